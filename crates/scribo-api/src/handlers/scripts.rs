//! Saved-script CRUD handlers. All routes require a verified Firebase user;
//! scripts live in a per-user subcollection so one user can never read
//! another's documents.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use scribo_models::{SavedScript, Source};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveScriptRequest {
    pub title: String,
    pub video_idea: String,
    pub script: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveScriptResponse {
    pub id: Uuid,
}

/// POST /api/scripts
pub async fn save_script(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<SaveScriptRequest>,
) -> ApiResult<(StatusCode, Json<SaveScriptResponse>)> {
    if request.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }
    if request.script.trim().is_empty() {
        return Err(ApiError::bad_request("script is required"));
    }

    let script = SavedScript {
        id: Uuid::new_v4(),
        title: request.title,
        video_idea: request.video_idea,
        script: request.script,
        sources: request.sources,
        created_at: Utc::now(),
    };

    state.scripts.save(&user.uid, &script).await?;
    info!(uid = %user.uid, script_id = %script.id, "Script saved");

    Ok((
        StatusCode::CREATED,
        Json(SaveScriptResponse { id: script.id }),
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListScriptsResponse {
    pub scripts: Vec<SavedScript>,
}

/// GET /api/scripts
pub async fn list_scripts(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ListScriptsResponse>> {
    let scripts = state.scripts.list(&user.uid, None).await?;
    Ok(Json(ListScriptsResponse { scripts }))
}

/// GET /api/scripts/:id
pub async fn get_script(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SavedScript>> {
    match state.scripts.get(&user.uid, id).await? {
        Some(script) => Ok(Json(script)),
        None => Err(ApiError::not_found(format!("Script {} not found", id))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameScriptRequest {
    pub title: String,
}

/// PATCH /api/scripts/:id/title
pub async fn rename_script(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RenameScriptRequest>,
) -> ApiResult<StatusCode> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }

    state.scripts.rename(&user.uid, id, title).await?;
    info!(uid = %user.uid, script_id = %id, "Script renamed");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/scripts/:id
pub async fn delete_script(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.scripts.delete(&user.uid, id).await?;
    info!(uid = %user.uid, script_id = %id, "Script deleted");
    Ok(StatusCode::NO_CONTENT)
}
