//! Generation-stage handlers: script components and final assembly.
//!
//! Both hard-fail with a structured error on a blocked or malformed
//! model response; neither fabricates fallback content.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use scribo_gen::CostEstimate;
use scribo_models::{ScriptComponents, UserSelection, VoiceProfile};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentsRequest {
    pub video_idea: String,
    pub research_brief: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentsResponse {
    pub components: ScriptComponents,
    pub cost: CostEstimate,
}

/// POST /api/script-components
pub async fn script_components(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ComponentsRequest>,
) -> ApiResult<Json<ComponentsResponse>> {
    let result =
        scribo_gen::generate_components(&state.gemini, &request.video_idea, &request.research_brief)
            .await;

    match result {
        Ok(bundle) => {
            metrics::record_generation_call("components", "ok");
            info!(
                uid = %user.uid,
                hooks = bundle.components.hooks.len(),
                factsets = bundle.components.factsets.len(),
                outros = bundle.components.outros.len(),
                estimated_cost_usd = bundle.cost.total_cost,
                "Script components generated"
            );
            Ok(Json(ComponentsResponse {
                components: bundle.components,
                cost: bundle.cost,
            }))
        }
        Err(e) => {
            metrics::record_generation_call("components", "error");
            Err(e.into())
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalScriptRequest {
    pub video_idea: String,
    pub selected_components: UserSelection,
    pub voice_profile: Option<VoiceProfile>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalScriptResponse {
    pub script: String,
}

/// POST /api/final-script
///
/// All four selections are mandatory; an incomplete selection is
/// rejected with 400 before any model call.
pub async fn final_script(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<FinalScriptRequest>,
) -> ApiResult<Json<FinalScriptResponse>> {
    let voice_data = request.voice_profile.as_ref().map(|v| &v.voice_profile);

    let result = scribo_gen::assemble_script(
        &state.gemini,
        &request.video_idea,
        &request.selected_components,
        voice_data,
    )
    .await;

    match result {
        Ok(script) => {
            metrics::record_generation_call("assemble", "ok");
            info!(uid = %user.uid, script_chars = script.len(), "Final script assembled");
            Ok(Json(FinalScriptResponse { script }))
        }
        Err(e) => {
            metrics::record_generation_call("assemble", "error");
            Err(e.into())
        }
    }
}
