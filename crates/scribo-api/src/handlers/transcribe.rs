//! Transcription handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    pub video_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeResponse {
    pub transcript: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// POST /api/transcribe
pub async fn transcribe(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<TranscribeRequest>,
) -> ApiResult<Json<TranscribeResponse>> {
    if request.video_url.trim().is_empty() {
        return Err(ApiError::bad_request("videoUrl is required"));
    }

    match state.transcription.transcribe_video(&request.video_url).await {
        Ok(result) => {
            metrics::record_transcription("ok");
            info!(
                uid = %user.uid,
                transcript_chars = result.transcript.len(),
                "Video transcribed"
            );
            Ok(Json(TranscribeResponse {
                transcript: result.transcript,
                title: result.title,
            }))
        }
        Err(e) => {
            metrics::record_transcription("error");
            Err(e.into())
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeAndScriptResponse {
    pub transcript: String,
    pub script: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// POST /api/transcribe-and-script
///
/// Transcribes a reference video and generates a fresh script from the
/// transcript in one call.
pub async fn transcribe_and_script(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<TranscribeRequest>,
) -> ApiResult<Json<TranscribeAndScriptResponse>> {
    if request.video_url.trim().is_empty() {
        return Err(ApiError::bad_request("videoUrl is required"));
    }

    let result = match state.transcription.transcribe_video(&request.video_url).await {
        Ok(r) => {
            metrics::record_transcription("ok");
            r
        }
        Err(e) => {
            metrics::record_transcription("error");
            return Err(e.into());
        }
    };

    let script = match scribo_gen::script_from_transcript(&state.gemini, &result.transcript).await {
        Ok(s) => {
            metrics::record_generation_call("rewrite", "ok");
            s
        }
        Err(e) => {
            metrics::record_generation_call("rewrite", "error");
            return Err(e.into());
        }
    };

    info!(
        uid = %user.uid,
        transcript_chars = result.transcript.len(),
        script_chars = script.len(),
        "Transcribed and scripted"
    );

    Ok(Json(TranscribeAndScriptResponse {
        transcript: result.transcript,
        script,
        title: result.title,
    }))
}
