//! Server-side pipeline run handler.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use scribo_models::{PipelineStep, ScriptComponents, Source};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRunRequest {
    pub video_idea: String,
    #[serde(default)]
    pub num_results: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRunResponse {
    pub current_step: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_step: Option<String>,
    pub steps: Vec<String>,
    pub sources: Vec<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_brief: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<ScriptComponents>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

fn step_names(steps: &[PipelineStep]) -> Vec<String> {
    steps.iter().map(|s| s.as_str().to_string()).collect()
}

/// POST /api/pipeline/run
///
/// Runs search, extraction, analysis, and component generation in one
/// server-side pass and returns the resulting state snapshot. The client
/// still makes the component selection and calls the assembly endpoint.
pub async fn run_pipeline(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<PipelineRunRequest>,
) -> ApiResult<Json<PipelineRunResponse>> {
    if request.video_idea.trim().is_empty() {
        return Err(ApiError::bad_request("videoIdea is required"));
    }

    let num_results = request
        .num_results
        .unwrap_or(state.config.search_results)
        .min(scribo_research::MAX_RESULTS_PER_REQUEST);

    let run = state.pipeline.run(&request.video_idea, num_results).await;
    metrics::record_pipeline_run(run.current_step.as_str());

    info!(
        uid = %user.uid,
        final_step = run.current_step.as_str(),
        sources = run.sources.len(),
        "Pipeline run finished"
    );

    Ok(Json(PipelineRunResponse {
        current_step: run.current_step.as_str().to_string(),
        error_step: run.error_step.map(|s| s.as_str().to_string()),
        steps: step_names(&run.history),
        sources: run.sources,
        research_brief: run.research_brief,
        components: run.components,
        diagnostics: run.diagnostics,
    }))
}
