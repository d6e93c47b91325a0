//! Research-stage handlers: source search, content extraction and
//! brief synthesis.
//!
//! Search and extraction soft-fail: they always answer 200 and describe
//! failures in the payload, so one bad source never aborts a research
//! pass. Brief synthesis hard-fails with a structured error.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use scribo_models::{Source, SourceContent};
use scribo_research::MAX_RESULTS_PER_REQUEST;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub num_results: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub sources: Vec<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

/// POST /api/search-sources
///
/// Always 200: a degraded search returns zero sources plus a diagnostic.
pub async fn search_sources(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<SearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    if request.query.trim().is_empty() {
        return Err(ApiError::bad_request("query is required"));
    }

    let num_results = request
        .num_results
        .unwrap_or(state.config.search_results)
        .min(MAX_RESULTS_PER_REQUEST);

    let outcome = state.search.search(&request.query, num_results).await;
    info!(
        uid = %user.uid,
        sources = outcome.sources.len(),
        degraded = outcome.diagnostic.is_some(),
        "Source search completed"
    );

    Ok(Json(SearchResponse {
        sources: outcome.sources,
        diagnostic: outcome.diagnostic,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub extracted_text: String,
    pub logs: Vec<String>,
}

/// POST /api/extract-content
///
/// Always 200; on logical failure `extractedText` carries a
/// human-readable description instead of content.
pub async fn extract_content(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(request): Json<ExtractRequest>,
) -> ApiResult<Json<ExtractResponse>> {
    if request.url.trim().is_empty() {
        return Err(ApiError::bad_request("url is required"));
    }

    let extraction = state.extractor.extract(&request.url).await;

    Ok(Json(ExtractResponse {
        extracted_text: extraction.extracted_text,
        logs: extraction.logs,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefRequest {
    pub video_idea: String,
    pub source_contents: Vec<SourceContent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefResponse {
    pub research_brief: String,
}

/// POST /api/research-brief
pub async fn research_brief(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<BriefRequest>,
) -> ApiResult<Json<BriefResponse>> {
    let result =
        scribo_gen::synthesize_brief(&state.gemini, &request.video_idea, &request.source_contents)
            .await;

    match result {
        Ok(research_brief) => {
            metrics::record_generation_call("brief", "ok");
            info!(uid = %user.uid, brief_chars = research_brief.len(), "Research brief generated");
            Ok(Json(BriefResponse { research_brief }))
        }
        Err(e) => {
            metrics::record_generation_call("brief", "error");
            Err(e.into())
        }
    }
}
