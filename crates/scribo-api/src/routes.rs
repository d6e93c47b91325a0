//! API routes.

use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::generate::{final_script, script_components};
use crate::handlers::pipeline::run_pipeline;
use crate::handlers::research::{extract_content, research_brief, search_sources};
use crate::handlers::scripts::{
    delete_script, get_script, list_scripts, rename_script, save_script,
};
use crate::handlers::transcribe::{transcribe, transcribe_and_script};
use crate::handlers::{health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Staged pipeline routes (each stage is a separate call so the client
    // can render intermediate results and retry a single stage)
    let research_routes = Router::new()
        .route("/search-sources", post(search_sources))
        .route("/extract-content", post(extract_content))
        .route("/research-brief", post(research_brief));

    let generation_routes = Router::new()
        .route("/script-components", post(script_components))
        .route("/final-script", post(final_script))
        // One-shot server-side run of search through component generation
        .route("/pipeline/run", post(run_pipeline));

    let transcription_routes = Router::new()
        .route("/transcribe", post(transcribe))
        .route("/transcribe-and-script", post(transcribe_and_script));

    let script_routes = Router::new()
        .route("/scripts", post(save_script))
        .route("/scripts", get(list_scripts))
        .route("/scripts/:script_id", get(get_script))
        .route("/scripts/:script_id", delete(delete_script))
        .route("/scripts/:script_id/title", patch(rename_script));

    // Create rate limiter for API routes
    let rate_limiter = std::sync::Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let api_routes = Router::new()
        .merge(research_routes)
        .merge(generation_routes)
        .merge(transcription_routes)
        .merge(script_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        // SECURITY: Request body size limit to prevent DoS attacks
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
