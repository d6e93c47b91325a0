//! Application state.

use std::sync::Arc;

use scribo_firestore::{FirestoreClient, ScriptRepository};
use scribo_gen::GeminiClient;
use scribo_pipeline::{live_pipeline, Pipeline};
use scribo_research::{Extractor, SearchClient};
use scribo_transcribe::TranscriptionService;

use crate::auth::JwksCache;
use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub gemini: Arc<GeminiClient>,
    pub search: Arc<SearchClient>,
    pub extractor: Arc<Extractor>,
    pub pipeline: Arc<Pipeline>,
    pub transcription: Arc<TranscriptionService>,
    pub scripts: Arc<ScriptRepository>,
    pub jwks: Arc<JwksCache>,
}

impl AppState {
    /// Create new application state from the environment.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let gemini = Arc::new(GeminiClient::from_env()?);
        let search = Arc::new(SearchClient::from_env()?);
        let extractor = Arc::new(Extractor::new());
        let transcription = Arc::new(TranscriptionService::from_env()?);

        let firestore = FirestoreClient::from_env().await?;
        let scripts = Arc::new(ScriptRepository::new(firestore));

        let jwks = Arc::new(JwksCache::new(&config.firebase_project_id).await?);

        // The pipeline gets its own search client so per-route and
        // orchestrated calls stay independent.
        let pipeline = Arc::new(live_pipeline(SearchClient::from_env()?, gemini.clone()));

        Ok(Self {
            config,
            gemini,
            search,
            extractor,
            pipeline,
            transcription,
            scripts,
            jwks,
        })
    }
}
