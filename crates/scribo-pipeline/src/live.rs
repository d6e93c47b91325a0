//! Live stage adapters over the real service clients.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use scribo_gen::GeminiClient;
use scribo_models::{
    ExtractedContent, ScriptComponents, SourceContent, UserSelection, VoiceProfileData,
};
use scribo_research::{Extractor, SearchClient, SearchOutcome};

use crate::error::StageFailure;
use crate::runner::Pipeline;
use crate::stages::{
    BriefSynthesizer, ComponentGenerator, ContentExtractor, ScriptAssembler, SourceSearcher,
};

pub struct LiveSearcher(pub SearchClient);

#[async_trait]
impl SourceSearcher for LiveSearcher {
    async fn search(&self, topic: &str, num_results: u32) -> SearchOutcome {
        self.0.search(topic, num_results).await
    }
}

pub struct LiveExtractor(pub Extractor);

#[async_trait]
impl ContentExtractor for LiveExtractor {
    async fn extract(&self, url: &str) -> ExtractedContent {
        let extraction = self.0.extract(url).await;
        for line in &extraction.logs {
            debug!(url = %url, "{}", line);
        }
        ExtractedContent::from_text(url, extraction.extracted_text)
    }
}

pub struct LiveSynthesizer(pub Arc<GeminiClient>);

#[async_trait]
impl BriefSynthesizer for LiveSynthesizer {
    async fn synthesize(
        &self,
        topic: &str,
        sources: &[SourceContent],
    ) -> Result<String, StageFailure> {
        scribo_gen::synthesize_brief(&self.0, topic, sources)
            .await
            .map_err(|e| StageFailure::new(e.to_string()))
    }
}

pub struct LiveGenerator(pub Arc<GeminiClient>);

#[async_trait]
impl ComponentGenerator for LiveGenerator {
    async fn generate(
        &self,
        topic: &str,
        research_brief: &str,
    ) -> Result<ScriptComponents, StageFailure> {
        let bundle = scribo_gen::generate_components(&self.0, topic, research_brief)
            .await
            .map_err(|e| StageFailure::new(e.to_string()))?;
        debug!(
            estimated_cost_usd = bundle.cost.total_cost,
            "Component generation cost estimated"
        );
        Ok(bundle.components)
    }
}

pub struct LiveAssembler(pub Arc<GeminiClient>);

#[async_trait]
impl ScriptAssembler for LiveAssembler {
    async fn assemble(
        &self,
        topic: &str,
        selection: &UserSelection,
        voice_profile: Option<&VoiceProfileData>,
    ) -> Result<String, StageFailure> {
        scribo_gen::assemble_script(&self.0, topic, selection, voice_profile)
            .await
            .map_err(|e| StageFailure::new(e.to_string()))
    }
}

/// Wire a pipeline over the live search, extraction and generation clients.
pub fn live_pipeline(search: SearchClient, gemini: Arc<GeminiClient>) -> Pipeline {
    Pipeline::new(
        Arc::new(LiveSearcher(search)),
        Arc::new(LiveExtractor(Extractor::new())),
        Arc::new(LiveSynthesizer(gemini.clone())),
        Arc::new(LiveGenerator(gemini.clone())),
        Arc::new(LiveAssembler(gemini)),
    )
}
