//! Stage traits for the generation workflow.
//!
//! Each stage is a single-flight async exchange. Search and extraction
//! soft-fail (their outputs describe failure instead of raising); the
//! model-backed stages return a typed failure that halts the run.

use async_trait::async_trait;

use scribo_models::{ExtractedContent, ScriptComponents, SourceContent, UserSelection, VoiceProfileData};
use scribo_research::SearchOutcome;

use crate::error::StageFailure;

/// Finds candidate reference sources for a topic. Never fails hard: a
/// degraded search reports a diagnostic with zero sources.
#[async_trait]
pub trait SourceSearcher: Send + Sync {
    async fn search(&self, topic: &str, num_results: u32) -> SearchOutcome;
}

/// Reduces one URL to cleaned text or a descriptive failure message.
/// One bad source must never abort the others.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> ExtractedContent;
}

/// Consolidates extracted sources into a single research brief.
#[async_trait]
pub trait BriefSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        topic: &str,
        sources: &[SourceContent],
    ) -> Result<String, StageFailure>;
}

/// Produces the structured component bundle from topic and brief.
#[async_trait]
pub trait ComponentGenerator: Send + Sync {
    async fn generate(
        &self,
        topic: &str,
        research_brief: &str,
    ) -> Result<ScriptComponents, StageFailure>;
}

/// Weaves the user's selections into the final script.
#[async_trait]
pub trait ScriptAssembler: Send + Sync {
    async fn assemble(
        &self,
        topic: &str,
        selection: &UserSelection,
        voice_profile: Option<&VoiceProfileData>,
    ) -> Result<String, StageFailure>;
}
