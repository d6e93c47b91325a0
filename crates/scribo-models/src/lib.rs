//! Shared data models for the Scribo backend.
//!
//! This crate provides Serde-serializable types for:
//! - Research sources and extracted page content
//! - Script components (hooks, factsets, takes, outros)
//! - User component selections and voice profiles
//! - Pipeline step identifiers for the generation workflow
//! - Saved script documents

pub mod saved_script;
pub mod script;
pub mod source;
pub mod step;
pub mod voice;

// Re-export common types
pub use saved_script::SavedScript;
pub use script::{
    Factset, FactsetCategory, Outro, ScriptComponents, ScriptHook, Take, UserSelection,
};
pub use source::{ExtractedContent, Source, SourceContent};
pub use step::PipelineStep;
pub use voice::{VoiceProfile, VoiceProfileData};
