//! Workflow orchestrator for staged script generation.
//!
//! An explicit finite-state machine (`PipelineStep` plus a typed
//! `PipelineState`) drives search, extraction, brief synthesis and
//! component generation, then assembles the final script once the user
//! has chosen components.

pub mod error;
pub mod live;
pub mod runner;
pub mod stages;
pub mod state;

pub use error::{PipelineError, PipelineResult, StageFailure};
pub use live::live_pipeline;
pub use runner::Pipeline;
pub use stages::{
    BriefSynthesizer, ComponentGenerator, ContentExtractor, ScriptAssembler, SourceSearcher,
};
pub use state::PipelineState;
