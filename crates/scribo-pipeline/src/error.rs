//! Pipeline error types.

use scribo_models::PipelineStep;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors surfaced by the orchestrator itself.
///
/// Stage failures are not errors here: they are recorded on the
/// [`crate::state::PipelineState`] as a `*_failed` step and the run halts.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Pipeline is at step {actual}, expected {expected}")]
    WrongStep {
        expected: PipelineStep,
        actual: PipelineStep,
    },

    #[error("selectedComponents.{0} is required")]
    IncompleteSelection(&'static str),

    #[error("Assembly failed: {0}")]
    AssemblyFailed(String),
}

/// A failed stage call, carrying the provider-facing message.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StageFailure(pub String);

impl StageFailure {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
