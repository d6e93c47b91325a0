//! Generation error types.

use thiserror::Error;

pub type GenResult<T> = Result<T, GenError>;

/// Errors from the generative-language client.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Model returned no text (finish reason: {finish_reason})")]
    Blocked {
        finish_reason: String,
        /// Raw safety ratings from the candidate, for diagnostics.
        safety_ratings: Vec<serde_json::Value>,
    },

    #[error("Failed to parse model output: {0}")]
    Parse(String),

    #[error("Model output did not match the expected schema: {0}")]
    Schema(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GenError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True for failures of the model output itself (blocked, empty or
    /// malformed completion) as opposed to transport/config problems.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            GenError::Blocked { .. } | GenError::Parse(_) | GenError::Schema(_)
        )
    }
}
