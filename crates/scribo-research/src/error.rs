//! Research crate error types.
//!
//! Only construction-time problems are hard errors here; the search and
//! extraction operations themselves soft-fail by contract.

use thiserror::Error;

pub type ResearchResult<T> = Result<T, ResearchError>;

#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ResearchError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
