//! Transcription error types.

use thiserror::Error;

pub type TranscribeResult<T> = Result<T, TranscribeError>;

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Downloader API returned {status}: {body}")]
    DownloaderHttp { status: u16, body: String },

    #[error("No audio link found for video: {0}")]
    NoAudioLink(String),

    #[error("Transcription provider rejected the job: {0}")]
    Rejected(String),

    #[error("Transcription failed: {0}")]
    Failed(String),

    #[error("Transcription did not complete within {attempts} polls")]
    TimedOut { attempts: u32 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl TranscribeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}
