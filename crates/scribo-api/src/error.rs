//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use scribo_gen::GenError;
use scribo_transcribe::TranscribeError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Generation blocked (finish reason: {finish_reason})")]
    GenerationBlocked {
        finish_reason: String,
        safety_ratings: Vec<serde_json::Value>,
    },

    #[error("Firestore error: {0}")]
    Firestore(#[from] scribo_firestore::FirestoreError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) | ApiError::GenerationBlocked { .. } => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Firestore(e) => e
                .http_status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl From<GenError> for ApiError {
    fn from(e: GenError) -> Self {
        match e {
            GenError::InvalidInput(msg) => ApiError::BadRequest(msg),
            GenError::Blocked {
                finish_reason,
                safety_ratings,
            } => ApiError::GenerationBlocked {
                finish_reason,
                safety_ratings,
            },
            GenError::Config(msg) => ApiError::Internal(msg),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<TranscribeError> for ApiError {
    fn from(e: TranscribeError) -> Self {
        match e {
            TranscribeError::Config(msg) => ApiError::Internal(msg),
            TranscribeError::NoAudioLink(url) => {
                ApiError::BadRequest(format!("No downloadable audio found for {}", url))
            }
            TranscribeError::TimedOut { attempts } => ApiError::UpstreamTimeout(format!(
                "transcription did not complete within {} polls",
                attempts
            )),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let error = match &self {
            ApiError::Internal(_) | ApiError::Firestore(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let details = match &self {
            ApiError::GenerationBlocked {
                finish_reason,
                safety_ratings,
            } => Some(serde_json::json!({
                "finishReason": finish_reason,
                "safetyRatings": safety_ratings,
            })),
            _ => None,
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_error_mapping() {
        let e: ApiError = GenError::invalid_input("videoIdea is required").into();
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);

        let e: ApiError = GenError::schema("missing field hooks").into();
        assert_eq!(e.status_code(), StatusCode::BAD_GATEWAY);

        let e: ApiError = GenError::Blocked {
            finish_reason: "SAFETY".to_string(),
            safety_ratings: vec![],
        }
        .into();
        assert_eq!(e.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_transcribe_error_mapping() {
        let e: ApiError = TranscribeError::TimedOut { attempts: 60 }.into();
        assert_eq!(e.status_code(), StatusCode::GATEWAY_TIMEOUT);

        let e: ApiError = TranscribeError::NoAudioLink("https://x.test".to_string()).into();
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    }
}
