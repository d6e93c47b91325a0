//! AssemblyAI transcription client.
//!
//! Transcription is asynchronous on the provider side: submit the audio
//! URL, then poll the transcript status until it completes, fails or the
//! poll ceiling is reached.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{TranscribeError, TranscribeResult};
use crate::poll::{poll_with_ceiling, PollConfig, PollOutcome, PollStatus};

const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";

/// AssemblyAI client.
pub struct TranscriptionClient {
    api_key: String,
    base_url: String,
    client: Client,
    poll: PollConfig,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    audio_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
    status: String,
    text: Option<String>,
    error: Option<String>,
}

impl TranscriptionClient {
    /// Create a client from the `ASSEMBLYAI_API_KEY` environment variable.
    pub fn from_env() -> TranscribeResult<Self> {
        let api_key = std::env::var("ASSEMBLYAI_API_KEY")
            .map_err(|_| TranscribeError::config("ASSEMBLYAI_API_KEY not set"))?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            poll: PollConfig::new("assemblyai_transcript")
                .with_max_attempts(60)
                .with_interval(Duration::from_secs(5)),
        }
    }

    /// Override the API base URL (used by tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override polling behavior (tests use a tight interval).
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Transcribe a directly-fetchable audio URL to text.
    pub async fn transcribe(&self, audio_url: &str) -> TranscribeResult<String> {
        let transcript_id = self.submit(audio_url).await?;
        info!(transcript_id = %transcript_id, "Transcription submitted");

        let outcome = poll_with_ceiling(&self.poll, || self.check(&transcript_id)).await?;

        match outcome {
            PollOutcome::Completed(text) => {
                info!(transcript_id = %transcript_id, chars = text.len(), "Transcription completed");
                Ok(text)
            }
            PollOutcome::Failed(reason) => Err(TranscribeError::Failed(reason)),
            PollOutcome::TimedOut { attempts } => Err(TranscribeError::TimedOut { attempts }),
        }
    }

    async fn submit(&self, audio_url: &str) -> TranscribeResult<String> {
        let response = self
            .client
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&SubmitRequest { audio_url })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Rejected(format!("{}: {}", status, body)));
        }

        let parsed: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::invalid_response(e.to_string()))?;
        Ok(parsed.id)
    }

    async fn check(&self, transcript_id: &str) -> TranscribeResult<PollStatus<String>> {
        let response = self
            .client
            .get(format!("{}/transcript/{}", self.base_url, transcript_id))
            .header("authorization", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscribeError::invalid_response(format!(
                "status check returned {}: {}",
                status, body
            )));
        }

        let parsed: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::invalid_response(e.to_string()))?;

        Ok(match parsed.status.as_str() {
            "completed" => PollStatus::Done(parsed.text.unwrap_or_default()),
            "error" => PollStatus::Failed(
                parsed
                    .error
                    .unwrap_or_else(|| "unknown transcription error".to_string()),
            ),
            // "queued" | "processing"
            _ => PollStatus::Pending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_poll() -> PollConfig {
        PollConfig::new("test")
            .with_max_attempts(5)
            .with_interval(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_transcribe_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transcript"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t1", "status": "queued"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/transcript/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t1", "status": "completed", "text": "city bees thrive"
            })))
            .mount(&server)
            .await;

        let client = TranscriptionClient::new("key")
            .with_base_url(server.uri())
            .with_poll_config(fast_poll());
        let text = client.transcribe("https://cdn.test/a.m4a").await.unwrap();
        assert_eq!(text, "city bees thrive");
    }

    #[tokio::test]
    async fn test_provider_error_is_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transcript"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t2", "status": "queued"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/transcript/t2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t2", "status": "error", "error": "unreadable audio"
            })))
            .mount(&server)
            .await;

        let client = TranscriptionClient::new("key")
            .with_base_url(server.uri())
            .with_poll_config(fast_poll());
        let err = client.transcribe("https://cdn.test/a.m4a").await.unwrap_err();
        assert!(matches!(err, TranscribeError::Failed(reason) if reason == "unreadable audio"));
    }

    #[tokio::test]
    async fn test_never_completing_job_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transcript"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t3", "status": "queued"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/transcript/t3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t3", "status": "processing"
            })))
            .mount(&server)
            .await;

        let client = TranscriptionClient::new("key")
            .with_base_url(server.uri())
            .with_poll_config(fast_poll());
        let err = client.transcribe("https://cdn.test/a.m4a").await.unwrap_err();
        assert!(matches!(err, TranscribeError::TimedOut { attempts: 5 }));
    }

    #[tokio::test]
    async fn test_rejected_submission() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transcript"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad audio_url"))
            .mount(&server)
            .await;

        let client = TranscriptionClient::new("key")
            .with_base_url(server.uri())
            .with_poll_config(fast_poll());
        let err = client.transcribe("not-a-url").await.unwrap_err();
        assert!(matches!(err, TranscribeError::Rejected(_)));
    }
}
