//! Video transcription: resolve a social-media video URL to a fetchable
//! audio link, then transcribe it through AssemblyAI.

pub mod assemblyai;
pub mod error;
pub mod poll;
pub mod resolve;

pub use assemblyai::TranscriptionClient;
pub use error::{TranscribeError, TranscribeResult};
pub use poll::{poll_with_ceiling, PollConfig, PollOutcome, PollStatus};
pub use resolve::{DownloaderClient, ResolvedAudio};

/// A resolved-and-transcribed video.
#[derive(Debug)]
pub struct VideoTranscript {
    pub transcript: String,
    /// Title reported by the downloader, when it provides one.
    pub title: Option<String>,
}

/// Downloader plus transcription provider behind one entry point.
pub struct TranscriptionService {
    downloader: DownloaderClient,
    transcriber: TranscriptionClient,
}

impl TranscriptionService {
    pub fn new(downloader: DownloaderClient, transcriber: TranscriptionClient) -> Self {
        Self {
            downloader,
            transcriber,
        }
    }

    pub fn from_env() -> TranscribeResult<Self> {
        Ok(Self::new(
            DownloaderClient::from_env()?,
            TranscriptionClient::from_env()?,
        ))
    }

    /// Transcribe a public social-media video URL end to end.
    pub async fn transcribe_video(&self, video_url: &str) -> TranscribeResult<VideoTranscript> {
        let resolved = self.downloader.resolve_audio_url(video_url).await?;
        let transcript = self.transcriber.transcribe(&resolved.audio_url).await?;
        Ok(VideoTranscript {
            transcript,
            title: resolved.title,
        })
    }
}
