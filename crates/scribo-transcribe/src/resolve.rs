//! Audio URL resolution via the RapidAPI social-media-video-downloader.
//!
//! Given a social-video page URL, asks the downloader service for direct
//! media links and picks the best audio-bearing one. Some platforms come
//! back behind the SMVD edge proxy; those links are decoded to the
//! underlying CDN URL before being handed to the transcription provider.

use std::time::Duration;

use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{TranscribeError, TranscribeResult};

const DEFAULT_BASE_URL: &str = "https://social-media-video-downloader.p.rapidapi.com";
const RAPIDAPI_HOST: &str = "social-media-video-downloader.p.rapidapi.com";

/// Downloader client.
pub struct DownloaderClient {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SmvdResponse {
    #[serde(default)]
    success: bool,
    title: Option<String>,
    #[serde(default)]
    links: Vec<SmvdLink>,
}

#[derive(Debug, Deserialize)]
struct SmvdLink {
    link: String,
    quality: Option<String>,
    #[serde(rename = "hasAudio")]
    has_audio: Option<bool>,
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
}

/// A resolved, directly-fetchable media URL plus the video title.
#[derive(Debug)]
pub struct ResolvedAudio {
    pub audio_url: String,
    pub title: Option<String>,
}

impl DownloaderClient {
    /// Create a client from the `RAPIDAPI_KEY` environment variable.
    pub fn from_env() -> TranscribeResult<Self> {
        let api_key = std::env::var("RAPIDAPI_KEY")
            .map_err(|_| TranscribeError::config("RAPIDAPI_KEY not set"))?;
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
        }
    }

    /// Override the API base URL (used by tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve a social-video URL to a direct audio-bearing media URL.
    pub async fn resolve_audio_url(&self, video_url: &str) -> TranscribeResult<ResolvedAudio> {
        // TikTok share links carry tracking params the downloader chokes on
        let requested = if is_tiktok_url(video_url) {
            clean_tiktok_url(video_url)
        } else {
            video_url.to_string()
        };

        info!(video_url = %requested, "Resolving media links");

        let response = self
            .client
            .get(format!("{}/smvd/get/all", self.base_url))
            .query(&[("url", requested.as_str())])
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", RAPIDAPI_HOST)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscribeError::DownloaderHttp { status, body });
        }

        let parsed: SmvdResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::invalid_response(e.to_string()))?;

        if !parsed.success {
            return Err(TranscribeError::NoAudioLink(requested));
        }

        let link = pick_audio_link(&parsed.links)
            .ok_or_else(|| TranscribeError::NoAudioLink(requested.clone()))?;

        // SMVD proxies some platforms' media through its edge; decode to
        // the underlying CDN URL when possible
        let audio_url = decode_smvd_proxy_url(link).unwrap_or_else(|| link.to_string());
        debug!(audio_url = %audio_url, "Resolved audio url");

        Ok(ResolvedAudio {
            audio_url,
            title: parsed.title,
        })
    }
}

/// Pick the most transcription-friendly link: audio-only mime types
/// first, then anything flagged as carrying audio.
fn pick_audio_link(links: &[SmvdLink]) -> Option<&str> {
    links
        .iter()
        .find(|l| {
            l.mime_type
                .as_deref()
                .map(|m| m.starts_with("audio/"))
                .unwrap_or(false)
        })
        .or_else(|| links.iter().find(|l| l.has_audio == Some(true)))
        .or_else(|| {
            links
                .iter()
                .find(|l| l.quality.as_deref().map(|q| q.contains("audio")).unwrap_or(false))
        })
        .map(|l| l.link.as_str())
}

fn is_tiktok_url(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h == "tiktok.com" || h.ends_with(".tiktok.com")))
        .unwrap_or(false)
}

/// Keep only origin + path; TikTok query parameters break the downloader.
fn clean_tiktok_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => format!("{}{}", parsed.origin().ascii_serialization(), parsed.path()),
        Err(_) => url.to_string(),
    }
}

/// Decode an `api-edge.smvd.xyz?u=<base64(percent-encoded url)>` proxy
/// link to the underlying media URL. Returns `None` for non-proxy links
/// or undecodable payloads.
fn decode_smvd_proxy_url(link: &str) -> Option<String> {
    let parsed = Url::parse(link).ok()?;
    if !parsed.host_str()?.contains("api-edge.smvd.xyz") {
        return None;
    }

    let encoded = parsed
        .query_pairs()
        .find(|(k, _)| k == "u")
        .map(|(_, v)| v.into_owned())?;

    let decoded_bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .ok()?;
    let percent_encoded = String::from_utf8(decoded_bytes).ok()?;

    match urlencoding::decode(&percent_encoded) {
        Ok(url) => Some(url.into_owned()),
        Err(e) => {
            warn!(error = %e, "SMVD proxy payload not percent-decodable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_clean_tiktok_url_strips_query() {
        assert_eq!(
            clean_tiktok_url("https://www.tiktok.com/@user/video/123?is_from_webapp=1&sender=pc"),
            "https://www.tiktok.com/@user/video/123"
        );
    }

    #[test]
    fn test_decode_smvd_proxy_url() {
        let target = "https://cdn.example.com/audio.mp3?sig=a%2Bb";
        let encoded = base64::engine::general_purpose::STANDARD.encode(target);
        let proxy = format!("https://api-edge.smvd.xyz/dl?u={}", encoded);

        assert_eq!(
            decode_smvd_proxy_url(&proxy).unwrap(),
            "https://cdn.example.com/audio.mp3?sig=a+b"
        );
    }

    #[test]
    fn test_non_proxy_links_pass_through() {
        assert!(decode_smvd_proxy_url("https://cdn.example.com/audio.mp3").is_none());
    }

    #[test]
    fn test_pick_audio_link_prefers_audio_mime() {
        let links = vec![
            SmvdLink {
                link: "https://v.test/video.mp4".to_string(),
                quality: Some("720p".to_string()),
                has_audio: Some(true),
                mime_type: Some("video/mp4".to_string()),
            },
            SmvdLink {
                link: "https://v.test/audio.m4a".to_string(),
                quality: Some("audio".to_string()),
                has_audio: Some(true),
                mime_type: Some("audio/mp4".to_string()),
            },
        ];
        assert_eq!(pick_audio_link(&links).unwrap(), "https://v.test/audio.m4a");
    }

    #[tokio::test]
    async fn test_resolve_sends_rapidapi_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/smvd/get/all"))
            .and(header("x-rapidapi-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "title": "Clip",
                "links": [
                    {"link": "https://v.test/audio.m4a", "hasAudio": true, "mimeType": "audio/mp4"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = DownloaderClient::new("test-key").with_base_url(server.uri());
        let resolved = client
            .resolve_audio_url("https://www.instagram.com/reel/abc/")
            .await
            .unwrap();

        assert_eq!(resolved.audio_url, "https://v.test/audio.m4a");
        assert_eq!(resolved.title.as_deref(), Some("Clip"));
    }

    #[tokio::test]
    async fn test_unsuccessful_response_is_no_audio_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": false})),
            )
            .mount(&server)
            .await;

        let client = DownloaderClient::new("key").with_base_url(server.uri());
        let err = client
            .resolve_audio_url("https://www.tiktok.com/@u/video/1")
            .await
            .unwrap_err();
        assert!(matches!(err, TranscribeError::NoAudioLink(_)));
    }
}
