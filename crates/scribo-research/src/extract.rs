//! Content extraction for a single source URL.
//!
//! Contract: extraction never raises for network or content errors.
//! Every failure mode degrades to a human-readable explanation returned
//! as the extracted text, so a research pass can keep partial results
//! from its other sources.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};
use url::Url;

use crate::captions::{self, CaptionError};
use crate::scrub::scrub_text;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Page titles containing any of these mark a soft-block/interstitial
/// page that must not be returned as content.
const RESTRICTION_KEYWORDS: &[&str] = &[
    "restricted",
    "unsupported browser",
    "error",
    "captcha",
    "login",
    "access denied",
    "block",
    "forbidden",
    "not available",
    "checking your browser",
    "just a moment",
];

/// Explicit article/main containers, tried first.
static MAIN_CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "article, main, [role=\"main\"], .main-content, .post-content, \
         .entry-content, #content, .content, #main-content",
    )
    .expect("valid selector")
});

/// Heading/paragraph/list fallback.
static TEXT_TAGS_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, p, li").expect("valid selector")
});

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));

/// Result of extracting one URL. `extracted_text` is either cleaned
/// content or a descriptive failure message; `logs` records what
/// happened for diagnostics.
#[derive(Debug)]
pub struct Extraction {
    pub extracted_text: String,
    pub logs: Vec<String>,
}

/// Content extractor for webpage and video-caption sources.
pub struct Extractor {
    client: Client,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// Extract cleaned plain text from a URL.
    ///
    /// Never returns an error; failures become descriptive text.
    pub async fn extract(&self, url: &str) -> Extraction {
        let mut logs = vec![format!("[extract] received url: {}", url)];

        let text = if is_video_url(url) {
            logs.push("[extract] video platform url detected".to_string());
            self.extract_captions(url, &mut logs).await
        } else {
            logs.push("[extract] website url detected".to_string());
            self.extract_webpage(url, &mut logs).await
        };

        let scrubbed = scrub_text(&text);
        logs.push(format!(
            "[extract] raw length: {}, scrubbed length: {}",
            text.len(),
            scrubbed.len()
        ));

        Extraction {
            extracted_text: scrubbed,
            logs,
        }
    }

    async fn extract_captions(&self, url: &str, logs: &mut Vec<String>) -> String {
        match captions::fetch_captions(&self.client, url).await {
            Ok(text) => {
                logs.push("[extract] fetched publisher captions".to_string());
                text
            }
            Err(CaptionError::NoTrack) => {
                logs.push("[extract] no caption track found".to_string());
                "YouTube video transcript not available via captions \
                 (automatic transcription fallback not implemented)."
                    .to_string()
            }
            Err(e) => {
                warn!(url, error = %e, "Caption fetch failed");
                logs.push(format!("[extract] caption fetch failed: {}", e));
                format!("Error fetching YouTube transcript: {}", e)
            }
        }
    }

    async fn extract_webpage(&self, url: &str, logs: &mut Vec<String>) -> String {
        let host = host_of(url);

        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "Request timed out.".to_string()
                } else {
                    e.to_string()
                };
                warn!(url, error = %reason, "Webpage fetch failed");
                logs.push(format!("[extract] fetch error: {}", reason));
                return format!("Failed to fetch content from {}: {}", host, reason);
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            logs.push(format!("[extract] http status {}", status));
            return format!(
                "Failed to fetch content from {}: Request failed with status code {}",
                host,
                status.as_u16()
            );
        }

        let html = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                logs.push(format!("[extract] body read error: {}", e));
                return format!("Failed to fetch content from {}: {}", host, e);
            }
        };

        match extract_from_html(&html) {
            HtmlExtraction::Content { text, used_body } => {
                if used_body {
                    logs.push("[extract] used body text fallback; may be noisy".to_string());
                } else {
                    logs.push("[extract] parsed semantic containers".to_string());
                }
                info!(url, chars = text.len(), "Webpage content extracted");
                text
            }
            HtmlExtraction::Restricted { title } => {
                logs.push(format!(
                    "[extract] restriction page detected, title: \"{}\"",
                    title
                ));
                format!(
                    "Content not accessible from {}: The page is protected or requires \
                     browser interaction (e.g., CAPTCHA, login, Cloudflare challenge).",
                    host
                )
            }
        }
    }
}

enum HtmlExtraction {
    Content { text: String, used_body: bool },
    Restricted { title: String },
}

/// Pull text out of a parsed page, in container priority order.
///
/// Synchronous on purpose: `Html` is not `Send` and must not live
/// across an await point.
fn extract_from_html(html: &str) -> HtmlExtraction {
    let document = Html::parse_document(html);

    let title: String = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|t| t.text().collect::<String>())
        .unwrap_or_default();

    // Blocked/interstitial pages respond 200 with a telltale title
    let title_lower = title.to_lowercase();
    if RESTRICTION_KEYWORDS.iter().any(|k| title_lower.contains(k)) {
        return HtmlExtraction::Restricted {
            title: title.trim().to_string(),
        };
    }

    let mut content = String::new();
    for element in document.select(&MAIN_CONTENT_SELECTOR) {
        content.push_str(&element.text().collect::<Vec<_>>().join(" "));
        content.push_str("\n\n");
    }

    if content.trim().is_empty() {
        for element in document.select(&TEXT_TAGS_SELECTOR) {
            let text: String = element.text().collect::<Vec<_>>().join(" ");
            let text = text.trim();
            if !text.is_empty() {
                content.push_str(text);
                content.push('\n');
            }
        }
    }

    let mut used_body = false;
    if content.trim().is_empty() {
        used_body = true;
        if let Some(body) = document.select(&BODY_SELECTOR).next() {
            content = body.text().collect::<Vec<_>>().join(" ");
        }
    }

    HtmlExtraction::Content {
        text: content,
        used_body,
    }
}

/// Classify video-platform URLs that should go down the caption path.
pub fn is_video_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    host == "youtube.com"
        || host.ends_with(".youtube.com")
        || host == "youtu.be"
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| url.to_string())
}
