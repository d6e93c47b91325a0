//! YouTube caption fetching.
//!
//! Pulls publisher-provided captions by locating a caption track on the
//! watch page and fetching its timedtext XML. There is deliberately no
//! fallback to model-based transcription here; callers that want
//! transcription use the transcription service explicitly.

use std::sync::LazyLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use reqwest::Client;
use tracing::debug;

/// First caption track base URL embedded in the watch page player config.
static CAPTION_TRACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""captionTracks":\[\{"baseUrl":"([^"]+)""#).expect("valid regex")
});

/// Errors while fetching captions. The extractor converts these into
/// descriptive failure text; they never escape the extraction contract.
#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("no caption track available")]
    NoTrack,
    #[error("caption XML unparseable: {0}")]
    Xml(String),
}

/// Fetch captions for a YouTube video URL, joined into one text blob.
pub async fn fetch_captions(client: &Client, video_url: &str) -> Result<String, CaptionError> {
    let page = client.get(video_url).send().await?.text().await?;

    let track_url = CAPTION_TRACK_RE
        .captures(&page)
        .and_then(|c| c.get(1))
        .map(|m| unescape_track_url(m.as_str()))
        .ok_or(CaptionError::NoTrack)?;

    debug!(video_url, "Found caption track");

    let xml = client.get(&track_url).send().await?.text().await?;
    let text = parse_timedtext(&xml)?;

    if text.trim().is_empty() {
        return Err(CaptionError::NoTrack);
    }
    Ok(text)
}

/// The baseUrl is JSON-escaped inside the page source.
fn unescape_track_url(raw: &str) -> String {
    raw.replace("\\u0026", "&").replace("\\/", "/")
}

/// Join the `<text>` nodes of a timedtext document.
fn parse_timedtext(xml: &str) -> Result<String, CaptionError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => in_text = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => in_text = false,
            Ok(Event::Text(e)) if in_text => {
                let t = e
                    .unescape()
                    .map_err(|err| CaptionError::Xml(err.to_string()))?;
                let t = t.trim();
                if !t.is_empty() {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    out.push_str(t);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(CaptionError::Xml(e.to_string())),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timedtext_joins_lines() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
            <transcript>
                <text start="0.0" dur="2.1">city bees</text>
                <text start="2.1" dur="3.0">are thriving &amp; healthy</text>
            </transcript>"#;
        assert_eq!(
            parse_timedtext(xml).unwrap(),
            "city bees are thriving & healthy"
        );
    }

    #[test]
    fn test_track_url_unescaping() {
        assert_eq!(
            unescape_track_url("https://a.test/api\\u0026lang=en"),
            "https://a.test/api&lang=en"
        );
    }

    #[test]
    fn test_track_regex_matches_player_config() {
        let page = r#"..."captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","name":..."#;
        let url = CAPTION_TRACK_RE
            .captures(page)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap();
        assert!(url.starts_with("https://www.youtube.com/api/timedtext"));
    }
}
