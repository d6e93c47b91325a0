//! Research source and extracted-content models.

use serde::{Deserialize, Serialize};

/// A candidate reference returned by the external source search.
///
/// Identified by `link`; created per search call and either discarded or
/// persisted verbatim alongside the eventual saved script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Extraction output for a single source URL.
///
/// The wire format carries only the text; extraction is always
/// "soft-succeeding" (HTTP 200) and the caller infers success from the
/// failure phrasing the extractor emits for degraded results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContent {
    pub source_link: String,
    pub text: String,
    pub succeeded: bool,
}

/// Prefixes the extractor uses for human-readable failure text.
///
/// Kept in one place so classification stays idempotent: extracting the
/// same static URL twice yields the same succeeded/failed outcome.
const FAILURE_PREFIXES: &[&str] = &[
    "Content not accessible from",
    "Failed to fetch content from",
    "YouTube video transcript not available",
    "Error fetching YouTube transcript",
];

impl ExtractedContent {
    /// Build from extractor output, inferring the success flag from the
    /// known failure phrasings.
    pub fn from_text(source_link: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let succeeded = !is_failure_text(&text);
        Self {
            source_link: source_link.into(),
            text,
            succeeded,
        }
    }
}

/// Check whether extracted text is one of the extractor's descriptive
/// failure messages rather than real page content.
pub fn is_failure_text(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || FAILURE_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// One entry of the Research Synthesizer input: a source plus whatever
/// text extraction produced for it (real content or failure description).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceContent {
    pub link: String,
    pub title: String,
    pub text: String,
}

impl SourceContent {
    /// Every element must carry a non-empty link and title; the whole
    /// synthesis request is rejected otherwise.
    pub fn is_valid(&self) -> bool {
        !self.link.trim().is_empty() && !self.title.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_text_classification() {
        assert!(is_failure_text(
            "Content not accessible from example.com: The page is protected"
        ));
        assert!(is_failure_text(
            "Failed to fetch content from example.com: Request timed out."
        ));
        assert!(is_failure_text(""));
        assert!(!is_failure_text("Urban beekeeping improves pollination."));
    }

    #[test]
    fn test_extracted_content_infers_success() {
        let ok = ExtractedContent::from_text("https://a.test", "Real article text");
        assert!(ok.succeeded);

        let failed = ExtractedContent::from_text(
            "https://b.test",
            "Failed to fetch content from b.test: Request timed out.",
        );
        assert!(!failed.succeeded);
    }

    #[test]
    fn test_classification_is_stable() {
        // Same input always classifies the same way
        let text = "Content not accessible from x.test: CAPTCHA challenge";
        let a = ExtractedContent::from_text("https://x.test", text);
        let b = ExtractedContent::from_text("https://x.test", text);
        assert_eq!(a.succeeded, b.succeeded);
    }

    #[test]
    fn test_source_content_validation() {
        let valid = SourceContent {
            link: "https://a.test".to_string(),
            title: "A".to_string(),
            text: String::new(),
        };
        assert!(valid.is_valid());

        let missing_title = SourceContent {
            link: "https://a.test".to_string(),
            title: "  ".to_string(),
            text: "body".to_string(),
        };
        assert!(!missing_title.is_valid());
    }
}
