//! Research brief synthesis.
//!
//! Consolidates all extracted source texts for one video idea into a
//! single ~300-400 word briefing document. The brief is a hard
//! dependency of component generation, so failures here are structural
//! errors rather than degraded text.

use scribo_models::SourceContent;
use tracing::info;

use crate::client::{GeminiClient, GenerateOptions};
use crate::error::{GenError, GenResult};

/// Per-source excerpt cap in characters; longer texts are truncated with
/// an ellipsis marker so a handful of big pages cannot crowd out the rest.
const MAX_EXCERPT_CHARS: usize = 2000;

/// Synthesize a research brief from the video idea and extracted sources.
///
/// Every element of `sources` must carry a non-empty link and title, and
/// the array itself must be non-empty; violations are rejected before any
/// model call.
pub async fn synthesize_brief(
    client: &GeminiClient,
    video_idea: &str,
    sources: &[SourceContent],
) -> GenResult<String> {
    if video_idea.trim().is_empty() {
        return Err(GenError::invalid_input("videoIdea is required"));
    }
    if sources.is_empty() {
        return Err(GenError::invalid_input(
            "a non-empty array of source contents is required",
        ));
    }
    if let Some(bad) = sources.iter().position(|s| !s.is_valid()) {
        return Err(GenError::invalid_input(format!(
            "source content at index {} is missing a link or title",
            bad
        )));
    }

    let prompt = build_brief_prompt(video_idea, sources);
    info!(
        sources = sources.len(),
        prompt_chars = prompt.len(),
        "Synthesizing research brief"
    );

    let brief = client.generate(&prompt, &GenerateOptions::default()).await?;
    info!(brief_chars = brief.len(), "Research brief generated");
    Ok(brief)
}

fn build_brief_prompt(video_idea: &str, sources: &[SourceContent]) -> String {
    let mut prompt = format!(
        "Video Idea: \"{video_idea}\"\n\n\
         Based on the following source materials, synthesize a comprehensive \
         research briefing document of 300-400 words. Consolidate the key \
         information, facts and insights relevant to the video idea. This \
         document will be used as the foundational text to generate the parts \
         of a short-form video script, so focus on clarity, accuracy and \
         relevance.\n\nSource Materials:\n"
    );

    for (index, source) in sources.iter().enumerate() {
        prompt.push_str(&format!(
            "\n--- Source {} ---\nTitle: {}\nLink: {}\nContent:\n{}\n",
            index + 1,
            source.title,
            source.link,
            excerpt(&source.text)
        ));
    }

    prompt
}

/// Cap a source text for prompt inclusion.
fn excerpt(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return "[No text extracted]".to_string();
    }
    if text.chars().count() <= MAX_EXCERPT_CHARS {
        return text.to_string();
    }
    let capped: String = text.chars().take(MAX_EXCERPT_CHARS).collect();
    format!("{}... (truncated)", capped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(link: &str, title: &str, text: &str) -> SourceContent {
        SourceContent {
            link: link.to_string(),
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_sources_rejected_before_network() {
        // Client points nowhere; an attempted call would error differently
        let client = GeminiClient::new("key", "model").with_base_url("http://127.0.0.1:1");
        let err = synthesize_brief(&client, "urban beekeeping benefits", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_source_missing_title_rejected() {
        let client = GeminiClient::new("key", "model").with_base_url("http://127.0.0.1:1");
        let sources = [source("https://a.test", "", "text")];
        let err = synthesize_brief(&client, "idea", &sources).await.unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(_)));
    }

    #[test]
    fn test_excerpt_caps_long_text() {
        let long = "x".repeat(5000);
        let capped = excerpt(&long);
        assert!(capped.ends_with("... (truncated)"));
        assert!(capped.chars().count() < 2100);
    }

    #[test]
    fn test_excerpt_keeps_short_text() {
        assert_eq!(excerpt("short text"), "short text");
        assert_eq!(excerpt("   "), "[No text extracted]");
    }

    #[test]
    fn test_prompt_lists_every_source() {
        let sources = [
            source("https://a.test", "A", "alpha"),
            source("https://b.test", "B", "bravo"),
        ];
        let prompt = build_brief_prompt("idea", &sources);
        assert!(prompt.contains("--- Source 1 ---"));
        assert!(prompt.contains("--- Source 2 ---"));
        assert!(prompt.contains("https://b.test"));
        assert!(prompt.contains("alpha"));
    }
}
