//! Script generation from a reference-video transcript.

use tracing::info;

use crate::client::{GeminiClient, GenerateOptions};
use crate::error::{GenError, GenResult};

/// Generate a fresh short-form script from a transcribed reference video.
///
/// The transcript is treated as source material only; the output must be
/// a new script, not a paraphrase of the original.
pub async fn script_from_transcript(
    client: &GeminiClient,
    transcript: &str,
) -> GenResult<String> {
    if transcript.trim().is_empty() {
        return Err(GenError::invalid_input("transcript is required"));
    }

    let prompt = build_rewrite_prompt(transcript);
    let options = GenerateOptions {
        json_mode: false,
        temperature: Some(0.7),
        max_output_tokens: Some(2048),
    };

    let script = client.generate(&prompt, &options).await?;
    info!(
        transcript_chars = transcript.len(),
        script_chars = script.len(),
        "Script generated from transcript"
    );
    Ok(script)
}

fn build_rewrite_prompt(transcript: &str) -> String {
    format!(
        "The following is a transcript of a short-form video:\n\n\
         ---\n{transcript}\n---\n\n\
         Using this transcript only as source material, write a new \
         short-form video script covering the same topic. Keep the core \
         facts and the overall arc, but use original wording and a fresh \
         hook. Output only the script text, with bracketed stage \
         directions where natural."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_transcript() {
        let prompt = build_rewrite_prompt("bees are great for cities");
        assert!(prompt.contains("bees are great for cities"));
    }
}
