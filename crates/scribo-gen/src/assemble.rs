//! Final script assembly.
//!
//! Weaves the user's four selected components into one flowing script,
//! optionally conditioned by a creator voice profile. A blocked or empty
//! completion is surfaced with its metadata; a fabricated script would
//! defeat the feature's purpose, so there is no fallback.

use scribo_models::{UserSelection, VoiceProfileData};
use tracing::info;

use crate::client::{GeminiClient, GenerateOptions};
use crate::error::{GenError, GenResult};

/// Assemble the final script from the user's selections.
///
/// All four selections (hook, bridge, golden nugget, wta) are mandatory;
/// an incomplete selection is rejected before any model call is made.
pub async fn assemble_script(
    client: &GeminiClient,
    video_idea: &str,
    selection: &UserSelection,
    voice_profile: Option<&VoiceProfileData>,
) -> GenResult<String> {
    if video_idea.trim().is_empty() {
        return Err(GenError::invalid_input("videoIdea is required"));
    }
    if let Some(missing) = selection.missing_field() {
        return Err(GenError::invalid_input(format!(
            "selectedComponents.{} is required",
            missing
        )));
    }

    let prompt = build_assembly_prompt(video_idea, selection, voice_profile)?;
    let options = GenerateOptions {
        json_mode: false,
        temperature: Some(0.7),
        max_output_tokens: Some(2048),
    };

    let script = client.generate(&prompt, &options).await?;
    info!(script_chars = script.len(), "Assembled final script");
    Ok(script)
}

fn build_assembly_prompt(
    video_idea: &str,
    selection: &UserSelection,
    voice_profile: Option<&VoiceProfileData>,
) -> GenResult<String> {
    let (Some(hook), Some(bridge), Some(nugget), Some(wta)) = (
        selection.hook.as_ref(),
        selection.bridge.as_ref(),
        selection.golden_nugget.as_ref(),
        selection.wta.as_ref(),
    ) else {
        return Err(GenError::invalid_input("selectedComponents is incomplete"));
    };

    let mut prompt = format!(
        "You are an expert scriptwriter assembling a cohesive, engaging \
         short-form video script (TikTok, YouTube Shorts, Instagram Reels).\n\n\
         Video Idea: \"{video_idea}\"\n\n"
    );

    if let Some(profile) = voice_profile {
        if profile.has_directives() {
            prompt.push_str("Voice directives - write in the creator's voice:\n");
            for tone in &profile.dominant_tones {
                prompt.push_str(&format!("- Tone: {}\n", tone));
            }
            for exemplar in &profile.tone_exemplars {
                prompt.push_str(&format!("- Example of their voice: \"{}\"\n", exemplar));
            }
            prompt.push('\n');
        }
        if profile.has_negative_constraints() {
            prompt.push_str("Never use these words or tones:\n");
            for banned in &profile.negative_constraints {
                prompt.push_str(&format!("- {}\n", banned));
            }
            prompt.push('\n');
        }
    }

    prompt.push_str(&format!(
        "Weave the following selected components into one flowing script \
         with smooth transitions, in this order.\n\n\
         Selected Hook:\nTitle: {}\nLines:\n{}\n\n\
         Selected Bridge:\n{}\n\n\
         Selected Golden Nugget:\n{}\n\n\
         Selected Why-To-Act:\nTitle: {}\nLines:\n{}\n\n\
         Output the script text itself, ready to be read aloud. You may add \
         brief bracketed stage directions (e.g. [VISUAL: ...]) where they \
         help delivery.",
        hook.title,
        hook.lines.join("\n"),
        bridge.content,
        nugget.content,
        wta.title,
        wta.lines.join("\n"),
    ));

    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribo_models::{Factset, FactsetCategory, Outro, ScriptHook};
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn complete_selection() -> UserSelection {
        UserSelection {
            hook: Some(ScriptHook {
                title: "Problem Hook".to_string(),
                lines: vec!["If you keep bees in a city, stop scrolling.".to_string()],
            }),
            bridge: Some(Factset {
                category: FactsetCategory::Bridge,
                content: "You've probably heard bees can't thrive downtown.".to_string(),
            }),
            golden_nugget: Some(Factset {
                category: FactsetCategory::GoldenNugget,
                content: "Rooftop hives actually out-produce rural ones.".to_string(),
            }),
            wta: Some(Outro {
                title: "Follow".to_string(),
                lines: vec!["For weekly beekeeping tips, hit follow.".to_string()],
            }),
        }
    }

    #[tokio::test]
    async fn test_incomplete_selection_rejected_without_network_call() {
        let server = MockServer::start().await;
        // Expect zero requests: rejection must happen before any call
        Mock::given(method("POST"))
            .and(path_regex(r":generateContent"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = GeminiClient::new("key", "model").with_base_url(server.uri());
        let mut selection = complete_selection();
        selection.wta = None;

        let err = assemble_script(&client, "idea", &selection, None)
            .await
            .unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(msg) if msg.contains("wta")));
    }

    #[tokio::test]
    async fn test_assembles_script_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r":generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": "If you keep bees in a city, stop scrolling. [VISUAL: rooftop hive] For weekly beekeeping tips, hit follow."}]},
                    "finishReason": "STOP"
                }]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new("key", "model").with_base_url(server.uri());
        let script = assemble_script(&client, "urban beekeeping benefits", &complete_selection(), None)
            .await
            .unwrap();

        // Recognizable fragments of the selected hook and outro survive
        assert!(script.contains("stop scrolling"));
        assert!(script.contains("hit follow"));
    }

    #[test]
    fn test_voice_profile_conditions_prompt() {
        let profile = VoiceProfileData {
            dominant_tones: vec!["playful".to_string()],
            tone_exemplars: vec!["okay but hear me out".to_string()],
            negative_constraints: vec!["game changer".to_string()],
            extra: Default::default(),
        };
        let prompt = build_assembly_prompt("idea", &complete_selection(), Some(&profile)).unwrap();
        assert!(prompt.contains("playful"));
        assert!(prompt.contains("okay but hear me out"));
        assert!(prompt.contains("Never use these words"));
        assert!(prompt.contains("game changer"));
    }

    #[test]
    fn test_prompt_lists_all_four_components() {
        let prompt = build_assembly_prompt("idea", &complete_selection(), None).unwrap();
        assert!(prompt.contains("stop scrolling"));
        assert!(prompt.contains("thrive downtown"));
        assert!(prompt.contains("out-produce rural"));
        assert!(prompt.contains("hit follow"));
    }
}
