//! Script component generation.
//!
//! Asks the model for the structured bundle of building blocks (hooks,
//! factsets, optional takes, outros) in JSON mode. A response that fails
//! to parse or omits a required key is a structural failure; this module
//! never substitutes placeholder components for a bad completion.

use scribo_models::ScriptComponents;
use tracing::info;

use crate::client::{GeminiClient, GenerateOptions};
use crate::cost::CostEstimate;
use crate::error::{GenError, GenResult};

/// Component generation output: validated components plus the estimated
/// cost of the exchange.
#[derive(Debug)]
pub struct ComponentBundle {
    pub components: ScriptComponents,
    pub cost: CostEstimate,
}

/// Generate script components for a video idea from its research brief.
pub async fn generate_components(
    client: &GeminiClient,
    video_idea: &str,
    research_brief: &str,
) -> GenResult<ComponentBundle> {
    if video_idea.trim().is_empty() || research_brief.trim().is_empty() {
        return Err(GenError::invalid_input(
            "videoIdea and researchBrief are required",
        ));
    }

    let prompt = build_components_prompt(video_idea, research_brief);
    let options = GenerateOptions {
        json_mode: true,
        temperature: Some(0.8),
        max_output_tokens: Some(4096),
    };

    // Serde enforces the schema: hooks/factsets/outros must be present
    // arrays, takes defaults to [].
    let raw = client.generate(&prompt, &options).await?;
    let components: ScriptComponents =
        serde_json::from_str(crate::client::strip_code_fences(&raw))
            .map_err(|e| GenError::schema(e.to_string()))?;

    info!(
        hooks = components.hooks.len(),
        factsets = components.factsets.len(),
        takes = components.takes.len(),
        outros = components.outros.len(),
        "Generated script components"
    );

    Ok(ComponentBundle {
        cost: CostEstimate::for_exchange(&prompt, &raw),
        components,
    })
}

fn build_components_prompt(video_idea: &str, research_brief: &str) -> String {
    format!(
        r#"You are an expert scriptwriting assistant for short-form video
(TikTok, Reels, Shorts). Generate modular script components for the video
idea below, grounded strictly in the research brief.

Video Idea: "{video_idea}"

Research Brief:
{research_brief}

Return ONLY a single JSON object with this exact schema:
{{
  "hooks": [{{"title": "short descriptive name", "lines": ["2-4 short spoken lines"]}}],
  "factsets": [{{"category": "Bridge" | "MicroHook" | "GoldenNugget", "content": "1-2 concise sentences"}}],
  "takes": [{{"perspective": "viewpoint label", "content": "1-2 sentences"}}],
  "outros": [{{"title": "short name including the action", "lines": ["1-3 lines, action keyword at the end"]}}]
}}

Requirements:
- Generate exactly 5 distinct hooks and 5 distinct outros.
- Generate at least one factset per category (Bridge, MicroHook, GoldenNugget).
- Speak to ONE person ("you"), conversational, simple everyday language.
- No empty strings, no placeholder content.
- "hooks", "factsets" and "outros" are mandatory keys; "takes" may be empty.
"#
    )
}
