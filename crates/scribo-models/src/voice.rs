//! Creator voice profile used to condition script assembly.

use serde::{Deserialize, Serialize};

/// Wrapper carried on assembly requests. The profile is an opaque
/// conditioning object; the only invariant enforced is that a supplied
/// wrapper actually contains a `voiceProfile` sub-object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    pub voice_profile: VoiceProfileData,
}

/// Creator persona data extracted from prior analyses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfileData {
    /// Tones the creator leans on (e.g. "playful", "direct").
    #[serde(default)]
    pub dominant_tones: Vec<String>,
    /// Short verbatim examples of each tone.
    #[serde(default)]
    pub tone_exemplars: Vec<String>,
    /// Words and tones the assembled script must avoid.
    #[serde(default)]
    pub negative_constraints: Vec<String>,
    /// Anything else the analyzer attached; passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VoiceProfileData {
    pub fn has_directives(&self) -> bool {
        !self.dominant_tones.is_empty() || !self.tone_exemplars.is_empty()
    }

    pub fn has_negative_constraints(&self) -> bool {
        !self.negative_constraints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_voice_profile_key() {
        assert!(serde_json::from_str::<VoiceProfile>(r#"{"tones": []}"#).is_err());

        let ok: VoiceProfile = serde_json::from_str(
            r#"{"voiceProfile": {"dominantTones": ["direct"], "toneExemplars": []}}"#,
        )
        .unwrap();
        assert!(ok.voice_profile.has_directives());
        assert!(!ok.voice_profile.has_negative_constraints());
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let profile: VoiceProfile = serde_json::from_str(
            r#"{"voiceProfile": {"dominantTones": [], "signaturePhrase": "hey friends"}}"#,
        )
        .unwrap();
        assert!(profile.voice_profile.extra.contains_key("signaturePhrase"));
    }
}
