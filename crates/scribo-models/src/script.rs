//! Script component models.
//!
//! These mirror the JSON contract of the component generator: `hooks`,
//! `factsets` and `outros` are always present (possibly empty) and
//! `takes` defaults to an empty array when the generator omits it.

use serde::{Deserialize, Serialize};

/// An opening hook: short title plus 2-4 spoken lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptHook {
    pub title: String,
    pub lines: Vec<String>,
}

/// Category of a factset building block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactsetCategory {
    Bridge,
    MicroHook,
    GoldenNugget,
}

impl FactsetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactsetCategory::Bridge => "Bridge",
            FactsetCategory::MicroHook => "MicroHook",
            FactsetCategory::GoldenNugget => "GoldenNugget",
        }
    }
}

impl std::fmt::Display for FactsetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A categorized mid-script building block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factset {
    pub category: FactsetCategory,
    pub content: String,
}

/// An optional opinionated "take" on the topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Take {
    pub perspective: String,
    pub content: String,
}

/// A closing outro / "why to act" block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outro {
    pub title: String,
    pub lines: Vec<String>,
}

/// The structured bundle of script building blocks produced for one
/// video idea.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptComponents {
    pub hooks: Vec<ScriptHook>,
    pub factsets: Vec<Factset>,
    #[serde(default)]
    pub takes: Vec<Take>,
    pub outros: Vec<Outro>,
}

impl ScriptComponents {
    /// True when at least one option exists per required category.
    pub fn has_required_options(&self) -> bool {
        self.hooks.iter().any(|h| !h.lines.is_empty())
            && self
                .factsets
                .iter()
                .any(|f| f.category == FactsetCategory::Bridge)
            && self
                .factsets
                .iter()
                .any(|f| f.category == FactsetCategory::GoldenNugget)
            && self.outros.iter().any(|o| !o.lines.is_empty())
    }
}

/// The user's pick of exactly one item per required category, used to
/// assemble the final script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSelection {
    pub hook: Option<ScriptHook>,
    pub bridge: Option<Factset>,
    pub golden_nugget: Option<Factset>,
    pub wta: Option<Outro>,
}

impl UserSelection {
    /// Name of the first missing required selection, if any.
    ///
    /// All four must be present before assembly is attempted; the check
    /// runs before any external generation call is made.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.hook.is_none() {
            Some("hook")
        } else if self.bridge.is_none() {
            Some("bridge")
        } else if self.golden_nugget.is_none() {
            Some("goldenNugget")
        } else if self.wta.is_none() {
            Some("wta")
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hook() -> ScriptHook {
        ScriptHook {
            title: "Problem Hook".to_string(),
            lines: vec!["If you live in a city,".to_string(), "listen up.".to_string()],
        }
    }

    fn factset(category: FactsetCategory) -> Factset {
        Factset {
            category,
            content: "content".to_string(),
        }
    }

    fn outro() -> Outro {
        Outro {
            title: "Follow".to_string(),
            lines: vec!["For weekly tips, hit follow.".to_string()],
        }
    }

    #[test]
    fn test_takes_defaults_to_empty() {
        let json = r#"{
            "hooks": [{"title": "t", "lines": ["a"]}],
            "factsets": [{"category": "Bridge", "content": "c"}],
            "outros": [{"title": "o", "lines": ["b"]}]
        }"#;
        let parsed: ScriptComponents = serde_json::from_str(json).unwrap();
        assert!(parsed.takes.is_empty());
        assert_eq!(parsed.hooks.len(), 1);
    }

    #[test]
    fn test_missing_required_key_fails_to_parse() {
        // No outros: must be a parse error, not a defaulted guess
        let json = r#"{
            "hooks": [],
            "factsets": []
        }"#;
        assert!(serde_json::from_str::<ScriptComponents>(json).is_err());
    }

    #[test]
    fn test_factset_category_wire_names() {
        let f: Factset =
            serde_json::from_str(r#"{"category": "GoldenNugget", "content": "x"}"#).unwrap();
        assert_eq!(f.category, FactsetCategory::GoldenNugget);
        assert_eq!(
            serde_json::to_string(&f.category).unwrap(),
            "\"GoldenNugget\""
        );
    }

    #[test]
    fn test_selection_missing_field_order() {
        let mut selection = UserSelection {
            hook: None,
            bridge: None,
            golden_nugget: None,
            wta: None,
        };
        assert_eq!(selection.missing_field(), Some("hook"));

        selection.hook = Some(hook());
        assert_eq!(selection.missing_field(), Some("bridge"));

        selection.bridge = Some(factset(FactsetCategory::Bridge));
        assert_eq!(selection.missing_field(), Some("goldenNugget"));

        selection.golden_nugget = Some(factset(FactsetCategory::GoldenNugget));
        assert_eq!(selection.missing_field(), Some("wta"));

        selection.wta = Some(outro());
        assert!(selection.is_complete());
    }

    #[test]
    fn test_selection_wire_uses_camel_case() {
        let selection = UserSelection {
            hook: Some(hook()),
            bridge: Some(factset(FactsetCategory::Bridge)),
            golden_nugget: Some(factset(FactsetCategory::GoldenNugget)),
            wta: Some(outro()),
        };
        let json = serde_json::to_value(&selection).unwrap();
        assert!(json.get("goldenNugget").is_some());
        assert!(json.get("golden_nugget").is_none());
    }

    #[test]
    fn test_has_required_options() {
        let components = ScriptComponents {
            hooks: vec![hook()],
            factsets: vec![
                factset(FactsetCategory::Bridge),
                factset(FactsetCategory::GoldenNugget),
            ],
            takes: vec![],
            outros: vec![outro()],
        };
        assert!(components.has_required_options());

        let no_nugget = ScriptComponents {
            factsets: vec![factset(FactsetCategory::Bridge)],
            ..components
        };
        assert!(!no_nugget.has_required_options());
    }
}
