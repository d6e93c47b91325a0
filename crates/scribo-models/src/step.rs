//! Pipeline step identifiers for the script-generation workflow.
//!
//! The orchestrator drives a single in-flight generation through these
//! steps and exposes them to the progress UI. Values are stable string
//! identifiers; renaming one is a breaking wire change.

use serde::{Deserialize, Serialize};

/// A step of the script-generation pipeline.
///
/// Normal forward order: `Init -> Search -> Extract -> Analyze ->
/// GenerateOptions -> OutlineReady`, with `Complete` after the user
/// finishes assembly. Each fallible stage has a terminal `*Failed`
/// variant; the pipeline halts there and only a fresh submission
/// restarts it (from `Search`, never mid-way).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    #[default]
    Init,
    Search,
    SearchEmpty,
    SearchFailed,
    Extract,
    ExtractIssues,
    ExtractFailed,
    AnalyzeReady,
    Analyze,
    AnalyzeFailed,
    GenerateOptions,
    GenerateFailed,
    OutlineReady,
    Complete,
}

impl PipelineStep {
    /// Stable string identifier used on the wire and in progress UIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStep::Init => "init",
            PipelineStep::Search => "search",
            PipelineStep::SearchEmpty => "search_empty",
            PipelineStep::SearchFailed => "search_failed",
            PipelineStep::Extract => "extract",
            PipelineStep::ExtractIssues => "extract_issues",
            PipelineStep::ExtractFailed => "extract_failed",
            PipelineStep::AnalyzeReady => "analyze_ready",
            PipelineStep::Analyze => "analyze",
            PipelineStep::AnalyzeFailed => "analyze_failed",
            PipelineStep::GenerateOptions => "generate_options",
            PipelineStep::GenerateFailed => "generate_failed",
            PipelineStep::OutlineReady => "outline_ready",
            PipelineStep::Complete => "complete",
        }
    }

    /// True for the `*_failed` variants.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            PipelineStep::SearchFailed
                | PipelineStep::ExtractFailed
                | PipelineStep::AnalyzeFailed
                | PipelineStep::GenerateFailed
        )
    }

    /// True when no further forward progress is expected.
    pub fn is_terminal(&self) -> bool {
        self.is_failure()
            || matches!(
                self,
                PipelineStep::SearchEmpty | PipelineStep::OutlineReady | PipelineStep::Complete
            )
    }

    /// Failures that warrant a blocking error banner. Isolated partial
    /// extraction failures (`ExtractIssues`) are logged but not surfaced.
    pub fn is_blocking_failure(&self) -> bool {
        matches!(
            self,
            PipelineStep::ExtractFailed
                | PipelineStep::AnalyzeFailed
                | PipelineStep::GenerateFailed
        )
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_identifiers() {
        // These strings are a public contract with the progress UI.
        let expected = [
            (PipelineStep::Init, "init"),
            (PipelineStep::Search, "search"),
            (PipelineStep::SearchEmpty, "search_empty"),
            (PipelineStep::SearchFailed, "search_failed"),
            (PipelineStep::Extract, "extract"),
            (PipelineStep::ExtractIssues, "extract_issues"),
            (PipelineStep::ExtractFailed, "extract_failed"),
            (PipelineStep::AnalyzeReady, "analyze_ready"),
            (PipelineStep::Analyze, "analyze"),
            (PipelineStep::AnalyzeFailed, "analyze_failed"),
            (PipelineStep::GenerateOptions, "generate_options"),
            (PipelineStep::GenerateFailed, "generate_failed"),
            (PipelineStep::OutlineReady, "outline_ready"),
            (PipelineStep::Complete, "complete"),
        ];
        for (step, s) in expected {
            assert_eq!(step.as_str(), s);
            assert_eq!(serde_json::to_string(&step).unwrap(), format!("\"{}\"", s));
        }
    }

    #[test]
    fn test_failure_classification() {
        assert!(PipelineStep::SearchFailed.is_failure());
        assert!(PipelineStep::GenerateFailed.is_failure());
        assert!(!PipelineStep::ExtractIssues.is_failure());

        // Search failing is recoverable by resubmitting; no banner
        assert!(!PipelineStep::SearchFailed.is_blocking_failure());
        assert!(PipelineStep::ExtractFailed.is_blocking_failure());
    }

    #[test]
    fn test_terminal_steps() {
        assert!(PipelineStep::OutlineReady.is_terminal());
        assert!(PipelineStep::Complete.is_terminal());
        assert!(PipelineStep::SearchEmpty.is_terminal());
        assert!(!PipelineStep::Analyze.is_terminal());
    }
}
