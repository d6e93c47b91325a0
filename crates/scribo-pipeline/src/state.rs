//! Orchestrator state for one in-flight generation.

use scribo_models::{ExtractedContent, PipelineStep, ScriptComponents, Source};

/// Mutable record of a single generation run.
///
/// `current_step` moves monotonically forward; a stage failure sets
/// `error_step` and no further forward transition happens. Nothing here
/// is persisted until the user explicitly saves the resulting script.
#[derive(Debug, Default)]
pub struct PipelineState {
    pub topic: String,
    pub current_step: PipelineStep,
    /// The `*_failed` (or `search_empty`) step that halted the run.
    pub error_step: Option<PipelineStep>,
    /// Every step visited, in order. Useful for progress UIs and tests.
    pub history: Vec<PipelineStep>,
    pub sources: Vec<Source>,
    pub extracted: Vec<ExtractedContent>,
    pub research_brief: Option<String>,
    pub components: Option<ScriptComponents>,
    /// Non-blocking notes: search diagnostics, partial extraction issues.
    pub diagnostics: Vec<String>,
}

impl PipelineState {
    pub fn new(topic: impl Into<String>) -> Self {
        let mut state = Self {
            topic: topic.into(),
            ..Default::default()
        };
        state.history.push(PipelineStep::Init);
        state
    }

    /// Advance to a forward step.
    pub(crate) fn advance(&mut self, step: PipelineStep) {
        self.current_step = step;
        self.history.push(step);
    }

    /// Record a halting step. The run stops here.
    pub(crate) fn halt(&mut self, step: PipelineStep, diagnostic: Option<String>) {
        self.current_step = step;
        self.history.push(step);
        self.error_step = Some(step);
        if let Some(d) = diagnostic {
            self.diagnostics.push(d);
        }
        metrics::counter!("pipeline_halts_total", "step" => step.as_str()).increment(1);
    }

    /// Record a non-blocking issue step and keep going.
    pub(crate) fn note(&mut self, step: PipelineStep, diagnostic: String) {
        self.history.push(step);
        self.diagnostics.push(diagnostic);
    }

    pub fn is_halted(&self) -> bool {
        self.error_step.is_some()
    }

    /// True once component options are ready for user selection.
    pub fn is_outline_ready(&self) -> bool {
        self.current_step == PipelineStep::OutlineReady
    }

    pub fn visited(&self, step: PipelineStep) -> bool {
        self.history.contains(&step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_at_init() {
        let state = PipelineState::new("urban beekeeping benefits");
        assert_eq!(state.current_step, PipelineStep::Init);
        assert_eq!(state.history, vec![PipelineStep::Init]);
        assert!(!state.is_halted());
    }

    #[test]
    fn test_halt_records_error_step() {
        let mut state = PipelineState::new("topic");
        state.advance(PipelineStep::Search);
        state.halt(PipelineStep::SearchFailed, Some("api down".to_string()));
        assert!(state.is_halted());
        assert_eq!(state.error_step, Some(PipelineStep::SearchFailed));
        assert_eq!(state.diagnostics, vec!["api down".to_string()]);
    }

    #[test]
    fn test_note_does_not_halt() {
        let mut state = PipelineState::new("topic");
        state.note(PipelineStep::ExtractIssues, "2 of 9 failed".to_string());
        assert!(!state.is_halted());
        assert!(state.visited(PipelineStep::ExtractIssues));
    }
}
