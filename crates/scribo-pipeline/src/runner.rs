//! The workflow runner.
//!
//! Sequences search, extraction, brief synthesis and component
//! generation for one submitted topic. Data flows strictly forward;
//! nothing is retried automatically. A failed stage halts the run at
//! the matching `*_failed` step and only a fresh submission restarts
//! it, from `search`, never mid-way.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use scribo_models::{PipelineStep, SourceContent, UserSelection, VoiceProfileData};

use crate::error::{PipelineError, PipelineResult};
use crate::stages::{
    BriefSynthesizer, ComponentGenerator, ContentExtractor, ScriptAssembler, SourceSearcher,
};
use crate::state::PipelineState;

/// Orchestrates the generation stages for one topic at a time.
pub struct Pipeline {
    searcher: Arc<dyn SourceSearcher>,
    extractor: Arc<dyn ContentExtractor>,
    synthesizer: Arc<dyn BriefSynthesizer>,
    generator: Arc<dyn ComponentGenerator>,
    assembler: Arc<dyn ScriptAssembler>,
}

impl Pipeline {
    pub fn new(
        searcher: Arc<dyn SourceSearcher>,
        extractor: Arc<dyn ContentExtractor>,
        synthesizer: Arc<dyn BriefSynthesizer>,
        generator: Arc<dyn ComponentGenerator>,
        assembler: Arc<dyn ScriptAssembler>,
    ) -> Self {
        Self {
            searcher,
            extractor,
            synthesizer,
            generator,
            assembler,
        }
    }

    /// Run the pipeline up to `outline_ready`.
    ///
    /// The returned state either reached `outline_ready` or halted at a
    /// `*_failed` (or `search_empty`) step; inspect `error_step`.
    pub async fn run(&self, topic: &str, num_results: u32) -> PipelineState {
        let mut state = PipelineState::new(topic);

        // Search: soft-failing, but zero sources cannot feed synthesis,
        // so an empty result halts here instead of failing downstream.
        state.advance(PipelineStep::Search);
        let outcome = self.searcher.search(topic, num_results).await;
        if outcome.sources.is_empty() {
            if let Some(diag) = outcome.diagnostic {
                warn!(topic = %topic, "Source search degraded: {}", diag);
                state.halt(PipelineStep::SearchFailed, Some(diag));
            } else {
                info!(topic = %topic, "Source search returned no results");
                state.halt(PipelineStep::SearchEmpty, None);
            }
            return state;
        }
        if let Some(diag) = outcome.diagnostic {
            state.diagnostics.push(diag);
        }
        info!(topic = %topic, sources = outcome.sources.len(), "Sources found");
        state.sources = outcome.sources;

        // Extraction fans out per source; each call soft-fails on its
        // own and results come back in source order.
        state.advance(PipelineStep::Extract);
        let extractions = join_all(
            state
                .sources
                .iter()
                .map(|source| self.extractor.extract(&source.link)),
        )
        .await;

        let failed = extractions.iter().filter(|e| !e.succeeded).count();
        let total = extractions.len();
        state.extracted = extractions;

        if failed == total {
            warn!(topic = %topic, "Extraction failed for all {} sources", total);
            state.halt(
                PipelineStep::ExtractFailed,
                Some(format!("extraction failed for all {} sources", total)),
            );
            return state;
        }
        if failed > 0 {
            state.note(
                PipelineStep::ExtractIssues,
                format!("extraction failed for {} of {} sources", failed, total),
            );
        }
        state.advance(PipelineStep::AnalyzeReady);

        // Synthesis receives every extraction, including the failure
        // descriptions: the model is told which sources were unusable.
        state.advance(PipelineStep::Analyze);
        let source_contents: Vec<SourceContent> = state
            .sources
            .iter()
            .zip(state.extracted.iter())
            .map(|(source, extraction)| SourceContent {
                link: source.link.clone(),
                title: source.title.clone(),
                text: extraction.text.clone(),
            })
            .collect();

        match self.synthesizer.synthesize(topic, &source_contents).await {
            Ok(brief) => {
                info!(topic = %topic, brief_chars = brief.len(), "Research brief ready");
                state.research_brief = Some(brief);
            }
            Err(e) => {
                warn!(topic = %topic, "Brief synthesis failed: {}", e);
                state.halt(PipelineStep::AnalyzeFailed, Some(e.to_string()));
                return state;
            }
        }

        state.advance(PipelineStep::GenerateOptions);
        let brief = state
            .research_brief
            .as_deref()
            .unwrap_or_default()
            .to_string();
        match self.generator.generate(topic, &brief).await {
            Ok(components) => {
                state.components = Some(components);
            }
            Err(e) => {
                warn!(topic = %topic, "Component generation failed: {}", e);
                state.halt(PipelineStep::GenerateFailed, Some(e.to_string()));
                return state;
            }
        }

        state.advance(PipelineStep::OutlineReady);
        info!(topic = %topic, "Component options ready");
        state
    }

    /// Assemble the final script from the user's selections.
    ///
    /// Requires an `outline_ready` state and a complete selection; both
    /// are validated before any generation call is made.
    pub async fn complete(
        &self,
        state: &mut PipelineState,
        selection: &UserSelection,
        voice_profile: Option<&VoiceProfileData>,
    ) -> PipelineResult<String> {
        if !state.is_outline_ready() {
            return Err(PipelineError::WrongStep {
                expected: PipelineStep::OutlineReady,
                actual: state.current_step,
            });
        }
        if let Some(missing) = selection.missing_field() {
            return Err(PipelineError::IncompleteSelection(missing));
        }

        let script = self
            .assembler
            .assemble(&state.topic, selection, voice_profile)
            .await
            .map_err(|e| PipelineError::AssemblyFailed(e.to_string()))?;

        state.advance(PipelineStep::Complete);
        info!(topic = %state.topic, script_chars = script.len(), "Script assembled");
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use scribo_models::{
        ExtractedContent, Factset, FactsetCategory, Outro, ScriptComponents, ScriptHook, Source,
    };
    use scribo_research::SearchOutcome;

    use crate::error::StageFailure;

    struct FakeSearcher {
        sources: Vec<Source>,
        diagnostic: Option<String>,
    }

    #[async_trait]
    impl SourceSearcher for FakeSearcher {
        async fn search(&self, _topic: &str, _num_results: u32) -> SearchOutcome {
            SearchOutcome {
                sources: self.sources.clone(),
                diagnostic: self.diagnostic.clone(),
            }
        }
    }

    /// Soft-fails for links containing "blocked".
    struct FakeExtractor;

    #[async_trait]
    impl ContentExtractor for FakeExtractor {
        async fn extract(&self, url: &str) -> ExtractedContent {
            if url.contains("blocked") {
                ExtractedContent::from_text(
                    url,
                    format!("Content not accessible from {} (Reason: restricted)", url),
                )
            } else {
                ExtractedContent::from_text(url, format!("Readable text from {}", url))
            }
        }
    }

    struct FakeSynthesizer {
        calls: AtomicU32,
        fail: bool,
    }

    impl FakeSynthesizer {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl BriefSynthesizer for FakeSynthesizer {
        async fn synthesize(
            &self,
            _topic: &str,
            sources: &[SourceContent],
        ) -> Result<String, StageFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StageFailure::new("model returned no text"));
            }
            Ok(format!("A brief synthesized from {} sources", sources.len()))
        }
    }

    struct FakeGenerator {
        fail: bool,
    }

    #[async_trait]
    impl ComponentGenerator for FakeGenerator {
        async fn generate(
            &self,
            _topic: &str,
            _research_brief: &str,
        ) -> Result<ScriptComponents, StageFailure> {
            if self.fail {
                return Err(StageFailure::new("response was not valid JSON"));
            }
            Ok(ScriptComponents {
                hooks: vec![ScriptHook {
                    title: "Hook".to_string(),
                    lines: vec!["Did you know?".to_string()],
                }],
                factsets: vec![
                    Factset {
                        category: FactsetCategory::Bridge,
                        content: "bridge".to_string(),
                    },
                    Factset {
                        category: FactsetCategory::GoldenNugget,
                        content: "nugget".to_string(),
                    },
                ],
                takes: vec![],
                outros: vec![Outro {
                    title: "Outro".to_string(),
                    lines: vec!["Act now".to_string()],
                }],
            })
        }
    }

    struct FakeAssembler {
        calls: AtomicU32,
    }

    impl FakeAssembler {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ScriptAssembler for FakeAssembler {
        async fn assemble(
            &self,
            topic: &str,
            _selection: &UserSelection,
            _voice_profile: Option<&VoiceProfileData>,
        ) -> Result<String, StageFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("Final script about {}", topic))
        }
    }

    fn source(link: &str) -> Source {
        Source {
            title: format!("Title for {}", link),
            link: link.to_string(),
            snippet: "snippet".to_string(),
        }
    }

    fn pipeline(
        searcher: FakeSearcher,
        synthesizer: FakeSynthesizer,
        generator: FakeGenerator,
    ) -> (Pipeline, Arc<FakeSynthesizer>, Arc<FakeAssembler>) {
        let synthesizer = Arc::new(synthesizer);
        let assembler = Arc::new(FakeAssembler::new());
        let p = Pipeline::new(
            Arc::new(searcher),
            Arc::new(FakeExtractor),
            synthesizer.clone(),
            Arc::new(generator),
            assembler.clone(),
        );
        (p, synthesizer, assembler)
    }

    fn complete_selection() -> UserSelection {
        UserSelection {
            hook: Some(ScriptHook {
                title: "Hook".to_string(),
                lines: vec!["Did you know?".to_string()],
            }),
            bridge: Some(Factset {
                category: FactsetCategory::Bridge,
                content: "bridge".to_string(),
            }),
            golden_nugget: Some(Factset {
                category: FactsetCategory::GoldenNugget,
                content: "nugget".to_string(),
            }),
            wta: Some(Outro {
                title: "Outro".to_string(),
                lines: vec!["Act now".to_string()],
            }),
        }
    }

    #[tokio::test]
    async fn test_happy_path_reaches_outline_ready() {
        let (p, _, _) = pipeline(
            FakeSearcher {
                sources: vec![source("https://a.test"), source("https://b.test")],
                diagnostic: None,
            },
            FakeSynthesizer::new(false),
            FakeGenerator { fail: false },
        );

        let state = p.run("urban beekeeping benefits", 10).await;
        assert!(state.is_outline_ready());
        assert!(!state.is_halted());
        assert_eq!(state.extracted.len(), 2);
        assert!(state.research_brief.is_some());
        assert!(state.components.is_some());
        assert!(!state.visited(PipelineStep::ExtractIssues));
    }

    #[tokio::test]
    async fn test_partial_extraction_failure_continues_with_issues() {
        let (p, _, _) = pipeline(
            FakeSearcher {
                sources: vec![source("https://a.test"), source("https://blocked.test")],
                diagnostic: None,
            },
            FakeSynthesizer::new(false),
            FakeGenerator { fail: false },
        );

        let state = p.run("topic", 10).await;
        assert!(state.is_outline_ready());
        assert!(state.visited(PipelineStep::ExtractIssues));
        // The failure description still reaches synthesis
        assert_eq!(state.extracted.len(), 2);
        assert!(!state.extracted[1].succeeded);
    }

    #[tokio::test]
    async fn test_total_extraction_failure_halts_before_analyze() {
        let (p, synthesizer, _) = pipeline(
            FakeSearcher {
                sources: vec![source("https://blocked.test"), source("https://blocked2.test")],
                diagnostic: None,
            },
            FakeSynthesizer::new(false),
            FakeGenerator { fail: false },
        );

        let state = p.run("topic", 10).await;
        assert_eq!(state.error_step, Some(PipelineStep::ExtractFailed));
        assert!(!state.visited(PipelineStep::Analyze));
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_search_halts() {
        let (p, _, _) = pipeline(
            FakeSearcher {
                sources: vec![],
                diagnostic: None,
            },
            FakeSynthesizer::new(false),
            FakeGenerator { fail: false },
        );

        let state = p.run("topic", 10).await;
        assert_eq!(state.error_step, Some(PipelineStep::SearchEmpty));
        assert!(!state.visited(PipelineStep::Extract));
    }

    #[tokio::test]
    async fn test_degraded_search_halts_as_search_failed() {
        let (p, _, _) = pipeline(
            FakeSearcher {
                sources: vec![],
                diagnostic: Some("search API unreachable".to_string()),
            },
            FakeSynthesizer::new(false),
            FakeGenerator { fail: false },
        );

        let state = p.run("topic", 10).await;
        assert_eq!(state.error_step, Some(PipelineStep::SearchFailed));
        assert_eq!(state.diagnostics, vec!["search API unreachable".to_string()]);
    }

    #[tokio::test]
    async fn test_synthesis_failure_halts_at_analyze_failed() {
        let (p, _, _) = pipeline(
            FakeSearcher {
                sources: vec![source("https://a.test")],
                diagnostic: None,
            },
            FakeSynthesizer::new(true),
            FakeGenerator { fail: false },
        );

        let state = p.run("topic", 10).await;
        assert_eq!(state.error_step, Some(PipelineStep::AnalyzeFailed));
        assert!(!state.visited(PipelineStep::GenerateOptions));
    }

    #[tokio::test]
    async fn test_generation_failure_halts_at_generate_failed() {
        let (p, _, _) = pipeline(
            FakeSearcher {
                sources: vec![source("https://a.test")],
                diagnostic: None,
            },
            FakeSynthesizer::new(false),
            FakeGenerator { fail: true },
        );

        let state = p.run("topic", 10).await;
        assert_eq!(state.error_step, Some(PipelineStep::GenerateFailed));
        assert!(!state.is_outline_ready());
    }

    #[tokio::test]
    async fn test_complete_requires_outline_ready() {
        let (p, _, assembler) = pipeline(
            FakeSearcher {
                sources: vec![],
                diagnostic: None,
            },
            FakeSynthesizer::new(false),
            FakeGenerator { fail: false },
        );

        let mut state = p.run("topic", 10).await;
        let err = p
            .complete(&mut state, &complete_selection(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::WrongStep { .. }));
        assert_eq!(assembler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_complete_rejects_missing_selection_before_assembly() {
        let (p, _, assembler) = pipeline(
            FakeSearcher {
                sources: vec![source("https://a.test")],
                diagnostic: None,
            },
            FakeSynthesizer::new(false),
            FakeGenerator { fail: false },
        );

        let mut state = p.run("topic", 10).await;
        assert!(state.is_outline_ready());

        let mut selection = complete_selection();
        selection.wta = None;
        let err = p.complete(&mut state, &selection, None).await.unwrap_err();
        assert!(matches!(err, PipelineError::IncompleteSelection("wta")));
        assert_eq!(assembler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_complete_assembles_and_marks_complete() {
        let (p, _, assembler) = pipeline(
            FakeSearcher {
                sources: vec![source("https://a.test")],
                diagnostic: None,
            },
            FakeSynthesizer::new(false),
            FakeGenerator { fail: false },
        );

        let mut state = p.run("urban beekeeping benefits", 10).await;
        let script = p
            .complete(&mut state, &complete_selection(), None)
            .await
            .unwrap();
        assert!(script.contains("urban beekeeping benefits"));
        assert_eq!(state.current_step, PipelineStep::Complete);
        assert_eq!(assembler.calls.load(Ordering::SeqCst), 1);
    }
}
