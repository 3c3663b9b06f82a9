//! Research orchestrator
//!
//! Runs the four agents in three phases:
//!
//! 1. Literature and Science agents, concurrently
//! 2. Review agent, once both have finished
//! 3. Writer agent
//!
//! Any failure stops the run. In phase 1 the first error wins and the
//! sibling call is dropped without being awaited further.

use chrono::Local;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

use super::result::{Phase, PhaseTimings, RunResult, RunState};
use crate::agents::{AgentContext, LiteratureAgent, ReviewAgent, ScienceAgent, WriterAgent};
use crate::artifact::ArtifactWriter;
use crate::config::{HypothesisSource, ResearchConfig};
use crate::error::Result;
use crate::llm::{LLMConfig, LLMProvider};
use crate::memory::SharedLog;
use crate::sources::{
    ExperimentRunner, PaperSource, RandomExperimentRunner, TemplatePaperSource,
};

/// Context label handed to the Science agent in phase 1
pub const INITIAL_CONTEXT: &str = "Initial research phase";

/// Name the orchestrator records its own log entry under.
///
/// This completion entry is appended after the four agent entries, so a
/// successful run adds five entries to the log. A failed run adds none.
pub const ORCHESTRATOR_NAME: &str = "Research Orchestrator";

/// Coordinates one or more research runs over a shared log
pub struct ResearchOrchestrator {
    provider: Arc<dyn LLMProvider>,
    log: SharedLog,
    papers: Arc<dyn PaperSource>,
    experiments: Arc<dyn ExperimentRunner>,
    hypothesis_source: HypothesisSource,
    llm_config: LLMConfig,
    timeout: Option<Duration>,
    output_dir: PathBuf,
    state: RwLock<RunState>,
}

impl std::fmt::Debug for ResearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchOrchestrator")
            .field("model", &self.provider.model_info().model_name)
            .field("hypothesis_source", &self.hypothesis_source)
            .field("output_dir", &self.output_dir)
            .field("state", &self.state())
            .finish()
    }
}

impl ResearchOrchestrator {
    /// Orchestrator with the built-in paper source and experiment runner.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn new(config: &ResearchConfig, provider: Arc<dyn LLMProvider>) -> Result<Self> {
        Self::builder(config, provider).build()
    }

    pub fn builder(
        config: &ResearchConfig,
        provider: Arc<dyn LLMProvider>,
    ) -> ResearchOrchestratorBuilder {
        ResearchOrchestratorBuilder {
            config: config.clone(),
            provider,
            papers: None,
            experiments: None,
            log: None,
        }
    }

    /// Shared log every agent appends to
    pub fn log(&self) -> &SharedLog {
        &self.log
    }

    pub fn state(&self) -> RunState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: RunState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn context(&self) -> AgentContext {
        AgentContext::new(self.provider.clone(), self.log.clone())
            .with_llm_config(self.llm_config.clone())
            .with_timeout(self.timeout)
    }

    /// Run the full pipeline for `topic`.
    ///
    /// # Errors
    ///
    /// Returns the first agent error. The state is left at
    /// `Failed(phase)` and no later phase starts.
    pub async fn run(&self, topic: &str) -> Result<RunResult> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("research_run", topic, %run_id);
        self.run_inner(run_id, topic).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, topic: &str) -> Result<RunResult> {
        let started_at = Local::now();
        let started = Instant::now();
        let first_entry = self.log.len();
        tracing::info!("Starting research");

        let literature = LiteratureAgent::new(self.context(), self.papers.clone());
        let science = ScienceAgent::new(self.context(), self.experiments.clone())
            .with_hypothesis_source(self.hypothesis_source);
        let review = ReviewAgent::new(self.context());
        let writer = WriterAgent::new(self.context(), ArtifactWriter::new(&self.output_dir));

        let ((library, science), parallel) = self
            .phase(Phase::Parallel, async {
                tokio::try_join!(
                    literature.execute(topic),
                    science.execute(topic, INITIAL_CONTEXT)
                )
            })
            .await?;

        let (review, review_time) = self
            .phase(Phase::Review, review.execute(&library, &science))
            .await?;

        let (paper, writing) = self
            .phase(
                Phase::Writing,
                writer.execute(topic, &library, &science, &review),
            )
            .await?;

        let total = started.elapsed();
        self.log.append(
            ORCHESTRATOR_NAME,
            format!(
                "Completed research on {} in {}s",
                topic,
                total.as_secs_f64().round() as u64
            ),
        );
        self.set_state(RunState::Completed);
        tracing::info!(elapsed_ms = total.as_millis() as u64, "Research complete");

        Ok(RunResult {
            run_id,
            topic: topic.to_string(),
            started_at,
            library,
            science,
            review,
            paper,
            timings: PhaseTimings {
                parallel,
                review: review_time,
                writing,
                total,
            },
            memory: self.log.entries_since(first_entry),
        })
    }

    async fn phase<T>(
        &self,
        phase: Phase,
        work: impl Future<Output = Result<T>>,
    ) -> Result<(T, Duration)> {
        self.set_state(RunState::Running(phase));
        let started = Instant::now();
        let span = tracing::info_span!("phase", phase = phase.label());

        match work.instrument(span).await {
            Ok(value) => {
                let elapsed = started.elapsed();
                tracing::info!(
                    phase = phase.label(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Phase complete"
                );
                Ok((value, elapsed))
            }
            Err(err) => {
                self.set_state(RunState::Failed(phase));
                tracing::error!(phase = phase.label(), error = %err, "Phase failed");
                Err(err)
            }
        }
    }
}

/// Builder for [`ResearchOrchestrator`]
pub struct ResearchOrchestratorBuilder {
    config: ResearchConfig,
    provider: Arc<dyn LLMProvider>,
    papers: Option<Arc<dyn PaperSource>>,
    experiments: Option<Arc<dyn ExperimentRunner>>,
    log: Option<SharedLog>,
}

impl ResearchOrchestratorBuilder {
    pub fn paper_source(mut self, source: Arc<dyn PaperSource>) -> Self {
        self.papers = Some(source);
        self
    }

    pub fn experiment_runner(mut self, runner: Arc<dyn ExperimentRunner>) -> Self {
        self.experiments = Some(runner);
        self
    }

    /// Append to an existing log instead of a fresh one
    pub fn log(mut self, log: SharedLog) -> Self {
        self.log = Some(log);
        self
    }

    /// # Errors
    ///
    /// Returns a configuration error if the configuration does not validate.
    pub fn build(self) -> Result<ResearchOrchestrator> {
        self.config.validate()?;

        Ok(ResearchOrchestrator {
            provider: self.provider,
            log: self.log.unwrap_or_default(),
            papers: self
                .papers
                .unwrap_or_else(|| Arc::new(TemplatePaperSource::new())),
            experiments: self
                .experiments
                .unwrap_or_else(|| Arc::new(RandomExperimentRunner::new())),
            hypothesis_source: self.config.science.hypothesis_source,
            llm_config: self.config.generation.llm_config(),
            timeout: self.config.generation.timeout,
            output_dir: self.config.output.directory,
            state: RwLock::new(RunState::Idle),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResearchError;
    use crate::llm::{PromptCategory, ScriptedProvider};
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> ResearchConfig {
        ResearchConfig::builder()
            .api_key("test-key")
            .output_dir(dir.path())
            .build()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = ResearchOrchestrator::new(
            &ResearchConfig::default(),
            Arc::new(ScriptedProvider::new()),
        )
        .unwrap_err();
        assert!(matches!(err, ResearchError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_state_transitions_to_completed() {
        let temp = TempDir::new().unwrap();
        let orchestrator =
            ResearchOrchestrator::new(&config(&temp), Arc::new(ScriptedProvider::new())).unwrap();
        assert_eq!(orchestrator.state(), RunState::Idle);

        let result = orchestrator.run("Robotics").await.unwrap();
        assert_eq!(orchestrator.state(), RunState::Completed);
        assert_eq!(result.topic, "Robotics");
        assert_eq!(result.memory.len(), 5);
        assert_eq!(result.memory[4].agent_name, ORCHESTRATOR_NAME);
        assert!(result.memory[4].note.starts_with("Completed research on Robotics in "));
    }

    #[tokio::test]
    async fn test_review_failure_records_phase() {
        let temp = TempDir::new().unwrap();
        let provider =
            Arc::new(ScriptedProvider::new().with_failure(PromptCategory::Review, "rate limit"));
        let orchestrator = ResearchOrchestrator::new(&config(&temp), provider.clone()).unwrap();

        let err = orchestrator.run("Robotics").await.unwrap_err();
        assert!(err.is_generation());
        assert_eq!(orchestrator.state(), RunState::Failed(Phase::Review));
        assert!(provider.prompts_for(PromptCategory::Writer).is_empty());
        assert_eq!(orchestrator.log().len(), 2);
    }

    #[tokio::test]
    async fn test_second_run_reports_only_its_own_entries() {
        let temp = TempDir::new().unwrap();
        let orchestrator =
            ResearchOrchestrator::new(&config(&temp), Arc::new(ScriptedProvider::new())).unwrap();

        let first = orchestrator.run("Astronomy").await.unwrap();
        let second = orchestrator.run("Botany").await.unwrap();

        assert_eq!(first.memory.len(), 5);
        assert_eq!(second.memory.len(), 5);
        assert_eq!(second.memory[0].sequence, 5);
        assert!(second.memory.iter().all(|e| !e.note.contains("Astronomy")));
        assert!(second.memory[4].note.starts_with("Completed research on Botany in "));
        assert_eq!(orchestrator.log().len(), 10);
    }

    #[tokio::test]
    async fn test_orchestrator_logs_once_and_only_on_success() {
        let temp = TempDir::new().unwrap();
        let orchestrator =
            ResearchOrchestrator::new(&config(&temp), Arc::new(ScriptedProvider::new())).unwrap();
        orchestrator.run("Robotics").await.unwrap();
        assert_eq!(orchestrator.log().entries_for(ORCHESTRATOR_NAME).len(), 1);

        let failing = Arc::new(
            ScriptedProvider::new().with_failure(PromptCategory::Writer, "quota exceeded"),
        );
        let orchestrator = ResearchOrchestrator::new(&config(&temp), failing).unwrap();
        orchestrator.run("Robotics").await.unwrap_err();
        assert!(orchestrator.log().entries_for(ORCHESTRATOR_NAME).is_empty());
        assert_eq!(orchestrator.log().len(), 3);
    }

    #[tokio::test]
    async fn test_science_receives_initial_context() {
        let temp = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::new());
        let orchestrator = ResearchOrchestrator::new(&config(&temp), provider.clone()).unwrap();

        orchestrator.run("Robotics").await.unwrap();
        let prompts = provider.prompts_for(PromptCategory::Science);
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Context: Initial research phase"));
    }
}
