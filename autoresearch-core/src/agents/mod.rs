//! The four research agents
//!
//! Each agent wraps one prompt template and one piece of domain logic,
//! issues exactly one model call per execution, and records a single entry
//! in the [`SharedLog`] when it succeeds.
//!
//! | Agent | Inputs | Result |
//! |-------|--------|--------|
//! | [`LiteratureAgent`] | topic | [`LibraryResult`] |
//! | [`ScienceAgent`] | topic, context label | [`ScienceResult`] |
//! | [`ReviewAgent`] | literature + science results | [`ReviewResult`] |
//! | [`WriterAgent`] | topic + all three prior results | [`PaperResult`] |

mod literature;
mod review;
mod science;
mod writer;

pub use literature::LiteratureAgent;
pub use review::ReviewAgent;
pub use science::{PLACEHOLDER_HYPOTHESES, ScienceAgent, parse_hypotheses};
pub use writer::WriterAgent;

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Result, ResearchError};
use crate::llm::{LLMConfig, LLMProvider};
use crate::memory::SharedLog;
use crate::sources::{ExperimentRecord, PaperRecord};

/// Identity of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Literature,
    Science,
    Review,
    Writer,
}

impl AgentKind {
    /// Name used in logs and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentKind::Literature => "Literature Agent",
            AgentKind::Science => "Science Agent",
            AgentKind::Review => "Review Agent",
            AgentKind::Writer => "Writer Agent",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Common identity of every agent
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;

    fn name(&self) -> &'static str {
        self.kind().display_name()
    }
}

/// Literature agent output
#[derive(Debug, Clone, Serialize)]
pub struct LibraryResult {
    pub papers_found: usize,
    pub papers: Vec<PaperRecord>,
    pub analysis: String,
}

/// Science agent output
#[derive(Debug, Clone, Serialize)]
pub struct ScienceResult {
    pub experiment_count: usize,
    pub experiments: Vec<ExperimentRecord>,
    pub design: String,
}

/// Review agent output
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResult {
    pub review: String,
}

/// Writer agent output
#[derive(Debug, Clone, Serialize)]
pub struct PaperResult {
    /// Model-generated paper body, verbatim
    pub paper: String,
    /// Where the formatted paper was written
    pub filename: PathBuf,
}

/// Output of any agent
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "agent", rename_all = "lowercase")]
pub enum AgentResult {
    Library(LibraryResult),
    Science(ScienceResult),
    Review(ReviewResult),
    Paper(PaperResult),
}

impl AgentResult {
    /// Agent that produced this result
    pub fn kind(&self) -> AgentKind {
        match self {
            AgentResult::Library(_) => AgentKind::Literature,
            AgentResult::Science(_) => AgentKind::Science,
            AgentResult::Review(_) => AgentKind::Review,
            AgentResult::Paper(_) => AgentKind::Writer,
        }
    }
}

impl From<LibraryResult> for AgentResult {
    fn from(result: LibraryResult) -> Self {
        AgentResult::Library(result)
    }
}

impl From<ScienceResult> for AgentResult {
    fn from(result: ScienceResult) -> Self {
        AgentResult::Science(result)
    }
}

impl From<ReviewResult> for AgentResult {
    fn from(result: ReviewResult) -> Self {
        AgentResult::Review(result)
    }
}

impl From<PaperResult> for AgentResult {
    fn from(result: PaperResult) -> Self {
        AgentResult::Paper(result)
    }
}

/// What every agent needs to run: the model, the log, and call settings
#[derive(Clone)]
pub struct AgentContext {
    provider: Arc<dyn LLMProvider>,
    log: SharedLog,
    llm_config: LLMConfig,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for AgentContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentContext")
            .field("model", &self.provider.model_info().model_name)
            .field("llm_config", &self.llm_config)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AgentContext {
    pub fn new(provider: Arc<dyn LLMProvider>, log: SharedLog) -> Self {
        Self {
            provider,
            log,
            llm_config: LLMConfig::default(),
            timeout: None,
        }
    }

    pub fn with_llm_config(mut self, config: LLMConfig) -> Self {
        self.llm_config = config;
        self
    }

    /// Bound every model call. Without this, calls wait indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn log(&self) -> &SharedLog {
        &self.log
    }

    /// One model call on behalf of `agent`.
    ///
    /// Provider failures, timeouts, and blank output all surface as errors
    /// attributed to the agent. Nothing is retried.
    pub(crate) async fn generate(&self, agent: AgentKind, prompt: &str) -> Result<String> {
        let name = agent.display_name();
        let started = Instant::now();
        tracing::debug!(agent = name, prompt_chars = prompt.len(), "Requesting generation");

        let call = self.provider.generate(prompt, &self.llm_config);
        let outcome = match self.timeout {
            Some(after) => match tokio::time::timeout(after, call).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(agent = name, ?after, "Generation timed out");
                    return Err(ResearchError::Timeout {
                        agent: name.to_string(),
                        after,
                    });
                }
            },
            None => call.await,
        };

        let text = outcome.map_err(|e| attribute(name, e))?;
        if text.trim().is_empty() {
            return Err(ResearchError::generation(name, "model returned empty text"));
        }

        tracing::debug!(
            agent = name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_chars = text.len(),
            "Generation complete"
        );
        Ok(text)
    }
}

fn attribute(agent: &str, err: ResearchError) -> ResearchError {
    match err {
        ResearchError::Generation {
            agent: origin,
            message,
        } => ResearchError::generation(agent, format!("[{}] {}", origin, message)),
        err @ (ResearchError::Configuration(_) | ResearchError::Timeout { .. }) => err,
        other => ResearchError::generation(agent, other.to_string()),
    }
}
