//! # AutoResearch - A Four-Agent Research Paper Pipeline
//!
//! Given a topic, four cooperating agents produce a short research paper:
//!
//! - **Literature agent**: gathers papers and synthesizes their findings
//! - **Science agent**: designs experiments and runs simulated trials
//! - **Review agent**: critiques the combined work
//! - **Writer agent**: drafts the final paper and saves it to disk
//!
//! Every agent records what it did in a shared, append-only log.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use autoresearch_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ResearchConfig::load()?;
//!     let provider = LLMProviderFactory::create(&config.llm).await?;
//!
//!     let orchestrator = ResearchOrchestrator::new(&config, provider)?;
//!     let run = orchestrator.run("Quantum Computing").await?;
//!
//!     println!("Paper saved to {}", run.paper.filename.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `llm-gemini` (default): Google Gemini provider
//! - `llm-openai`: OpenAI chat completions provider

pub mod agents;
pub mod artifact;
pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod pipeline;
pub mod sources;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::agents::{
        AgentKind, AgentResult, LibraryResult, PaperResult, ReviewResult, ScienceResult,
    };
    pub use crate::artifact::{ArtifactWriter, PaperDocument};
    pub use crate::config::{
        GenerationConfig, HypothesisSource, LLMProvider as LLMProviderType, LLMProviderConfig,
        ResearchConfig,
    };
    pub use crate::error::{ResearchError, Result};
    pub use crate::llm::{LLMConfig, LLMProvider, LLMProviderFactory, ScriptedProvider};
    pub use crate::memory::{MemoryEntry, SharedLog};
    pub use crate::pipeline::{Phase, ResearchOrchestrator, RunResult, RunState};
    pub use crate::sources::{ExperimentRecord, ExperimentRunner, PaperRecord, PaperSource};
}
