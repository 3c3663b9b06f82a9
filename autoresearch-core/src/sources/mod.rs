//! Data sources the agents draw on
//!
//! Both capabilities are synchronous and stateless, so one instance can be
//! shared by any number of concurrently running agents. The bundled
//! implementations synthesize data locally; a real literature search or
//! experiment backend plugs in by implementing the same trait.

mod experiments;
mod papers;

pub use experiments::RandomExperimentRunner;
pub use papers::TemplatePaperSource;

use serde::{Deserialize, Serialize};

/// A paper-like search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    pub summary: String,
    pub source: String,
    pub year: String,
}

/// Outcome of one executed experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub hypothesis: String,
    /// Participants, in `[50, 200]`
    pub sample_size: u32,
    /// Fraction of successes, in `[0.65, 0.95]` with two decimals
    pub success_rate: f64,
    pub confidence: String,
    pub status: String,
}

/// Finds literature for a topic
pub trait PaperSource: Send + Sync {
    fn search(&self, topic: &str) -> Vec<PaperRecord>;
}

/// Executes an experiment for a hypothesis
pub trait ExperimentRunner: Send + Sync {
    fn run_experiment(&self, hypothesis: &str) -> ExperimentRecord;
}
