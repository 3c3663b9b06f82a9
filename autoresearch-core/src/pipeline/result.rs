//! Run outcome types

use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use crate::agents::{AgentResult, LibraryResult, PaperResult, ReviewResult, ScienceResult};
use crate::memory::MemoryEntry;

/// Stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Literature and Science agents, concurrently
    Parallel,
    /// Review agent
    Review,
    /// Writer agent
    Writing,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Parallel => "Parallel research",
            Phase::Review => "Peer review",
            Phase::Writing => "Paper writing",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of an orchestrator run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "phase", rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Running(Phase),
    Completed,
    Failed(Phase),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed(_))
    }
}

/// Wall-clock time spent in each phase
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PhaseTimings {
    #[serde(with = "humantime_serde")]
    pub parallel: Duration,
    #[serde(with = "humantime_serde")]
    pub review: Duration,
    #[serde(with = "humantime_serde")]
    pub writing: Duration,
    #[serde(with = "humantime_serde")]
    pub total: Duration,
}

/// Everything a successful run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub topic: String,
    pub started_at: DateTime<Local>,
    pub library: LibraryResult,
    pub science: ScienceResult,
    pub review: ReviewResult,
    pub paper: PaperResult,
    pub timings: PhaseTimings,
    /// Log entries appended during this run, in order
    pub memory: Vec<MemoryEntry>,
}

impl RunResult {
    /// The four agent results in pipeline order
    pub fn agent_results(&self) -> Vec<AgentResult> {
        vec![
            self.library.clone().into(),
            self.science.clone().into(),
            self.review.clone().into(),
            self.paper.clone().into(),
        ]
    }

    /// Time for the whole run, rounded to whole seconds
    pub fn elapsed_secs(&self) -> u64 {
        self.timings.total.as_secs_f64().round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_state_terminal() {
        assert!(!RunState::Idle.is_terminal());
        assert!(!RunState::Running(Phase::Review).is_terminal());
        assert!(RunState::Completed.is_terminal());
        assert!(RunState::Failed(Phase::Writing).is_terminal());
    }

    #[test]
    fn test_run_state_serializes_with_phase() {
        let json = serde_json::to_value(RunState::Failed(Phase::Parallel)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "failed", "phase": "parallel"}));
    }

    #[test]
    fn test_timings_serialize_human_readable() {
        let timings = PhaseTimings {
            parallel: Duration::from_secs(2),
            total: Duration::from_millis(2500),
            ..Default::default()
        };
        let json = serde_json::to_value(timings).unwrap();
        assert_eq!(json["parallel"], "2s");
        assert_eq!(json["total"], "2s 500ms");
    }
}
