//! The three-phase research pipeline

mod orchestrator;
mod result;

pub use orchestrator::{
    INITIAL_CONTEXT, ORCHESTRATOR_NAME, ResearchOrchestrator, ResearchOrchestratorBuilder,
};
pub use result::{Phase, PhaseTimings, RunResult, RunState};
