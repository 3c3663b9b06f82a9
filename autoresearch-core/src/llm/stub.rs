//! Scripted LLM provider for deterministic runs
//!
//! Answers each prompt with a canned response chosen by the prompt's
//! category (which agent sent it), optionally after a delay or with a
//! failure, and records when every call started and finished. Used by the
//! test suite and by offline demos that must not reach a real model.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::{Result, ResearchError};
use crate::llm::{LLMConfig, LLMProvider, ModelInfo};

/// Which agent a prompt came from, recognised by its opening role line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptCategory {
    Literature,
    Science,
    Review,
    Writer,
    Other,
}

impl PromptCategory {
    /// Classify a prompt by the role it assigns the model
    pub fn classify(prompt: &str) -> Self {
        if prompt.contains("expert research analyst") {
            PromptCategory::Literature
        } else if prompt.contains("research scientist") {
            PromptCategory::Science
        } else if prompt.contains("peer reviewer") {
            PromptCategory::Review
        } else if prompt.contains("research paper writer") {
            PromptCategory::Writer
        } else {
            PromptCategory::Other
        }
    }

    fn default_response(&self) -> &'static str {
        match self {
            PromptCategory::Literature => "Stub literature analysis.",
            PromptCategory::Science => {
                "EXPERIMENT 1:\nHypothesis: Stub hypothesis one.\nExpected: Stub outcome one.\n\n\
                 EXPERIMENT 2:\nHypothesis: Stub hypothesis two.\nExpected: Stub outcome two."
            }
            PromptCategory::Review => "Stub peer review.",
            PromptCategory::Writer => "Stub research paper.",
            PromptCategory::Other => "Stub response.",
        }
    }
}

/// Lifecycle point of a recorded call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallPhase {
    Started,
    Finished,
    Failed,
}

/// One recorded call lifecycle event
#[derive(Debug, Clone, Serialize)]
pub struct CallEvent {
    /// Global order of this event within the provider
    pub sequence: u64,
    pub category: PromptCategory,
    pub phase: CallPhase,
}

#[derive(Debug, Clone)]
enum Outcome {
    Reply(String),
    Fail(String),
}

#[derive(Debug, Clone)]
struct Script {
    outcome: Outcome,
    delay: Duration,
}

/// Deterministic provider answering by prompt category
pub struct ScriptedProvider {
    scripts: HashMap<PromptCategory, Script>,
    events: Mutex<Vec<CallEvent>>,
    prompts: Mutex<Vec<(PromptCategory, String)>>,
    sequence: AtomicU64,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProvider {
    /// Provider that answers every category with its built-in stub text
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            events: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            sequence: AtomicU64::new(0),
        }
    }

    fn script_mut(&mut self, category: PromptCategory) -> &mut Script {
        self.scripts.entry(category).or_insert_with(|| Script {
            outcome: Outcome::Reply(category.default_response().to_string()),
            delay: Duration::ZERO,
        })
    }

    /// Answer `category` prompts with `text`
    pub fn with_response(mut self, category: PromptCategory, text: impl Into<String>) -> Self {
        self.script_mut(category).outcome = Outcome::Reply(text.into());
        self
    }

    /// Fail `category` prompts with a generation error
    pub fn with_failure(mut self, category: PromptCategory, message: impl Into<String>) -> Self {
        self.script_mut(category).outcome = Outcome::Fail(message.into());
        self
    }

    /// Suspend for `delay` before answering `category` prompts
    pub fn with_delay(mut self, category: PromptCategory, delay: Duration) -> Self {
        self.script_mut(category).delay = delay;
        self
    }

    /// All recorded call events in order
    pub fn events(&self) -> Vec<CallEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Prompts received for a category, in arrival order
    pub fn prompts_for(&self, category: PromptCategory) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, p)| p.clone())
            .collect()
    }

    /// Number of calls received
    pub fn call_count(&self) -> usize {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Sequence number of the first `phase` event for `category`
    pub fn first_event(&self, category: PromptCategory, phase: CallPhase) -> Option<u64> {
        self.events()
            .into_iter()
            .find(|e| e.category == category && e.phase == phase)
            .map(|e| e.sequence)
    }

    fn record(&self, category: PromptCategory, phase: CallPhase) {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        events.push(CallEvent {
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst),
            category,
            phase,
        });
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn generate(&self, prompt: &str, _config: &LLMConfig) -> Result<String> {
        let category = PromptCategory::classify(prompt);
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((category, prompt.to_string()));
        self.record(category, CallPhase::Started);

        let script = self.scripts.get(&category).cloned().unwrap_or(Script {
            outcome: Outcome::Reply(category.default_response().to_string()),
            delay: Duration::ZERO,
        });

        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }

        match script.outcome {
            Outcome::Reply(text) => {
                self.record(category, CallPhase::Finished);
                Ok(text)
            }
            Outcome::Fail(message) => {
                self.record(category, CallPhase::Failed);
                Err(ResearchError::generation("scripted", message))
            }
        }
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "scripted".to_string(),
            model_name: "none".to_string(),
        }
    }
}
