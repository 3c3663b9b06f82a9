use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use super::{Agent, AgentContext, AgentKind, ScienceResult};
use crate::config::HypothesisSource;
use crate::error::Result;
use crate::sources::ExperimentRunner;

/// Hypotheses executed when the model's design is not used
pub const PLACEHOLDER_HYPOTHESES: [&str; 2] = ["Testing hypothesis 1", "Testing hypothesis 2"];

static HYPOTHESIS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[\s*_#>-]*hypothesis[\s*_]*\d*[\s*_]*:[\s*_]*(.+?)[\s*_]*$")
        .expect("hypothesis pattern is valid")
});

/// Designs two experiments with the model, then runs two experiments
pub struct ScienceAgent {
    ctx: AgentContext,
    runner: Arc<dyn ExperimentRunner>,
    hypothesis_source: HypothesisSource,
}

impl ScienceAgent {
    pub fn new(ctx: AgentContext, runner: Arc<dyn ExperimentRunner>) -> Self {
        Self {
            ctx,
            runner,
            hypothesis_source: HypothesisSource::default(),
        }
    }

    pub fn with_hypothesis_source(mut self, source: HypothesisSource) -> Self {
        self.hypothesis_source = source;
        self
    }

    /// Run the agent. `context` is a free-text label for the research phase.
    ///
    /// With [`HypothesisSource::Placeholder`] the executed experiments are
    /// independent of the model's design text.
    pub async fn execute(&self, topic: &str, context: &str) -> Result<ScienceResult> {
        tracing::info!(agent = self.name(), topic, context, "Designing experiments");

        let prompt = design_prompt(topic, context);
        let design = self.ctx.generate(self.kind(), &prompt).await?;

        let hypotheses = match self.hypothesis_source {
            HypothesisSource::Placeholder => PLACEHOLDER_HYPOTHESES.map(str::to_string),
            HypothesisSource::Designed => hypotheses_from_design(&design),
        };

        let experiments: Vec<_> = hypotheses
            .iter()
            .map(|h| self.runner.run_experiment(h))
            .collect();

        self.ctx.log().append(
            self.name(),
            format!("Designed and ran {} experiments", experiments.len()),
        );
        tracing::info!(
            agent = self.name(),
            experiments = experiments.len(),
            "Experiments complete"
        );

        Ok(ScienceResult {
            experiment_count: experiments.len(),
            experiments,
            design,
        })
    }
}

impl Agent for ScienceAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Science
    }
}

/// Extract the `Hypothesis:` lines of a design, in order
pub fn parse_hypotheses(design: &str) -> Vec<String> {
    HYPOTHESIS_LINE
        .captures_iter(design)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|h| !h.is_empty())
        .collect()
}

/// Two hypotheses from the design, topping up from the placeholders
fn hypotheses_from_design(design: &str) -> [String; 2] {
    let mut parsed = parse_hypotheses(design).into_iter();
    PLACEHOLDER_HYPOTHESES.map(|fallback| parsed.next().unwrap_or_else(|| fallback.to_string()))
}

fn design_prompt(topic: &str, context: &str) -> String {
    format!(
        r#"You are a research scientist. Based on this topic: "{topic}"

Context: {context}

Design 2 simple experiments to test key hypotheses.

For each experiment, provide:
1. A clear hypothesis (one sentence)
2. Expected outcome (one sentence)

Format:
EXPERIMENT 1:
Hypothesis: [hypothesis]
Expected: [expected outcome]

EXPERIMENT 2:
Hypothesis: [hypothesis]
Expected: [expected outcome]

Keep it simple and practical."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{PromptCategory, ScriptedProvider};
    use crate::memory::SharedLog;
    use crate::sources::RandomExperimentRunner;

    const DESIGN: &str = "EXPERIMENT 1:\nHypothesis: Qubits decohere slower when cooled.\n\
                          Expected: Longer coherence.\n\nEXPERIMENT 2:\n\
                          **Hypothesis:** Error correction scales linearly.\nExpected: Linear cost.";

    fn agent(design: &str, source: HypothesisSource) -> (ScienceAgent, SharedLog) {
        let provider = ScriptedProvider::new().with_response(PromptCategory::Science, design);
        let log = SharedLog::new();
        let agent = ScienceAgent::new(
            AgentContext::new(Arc::new(provider), log.clone()),
            Arc::new(RandomExperimentRunner::new()),
        )
        .with_hypothesis_source(source);
        (agent, log)
    }

    #[test]
    fn test_prompt_format() {
        let prompt = design_prompt("Quantum Computing", "Initial research phase");
        assert!(prompt.contains(r#"topic: "Quantum Computing""#));
        assert!(prompt.contains("Context: Initial research phase"));
        assert!(prompt.contains("EXPERIMENT 1:\nHypothesis: [hypothesis]\nExpected: [expected outcome]"));
        assert!(prompt.contains("EXPERIMENT 2:"));
    }

    #[test]
    fn test_parse_hypotheses_handles_markdown() {
        assert_eq!(
            parse_hypotheses(DESIGN),
            vec![
                "Qubits decohere slower when cooled.".to_string(),
                "Error correction scales linearly.".to_string(),
            ]
        );
        assert!(parse_hypotheses("no structure here").is_empty());
    }

    #[test]
    fn test_parse_hypotheses_accepts_numbered_labels() {
        let design = "Hypothesis 1: Warm rooms slow typing.\nExpected: Fewer words.\n\
                      **Hypothesis 2:** Music helps focus.\n- Hypothesis: Naps boost recall.";
        assert_eq!(
            parse_hypotheses(design),
            vec![
                "Warm rooms slow typing.".to_string(),
                "Music helps focus.".to_string(),
                "Naps boost recall.".to_string(),
            ]
        );
    }

    #[test]
    fn test_designed_hypotheses_fall_back_per_slot() {
        let hypotheses = hypotheses_from_design("Hypothesis: Only one.");
        assert_eq!(hypotheses[0], "Only one.");
        assert_eq!(hypotheses[1], "Testing hypothesis 2");
    }

    #[tokio::test]
    async fn test_placeholder_mode_ignores_design() {
        let (agent, log) = agent(DESIGN, HypothesisSource::Placeholder);
        let result = agent.execute("Quantum Computing", "Initial research phase").await.unwrap();

        assert_eq!(result.experiment_count, 2);
        assert_eq!(result.design, DESIGN);
        let executed: Vec<_> = result.experiments.iter().map(|e| e.hypothesis.as_str()).collect();
        assert_eq!(executed, PLACEHOLDER_HYPOTHESES.to_vec());

        let entries = log.all_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].note, "Designed and ran 2 experiments");
    }

    #[tokio::test]
    async fn test_designed_mode_runs_model_hypotheses() {
        let (agent, _log) = agent(DESIGN, HypothesisSource::Designed);
        let result = agent.execute("Quantum Computing", "ctx").await.unwrap();

        assert_eq!(result.experiments[0].hypothesis, "Qubits decohere slower when cooled.");
        assert_eq!(result.experiments[1].hypothesis, "Error correction scales linearly.");
    }
}
