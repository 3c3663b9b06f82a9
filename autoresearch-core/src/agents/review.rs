use super::{Agent, AgentContext, AgentKind, LibraryResult, ReviewResult, ScienceResult};
use crate::error::Result;

/// Critiques the combined literature and experiment work
pub struct ReviewAgent {
    ctx: AgentContext,
}

impl ReviewAgent {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(
        &self,
        library: &LibraryResult,
        science: &ScienceResult,
    ) -> Result<ReviewResult> {
        tracing::info!(agent = self.name(), "Reviewing research");

        let prompt = review_prompt(library, science);
        let review = self.ctx.generate(self.kind(), &prompt).await?;

        self.ctx
            .log()
            .append(self.name(), "Completed peer review of research");

        Ok(ReviewResult { review })
    }
}

impl Agent for ReviewAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Review
    }
}

fn review_prompt(library: &LibraryResult, science: &ScienceResult) -> String {
    format!(
        r#"You are a supportive peer reviewer.

LITERATURE REVIEW:
{}

EXPERIMENTAL WORK:
{}

Provide constructive feedback (4-5 sentences):
1. Strengths: What's good?
2. Suggestions: What could improve?
3. Overall assessment

Be encouraging and helpful!"#,
        library.analysis, science.design
    )
}
