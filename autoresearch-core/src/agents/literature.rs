use std::sync::Arc;

use super::{Agent, AgentContext, AgentKind, LibraryResult};
use crate::error::Result;
use crate::sources::{PaperRecord, PaperSource};

/// Searches for papers on a topic and synthesizes what they say
pub struct LiteratureAgent {
    ctx: AgentContext,
    source: Arc<dyn PaperSource>,
}

impl LiteratureAgent {
    pub fn new(ctx: AgentContext, source: Arc<dyn PaperSource>) -> Self {
        Self { ctx, source }
    }

    pub async fn execute(&self, topic: &str) -> Result<LibraryResult> {
        tracing::info!(agent = self.name(), topic, "Reviewing literature");

        let papers = self.source.search(topic);
        let prompt = analysis_prompt(topic, &papers);
        let analysis = self.ctx.generate(self.kind(), &prompt).await?;

        self.ctx.log().append(
            self.name(),
            format!("Analyzed {} papers on {}", papers.len(), topic),
        );
        tracing::info!(agent = self.name(), papers = papers.len(), "Literature analysis complete");

        Ok(LibraryResult {
            papers_found: papers.len(),
            papers,
            analysis,
        })
    }
}

impl Agent for LiteratureAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Literature
    }
}

fn analysis_prompt(topic: &str, papers: &[PaperRecord]) -> String {
    let papers_text = papers
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "Paper {}: {}\nSource: {} ({})\nSummary: {}",
                i + 1,
                p.title,
                p.source,
                p.year,
                p.summary
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are an expert research analyst. Analyze these papers about "{topic}":

{papers_text}

Provide a clear summary (4-5 sentences) covering:
1. Main findings across these papers
2. Key trends and patterns
3. Important insights for new research

Write in simple, clear language."#
    )
}
