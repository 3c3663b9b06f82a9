use super::{
    Agent, AgentContext, AgentKind, LibraryResult, PaperResult, ReviewResult, ScienceResult,
};
use crate::artifact::{ArtifactWriter, PaperDocument};
use crate::error::Result;

/// Drafts the five-section paper and saves it
pub struct WriterAgent {
    ctx: AgentContext,
    writer: ArtifactWriter,
}

impl WriterAgent {
    pub fn new(ctx: AgentContext, writer: ArtifactWriter) -> Self {
        Self { ctx, writer }
    }

    /// Generate the paper body and persist it.
    ///
    /// Nothing is logged or written if generation fails. A write failure is
    /// returned as a persistence error and also leaves the log untouched.
    pub async fn execute(
        &self,
        topic: &str,
        library: &LibraryResult,
        science: &ScienceResult,
        review: &ReviewResult,
    ) -> Result<PaperResult> {
        tracing::info!(agent = self.name(), topic, "Writing paper");

        let prompt = paper_prompt(topic, library, science, review);
        let paper = self.ctx.generate(self.kind(), &prompt).await?;

        let document = PaperDocument::new(topic, paper.as_str());
        let filename = self.writer.write(&document).await?;

        self.ctx.log().append(
            self.name(),
            format!("Wrote complete paper and saved to {}", filename.display()),
        );

        Ok(PaperResult { paper, filename })
    }
}

impl Agent for WriterAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Writer
    }
}

fn paper_prompt(
    topic: &str,
    library: &LibraryResult,
    science: &ScienceResult,
    review: &ReviewResult,
) -> String {
    format!(
        r#"You are a research paper writer. Write a SHORT research paper on "{topic}".

Use this information:

LITERATURE FINDINGS:
{}

EXPERIMENTS CONDUCTED:
{}

PEER REVIEW:
{}

Write a complete paper with these sections:

1. INTRODUCTION (2-3 sentences: What is this about?)
2. LITERATURE REVIEW (2-3 sentences: What did others find?)
3. METHODOLOGY (2-3 sentences: What did we do?)
4. RESULTS (2-3 sentences: What did we find?)
5. CONCLUSION (2-3 sentences: What does it mean?)

Keep it clear, simple, and well-structured!"#,
        library.analysis, science.design, review.review
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{PromptCategory, ScriptedProvider};
    use crate::memory::SharedLog;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn inputs() -> (LibraryResult, ScienceResult, ReviewResult) {
        (
            LibraryResult {
                papers_found: 3,
                papers: Vec::new(),
                analysis: "Lit.".to_string(),
            },
            ScienceResult {
                experiment_count: 2,
                experiments: Vec::new(),
                design: "Exp.".to_string(),
            },
            ReviewResult {
                review: "Rev.".to_string(),
            },
        )
    }

    #[test]
    fn test_prompt_lists_sections_and_inputs() {
        let (library, science, review) = inputs();
        let prompt = paper_prompt("Robotics", &library, &science, &review);

        for section in [
            "1. INTRODUCTION",
            "2. LITERATURE REVIEW",
            "3. METHODOLOGY",
            "4. RESULTS",
            "5. CONCLUSION",
        ] {
            assert!(prompt.contains(section));
        }
        assert!(prompt.contains("LITERATURE FINDINGS:\nLit."));
        assert!(prompt.contains("EXPERIMENTS CONDUCTED:\nExp."));
        assert!(prompt.contains("PEER REVIEW:\nRev."));
        assert_eq!(PromptCategory::classify(&prompt), PromptCategory::Writer);
    }

    #[tokio::test]
    async fn test_execute_writes_file_then_logs() {
        let temp = TempDir::new().unwrap();
        let provider =
            ScriptedProvider::new().with_response(PromptCategory::Writer, "INTRODUCTION\nHi.");
        let log = SharedLog::new();
        let agent = WriterAgent::new(
            AgentContext::new(Arc::new(provider), log.clone()),
            ArtifactWriter::new(temp.path()),
        );
        let (library, science, review) = inputs();

        let result = agent
            .execute("Robotics", &library, &science, &review)
            .await
            .unwrap();

        assert_eq!(result.paper, "INTRODUCTION\nHi.");
        assert!(result.filename.starts_with(temp.path()));
        let text = std::fs::read_to_string(&result.filename).unwrap();
        assert!(text.contains("RESEARCH PAPER: Robotics"));
        assert!(text.contains("INTRODUCTION\nHi."));

        let entries = log.all_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].note,
            format!("Wrote complete paper and saved to {}", result.filename.display())
        );
    }

    #[tokio::test]
    async fn test_write_failure_is_not_logged() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("output");
        std::fs::write(&blocker, "file in the way").unwrap();

        let log = SharedLog::new();
        let agent = WriterAgent::new(
            AgentContext::new(Arc::new(ScriptedProvider::new()), log.clone()),
            ArtifactWriter::new(&blocker),
        );
        let (library, science, review) = inputs();

        let err = agent
            .execute("Robotics", &library, &science, &review)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::ResearchError::Persistence { .. }));
        assert!(log.is_empty());
    }
}
