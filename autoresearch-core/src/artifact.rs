//! Paper artifact formatting and persistence

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::error::{Result, ResearchError};

const RULE_WIDTH: usize = 70;

/// A finished paper, ready to render
#[derive(Debug, Clone)]
pub struct PaperDocument {
    pub topic: String,
    /// Model-generated body, included verbatim
    pub body: String,
    pub generated_at: DateTime<Local>,
}

impl PaperDocument {
    pub fn new(topic: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            body: body.into(),
            generated_at: Local::now(),
        }
    }

    pub fn with_generated_at(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = at;
        self
    }

    /// `research_paper_YYYYMMDD_HHMMSS.txt`, local time, second resolution
    pub fn file_name(&self) -> String {
        format!(
            "research_paper_{}.txt",
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Full text: header block, body, footer block
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        format!(
            "{rule}\nRESEARCH PAPER: {topic}\n{rule}\nGenerated by AutoResearcher\nDate: {date}\n{rule}\n\n{body}\n\n{rule}\nEnd of Paper\n{rule}\n",
            topic = self.topic,
            date = self.generated_at.format("%B %d, %Y at %I:%M %p"),
            body = self.body,
        )
    }
}

/// Writes rendered papers into a directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    directory: PathBuf,
}

impl ArtifactWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write `doc`, creating the directory if needed.
    ///
    /// A file with the same name, from a run in the same second, is
    /// overwritten.
    pub async fn write(&self, doc: &PaperDocument) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| ResearchError::persistence(&self.directory, e))?;

        let path = self.directory.join(doc.file_name());
        tokio::fs::write(&path, doc.render())
            .await
            .map_err(|e| ResearchError::persistence(&path, e))?;

        tracing::info!(path = %path.display(), "Paper saved");
        Ok(path)
    }
}
