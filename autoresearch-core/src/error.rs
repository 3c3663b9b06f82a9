//! Error types for research pipeline operations

use std::path::PathBuf;
use std::time::Duration;

/// Result type for research pipeline operations
pub type Result<T> = std::result::Result<T, ResearchError>;

/// Error types for the research pipeline
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    /// Missing or invalid configuration (credentials, model, settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A model call failed or returned unusable output
    #[error("Generation error in {agent}: {message}")]
    Generation { agent: String, message: String },

    /// A model call exceeded the configured generation timeout
    #[error("Generation in {agent} timed out after {after:?}")]
    Timeout { agent: String, after: Duration },

    /// The final artifact could not be written
    #[error("Persistence error writing {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResearchError {
    /// Build a generation error attributed to an agent
    pub fn generation(agent: impl Into<String>, message: impl Into<String>) -> Self {
        ResearchError::Generation {
            agent: agent.into(),
            message: message.into(),
        }
    }

    /// Build a persistence error for a path
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResearchError::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from the model call boundary
    pub fn is_generation(&self) -> bool {
        matches!(
            self,
            ResearchError::Generation { .. } | ResearchError::Timeout { .. }
        )
    }
}
