use model::ExplainError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading and analysing explain reports.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Failed to load explain report from {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ExplainError,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid index key pattern: {0}")]
    InvalidIndexPattern(String),
}
