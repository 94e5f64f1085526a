use serde_json::error::Category;
use thiserror::Error;

/// Failures raised while turning raw bytes into an [`ExplainReport`](crate::ExplainReport).
#[derive(Debug, Error)]
pub enum ExplainError {
    /// The input is not valid JSON (syntax error or truncated document).
    #[error("Malformed explain document: {message}")]
    Malformed {
        line: usize,
        column: usize,
        message: String,
    },

    /// The input is valid JSON but does not have the explain shape
    /// (missing required field or wrong value type).
    #[error("Explain document does not match the expected schema: {message}")]
    Schema {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Failed to read explain document: {0}")]
    Io(#[from] std::io::Error),
}

impl ExplainError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, ExplainError::Malformed { .. })
    }

    pub fn is_schema_violation(&self) -> bool {
        matches!(self, ExplainError::Schema { .. })
    }

    /// Line and column of the failure, when the parser reported one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            ExplainError::Malformed { line, column, .. }
            | ExplainError::Schema { line, column, .. } => Some((*line, *column)),
            ExplainError::Io(_) => None,
        }
    }
}

impl From<serde_json::Error> for ExplainError {
    fn from(err: serde_json::Error) -> Self {
        let line = err.line();
        let column = err.column();
        match err.classify() {
            Category::Syntax | Category::Eof => ExplainError::Malformed {
                line,
                column,
                message: err.to_string(),
            },
            Category::Data => ExplainError::Schema {
                line,
                column,
                message: err.to_string(),
            },
            Category::Io => ExplainError::Io(err.into()),
        }
    }
}
