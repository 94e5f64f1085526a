use analyzer::{analysis::Verdict, error::AnalyzerError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read or write a file: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Analyzer(#[from] AnalyzerError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Explain check failed for {file}: verdict {verdict:?}")]
    CheckFailed { file: String, verdict: Verdict },
}
