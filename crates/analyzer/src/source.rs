use crate::error::AnalyzerError;
use futures::future::try_join_all;
use model::ExplainReport;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Reads and parses one explain report from disk.
pub async fn load_report(path: impl AsRef<Path>) -> Result<ExplainReport, AnalyzerError> {
    let path = path.as_ref();
    info!("Loading explain report from {}", path.display());

    let bytes = tokio::fs::read(path).await.map_err(|source| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    ExplainReport::from_slice(&bytes).map_err(|source| {
        warn!("Rejected {}: {source}", path.display());
        AnalyzerError::Load {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Loads several reports concurrently, preserving input order.
/// Fails on the first file that cannot be read or parsed.
pub async fn load_reports(
    paths: &[PathBuf],
) -> Result<Vec<(PathBuf, ExplainReport)>, AnalyzerError> {
    let reports = try_join_all(paths.iter().map(|path| async move {
        load_report(path).await.map(|report| (path.clone(), report))
    }))
    .await?;

    info!("Loaded {} explain report(s)", reports.len());
    Ok(reports)
}

/// Query name derived from a report path: the file stem.
pub fn query_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
