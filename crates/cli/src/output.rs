use crate::error::CliError;
use analyzer::{
    comparison::BenchmarkRecord, finding::Finding, monitor::MonitorReport, summary::PlanSummary,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    let json = serde_json::to_string_pretty(value)?;
    Ok(json)
}

/// Writes `value` as pretty JSON to `path`, or to stdout when no path is given.
pub async fn emit_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<(), CliError> {
    let json = to_json(value)?;
    match path {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Saves a benchmark record. A directory target gets the record's own file name.
pub async fn write_benchmark(
    record: &BenchmarkRecord,
    target: Option<&Path>,
) -> Result<(), CliError> {
    let path: Option<PathBuf> = match target {
        Some(dir) if tokio::fs::metadata(dir).await.is_ok_and(|m| m.is_dir()) => {
            Some(dir.join(record.file_name()))
        }
        other => other.map(Path::to_path_buf),
    };
    emit_json(record, path.as_deref()).await
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

pub fn print_summary(summary: &PlanSummary) {
    println!("Explain summary for '{}':", summary.namespace);
    println!("-----------------------------");
    println!("{:<22} {}", "Stages", summary.stage_chain());
    println!("{:<22} {}", "Execution success", summary.execution_success);
    println!("{:<22} {} ms", "Execution time", summary.execution_time_millis);
    println!(
        "{:<22} {}",
        "Optimization time",
        or_na(summary.optimization_time_millis.map(|ms| format!("{ms} ms")))
    );
    println!("{:<22} {}", "Returned", summary.n_returned);
    println!("{:<22} {}", "Docs examined", summary.total_docs_examined);
    println!("{:<22} {}", "Keys examined", summary.total_keys_examined);
    println!(
        "{:<22} {}",
        "Docs per returned",
        or_na(summary.docs_examined_per_returned.map(|r| format!("{r:.2}")))
    );
    println!("{:<22} {}", "Index", or_na(summary.index_name.as_deref()));
    println!("{:<22} {}", "Index type", or_na(summary.index_kind));
    println!("{:<22} {}", "Rejected plans", summary.rejected_plans);
    println!(
        "{:<22} {}",
        "Memory estimate",
        or_na(summary.memory_usage_bytes_estimate.map(|b| format!("{b} B")))
    );
}

pub fn print_findings(findings: &[Finding]) {
    for finding in findings {
        println!("[{:?}] {}: {}", finding.severity, finding.code, finding.message);
        if let Some(suggestion) = &finding.suggestion {
            println!("    -> {suggestion}");
        }
    }
}

pub fn print_monitor(report: &MonitorReport) {
    println!("Slow query monitor (threshold {} ms):", report.threshold_ms);
    println!("-----------------------------");
    println!(
        "{:<32} {:>10} {:<6} {}",
        "Query", "Time (ms)", "Slow", "Index"
    );
    for query in &report.queries {
        println!(
            "{:<32} {:>10} {:<6} {}",
            query.name,
            query.execution_time_millis,
            if query.slow { "yes" } else { "no" },
            or_na(query.index_name.as_deref())
        );
    }
    println!("-----------------------------");
    println!("{:<22} {}", "Queries tested", report.total);
    println!("{:<22} {}", "Slow queries", report.slow);
    println!("{:<22} {}", "Fast queries", report.fast);
    println!(
        "{:<22} {}",
        "Average time",
        or_na(report.average_execution_time_millis.map(|ms| format!("{ms:.1} ms")))
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyzer::summary::PlanSummary;
    use model::Document;

    fn summary(millis: u64) -> PlanSummary {
        PlanSummary {
            namespace: "trips_db.trips".into(),
            parsed_query: Document::new(),
            optimization_time_millis: None,
            rejected_plans: 0,
            execution_success: true,
            n_returned: 1,
            execution_time_millis: millis,
            total_docs_examined: 1,
            total_keys_examined: 1,
            stages: vec!["FETCH".into(), "IXSCAN".into()],
            index_name: Some("trip_time_1".into()),
            index_bounds: None,
            index_kind: None,
            memory_usage_bytes_estimate: None,
            sort_pattern: None,
            docs_examined_per_returned: Some(1.0),
        }
    }

    #[tokio::test]
    async fn test_write_benchmark_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let record = BenchmarkRecord::new("q1_simple_outlier", None, summary(400), summary(3));

        write_benchmark(&record, Some(dir.path())).await.unwrap();

        let written = dir.path().join(record.file_name());
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(written).unwrap()).unwrap();
        assert_eq!(json["query_name"], "q1_simple_outlier");
        assert_eq!(json["comparison"]["improved"], true);
    }

    #[tokio::test]
    async fn test_emit_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");

        emit_json(&summary(12), Some(&path)).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["executionTimeMillis"], 12);
    }

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(Some(5)), "5");
        assert_eq!(or_na::<u64>(None), "n/a");
    }
}
