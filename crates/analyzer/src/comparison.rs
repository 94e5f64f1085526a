use crate::{error::AnalyzerError, summary::PlanSummary};
use chrono::{DateTime, Utc};
use model::{Document, IndexKind};
use serde::Serialize;
use serde_json::Value;

/// Before/after values of one metric.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricDelta {
    pub before: u64,
    pub after: u64,
    /// `after - before`, saturated to the `i64` range; negative means the metric went down.
    pub delta: i64,
    /// `delta / before`. `None` when `before` is zero.
    pub relative: Option<f64>,
}

impl MetricDelta {
    pub fn new(before: u64, after: u64) -> Self {
        let delta = i128::from(after) - i128::from(before);
        let delta = i64::try_from(delta).unwrap_or(if delta < 0 { i64::MIN } else { i64::MAX });
        MetricDelta {
            before,
            after,
            delta,
            relative: (before > 0).then(|| delta as f64 / before as f64),
        }
    }

    pub fn decreased(&self) -> bool {
        self.delta < 0
    }

    pub fn increased(&self) -> bool {
        self.delta > 0
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub query_name: String,
    pub execution_time_millis: MetricDelta,
    pub total_docs_examined: MetricDelta,
    pub total_keys_examined: MetricDelta,
    pub n_returned: MetricDelta,
    pub index_before: Option<String>,
    pub index_after: Option<String>,
    pub index_changed: bool,
    pub improved: bool,
}

impl Comparison {
    pub fn between(
        query_name: impl Into<String>,
        before: &PlanSummary,
        after: &PlanSummary,
    ) -> Self {
        let execution_time_millis =
            MetricDelta::new(before.execution_time_millis, after.execution_time_millis);
        let total_docs_examined =
            MetricDelta::new(before.total_docs_examined, after.total_docs_examined);

        let improved = (execution_time_millis.decreased() || total_docs_examined.decreased())
            && !execution_time_millis.increased()
            && !total_docs_examined.increased();

        Comparison {
            query_name: query_name.into(),
            execution_time_millis,
            total_docs_examined,
            total_keys_examined: MetricDelta::new(
                before.total_keys_examined,
                after.total_keys_examined,
            ),
            n_returned: MetricDelta::new(before.n_returned, after.n_returned),
            index_before: before.index_name.clone(),
            index_after: after.index_name.clone(),
            index_changed: before.index_name != after.index_name,
            improved,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct BenchmarkResults {
    pub before: PlanSummary,
    pub after: PlanSummary,
}

/// A saved before/after index benchmark.
#[derive(Serialize, Debug, Clone)]
pub struct BenchmarkRecord {
    pub query_name: String,
    pub index_param: Option<Document>,
    pub index_type: Option<IndexKind>,
    pub recorded_at: DateTime<Utc>,
    pub comparison: Comparison,
    pub results: BenchmarkResults,
}

impl BenchmarkRecord {
    pub fn new(
        query_name: &str,
        index_param: Option<Document>,
        before: PlanSummary,
        after: PlanSummary,
    ) -> Self {
        BenchmarkRecord {
            query_name: query_name.to_string(),
            index_type: index_param.as_ref().and_then(IndexKind::classify),
            index_param,
            recorded_at: Utc::now(),
            comparison: Comparison::between(query_name, &before, &after),
            results: BenchmarkResults { before, after },
        }
    }

    /// File name the record is saved under, e.g. `q7_PULoc_time_2025-11-02_14-03-59.json`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.json",
            self.query_name,
            self.recorded_at.format("%Y-%m-%d_%H-%M-%S")
        )
    }
}

/// Parses an index key pattern given as JSON text, e.g. `{"trip_time": 1}`.
pub fn parse_index_pattern(text: &str) -> Result<Document, AnalyzerError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(pattern)) if !pattern.is_empty() => Ok(pattern),
        Ok(_) => Err(AnalyzerError::InvalidIndexPattern(format!(
            "expected a non-empty JSON object, got `{text}`"
        ))),
        Err(err) => Err(AnalyzerError::InvalidIndexPattern(err.to_string())),
    }
}
