use crate::{Document, stage::PlanStage};
use serde::{Deserialize, Serialize};

/// The `executionStats` section: counters from one execution of the winning plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStats {
    pub execution_success: bool,
    pub n_returned: u64,
    pub execution_time_millis: u64,
    pub total_keys_examined: u64,
    pub total_docs_examined: u64,
    pub execution_stages: PlanStage,
    #[serde(default)]
    pub all_plans_execution: Vec<PlanExecution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(flatten)]
    pub extra: Document,
}

/// Trial-period sample for one candidate plan (`allPlansExecution` entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanExecution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_returned: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_millis_estimate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_keys_examined: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_docs_examined: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_stages: Option<PlanStage>,
    #[serde(flatten)]
    pub extra: Document,
}

impl ExecutionStats {
    /// Documents fetched per document returned. `None` when nothing was returned.
    pub fn docs_examined_per_returned(&self) -> Option<f64> {
        (self.n_returned > 0).then(|| self.total_docs_examined as f64 / self.n_returned as f64)
    }

    /// Index keys scanned per document returned. `None` when nothing was returned.
    pub fn keys_examined_per_returned(&self) -> Option<f64> {
        (self.n_returned > 0).then(|| self.total_keys_examined as f64 / self.n_returned as f64)
    }
}
