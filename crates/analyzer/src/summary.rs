use model::{Document, ExplainReport, IndexKind, StageName};
use serde::Serialize;
use serde_json::Value;

/// The headline metrics of one explain report.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub namespace: String,
    pub parsed_query: Document,
    pub optimization_time_millis: Option<u64>,
    pub rejected_plans: usize,
    pub execution_success: bool,
    pub n_returned: u64,
    pub execution_time_millis: u64,
    pub total_docs_examined: u64,
    pub total_keys_examined: u64,
    /// Classic stage names of the executed plan in pre-order, root first.
    pub stages: Vec<String>,
    pub index_name: Option<String>,
    pub index_bounds: Option<Value>,
    pub index_kind: Option<IndexKind>,
    pub memory_usage_bytes_estimate: Option<u64>,
    pub sort_pattern: Option<Document>,
    pub docs_examined_per_returned: Option<f64>,
}

impl PlanSummary {
    pub fn from_report(report: &ExplainReport) -> Self {
        let planner = &report.query_planner;
        let stats = &report.execution_stats;
        let root = report.plan_tree();

        // The last index scan in pre-order is the one reported, as the
        // benchmark harness did.
        let ixscan = root.iter().filter(|s| s.stage == StageName::IxScan).last();
        let sort = root.find(&StageName::Sort);
        let memory_usage_bytes_estimate = stats
            .execution_stages
            .max_memory_usage_bytes
            .or(root.max_memory_usage_bytes);

        PlanSummary {
            namespace: planner.namespace.clone(),
            parsed_query: planner.parsed_query.clone(),
            optimization_time_millis: planner.optimization_time_millis,
            rejected_plans: planner.rejected_plans.len(),
            execution_success: stats.execution_success,
            n_returned: stats.n_returned,
            execution_time_millis: stats.execution_time_millis,
            total_docs_examined: stats.total_docs_examined,
            total_keys_examined: stats.total_keys_examined,
            stages: root.iter().map(|s| s.stage.to_string()).collect(),
            index_name: ixscan.and_then(|s| s.index_name.clone()),
            index_bounds: ixscan.and_then(|s| s.index_bounds.clone()),
            index_kind: ixscan.and_then(|s| s.index_kind()),
            memory_usage_bytes_estimate,
            sort_pattern: sort.and_then(|s| s.sort_pattern.clone()),
            docs_examined_per_returned: stats.docs_examined_per_returned(),
        }
    }

    /// Stage chain rendered as `LIMIT > FETCH > IXSCAN`.
    pub fn stage_chain(&self) -> String {
        self.stages.join(" > ")
    }

    pub fn uses_index(&self) -> bool {
        self.index_name.is_some()
    }
}
