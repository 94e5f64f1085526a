use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FindingKind {
    Namespace, // collection missing
    Scan,      // full collection scan
    Sort,      // blocking or spilled sort
    Selectivity,
    Latency,
    Planner, // planner enumeration limits
    Execution,
    Index,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Finding {
    pub code: String,    // stable programmatic id
    pub message: String, // human-readable
    pub severity: Severity,
    pub kind: FindingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>, // how to fix
}

/// Constants for finding codes.
pub const CODE_EXPLAIN_NOT_OK: &str = "EXPLAIN_NOT_OK";
pub const CODE_EXECUTION_FAILED: &str = "EXECUTION_FAILED";
pub const CODE_NONEXISTENT_NAMESPACE: &str = "NONEXISTENT_NAMESPACE";
pub const CODE_COLLECTION_SCAN: &str = "COLLECTION_SCAN";
pub const CODE_IN_MEMORY_SORT: &str = "IN_MEMORY_SORT";
pub const CODE_SORT_SPILLED: &str = "SORT_SPILLED";
pub const CODE_SLOW_QUERY: &str = "SLOW_QUERY";
pub const CODE_LOW_SELECTIVITY: &str = "LOW_SELECTIVITY";
pub const CODE_PLAN_LIMITS_REACHED: &str = "PLAN_LIMITS_REACHED";
pub const CODE_COVERED_QUERY: &str = "COVERED_QUERY";

impl Finding {
    pub fn new(
        code: &str,
        message: String,
        severity: Severity,
        kind: FindingKind,
        suggestion: Option<String>,
    ) -> Self {
        Finding {
            code: code.to_string(),
            message,
            severity,
            kind,
            suggestion,
        }
    }

    pub fn new_explain_not_ok(ok: &serde_json::Number) -> Self {
        Self::new(
            CODE_EXPLAIN_NOT_OK,
            format!("The explain command reported ok: {ok}"),
            Severity::Error,
            FindingKind::Execution,
            None,
        )
    }

    pub fn new_execution_failed(error_message: Option<&str>) -> Self {
        let detail = error_message.map(|m| format!(": {m}")).unwrap_or_default();
        Self::new(
            CODE_EXECUTION_FAILED,
            format!("Query execution did not succeed{detail}"),
            Severity::Error,
            FindingKind::Execution,
            None,
        )
    }

    /// Creates a new finding for a query against a collection that does not exist.
    pub fn new_nonexistent_namespace(namespace: &str) -> Self {
        Self::new(
            CODE_NONEXISTENT_NAMESPACE,
            format!("Namespace `{namespace}` does not exist; the plan is a bare EOF stage."),
            Severity::Warning,
            FindingKind::Namespace,
            Some("Check the database and collection names the query targets.".into()),
        )
    }

    pub fn new_collection_scan(docs_examined: u64) -> Self {
        Self::new(
            CODE_COLLECTION_SCAN,
            format!("The winning plan scans the whole collection ({docs_examined} documents examined)."),
            Severity::Warning,
            FindingKind::Scan,
            Some("Create an index on the filtered fields.".into()),
        )
    }

    pub fn new_in_memory_sort(sort_pattern: Option<String>) -> Self {
        let pattern = sort_pattern.map(|p| format!(" on {p}")).unwrap_or_default();
        Self::new(
            CODE_IN_MEMORY_SORT,
            format!("The plan performs a blocking in-memory sort{pattern}."),
            Severity::Warning,
            FindingKind::Sort,
            Some("Add the sort fields to an index following the equality, sort, range order.".into()),
        )
    }

    pub fn new_sort_spilled() -> Self {
        Self::new(
            CODE_SORT_SPILLED,
            "The sort exceeded its memory limit and spilled to disk.".to_string(),
            Severity::Warning,
            FindingKind::Sort,
            None,
        )
    }

    pub fn new_slow_query(execution_time_millis: u64, threshold_ms: u64) -> Self {
        Self::new(
            CODE_SLOW_QUERY,
            format!("Execution took {execution_time_millis} ms, above the {threshold_ms} ms threshold."),
            Severity::Warning,
            FindingKind::Latency,
            None,
        )
    }

    pub fn new_low_selectivity(ratio: f64, limit: f64) -> Self {
        Self::new(
            CODE_LOW_SELECTIVITY,
            format!("{ratio:.1} documents examined per document returned (limit {limit})."),
            Severity::Warning,
            FindingKind::Selectivity,
            Some("Use a more selective index or narrow the filter.".into()),
        )
    }

    pub fn new_plan_limits_reached() -> Self {
        Self::new(
            CODE_PLAN_LIMITS_REACHED,
            "The planner stopped enumerating candidate plans after reaching a limit.".to_string(),
            Severity::Info,
            FindingKind::Planner,
            None,
        )
    }

    pub fn new_covered_query(index_name: &str) -> Self {
        Self::new(
            CODE_COVERED_QUERY,
            format!("The query is covered by index `{index_name}`; no documents were fetched."),
            Severity::Info,
            FindingKind::Index,
            None,
        )
    }
}
