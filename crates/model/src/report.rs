use crate::{
    Document,
    command::Command,
    error::ExplainError,
    planner::QueryPlanner,
    server::{ServerInfo, ServerParameters},
    stage::PlanStage,
    stats::ExecutionStats,
};
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::debug;

/// A complete explain document as returned by `explain("executionStats")`.
///
/// `explainVersion`, `queryPlanner`, `executionStats`, `serverInfo` and `ok`
/// are required; everything else may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainReport {
    pub explain_version: String,
    pub query_planner: QueryPlanner,
    pub execution_stats: ExecutionStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_shape_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,
    pub server_info: ServerInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_parameters: Option<ServerParameters>,
    /// Kept as the server's number so `1` and `1.0` both survive a round-trip.
    pub ok: serde_json::Number,
    /// Top-level keys without a dedicated field (`$clusterTime`, `operationTime`, ...).
    #[serde(flatten)]
    pub extra: Document,
}

impl ExplainReport {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ExplainError> {
        let report: ExplainReport = serde_json::from_slice(bytes)?;
        debug!(
            "Parsed explain report for {} ({} bytes)",
            report.query_planner.namespace,
            bytes.len()
        );
        Ok(report)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self, ExplainError> {
        Self::from_slice(text.as_bytes())
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ExplainError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_slice(&bytes)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_ok(&self) -> bool {
        self.ok.as_f64() == Some(1.0)
    }

    /// Root of the winning plan's classic stage tree.
    pub fn winning_stage(&self) -> &PlanStage {
        self.query_planner.winning_plan.stage()
    }

    /// Classic stage tree of the plan that ran.
    ///
    /// The classic engine reports it as `executionStats.executionStages`. Under
    /// the slot-based engine those stages are SBE nodes (`nlj`, `ixseek`,
    /// `scan`, ...), so the winning `queryPlan` is returned instead.
    pub fn plan_tree(&self) -> &PlanStage {
        if self.query_planner.winning_plan.is_slot_based() {
            self.winning_stage()
        } else {
            &self.execution_stats.execution_stages
        }
    }

    pub fn namespace(&self) -> &str {
        &self.query_planner.namespace
    }
}

impl std::str::FromStr for ExplainReport {
    type Err = ExplainError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        ExplainReport::from_slice(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::StageName;
    use serde_json::{Value, json};

    const FIXTURE: &str = include_str!("../fixtures/eof_nonexistent_namespace.json");

    fn fixture_value() -> Value {
        serde_json::from_str(FIXTURE).unwrap()
    }

    fn parse_value(value: &Value) -> Result<ExplainReport, ExplainError> {
        ExplainReport::from_slice(&serde_json::to_vec(value).unwrap())
    }

    #[test]
    fn test_parse_fixture() {
        let report = ExplainReport::from_str(FIXTURE).unwrap();

        assert_eq!(report.explain_version, "1");
        assert_eq!(report.namespace(), "trips_db.fhvhv_trips_2021-10");
        assert_eq!(report.winning_stage().stage, StageName::Eof);
        assert_eq!(
            report.winning_stage().kind.as_deref(),
            Some("nonExistentNamespace")
        );
        assert_eq!(report.execution_stats.n_returned, 0);
        assert!(report.execution_stats.execution_success);
        assert!(report.execution_stats.execution_stages.is_eof());
        assert_eq!(report.execution_stats.execution_stages.works, Some(1));
        assert_eq!(
            report.query_shape_hash.as_deref(),
            Some("68F31E123EDEF1C80353279995B67E488624FD57853182C30F62F9F1745495E1")
        );
        assert_eq!(report.server_info.port, 27017);
        assert!(report.is_ok());
    }

    #[test]
    fn test_round_trip_is_semantically_equal() {
        let report = ExplainReport::from_str(FIXTURE).unwrap();
        assert_eq!(report.to_json_value().unwrap(), fixture_value());

        let reparsed = ExplainReport::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reparsed, report);
    }

    #[test]
    fn test_empty_sequences_parse_to_empty_vectors() {
        let report = ExplainReport::from_str(FIXTURE).unwrap();
        assert!(report.query_planner.rejected_plans.is_empty());
        assert!(report.execution_stats.all_plans_execution.is_empty());

        let value = report.to_json_value().unwrap();
        assert_eq!(value["queryPlanner"]["rejectedPlans"], json!([]));
        assert_eq!(value["executionStats"]["allPlansExecution"], json!([]));
    }

    #[test]
    fn test_missing_ok_is_schema_violation() {
        let mut value = fixture_value();
        value.as_object_mut().unwrap().remove("ok");

        let err = parse_value(&value).unwrap_err();
        assert!(err.is_schema_violation(), "unexpected error: {err}");
        assert!(err.to_string().contains("`ok`"));
    }

    #[test]
    fn test_each_required_key_is_enforced() {
        for key in [
            "explainVersion",
            "queryPlanner",
            "executionStats",
            "serverInfo",
            "ok",
        ] {
            let mut value = fixture_value();
            value.as_object_mut().unwrap().remove(key);
            let err = parse_value(&value).unwrap_err();
            assert!(err.is_schema_violation(), "{key}: {err}");
        }
    }

    #[test]
    fn test_optional_sections_may_be_absent() {
        let mut value = fixture_value();
        let object = value.as_object_mut().unwrap();
        object.remove("command");
        object.remove("serverParameters");
        object.remove("queryShapeHash");

        let report = parse_value(&value).unwrap();
        assert!(report.command.is_none());
        assert!(report.server_parameters.is_none());
    }

    #[test]
    fn test_non_numeric_ok_is_schema_violation() {
        let mut value = fixture_value();
        value["ok"] = json!("yes");

        let err = parse_value(&value).unwrap_err();
        assert!(err.is_schema_violation(), "unexpected error: {err}");
    }

    #[test]
    fn test_integer_ok_is_accepted() {
        let mut value = fixture_value();
        value["ok"] = json!(1);
        let report = parse_value(&value).unwrap();
        assert!(report.is_ok());
        assert_eq!(report.to_json_value().unwrap(), value);

        value["ok"] = json!(0.0);
        assert!(!parse_value(&value).unwrap().is_ok());
    }

    #[test]
    fn test_plan_tree_follows_execution_engine() {
        let report = ExplainReport::from_str(FIXTURE).unwrap();
        assert!(std::ptr::eq(
            report.plan_tree(),
            &report.execution_stats.execution_stages
        ));

        let mut value = fixture_value();
        value["queryPlanner"]["winningPlan"] = json!({
            "isCached": false,
            "queryPlan": {"stage": "COLLSCAN", "planNodeId": 1},
            "slotBasedPlan": {"slots": "$$RESULT=s4", "stages": "[1] scan s4 s5"}
        });
        value["executionStats"]["executionStages"] = json!({
            "stage": "filter",
            "planNodeId": 1,
            "inputStage": {"stage": "scan", "planNodeId": 1}
        });

        let report = parse_value(&value).unwrap();
        assert_eq!(report.plan_tree().stage, StageName::CollScan);
        assert_eq!(
            report.execution_stats.execution_stages.stage,
            StageName::from("filter")
        );
    }

    #[test]
    fn test_truncated_input_is_malformed() {
        let truncated = &FIXTURE[..FIXTURE.len() / 2];
        let err = ExplainReport::from_str(truncated).unwrap_err();
        assert!(err.is_malformed(), "unexpected error: {err}");
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        for input in ["", "{", "{\"ok\": }", "not json", "{\"ok\": 1,}"] {
            let err = ExplainReport::from_str(input).unwrap_err();
            assert!(err.is_malformed(), "{input:?}: {err}");
            assert!(err.position().is_some());
        }
    }

    #[test]
    fn test_wrong_top_level_type_is_schema_violation() {
        let err = ExplainReport::from_str("[1, 2, 3]").unwrap_err();
        assert!(err.is_schema_violation());
    }

    #[test]
    fn test_unknown_server_parameters_are_preserved() {
        let mut value = fixture_value();
        value["serverParameters"]["internalQueryNewKnobFromTheFuture"] = json!(42);

        let report = parse_value(&value).unwrap();
        let params = report.server_parameters.as_ref().unwrap();
        assert_eq!(params.len(), 11);
        assert_eq!(params.get_u64("internalQueryNewKnobFromTheFuture"), Some(42));
        assert_eq!(report.to_json_value().unwrap(), value);
    }

    #[test]
    fn test_unknown_top_level_keys_are_preserved() {
        let mut value = fixture_value();
        value["operationTime"] = json!({"$timestamp": {"t": 1, "i": 1}});

        let report = parse_value(&value).unwrap();
        assert!(report.extra.contains_key("operationTime"));
        assert_eq!(report.to_json_value().unwrap(), value);
    }

    #[test]
    fn test_from_reader() {
        let report = ExplainReport::from_reader(FIXTURE.as_bytes()).unwrap();
        assert_eq!(report.server_info.version, "8.2.1");
    }

    #[test]
    fn test_from_str_trait() {
        let report: ExplainReport = FIXTURE.parse().unwrap();
        assert_eq!(report.explain_version, "1");
    }
}
