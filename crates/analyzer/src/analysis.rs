use crate::{
    finding::{Finding, Severity},
    summary::PlanSummary,
    thresholds::Thresholds,
};
use chrono::{DateTime, Utc};
use model::{ExplainReport, PlanStage, StageName};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// The overall outcome of an analysis.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    #[default]
    Healthy,
    NeedsAttention,
    Failed,
}

impl Verdict {
    /// Worst verdict implied by a set of findings.
    pub fn from_findings(findings: &[Finding]) -> Self {
        match findings.iter().map(|f| f.severity).max() {
            Some(Severity::Error) => Verdict::Failed,
            Some(Severity::Warning) => Verdict::NeedsAttention,
            _ => Verdict::Healthy,
        }
    }
}

/// Summary plus findings for one explain report.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: String,
    pub engine_version: String,
    pub generated_at: DateTime<Utc>,
    pub verdict: Verdict,
    pub summary: PlanSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<Finding>,
}

impl Analysis {
    pub fn has_finding(&self, code: &str) -> bool {
        self.findings.iter().any(|f| f.code == code)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }
}

pub fn analyze(report: &ExplainReport, thresholds: &Thresholds) -> Analysis {
    let summary = PlanSummary::from_report(report);
    let findings = collect_findings(report, thresholds);
    let verdict = Verdict::from_findings(&findings);

    info!(
        "Analysed {}: {} finding(s), verdict {:?}",
        summary.namespace,
        findings.len(),
        verdict
    );

    Analysis {
        id: uuid::Uuid::new_v4().to_string(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: Utc::now(),
        verdict,
        summary,
        findings,
    }
}

fn collect_findings(report: &ExplainReport, thresholds: &Thresholds) -> Vec<Finding> {
    let planner = &report.query_planner;
    let stats = &report.execution_stats;
    let executed = &stats.execution_stages;
    let plan = report.plan_tree();
    let mut findings = Vec::new();

    if !report.is_ok() {
        findings.push(Finding::new_explain_not_ok(&report.ok));
    }

    if !stats.execution_success {
        findings.push(Finding::new_execution_failed(stats.error_message.as_deref()));
    }

    let stages = || executed.iter().chain(report.winning_stage().iter());

    if stages().any(PlanStage::is_nonexistent_namespace) {
        findings.push(Finding::new_nonexistent_namespace(&planner.namespace));
    }

    if plan.contains(&StageName::CollScan) {
        findings.push(Finding::new_collection_scan(stats.total_docs_examined));
    }

    if let Some(sort) = plan.find(&StageName::Sort) {
        let pattern = sort
            .sort_pattern
            .as_ref()
            .map(|p| Value::Object(p.clone()).to_string());
        findings.push(Finding::new_in_memory_sort(pattern));
    }

    // SBE reports the spill on its lowercase `sort` node.
    if executed
        .iter()
        .any(|s| is_sort(&s.stage) && s.used_disk == Some(true))
    {
        findings.push(Finding::new_sort_spilled());
    }

    if thresholds.is_slow(stats.execution_time_millis) {
        findings.push(Finding::new_slow_query(
            stats.execution_time_millis,
            thresholds.slow_query_ms,
        ));
    }

    if let Some(ratio) = stats.docs_examined_per_returned()
        && ratio > thresholds.max_docs_per_returned
    {
        findings.push(Finding::new_low_selectivity(
            ratio,
            thresholds.max_docs_per_returned,
        ));
    }

    if planner.hit_plan_limits() {
        findings.push(Finding::new_plan_limits_reached());
    }

    if stats.total_docs_examined == 0
        && stats.n_returned > 0
        && let Some(index) = plan
            .iter()
            .find(|s| s.stage.is_index_access())
            .and_then(|s| s.index_name.as_deref())
    {
        findings.push(Finding::new_covered_query(index));
    }

    for finding in &findings {
        debug!("{} [{:?}] {}", finding.code, finding.severity, finding.message);
    }

    findings
}

fn is_sort(name: &StageName) -> bool {
    *name == StageName::Sort || name.as_str() == "sort"
}
