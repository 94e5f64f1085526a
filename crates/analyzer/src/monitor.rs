use crate::{summary::PlanSummary, thresholds::Thresholds};
use model::ExplainReport;
use serde::Serialize;
use tracing::info;

/// One entry of a monitored batch.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredQuery {
    pub name: String,
    pub namespace: String,
    pub execution_time_millis: u64,
    pub index_name: Option<String>,
    pub slow: bool,
}

/// Slow/fast breakdown of a batch of explained queries.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonitorReport {
    pub threshold_ms: u64,
    pub total: usize,
    pub slow: usize,
    pub fast: usize,
    pub average_execution_time_millis: Option<f64>,
    /// Slow queries, slowest first.
    pub slowest: Vec<MonitoredQuery>,
    pub queries: Vec<MonitoredQuery>,
}

pub struct SlowQueryMonitor {
    thresholds: Thresholds,
    queries: Vec<MonitoredQuery>,
}

impl SlowQueryMonitor {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            queries: Vec::new(),
        }
    }

    pub fn record(&mut self, name: impl Into<String>, report: &ExplainReport) {
        let summary = PlanSummary::from_report(report);
        let slow = self.thresholds.is_slow(summary.execution_time_millis);
        let name = name.into();

        info!(
            "{name}: {} ms ({})",
            summary.execution_time_millis,
            if slow { "slow" } else { "fast" }
        );

        self.queries.push(MonitoredQuery {
            name,
            namespace: summary.namespace,
            execution_time_millis: summary.execution_time_millis,
            index_name: summary.index_name,
            slow,
        });
    }

    pub fn report(&self) -> MonitorReport {
        let total = self.queries.len();
        let slow = self.queries.iter().filter(|q| q.slow).count();
        let sum: u64 = self.queries.iter().map(|q| q.execution_time_millis).sum();
        let average = (total > 0).then(|| sum as f64 / total as f64);

        let mut slowest: Vec<MonitoredQuery> =
            self.queries.iter().filter(|q| q.slow).cloned().collect();
        slowest.sort_by(|a, b| b.execution_time_millis.cmp(&a.execution_time_millis));

        MonitorReport {
            threshold_ms: self.thresholds.slow_query_ms,
            total,
            slow,
            fast: total - slow,
            average_execution_time_millis: average,
            slowest,
            queries: self.queries.clone(),
        }
    }
}
