use super::fixtures_dir;
use model::ExplainReport;
use serde_json::Value;
use std::fs;

/// EOF plan against a collection that does not exist (the original capture).
pub const EOF_NONEXISTENT_NAMESPACE: &str = "eof_nonexistent_namespace.json";
/// Unindexed filter with a blocking sort, 8.7 s.
pub const COLLSCAN_SORT_SLOW: &str = "collscan_sort_slow.json";
/// The same query after a compound index was built, slot-based winning plan.
pub const IXSCAN_COMPOUND_FAST: &str = "ixscan_compound_fast.json";

pub fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name)).expect("read fixture")
}

pub fn fixture_value(name: &str) -> Value {
    serde_json::from_str(&read_fixture(name)).expect("fixture is valid JSON")
}

pub fn parse_fixture(name: &str) -> ExplainReport {
    ExplainReport::from_str(&read_fixture(name)).expect("fixture parses")
}
