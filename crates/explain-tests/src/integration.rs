#[cfg(test)]
mod tests {
    use crate::{
        stage_fixture,
        utils::{
            COLLSCAN_SORT_SLOW, EOF_NONEXISTENT_NAMESPACE, IXSCAN_COMPOUND_FAST, fixture_value,
            parse_fixture, read_fixture,
        },
    };
    use analyzer::{
        analysis::{Verdict, analyze},
        comparison::{BenchmarkRecord, parse_index_pattern},
        error::AnalyzerError,
        finding::{
            CODE_COLLECTION_SCAN, CODE_IN_MEMORY_SORT, CODE_LOW_SELECTIVITY,
            CODE_NONEXISTENT_NAMESPACE, CODE_SLOW_QUERY, CODE_SORT_SPILLED,
        },
        monitor::SlowQueryMonitor,
        source::{load_report, load_reports, query_name},
        summary::PlanSummary,
        thresholds::Thresholds,
    };
    use model::{ExplainReport, IndexKind, StageName};
    use std::fs;
    use tempfile::tempdir;
    use tracing_test::traced_test;

    const ALL_FIXTURES: [&str; 3] = [
        EOF_NONEXISTENT_NAMESPACE,
        COLLSCAN_SORT_SLOW,
        IXSCAN_COMPOUND_FAST,
    ];

    // Scenario: every captured document is parsed and serialised again.
    // Expected Outcome: the output is the same JSON value as the input.
    #[test]
    fn fixtures_round_trip() {
        for name in ALL_FIXTURES {
            let report = parse_fixture(name);
            assert_eq!(report.to_json_value().unwrap(), fixture_value(name), "{name}");
        }
    }

    // Scenario: the original capture of a find against a missing collection.
    // Expected Outcome: EOF winning plan, nothing returned, empty plan lists.
    #[test]
    fn eof_capture_properties() {
        let report = parse_fixture(EOF_NONEXISTENT_NAMESPACE);

        assert_eq!(report.winning_stage().stage, StageName::Eof);
        assert_eq!(report.execution_stats.n_returned, 0);
        assert!(report.query_planner.rejected_plans.is_empty());
        assert!(report.execution_stats.all_plans_execution.is_empty());

        let command = report.command.as_ref().unwrap();
        assert_eq!(command.find.as_deref(), Some("fhvhv_trips_2021-10"));
        assert_eq!(command.db.as_deref(), Some("trips_db"));

        let params = report.server_parameters.as_ref().unwrap();
        assert_eq!(params.len(), 10);
        assert_eq!(
            params.get_u64("internalQueryPlannerIgnoreIndexWithCollationForRegex"),
            Some(1)
        );
    }

    // Scenario: the capture with `ok` removed, and the capture cut in half.
    // Expected Outcome: a schema violation and a malformed-input failure respectively.
    #[test]
    fn invalid_documents_are_rejected() {
        let mut value = fixture_value(EOF_NONEXISTENT_NAMESPACE);
        value.as_object_mut().unwrap().remove("ok");
        let err = ExplainReport::from_slice(&serde_json::to_vec(&value).unwrap()).unwrap_err();
        assert!(err.is_schema_violation(), "{err}");

        let text = read_fixture(EOF_NONEXISTENT_NAMESPACE);
        let err = ExplainReport::from_str(&text[..text.len() - 20]).unwrap_err();
        assert!(err.is_malformed(), "{err}");
    }

    #[traced_test]
    #[test]
    fn eof_capture_analysis() {
        let report = parse_fixture(EOF_NONEXISTENT_NAMESPACE);
        let analysis = analyze(&report, &Thresholds::default());

        assert_eq!(analysis.verdict, Verdict::NeedsAttention);
        assert!(analysis.has_finding(CODE_NONEXISTENT_NAMESPACE));
        assert_eq!(analysis.summary.stages, vec!["EOF"]);
        assert!(logs_contain("Analysed trips_db.fhvhv_trips_2021-10"));
    }

    // Scenario: unindexed filter with a sort on a 14M document collection.
    // Expected Outcome: scan, sort, latency and selectivity findings.
    #[traced_test]
    #[test]
    fn slow_collection_scan_analysis() {
        let report = parse_fixture(COLLSCAN_SORT_SLOW);
        let analysis = analyze(&report, &Thresholds::default());

        for code in [
            CODE_COLLECTION_SCAN,
            CODE_IN_MEMORY_SORT,
            CODE_SLOW_QUERY,
            CODE_LOW_SELECTIVITY,
        ] {
            assert!(analysis.has_finding(code), "missing {code}");
        }
        assert_eq!(analysis.verdict, Verdict::NeedsAttention);
        assert_eq!(analysis.summary.stage_chain(), "SORT > COLLSCAN");
        assert_eq!(analysis.summary.memory_usage_bytes_estimate, Some(712_304));
        assert!(logs_contain("COLLECTION_SCAN"));
    }

    // Scenario: the same query once the compound index exists, run by the slot-based engine.
    // Expected Outcome: the summary and findings come from the classic `queryPlan`,
    // not from the SBE execution nodes.
    #[test]
    fn slot_based_plan_summary() {
        let report = parse_fixture(IXSCAN_COMPOUND_FAST);
        assert_eq!(report.explain_version, "2");
        assert!(report.query_planner.winning_plan.is_slot_based());
        assert_eq!(report.winning_stage().depth(), 3);
        assert_eq!(
            report.execution_stats.execution_stages.stage,
            StageName::from("sort")
        );

        let summary = PlanSummary::from_report(&report);
        assert_eq!(summary.stage_chain(), "SORT > FETCH > IXSCAN");
        assert_eq!(
            summary.index_name.as_deref(),
            Some("dispatching_base_num_1_trip_miles_1_trip_time_1")
        );
        assert_eq!(summary.index_kind, Some(IndexKind::Compound));
        assert_eq!(summary.docs_examined_per_returned, Some(1.0));

        let analysis = analyze(&report, &Thresholds::default());
        assert!(analysis.has_finding(CODE_IN_MEMORY_SORT));
        assert!(!analysis.has_finding(CODE_SORT_SPILLED));
        assert!(!analysis.has_finding(CODE_SLOW_QUERY));
        assert!(!analysis.has_finding(CODE_COLLECTION_SCAN));
    }

    // Scenario: before/after benchmark of building the compound index.
    // Expected Outcome: the comparison is an improvement and records the new index.
    #[test]
    fn index_benchmark_comparison() {
        let before = PlanSummary::from_report(&parse_fixture(COLLSCAN_SORT_SLOW));
        let after = PlanSummary::from_report(&parse_fixture(IXSCAN_COMPOUND_FAST));
        let index =
            parse_index_pattern(r#"{"dispatching_base_num": 1, "trip_miles": 1, "trip_time": 1}"#)
                .unwrap();

        let record = BenchmarkRecord::new("q10_complex_user_request", Some(index), before, after);

        assert!(record.comparison.improved);
        assert!(record.comparison.index_changed);
        assert_eq!(record.comparison.index_before, None);
        assert_eq!(record.comparison.execution_time_millis.delta, 38 - 8741);
        assert_eq!(record.comparison.n_returned.delta, 0);
        assert_eq!(record.index_type, Some(IndexKind::Compound));
    }

    #[traced_test]
    #[tokio::test]
    async fn monitor_batch_from_disk() {
        let dir = tempdir().unwrap();
        let paths: Vec<_> = ALL_FIXTURES
            .iter()
            .map(|name| stage_fixture(dir.path(), name))
            .collect();

        let mut monitor = SlowQueryMonitor::new(Thresholds::default());
        for (path, report) in load_reports(&paths).await.unwrap() {
            monitor.record(query_name(&path), &report);
        }
        let report = monitor.report();

        assert_eq!(report.total, 3);
        assert_eq!(report.slow, 1);
        assert_eq!(report.slowest[0].name, "collscan_sort_slow");
        assert_eq!(report.average_execution_time_millis, Some((8741.0 + 38.0) / 3.0));
        assert!(logs_contain("Loaded 3 explain report(s)"));
    }

    #[traced_test]
    #[tokio::test]
    async fn truncated_file_is_reported_with_its_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        let text = read_fixture(COLLSCAN_SORT_SLOW);
        fs::write(&path, &text[..text.len() / 3]).unwrap();

        match load_report(&path).await {
            Err(AnalyzerError::Load { path: failed, source }) => {
                assert_eq!(failed, path);
                assert!(source.is_malformed());
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(logs_contain("Rejected"));
    }
}
