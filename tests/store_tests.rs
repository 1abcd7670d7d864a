//! End-to-end tests over the ingestion pipeline and the document store.

use wattsci::carbon::enrich_document;
use wattsci::compare::{compare_documents, DeltaStatus};
use wattsci::method::Method;
use wattsci::store::{read_document, Baseline, CommitStore};

const MEASUREMENT_REPORT: &str = "\
# started on Tue Jul  1 10:00:00 2025

     1.000276916         10,00 W    pkg
     2.000554123         12,00 W    pkg
     3.000831330         14,00 W    pkg

       3.001234567 seconds time elapsed
";

const BASELINE_REPORT: &str = "\
     1.000276916          2,00 W    pkg
     2.000554123          2,00 W    pkg
     3.000831330          2,00 W    pkg
";

fn submit_report(
    store: &CommitStore,
    key: &str,
    report: &str,
    baseline: bool,
) -> wattsci::store::CommitDocument {
    let run = Method::Perf
        .process(report, Some(0), Some(2_000_000))
        .unwrap();

    if baseline {
        store
            .submit_baseline(
                key,
                Baseline {
                    timer_start: run.timer_start,
                    timer_end: run.timer_end,
                    events: run.events,
                },
            )
            .unwrap()
    } else {
        store
            .submit_measurement(key, run.events, run.timer_start, run.timer_end)
            .unwrap()
            .1
    }
}

#[test]
fn test_pipeline_single_measurement() {
    let dir = tempfile::tempdir().unwrap();
    let store = CommitStore::new(dir.path());

    let document = submit_report(&store, "abc123", MEASUREMENT_REPORT, false);

    let measurement = document.measurements.get(0).unwrap();
    let pkg = &measurement.with_baseline["pkg"];
    assert_eq!(pkg.mean, 12.0);
    assert_eq!(pkg.consumption, Some(24.0));

    // One measurement: the aggregate is that measurement's data, verbatim.
    let aggregate = document.aggregate.as_ref().unwrap();
    assert_eq!(aggregate.with_baseline, measurement.with_baseline);
}

#[test]
fn test_pipeline_baseline_correction() {
    let dir = tempfile::tempdir().unwrap();
    let store = CommitStore::new(dir.path());

    submit_report(&store, "abc123", BASELINE_REPORT, true);
    let document = submit_report(&store, "abc123", MEASUREMENT_REPORT, false);

    let corrected = document
        .measurements
        .get(0)
        .unwrap()
        .without_baseline
        .as_ref()
        .unwrap();
    assert_eq!(corrected["pkg"].mean, 10.0);
    assert_eq!(corrected["pkg"].consumption, Some(20.0));
}

#[test]
fn test_retro_fix_after_late_baseline() {
    let dir = tempfile::tempdir().unwrap();

    // Independent store instances per submission: handlers are stateless.
    submit_report(
        &CommitStore::new(dir.path()),
        "abc123",
        MEASUREMENT_REPORT,
        false,
    );
    submit_report(
        &CommitStore::new(dir.path()),
        "abc123",
        MEASUREMENT_REPORT,
        false,
    );
    let document = submit_report(
        &CommitStore::new(dir.path()),
        "abc123",
        BASELINE_REPORT,
        true,
    );

    assert_eq!(document.measurements.len(), 2);
    for (_, measurement) in document.measurements.iter() {
        let corrected = measurement.without_baseline.as_ref().unwrap();
        assert_eq!(corrected["pkg"].mean, 10.0);
    }
    assert!(document
        .aggregate
        .as_ref()
        .unwrap()
        .without_baseline
        .is_some());
}

#[test]
fn test_document_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    let store = CommitStore::new(dir.path());

    submit_report(&store, "abc123", BASELINE_REPORT, true);
    submit_report(&store, "abc123", MEASUREMENT_REPORT, false);

    let raw = std::fs::read_to_string(store.document_path("abc123")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert!(json["baseline"]["pkg"]["mean"].is_number());
    assert_eq!(json["measurement_0"]["delta_t_seconds"], 2.0);
    assert!(json["measurement_0"]["withBaseline"]["pkg"]["percentiles"]["p99"].is_number());
    assert!(json["measurement_0"]["withoutBaseline"]["pkg"].is_object());
    assert!(json["aggregate"]["withBaseline"]["pkg"]["consumption"].is_number());
}

#[test]
fn test_enrichment_persists_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let store = CommitStore::new(dir.path());

    submit_report(&store, "abc123", MEASUREMENT_REPORT, false);
    store
        .update("abc123", |document| enrich_document(document, 400.0))
        .unwrap();

    let reloaded = read_document(store.document_path("abc123")).unwrap();
    assert_eq!(reloaded.carbon_intensity, Some(400.0));
    let aggregate = reloaded.aggregate.as_ref().unwrap();
    assert!(aggregate.with_baseline["pkg"].carbon_footprint_g.is_some());
}

#[test]
fn test_compare_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = CommitStore::new(dir.path());

    submit_report(&store, "base", MEASUREMENT_REPORT, false);
    // Refactor draws less power over the same interval.
    let refactor_report = "1.0 8,00 W pkg\n2.0 9,00 W pkg\n3.0 10,00 W pkg\n";
    submit_report(&store, "refactor", refactor_report, false);

    let base = read_document(store.document_path("base")).unwrap();
    let refactor = read_document(store.document_path("refactor")).unwrap();

    let comparison = compare_documents(&base, &refactor).unwrap();
    let pkg = &comparison["pkg"];
    assert_eq!(pkg.status, DeltaStatus::Improved);
    assert_eq!(pkg.base_consumption, Some(24.0));
    assert_eq!(pkg.refactor_consumption, Some(18.0));
    assert_eq!(pkg.difference, Some(-6.0));
}

#[test]
fn test_concurrent_submissions_keep_indices_gap_free() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let root = root.clone();
            std::thread::spawn(move || {
                let store = CommitStore::new(root);
                for _ in 0..2 {
                    let run = Method::Perf.process("1.0 10,0 W pkg\n", None, None).unwrap();
                    store
                        .submit_measurement("abc123", run.events, None, None)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let document = CommitStore::new(&root).load("abc123").unwrap();
    let indices: Vec<u64> = document.measurements.iter().map(|(i, _)| i).collect();
    assert_eq!(indices, (0..16).collect::<Vec<u64>>());
}
