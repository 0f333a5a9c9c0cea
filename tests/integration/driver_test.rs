//! Driver Integration Tests
//!
//! Resumption, checkpoint cadence and failure handling of
//! `CheckpointDriver` over `MemoryDatasetStore`:
//! - Three-row scenario across two runs
//! - Write count for a given checkpoint interval
//! - Idempotent resumption and one call per completed record
//! - Unknown-only runs leave the dataset unchanged
//! - Work lost to a failed write is bounded by the interval

use relabel::services::{CheckpointDriver, DriverOptions};
use relabel::{AppError, Dataset, DatasetStore, LoadSource, MemoryDatasetStore};

use crate::common::{posts, ScriptedClassifier};

// ============================================================================
// Helpers
// ============================================================================

fn options(interval: usize) -> DriverOptions {
    DriverOptions {
        checkpoint_interval: interval,
        ..Default::default()
    }
}

fn column(ds: &Dataset, name: &str) -> Vec<String> {
    (0..ds.len())
        .map(|row| ds.cell(row, name).unwrap_or_default().to_string())
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_three_row_scenario_across_two_runs() {
    let mut store = MemoryDatasetStore::new(posts(&[
        ("first", "suicide ideation"),
        ("second", "NOT SUICIDE IDEATION"),
        ("third", "suicide ideation"),
    ]));

    // third row: no scripted reply, so a transport failure
    let classifier = ScriptedClassifier::new(&[
        ("first", "not suicide ideation"),
        ("second", "Not Suicide Ideation\n"),
    ]);
    let summary = CheckpointDriver::new(&classifier, &mut store, options(1000))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(summary.newly_processed, 2);
    assert_eq!(summary.unknown, 1);
    assert_eq!(summary.remaining, 1);

    let ds = store.checkpoint().unwrap();
    assert_eq!(
        column(ds, "New_Class"),
        vec!["not suicide ideation", "not suicide ideation", ""]
    );
    assert_eq!(column(ds, "Changed"), vec!["True", "False", "False"]);
    assert_eq!(column(ds, "Reclassified"), vec!["1", "1", "0"]);

    let classifier = ScriptedClassifier::always(
        "suicide ideation",
        &["first", "second", "third"],
    );
    let summary = CheckpointDriver::new(&classifier, &mut store, options(1000))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(summary.source, LoadSource::Checkpoint);
    assert_eq!(summary.newly_processed, 1);
    assert_eq!(classifier.calls(), vec!["third"]);

    let ds = store.checkpoint().unwrap();
    assert_eq!(ds.cell(2, "New_Class"), Some("suicide ideation"));
    assert_eq!(ds.cell(2, "Changed"), Some("False"));
    assert_eq!(ds.cell(2, "Reclassified"), Some("1"));
    // earlier results are untouched by the second run
    assert_eq!(ds.cell(0, "New_Class"), Some("not suicide ideation"));
}

#[tokio::test]
async fn test_interval_two_with_five_rows_writes_three_times() {
    let texts = ["a", "b", "c", "d", "e"];
    let rows: Vec<(&str, &str)> = texts.iter().map(|t| (*t, "suicide ideation")).collect();
    let mut store = MemoryDatasetStore::new(posts(&rows));
    let classifier = ScriptedClassifier::always("not suicide ideation", &texts);

    let summary = CheckpointDriver::new(&classifier, &mut store, options(2))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.newly_processed, 5);
    assert_eq!(summary.persists, 3);
    assert_eq!(store.persist_count(), 3);
}

#[tokio::test]
async fn test_interval_counts_only_successes() {
    // unknown outcomes do not advance the checkpoint counter
    let mut store = MemoryDatasetStore::new(posts(&[
        ("ok-1", "x"),
        ("fail-1", "x"),
        ("fail-2", "x"),
        ("ok-2", "x"),
        ("ok-3", "x"),
    ]));
    let classifier = ScriptedClassifier::always("suicide ideation", &["ok-1", "ok-2", "ok-3"]);

    let summary = CheckpointDriver::new(&classifier, &mut store, options(2))
        .unwrap()
        .run()
        .await
        .unwrap();

    // one checkpoint after the second success, then the final write
    assert_eq!(summary.persists, 2);
    assert_eq!(summary.newly_processed, 3);
    assert_eq!(summary.unknown, 2);
}

// ============================================================================
// Properties
// ============================================================================

#[tokio::test]
async fn test_idempotent_resumption() {
    let texts = ["a", "b", "c", "d"];
    let rows: Vec<(&str, &str)> = texts.iter().map(|t| (*t, "suicide")).collect();
    let mut store = MemoryDatasetStore::new(posts(&rows));
    let classifier = ScriptedClassifier::always("suicide ideation", &texts);

    let first = CheckpointDriver::new(&classifier, &mut store, options(3))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(first.newly_processed, 4);
    let writes_after_first = store.persist_count();

    let second = CheckpointDriver::new(&classifier, &mut store, options(3))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert!(second.skipped_run);
    assert_eq!(second.newly_processed, 0);
    // no-op run writes nothing
    assert_eq!(store.persist_count(), writes_after_first);

    for text in texts {
        assert_eq!(classifier.call_count(text), 1, "{text}");
    }
}

#[tokio::test]
async fn test_one_call_per_completed_record() {
    let mut store = MemoryDatasetStore::new(posts(&[("a", "x"), ("b", "x"), ("c", "x")]));

    // run 1: only "a" succeeds
    let flaky = ScriptedClassifier::new(&[("a", "suicide ideation")]);
    CheckpointDriver::new(&flaky, &mut store, options(10))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(flaky.calls(), vec!["a", "b", "c"]);

    // run 2: everything succeeds, but "a" is never asked again
    let healthy = ScriptedClassifier::always("not suicide ideation", &["a", "b", "c"]);
    CheckpointDriver::new(&healthy, &mut store, options(10))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(healthy.calls(), vec!["b", "c"]);
    assert_eq!(store.checkpoint().unwrap().cell(0, "New_Class"), Some("suicide ideation"));
}

#[tokio::test]
async fn test_changed_flag_matches_case_insensitive_comparison() {
    let rows = [
        ("a", "Suicide Ideation"),
        ("b", "not suicide ideation"),
        ("c", "suicide"),
        ("d", ""),
        ("e", "NOT SUICIDE IDEATION"),
    ];
    let mut store = MemoryDatasetStore::new(posts(&rows));
    let classifier = ScriptedClassifier::new(&[
        ("a", "SUICIDE IDEATION"),
        ("b", "suicide ideation"),
        ("c", "suicide ideation"),
        ("d", "not suicide ideation"),
        ("e", "not suicide ideation"),
    ]);
    CheckpointDriver::new(&classifier, &mut store, options(1000))
        .unwrap()
        .run()
        .await
        .unwrap();

    let ds = store.checkpoint().unwrap();
    for (row, (_, original)) in rows.iter().enumerate() {
        let new_label = ds.cell(row, "New_Class").unwrap();
        let original = if original.is_empty() {
            "nan".to_string()
        } else {
            original.to_lowercase()
        };
        let expected = if new_label.to_lowercase() != original { "True" } else { "False" };
        assert_eq!(ds.cell(row, "Changed"), Some(expected), "row {row}");
    }
    assert_eq!(column(ds, "Changed"), vec!["False", "True", "True", "True", "False"]);
}

#[tokio::test]
async fn test_unknown_only_run_leaves_dataset_unchanged() {
    let mut store = MemoryDatasetStore::new(posts(&[("a", "suicide"), ("b", "non-suicide")]));
    let classifier = ScriptedClassifier::always("I cannot help with that", &["a", "b"]);

    let summary = CheckpointDriver::new(&classifier, &mut store, options(1))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(summary.newly_processed, 0);
    assert_eq!(summary.unknown, 2);
    // the run is not a no-op, so the final write still happens
    assert_eq!(summary.persists, 1);

    let first_snapshot = store.checkpoint().unwrap().clone();
    assert_eq!(column(&first_snapshot, "Reclassified"), vec!["0", "0"]);
    assert_eq!(column(&first_snapshot, "New_Class"), vec!["", ""]);

    CheckpointDriver::new(&classifier, &mut store, options(1))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(store.checkpoint().unwrap(), &first_snapshot);
}

#[tokio::test]
async fn test_failed_write_loses_at_most_work_since_last_checkpoint() {
    let texts = ["a", "b", "c", "d", "e"];
    let rows: Vec<(&str, &str)> = texts.iter().map(|t| (*t, "x")).collect();

    // writes: after 2, after 4, final. The final one fails.
    let mut store = MemoryDatasetStore::new(posts(&rows)).fail_on_persist(3);
    let classifier = ScriptedClassifier::always("suicide ideation", &texts);

    let err = CheckpointDriver::new(&classifier, &mut store, options(2))
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
    assert_eq!(
        column(store.checkpoint().unwrap(), "Reclassified"),
        vec!["1", "1", "1", "1", "0"]
    );

    // restart retries only the lost record
    let restart = ScriptedClassifier::always("suicide ideation", &texts);
    let summary = CheckpointDriver::new(&restart, &mut store, options(2))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(restart.calls(), vec!["e"]);
    assert_eq!(summary.newly_processed, 1);
    assert_eq!(summary.remaining, 0);
}

#[tokio::test]
async fn test_failed_load_is_fatal_before_classifying() {
    struct BrokenStore;

    impl DatasetStore for BrokenStore {
        fn load(&self) -> relabel::AppResult<(Dataset, LoadSource)> {
            Err(AppError::dataset("checkpoint is truncated"))
        }

        fn persist(&mut self, _dataset: &Dataset) -> relabel::AppResult<()> {
            panic!("must not write after a failed load");
        }
    }

    let classifier = ScriptedClassifier::always("suicide ideation", &["a"]);
    let err = CheckpointDriver::new(&classifier, BrokenStore, options(1))
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Dataset(_)));
    assert!(classifier.calls().is_empty());
}

#[tokio::test]
async fn test_quarantine_stops_retrying_stuck_records() {
    let mut store = MemoryDatasetStore::new(posts(&[("stuck", "x"), ("fine", "x")]));
    let opts = DriverOptions {
        max_attempts: Some(3),
        ..options(10)
    };

    for _ in 0..3 {
        let classifier = ScriptedClassifier::always("suicide ideation", &["fine"]);
        CheckpointDriver::new(&classifier, &mut store, opts.clone())
            .unwrap()
            .run()
            .await
            .unwrap();
    }

    let classifier = ScriptedClassifier::always("suicide ideation", &["fine", "stuck"]);
    let summary = CheckpointDriver::new(&classifier, &mut store, opts)
        .unwrap()
        .run()
        .await
        .unwrap();
    assert!(summary.skipped_run);
    assert_eq!(summary.quarantined, 1);
    assert!(classifier.calls().is_empty());

    let ds = store.checkpoint().unwrap();
    assert_eq!(ds.cell(0, "Attempts"), Some("3"));
    assert_eq!(ds.cell(0, "Reclassified"), Some("0"));
}
