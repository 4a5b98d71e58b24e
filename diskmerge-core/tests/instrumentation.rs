#![expect(clippy::expect_used, reason = "tests require contextual panics")]
//! Tracing instrumentation emitted by merge runs.

use diskmerge_core::{DiskMergerBuilder, DiskSet, DistanceMetric};
use diskmerge_test_support::{fixtures::OVERLAPPING_LINE, tracing::RecordingLayer};
use rstest::rstest;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[rstest]
fn run_records_stage_spans() {
    let disks = DiskSet::from_triples("line", OVERLAPPING_LINE).expect("fixture is valid");
    let merger = DiskMergerBuilder::new()
        .with_metric(DistanceMetric::SquaredEuclidean)
        .with_verification(true)
        .build()
        .expect("configuration is valid");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let outcome = tracing::subscriber::with_default(subscriber, || merger.run(&disks))
        .expect("run must succeed");
    assert_eq!(outcome.selected_count(), 2);

    let run = layer.span("core.run").expect("core.run span must exist");
    assert_eq!(run.field("disk_set"), Some("line"));
    assert_eq!(run.field("disks"), Some("3"));
    assert_eq!(run.field("metric"), Some("planar"));
    assert_eq!(run.field("relaxation"), Some("tight"));
    assert_eq!(run.field("solver"), Some("good_lp/microlp"));

    for stage in ["core.prune", "core.model", "core.solve", "core.project", "core.verify"] {
        assert!(layer.span(stage).is_some(), "{stage} span must exist");
    }
    let solve = layer.span("core.solve").expect("core.solve span must exist");
    assert_eq!(solve.field("variables"), Some("9"));

    let completed = layer.events_with_message("merge completed");
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].level, Level::INFO);
    assert_eq!(completed[0].field("selected"), Some("2"));
    assert_eq!(completed[0].field("merged"), Some("1"));

    let model = layer.events_with_message("model emitted");
    assert_eq!(model.len(), 1);
    assert_eq!(model[0].field("disjointness_rows"), Some("6"));
}

#[rstest]
fn empty_run_skips_every_stage() {
    let disks = DiskSet::new("void", Vec::new()).expect("empty set is constructible");
    let merger = DiskMergerBuilder::new().build().expect("defaults are valid");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let outcome = tracing::subscriber::with_default(subscriber, || merger.run(&disks))
        .expect("empty set merges trivially");
    assert_eq!(outcome.selected_count(), 0);

    let run = layer.span("core.run").expect("core.run span must exist");
    assert_eq!(run.field("disk_set"), Some("void"));
    assert_eq!(run.field("disks"), Some("0"));
    let skipped = layer.events_with_message("disk set is empty, nothing to merge");
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].level, Level::DEBUG);
    for stage in ["core.prune", "core.model", "core.solve", "core.project"] {
        assert!(layer.span(stage).is_none(), "{stage} span must not exist");
    }
    assert!(layer.events().iter().all(|event| event.level != Level::ERROR));
}
