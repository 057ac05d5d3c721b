mod common;

use serde_json::json;
use std::fs;

use common::{date, seed_snapshot, target, StubFetcher};
use price_tracker::error::{ExtractError, TrackerError};
use price_tracker::services::runner::{TargetOutcome, Tracker};
use price_tracker::services::storage::SnapshotStore;

#[tokio::test]
async fn partial_failures_still_write_a_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path()).unwrap();
    let fetcher = StubFetcher::default()
        .with_page("Lamp", r#"<span class="price">$19.99</span>"#)
        .with_page("Desk", r#"<div class="cost">$1,234.56 USD</div>"#)
        .with_page("Chair", r#"<div class="sold-out">Gone</div>"#);
    let targets = vec![
        target("Lamp", "span.price", Some(r"\$([0-9]+\.[0-9]{2})")),
        target("Offline", "span.price", None),
        target("Desk", "div.cost", None),
        target("Chair", "span.price", None),
    ];

    let report = Tracker::new(&fetcher, &store)
        .run(&targets, date(2024, 1, 3))
        .await
        .unwrap();

    assert_eq!(report.prices.len(), 2);
    assert_eq!(report.prices["Lamp"], 19.99);
    assert_eq!(report.prices["Desk"], 1234.56);
    assert_eq!(report.failures.len(), 2);
    assert!(matches!(report.failures[0], (ref name, TargetOutcome::FetchFailed(_)) if name == "Offline"));
    assert!(matches!(report.failures[1], (ref name, TargetOutcome::NotFound) if name == "Chair"));
    assert_eq!(report.history_days, 1);
    assert_eq!(report.snapshot_path, dir.path().join("2024-01-03.json"));

    // Every target is tried, in order, exactly once.
    assert_eq!(fetcher.calls(), vec!["Lamp", "Offline", "Desk", "Chair"]);
}

#[tokio::test]
async fn all_failures_write_nothing_and_keep_history() {
    let dir = tempfile::tempdir().unwrap();
    seed_snapshot(dir.path(), "2024-01-01", json!({"Lamp": 18.0}));
    let store = SnapshotStore::new(dir.path()).unwrap();
    store.rebuild_combined_history().unwrap();
    let history_before = fs::read_to_string(store.combined_path()).unwrap();

    let fetcher = StubFetcher::default();
    let targets = vec![target("Lamp", "span.price", None), target("Desk", "div.cost", None)];

    let result = Tracker::new(&fetcher, &store).run(&targets, date(2024, 1, 2)).await;

    assert!(matches!(result, Err(TrackerError::NoPrices)));
    assert!(!store.snapshot_path(date(2024, 1, 2)).exists());
    assert_eq!(fs::read_to_string(store.combined_path()).unwrap(), history_before);
}

#[tokio::test]
async fn empty_target_list_is_a_failed_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path()).unwrap();
    let fetcher = StubFetcher::default();

    let result = Tracker::new(&fetcher, &store).run(&[], date(2024, 1, 2)).await;
    assert!(matches!(result, Err(TrackerError::NoPrices)));
}

#[tokio::test]
async fn run_appends_to_existing_history() {
    let dir = tempfile::tempdir().unwrap();
    seed_snapshot(dir.path(), "2024-01-01", json!({"A": 10.0}));
    let store = SnapshotStore::new(dir.path()).unwrap();
    let fetcher = StubFetcher::default().with_page("A", r#"<b id="p">11</b>"#);

    let report = Tracker::new(&fetcher, &store)
        .run(&[target("A", "#p", None)], date(2024, 1, 2))
        .await
        .unwrap();

    assert_eq!(report.history_days, 2);
    assert_eq!(
        serde_json::to_value(store.read_combined_history().unwrap()).unwrap(),
        json!({"2024-01-01": {"A": 10.0}, "2024-01-02": {"A": 11.0}})
    );
}

#[tokio::test]
async fn price_target_distinguishes_failure_kinds() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path()).unwrap();
    let fetcher = StubFetcher::default()
        .with_page("Good", r#"<p class="p">$5.25</p>"#)
        .with_page("Garbled", r#"<p class="p">1.234.567,89</p>"#);
    let tracker = Tracker::new(&fetcher, &store);

    let good = tracker.price_target(&target("Good", ".p", None)).await;
    assert_eq!(good.price(), Some(5.25));

    let garbled = tracker.price_target(&target("Garbled", ".p", None)).await;
    assert!(matches!(
        garbled,
        TargetOutcome::ExtractFailed(ExtractError::InvalidNumber(_))
    ));

    let missing = tracker.price_target(&target("Missing", ".p", None)).await;
    assert!(matches!(missing, TargetOutcome::FetchFailed(_)));
    assert_eq!(missing.price(), None);
}

#[tokio::test]
async fn duplicate_names_keep_the_last_price() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path()).unwrap();
    let fetcher = StubFetcher::default()
        .with_page("Same", r#"<i class="a">1.00</i><i class="b">2.00</i>"#);
    let targets = vec![target("Same", "i.a", None), target("Same", "i.b", None)];

    let report = Tracker::new(&fetcher, &store).run(&targets, date(2024, 1, 4)).await.unwrap();
    assert_eq!(report.prices.len(), 1);
    assert_eq!(report.prices["Same"], 2.0);
}
