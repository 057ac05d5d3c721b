// src/services/runner.rs
use chrono::NaiveDate;
use log::{error, info, warn};
use std::path::PathBuf;

use crate::error::{ExtractError, FetchError, Result, TrackerError};
use crate::models::{DailySnapshot, Prices, Target};
use crate::services::extractor::extract_price;
use crate::services::fetcher::PageFetcher;
use crate::services::storage::SnapshotStore;

/// What happened to one target during a run.
#[derive(Debug)]
pub enum TargetOutcome {
    Priced(f64),
    NotFound,
    FetchFailed(FetchError),
    ExtractFailed(ExtractError),
}

impl TargetOutcome {
    pub fn price(&self) -> Option<f64> {
        match self {
            TargetOutcome::Priced(price) => Some(*price),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub date: NaiveDate,
    pub prices: Prices,
    pub failures: Vec<(String, TargetOutcome)>,
    pub snapshot_path: PathBuf,
    pub history_days: usize,
}

/// Runs the fetch → extract → store pipeline, one target at a time.
pub struct Tracker<'a> {
    fetcher: &'a dyn PageFetcher,
    store: &'a SnapshotStore,
}

impl<'a> Tracker<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, store: &'a SnapshotStore) -> Self {
        Tracker { fetcher, store }
    }

    pub async fn price_target(&self, target: &Target) -> TargetOutcome {
        let html = match self.fetcher.fetch(target).await {
            Ok(html) => html,
            Err(e) => return TargetOutcome::FetchFailed(e),
        };

        match extract_price(&html, target) {
            Ok(Some(price)) => TargetOutcome::Priced(price),
            Ok(None) => TargetOutcome::NotFound,
            Err(e) => TargetOutcome::ExtractFailed(e),
        }
    }

    /// Price every target, then write the day's snapshot and rebuild the
    /// combined history. Fails with `NoPrices`, writing nothing, when no
    /// target produced a price.
    pub async fn run(&self, targets: &[Target], date: NaiveDate) -> Result<RunReport> {
        let mut snapshot = DailySnapshot::new(date);
        let mut failures = Vec::new();

        for target in targets {
            let outcome = self.price_target(target).await;
            match &outcome {
                TargetOutcome::Priced(price) => {
                    info!("{}: {}", target.name, price);
                    snapshot.record(&target.name, *price);
                    continue;
                }
                TargetOutcome::NotFound => {
                    warn!("{}: selector {:?} matched nothing", target.name, target.selector)
                }
                TargetOutcome::FetchFailed(e) => warn!("Error fetching {}: {}", target.name, e),
                TargetOutcome::ExtractFailed(e) => warn!("Error extracting {}: {}", target.name, e),
            }
            failures.push((target.name.clone(), outcome));
        }

        if snapshot.is_empty() {
            error!("No prices were successfully scraped.");
            return Err(TrackerError::NoPrices);
        }

        let snapshot_path = self.store.write_snapshot(&snapshot)?;
        let history = self.store.rebuild_combined_history()?;

        Ok(RunReport {
            date,
            prices: snapshot.prices,
            failures,
            snapshot_path,
            history_days: history.len(),
        })
    }
}
