use anyhow::Context;
use chrono::Local;
use dotenv::dotenv;
use env_logger;
use log::{error, info, warn};
use std::process::ExitCode;

use price_tracker::build_fetcher;
use price_tracker::config::Settings;
use price_tracker::services::runner::Tracker;
use price_tracker::services::storage::SnapshotStore;
use price_tracker::services::targets::load_targets;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting price run...");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("Error loading settings")?;
    info!("Using {:?} fetch mode", settings.fetch_mode);

    let targets = load_targets(&settings.config_path).context("Error loading websites configuration")?;
    if targets.is_empty() {
        warn!("{} lists no targets", settings.config_path.display());
    }

    let fetcher = build_fetcher(&settings).context("Failed to set up page fetcher")?;
    let store = SnapshotStore::new(&settings.data_dir)
        .with_context(|| format!("Failed to open data directory {}", settings.data_dir.display()))?;

    let today = Local::now().date_naive();
    let report = Tracker::new(fetcher.as_ref(), &store).run(&targets, today).await?;

    info!(
        "Run for {} finished: {} priced, {} missed, {} day(s) in history",
        report.date,
        report.prices.len(),
        report.failures.len(),
        report.history_days
    );
    Ok(())
}
