// src/bin/rebuild_history.rs
// Rebuilds combined.json from the per-date snapshots without fetching anything.

use dotenv::dotenv;
use env_logger;
use log::info;

use price_tracker::config::Settings;
use price_tracker::services::storage::SnapshotStore;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env()?;
    let store = SnapshotStore::new(&settings.data_dir)?;

    let before = store.read_combined_history()?;
    let after = store.rebuild_combined_history()?;

    info!("Combined history: {} day(s) before, {} day(s) after", before.len(), after.len());
    if let (Some(first), Some(last)) = (after.keys().next(), after.keys().next_back()) {
        info!("Covers {} to {}", first, last);
    }
    Ok(())
}
