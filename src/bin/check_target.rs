// src/bin/check_target.rs
// Run with: cargo run --bin check_target -- "Amazon Example"
//
// Fetches a single configured target and shows what the selector and
// pattern make of it. Nothing is written to the data directory.

use anyhow::{anyhow, Context};
use dotenv::dotenv;
use env_logger;
use log::{error, info, warn};
use std::env;

use price_tracker::build_fetcher;
use price_tracker::config::Settings;
use price_tracker::services::extractor::{parse_price, price_text};
use price_tracker::services::targets::load_targets;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let name = env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: check_target <target name>"))?;

    let settings = Settings::from_env()?;
    let targets = load_targets(&settings.config_path)?;
    let target = targets
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| anyhow!("no target named {:?} in {}", name, settings.config_path.display()))?;

    info!("Checking {} with {:?} fetch mode", target.name, settings.fetch_mode);
    let fetcher = build_fetcher(&settings)?;
    let html = fetcher
        .fetch(target)
        .await
        .with_context(|| format!("Failed to fetch {}", target.url))?;
    info!("Fetched {} bytes", html.len());

    match price_text(&html, &target.selector)? {
        Some(text) => {
            info!("Selector {:?} matched text: {:?}", target.selector, text);
            match parse_price(&text, target.regex.as_deref()) {
                Ok(price) => info!("SUCCESS: {} price is {}", target.name, price),
                Err(e) => error!("ERROR: could not parse a price: {}", e),
            }
        }
        None => {
            warn!("Selector {:?} matched nothing", target.selector);
            let sample = html.chars().take(2000).collect::<String>();
            info!("HTML sample (first 2000 chars):");
            println!("{}", sample);
        }
    }

    Ok(())
}
