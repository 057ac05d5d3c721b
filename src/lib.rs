// src/lib.rs

pub mod config;
pub mod error;
pub mod models;
pub mod services;

use crate::config::{FetchMode, Settings};
use crate::error::FetchError;
use crate::services::browser::BrowserFetcher;
use crate::services::fetcher::{HttpFetcher, PageFetcher};

/// Build the fetch strategy selected in `settings`.
pub fn build_fetcher(settings: &Settings) -> Result<Box<dyn PageFetcher>, FetchError> {
    match settings.fetch_mode {
        FetchMode::Http => Ok(Box::new(HttpFetcher::from_settings(settings)?)),
        FetchMode::Browser => Ok(Box::new(BrowserFetcher::from_settings(settings))),
    }
}
