// src/error.rs
use std::path::PathBuf;
use std::time::Duration;

/// Anything that stops the target list or settings from loading. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not create default config at {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config at {path} is not a valid target list: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid setting {name}={value}: {reason}")]
    InvalidSetting {
        name: String,
        value: String,
        reason: String,
    },
}

/// Failure to get HTML for one target. The run carries on without it.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} did not load within {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("browser session failed: {0}")]
    Browser(String),
}

/// Failure to turn a matched element into a price.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid price pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("price pattern {0:?} has no capture group")]
    MissingCaptureGroup(String),

    #[error("price element has no text")]
    EmptyText,

    #[error("{0:?} is not a number")]
    InvalidNumber(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no prices were successfully scraped")]
    NoPrices,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, TrackerError>;
