// src/config.rs
use log::warn;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const HTTP_TIMEOUT_SECS: u64 = 10;
pub const BROWSER_TIMEOUT_SECS: u64 = 60;
pub const SETTLE_MIN_SECS: u64 = 5;
pub const SETTLE_MAX_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Http,
    Browser,
}

impl FetchMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" => Some(FetchMode::Http),
            "browser" => Some(FetchMode::Browser),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub debug_dir: PathBuf,
    pub fetch_mode: FetchMode,
    pub timeout: Duration,
    pub user_agent: String,
    pub webdriver_url: String,
    pub settle_min: Duration,
    pub settle_max: Duration,
    pub debug_html: bool,
    pub headless: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            config_path: PathBuf::from("websites.json"),
            data_dir: PathBuf::from("data"),
            debug_dir: PathBuf::from("debug"),
            fetch_mode: FetchMode::Http,
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            settle_min: Duration::from_secs(SETTLE_MIN_SECS),
            settle_max: Duration::from_secs(SETTLE_MAX_SECS),
            debug_html: false,
            headless: false,
        }
    }
}

impl Settings {
    /// Read settings from the process environment. Call `dotenv().ok()` first
    /// if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Unset keys keep their defaults;
    /// the timeout and debug dump defaults depend on the fetch mode.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(path) = lookup("PRICE_TRACKER_CONFIG") {
            settings.config_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("PRICE_TRACKER_DATA_DIR") {
            settings.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("PRICE_TRACKER_DEBUG_DIR") {
            settings.debug_dir = PathBuf::from(dir);
        }
        if let Some(mode) = lookup("PRICE_TRACKER_FETCH_MODE") {
            settings.fetch_mode = FetchMode::parse(&mode)
                .ok_or_else(|| invalid("PRICE_TRACKER_FETCH_MODE", &mode, "expected 'http' or 'browser'"))?;
        }

        let default_timeout = match settings.fetch_mode {
            FetchMode::Http => HTTP_TIMEOUT_SECS,
            FetchMode::Browser => BROWSER_TIMEOUT_SECS,
        };
        settings.timeout = Duration::from_secs(seconds(&lookup, "PRICE_TRACKER_TIMEOUT_SECS", default_timeout)?);
        if settings.timeout.is_zero() {
            return Err(invalid("PRICE_TRACKER_TIMEOUT_SECS", "0", "timeout must be positive"));
        }

        if let Some(agent) = lookup("PRICE_TRACKER_USER_AGENT") {
            if agent.trim().is_empty() {
                warn!("PRICE_TRACKER_USER_AGENT is empty, keeping the default");
            } else {
                settings.user_agent = agent;
            }
        }
        if let Some(url) = lookup("PRICE_TRACKER_WEBDRIVER_URL") {
            settings.webdriver_url = url;
        }

        let min = seconds(&lookup, "PRICE_TRACKER_SETTLE_MIN_SECS", SETTLE_MIN_SECS)?;
        let max = seconds(&lookup, "PRICE_TRACKER_SETTLE_MAX_SECS", SETTLE_MAX_SECS)?;
        if min > max {
            return Err(invalid(
                "PRICE_TRACKER_SETTLE_MIN_SECS",
                &min.to_string(),
                &format!("must not exceed PRICE_TRACKER_SETTLE_MAX_SECS ({})", max),
            ));
        }
        settings.settle_min = Duration::from_secs(min);
        settings.settle_max = Duration::from_secs(max);

        settings.debug_html = match lookup("PRICE_TRACKER_DEBUG_HTML") {
            Some(flag) => parse_flag(&flag)
                .ok_or_else(|| invalid("PRICE_TRACKER_DEBUG_HTML", &flag, "expected true or false"))?,
            None => settings.fetch_mode == FetchMode::Browser,
        };

        if let Some(flag) = lookup("PRICE_TRACKER_HEADLESS") {
            settings.headless = parse_flag(&flag)
                .ok_or_else(|| invalid("PRICE_TRACKER_HEADLESS", &flag, "expected true or false"))?;
        }

        Ok(settings)
    }
}

fn seconds<F>(lookup: &F, name: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(name, &value, &e.to_string())),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(name: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
