// src/services/browser.rs
//
// Scripted-browser fetching over WebDriver. Each target gets its own
// session so cookies and storage never leak between sites.

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use log::{debug, info, warn};
use rand::Rng;
use serde_json::{json, Map, Value};
use std::fmt::Display;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Settings;
use crate::error::FetchError;
use crate::models::Target;
use crate::services::fetcher::{FetchOptions, PageFetcher};
use crate::services::storage::write_debug_html;

/// Bounds for the pause that lets scripts and bot checks finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    pub min: Duration,
    pub max: Duration,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        SettlePolicy {
            min: Duration::from_secs(5),
            max: Duration::from_secs(10),
        }
    }
}

impl SettlePolicy {
    pub fn new(min: Duration, max: Duration) -> Self {
        if max < min {
            SettlePolicy { min: max, max: min }
        } else {
            SettlePolicy { min, max }
        }
    }

    /// No waiting at all.
    pub fn none() -> Self {
        SettlePolicy {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn next_delay(&self) -> Duration {
        self.next_delay_with(&mut rand::thread_rng())
    }

    pub fn next_delay_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if max <= min {
            return self.min;
        }
        Duration::from_millis(rng.gen_range(min..=max))
    }
}

/// How the browser presents itself.
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub viewport: (u32, u32),
    pub locale: String,
    pub headless: bool,
}

impl Default for BrowserProfile {
    fn default() -> Self {
        BrowserProfile {
            viewport: (1920, 1080),
            locale: "en-US".to_string(),
            headless: false,
        }
    }
}

impl BrowserProfile {
    /// WebDriver capabilities for a Chrome session. `eager` makes navigation
    /// return once DOM content has loaded.
    pub fn capabilities(&self, user_agent: &str, accept_language: &str) -> Map<String, Value> {
        let mut args = vec![
            format!("--window-size={},{}", self.viewport.0, self.viewport.1),
            format!("--lang={}", self.locale),
            format!("--user-agent={}", user_agent),
        ];
        if self.headless {
            args.push("--headless=new".to_string());
        }

        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert("pageLoadStrategy".to_string(), json!("eager"));
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": args,
                "prefs": { "intl.accept_languages": accept_language },
            }),
        );
        caps
    }
}

pub struct BrowserFetcher {
    webdriver_url: String,
    options: FetchOptions,
    profile: BrowserProfile,
    settle: SettlePolicy,
    debug_dir: Option<PathBuf>,
}

impl BrowserFetcher {
    pub fn new(webdriver_url: impl Into<String>, options: FetchOptions, settle: SettlePolicy) -> Self {
        BrowserFetcher {
            webdriver_url: webdriver_url.into(),
            options,
            profile: BrowserProfile::default(),
            settle,
            debug_dir: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut fetcher = BrowserFetcher::new(
            settings.webdriver_url.clone(),
            FetchOptions::from_settings(settings),
            SettlePolicy::new(settings.settle_min, settings.settle_max),
        );
        fetcher.profile.headless = settings.headless;
        if settings.debug_html {
            fetcher.with_debug_dir(settings.debug_dir.clone())
        } else {
            fetcher
        }
    }

    /// Dump every fetched page under `dir`.
    pub fn with_debug_dir(mut self, dir: PathBuf) -> Self {
        self.debug_dir = Some(dir);
        self
    }

    async fn settle(&self) {
        let delay = self.settle.next_delay();
        if !delay.is_zero() {
            debug!("Waiting {:?} for the page to settle", delay);
            tokio::time::sleep(delay).await;
        }
    }

    /// Run one WebDriver call, giving up after the configured timeout.
    async fn bounded<T, E, F>(&self, url: &str, call: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        match tokio::time::timeout(self.options.timeout, call).await {
            Ok(result) => result.map_err(|e| FetchError::Browser(e.to_string())),
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                after: self.options.timeout,
            }),
        }
    }

    async fn render(&self, client: &Client, target: &Target) -> Result<String, FetchError> {
        self.bounded(&target.url, client.goto(&target.url)).await?;

        self.settle().await;
        self.bounded(&target.url, client.execute("return document.body !== null;", vec![]))
            .await?;
        self.settle().await;

        self.bounded(&target.url, client.source()).await
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, target: &Target) -> Result<String, FetchError> {
        info!("Opening browser session for {} ({})", target.name, target.url);

        if let Some(headers) = &target.headers {
            let ignored: Vec<&String> = headers
                .keys()
                .filter(|name| !name.eq_ignore_ascii_case("user-agent"))
                .collect();
            if !ignored.is_empty() {
                debug!("Browser mode only applies User-Agent; ignoring {:?}", ignored);
            }
        }

        let caps = self.profile.capabilities(
            &self.options.user_agent_for(target),
            &self.options.accept_language,
        );
        let mut builder = ClientBuilder::rustls();
        builder.capabilities(caps);
        let client = self
            .bounded(&self.webdriver_url, builder.connect(&self.webdriver_url))
            .await?;

        let rendered = self.render(&client, target).await;
        if let Err(e) = self.bounded(&self.webdriver_url, client.close()).await {
            warn!("Failed to close browser session for {}: {}", target.name, e);
        }
        let content = rendered?;

        if let Some(dir) = &self.debug_dir {
            match write_debug_html(dir, &target.name, &content) {
                Ok(path) => info!("Saved HTML to {} for inspection", path.display()),
                Err(e) => warn!("Could not save debug HTML for {}: {}", target.name, e),
            }
        }

        Ok(content)
    }
}
