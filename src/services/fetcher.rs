// src/services/fetcher.rs
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Settings, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT, HTTP_TIMEOUT_SECS};
use crate::error::FetchError;
use crate::models::Target;
use crate::services::storage::write_debug_html;

/// Source of raw HTML for a target.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, target: &Target) -> Result<String, FetchError>;
}

/// Request defaults shared by both fetch strategies.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub accept_language: String,
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
        }
    }
}

impl FetchOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        FetchOptions {
            user_agent: settings.user_agent.clone(),
            timeout: settings.timeout,
            ..FetchOptions::default()
        }
    }

    /// Headers to send for `target`: its own when configured, otherwise the
    /// default User-Agent.
    pub fn headers_for(&self, target: &Target) -> BTreeMap<String, String> {
        match &target.headers {
            Some(headers) => headers.clone(),
            None => BTreeMap::from([("User-Agent".to_string(), self.user_agent.clone())]),
        }
    }

    /// User-Agent for `target`, looked up case-insensitively in its headers.
    pub fn user_agent_for(&self, target: &Target) -> String {
        target
            .headers
            .as_ref()
            .and_then(|headers| {
                headers
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(USER_AGENT.as_str()))
                    .map(|(_, value)| value.clone())
            })
            .unwrap_or_else(|| self.user_agent.clone())
    }
}

/// Plain GET with a fixed timeout.
pub struct HttpFetcher {
    client: Client,
    options: FetchOptions,
    debug_dir: Option<PathBuf>,
}

impl HttpFetcher {
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(HttpFetcher {
            client,
            options,
            debug_dir: None,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(FetchOptions::from_settings(settings))?;
        if settings.debug_html {
            Ok(fetcher.with_debug_dir(settings.debug_dir.clone()))
        } else {
            Ok(fetcher)
        }
    }

    /// Dump every fetched body under `dir`.
    pub fn with_debug_dir(mut self, dir: PathBuf) -> Self {
        self.debug_dir = Some(dir);
        self
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, target: &Target) -> Result<String, FetchError> {
        info!("Fetching {} from URL: {}", target.name, target.url);

        let mut request = self.client.get(&target.url);
        for (name, value) in self.options.headers_for(target) {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: target.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes for {}", body.len(), target.name);

        if let Some(dir) = &self.debug_dir {
            match write_debug_html(dir, &target.name, &body) {
                Ok(path) => info!("Saved HTML to {} for inspection", path.display()),
                Err(e) => warn!("Could not save debug HTML for {}: {}", target.name, e),
            }
        }

        Ok(body)
    }
}
