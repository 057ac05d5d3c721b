//! Shared fixtures for the integration tests: a canned-page fetcher and
//! helpers for seeding a scratch data directory.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use price_tracker::error::FetchError;
use price_tracker::models::Target;
use price_tracker::services::fetcher::PageFetcher;

/// Serves fixed HTML per target name. Targets without a page fail with a
/// 503, like an unreachable shop.
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn with_page(mut self, name: &str, html: &str) -> Self {
        self.pages.insert(name.to_string(), html.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, target: &Target) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(target.name.clone());
        self.pages.get(&target.name).cloned().ok_or_else(|| FetchError::Status {
            url: target.url.clone(),
            status: 503,
        })
    }
}

pub fn target(name: &str, selector: &str, regex: Option<&str>) -> Target {
    Target {
        name: name.to_string(),
        url: format!("https://shop.example/{}", name.to_lowercase()),
        selector: selector.to_string(),
        regex: regex.map(str::to_string),
        headers: None,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Write a raw snapshot file the way an earlier run would have.
pub fn seed_snapshot(data_dir: &Path, date: &str, body: serde_json::Value) {
    fs::write(
        data_dir.join(format!("{}.json", date)),
        serde_json::to_string_pretty(&body).unwrap(),
    )
    .unwrap();
}

/// A server that accepts connections and never answers. Returns its
/// `http://` base URL; abort the handle to drop the held sockets.
pub async fn silent_server() -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    (format!("http://{}", addr), handle)
}
