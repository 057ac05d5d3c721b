// src/services/storage.rs
//
// On-disk layout:
//   <data_dir>/YYYY-MM-DD.json  one flat {name: price} object per run date
//   <data_dir>/combined.json    {date: {name: price}} rebuilt from the above
//   <debug_dir>/<name>.html     raw pages, never read back

use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, TrackerError};
use crate::models::{CombinedHistory, DailySnapshot, Prices, DATE_FORMAT};

pub const COMBINED_FILE: &str = "combined.json";

pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    /// Open the store, creating `data_dir` if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(SnapshotStore { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn snapshot_path(&self, date: NaiveDate) -> PathBuf {
        self.data_dir.join(format!("{}.json", date.format(DATE_FORMAT)))
    }

    pub fn combined_path(&self) -> PathBuf {
        self.data_dir.join(COMBINED_FILE)
    }

    /// Write one run's prices, replacing any earlier file for the same date.
    /// An empty snapshot is refused and nothing is written.
    pub fn write_snapshot(&self, snapshot: &DailySnapshot) -> Result<PathBuf> {
        if snapshot.is_empty() {
            return Err(TrackerError::NoPrices);
        }

        let path = self.snapshot_path(snapshot.date);
        write_json(&path, &snapshot.prices)?;
        info!("Saved prices for {} to {}", snapshot.date_key(), path.display());
        Ok(path)
    }

    pub fn read_snapshot(&self, date: NaiveDate) -> Result<Option<Prices>> {
        let path = self.snapshot_path(date);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    /// Per-date snapshot files in filename order, which is date order.
    pub fn snapshot_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if path.file_name().and_then(|n| n.to_str()) == Some(COMBINED_FILE) {
                continue;
            }

            let stem = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            if NaiveDate::parse_from_str(&stem, DATE_FORMAT).is_err() {
                warn!("Skipping {}: not a dated snapshot", path.display());
                continue;
            }
            files.push((stem, path));
        }
        files.sort();
        Ok(files)
    }

    /// Rebuild `combined.json` from every snapshot currently on disk.
    pub fn rebuild_combined_history(&self) -> Result<CombinedHistory> {
        let mut history = CombinedHistory::new();
        for (date, path) in self.snapshot_files()? {
            let prices: Prices = read_json(&path)?;
            history.insert(date, prices);
        }

        write_json(&self.combined_path(), &history)?;
        info!("Updated combined data file with {} day(s).", history.len());
        Ok(history)
    }

    pub fn read_combined_history(&self) -> Result<CombinedHistory> {
        let path = self.combined_path();
        if !path.exists() {
            return Ok(CombinedHistory::new());
        }
        read_json(&path)
    }
}

/// File name for a target's debug dump: spaces become underscores, lowercased.
pub fn debug_file_name(target_name: &str) -> String {
    format!("{}.html", target_name.replace(' ', "_").to_lowercase())
}

pub fn write_debug_html(debug_dir: &Path, target_name: &str, html: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(debug_dir)?;
    let path = debug_dir.join(debug_file_name(target_name));
    fs::write(&path, html)?;
    Ok(path)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| TrackerError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-print `value` to a sibling temp file, then rename it over `path`.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value).map_err(|source| TrackerError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
