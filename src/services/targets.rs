// src/services/targets.rs
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::DEFAULT_USER_AGENT;
use crate::error::ConfigError;
use crate::models::Target;

/// Example entries written when no config exists yet. One shows the
/// optional `regex`, the other the optional `headers`.
pub fn default_targets() -> Vec<Target> {
    vec![
        Target {
            name: "Amazon Example".to_string(),
            url: "https://www.amazon.com/example-product".to_string(),
            selector: "span.a-offscreen".to_string(),
            regex: Some(r"\$([0-9]+\.[0-9]{2})".to_string()),
            headers: None,
        },
        Target {
            name: "Walmart Example".to_string(),
            url: "https://www.walmart.com/example-product".to_string(),
            selector: "span.price-characteristic".to_string(),
            regex: None,
            headers: Some(BTreeMap::from([(
                "User-Agent".to_string(),
                DEFAULT_USER_AGENT.to_string(),
            )])),
        },
    ]
}

/// Load the target list, creating the default file first if it is missing.
pub fn load_targets(path: &Path) -> Result<Vec<Target>, ConfigError> {
    if !path.exists() {
        write_default_config(path)?;
        info!("Created default config file at {}", path.display());
    }

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let targets: Vec<Target> = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loaded {} target(s) from {}", targets.len(), path.display());
    Ok(targets)
}

fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let create_err = |source| ConfigError::Create {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(create_err)?;
    }

    let body = serde_json::to_string_pretty(&default_targets())
        .map_err(|e| create_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    fs::write(path, body).map_err(create_err)
}
