//! Optional config file loading. Search order: ./firescrape.toml, then
//! $XDG_CONFIG_HOME/firescrape/config.toml (or ~/.config/firescrape/config.toml).
//!
//! Only non-secret settings live here; the API key comes from [crate::credentials].

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Base URL of the Firecrawl API (e.g. a self-hosted instance). Default https://api.firecrawl.dev.
    pub api_url: Option<String>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
}

/// Candidate config paths in search order.
pub fn config_paths() -> Result<Vec<PathBuf>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    let mut paths = vec![cwd.join("firescrape.toml")];
    if let Some(d) = dirs::config_dir() {
        paths.push(d.join("firescrape").join("config.toml"));
    }
    Ok(paths)
}

/// Load the first config file found. Missing file returns Ok(None).
/// Invalid TOML or I/O error reading a present file returns Err.
pub fn load_config() -> Result<Option<Config>, String> {
    load_config_from(&config_paths()?)
}

/// Same as [load_config] over an explicit list of candidate paths.
pub fn load_config_from(paths: &[PathBuf]) -> Result<Option<Config>, String> {
    for path in paths {
        if path.exists() {
            let config = read_config(path)?;
            tracing::debug!("Loaded config from {}", path.display());
            return Ok(Some(config));
        }
    }
    Ok(None)
}

fn read_config(path: &Path) -> Result<Config, String> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    toml::from_str(&s).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}
