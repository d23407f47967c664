//! API key lookup: `FIRECRAWL_API_KEY` from the environment, then `~/.claude/.env`.

use std::path::{Path, PathBuf};

/// Environment variable (and `.env` key) holding the Firecrawl API key.
pub const API_KEY_VAR: &str = "FIRECRAWL_API_KEY";

/// Fallback dotenv file: `~/.claude/.env`.
pub fn env_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".claude").join(".env"))
}

/// Resolve the API key from the environment, falling back to `~/.claude/.env`.
///
/// Returns an empty string when neither source has a key. The caller decides
/// how to report that.
pub fn resolve_api_key() -> String {
    let from_env = std::env::var(API_KEY_VAR).ok();
    resolve_api_key_from(from_env.as_deref(), env_file_path().as_deref())
}

/// Same lookup as [resolve_api_key] against explicit inputs.
pub fn resolve_api_key_from(env_value: Option<&str>, env_file: Option<&Path>) -> String {
    if let Some(key) = env_value.filter(|k| !k.is_empty()) {
        tracing::debug!("API key found in {}", API_KEY_VAR);
        return key.to_string();
    }
    let Some(path) = env_file else {
        return String::new();
    };
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("No readable env file at {}: {}", path.display(), e);
            return String::new();
        }
    };
    match find_key_in_dotenv(&contents) {
        Some(key) => {
            tracing::debug!("API key found in {}", path.display());
            key
        }
        None => String::new(),
    }
}

/// First `FIRECRAWL_API_KEY=value` line wins. Quotes and whitespace around the value are stripped.
fn find_key_in_dotenv(contents: &str) -> Option<String> {
    let prefix = format!("{}=", API_KEY_VAR);
    contents
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .map(|value| {
            value
                .trim()
                .trim_matches('"')
                .trim_matches('\'')
                .to_string()
        })
}
