//! Error type for the Firecrawl client.

use thiserror::Error;

/// Failure of a single scrape or search call.
#[derive(Debug, Error)]
pub enum ApiError {
    // Credentials
    #[error("FIRECRAWL_API_KEY not found in environment or ~/.claude/.env")]
    MissingApiKey,

    #[error("Failed to create HTTP client: {source}")]
    ClientBuild { source: reqwest::Error },

    // Network (connect, TLS, timeout)
    #[error("Network error: could not reach {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    // Service responses
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response without a truthy `success` or without `data`.
    #[error("{message}")]
    Service { message: String },

    #[error("Invalid response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}
