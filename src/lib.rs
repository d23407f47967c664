//! firescrape: CLI client for the Firecrawl scrape and search API.

pub mod api;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod model;
pub mod render;

// Re-exports for CLI and consumers.
pub use api::{ApiError, FirecrawlClient, FirecrawlClientBuilder};
pub use credentials::resolve_api_key;
pub use model::{ContentFormat, ScrapeResult, SearchHit, SearchResult};
