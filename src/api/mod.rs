//! Firecrawl API access: blocking client and its error type.

mod client;
mod error;

pub use client::{FirecrawlClient, FirecrawlClientBuilder, DEFAULT_API_URL, REQUEST_TIMEOUT_SECS};
pub use error::ApiError;
