//! Blocking Firecrawl client: one authenticated JSON POST per call, fixed timeout, no retries.

use super::ApiError;
use crate::model::{
    ContentFormat, Envelope, ScrapeData, ScrapeRequest, ScrapeResult, SearchHit, SearchRequest,
    SearchResult,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

pub const DEFAULT_API_URL: &str = "https://api.firecrawl.dev";
/// Wall-clock limit for a whole request (connect, send, read).
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

const DEFAULT_USER_AGENT: &str = concat!("firescrape/", env!("CARGO_PKG_VERSION"));
const SCRAPE_PATH: &str = "/v1/scrape";
const SEARCH_PATH: &str = "/v1/search";
const UNKNOWN_ERROR: &str = "Unknown error";

/// Blocking client for the scrape and search endpoints.
#[derive(Debug)]
pub struct FirecrawlClient {
    inner: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl FirecrawlClient {
    pub fn builder() -> FirecrawlClientBuilder {
        FirecrawlClientBuilder::default()
    }

    /// Scrape one URL. Missing strings in the response come back empty, missing collections empty.
    pub fn scrape(
        &self,
        url: &str,
        formats: &[ContentFormat],
        only_main_content: bool,
    ) -> Result<ScrapeResult, ApiError> {
        let body = ScrapeRequest {
            url,
            formats,
            only_main_content,
        };
        let data: ScrapeData = self.post(SCRAPE_PATH, &body)?;
        Ok(data.into())
    }

    /// Search the web. Hits are returned in the service's ranking order.
    pub fn search(&self, query: &str, limit: u32) -> Result<SearchResult, ApiError> {
        let body = SearchRequest { query, limit };
        let results: Vec<SearchHit> = self.post(SEARCH_PATH, &body)?;
        Ok(SearchResult { results })
    }

    /// POST `body` to `path` and unwrap the `{success, data, error}` envelope.
    ///
    /// Fails without touching the network when no API key is configured.
    fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        if self.api_key.is_empty() {
            return Err(ApiError::MissingApiKey);
        }
        let url = format!("{}{}", self.base_url, path);
        let transport = |source| ApiError::Transport {
            url: url.clone(),
            source,
        };

        tracing::debug!("POST {}", url);
        let started = Instant::now();
        let response = self
            .inner
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .map_err(transport)?;
        let status = response.status();
        let text = response.text().map_err(transport)?;
        tracing::debug!(
            "{} {} in {:?} ({} bytes)",
            url,
            status,
            started.elapsed(),
            text.len()
        );

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let decode = |source| ApiError::Decode {
            url: url.clone(),
            source,
        };
        let envelope: Envelope = serde_json::from_str(&text).map_err(decode)?;
        let data = envelope.into_data().map_err(|message| ApiError::Service {
            message: message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        })?;
        serde_json::from_value(data).map_err(decode)
    }
}

/// Builder for FirecrawlClient with API key, base URL, User-Agent and timeout.
#[derive(Debug)]
pub struct FirecrawlClientBuilder {
    api_key: String,
    base_url: String,
    user_agent: Option<String>,
    timeout_secs: u64,
}

impl Default for FirecrawlClientBuilder {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_API_URL.to_string(),
            user_agent: None,
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl FirecrawlClientBuilder {
    /// Bearer token. An empty key is accepted here; calls then fail with [ApiError::MissingApiKey].
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Base URL without the `/v1/...` path. Trailing slashes are ignored.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Request timeout in seconds. Default 60.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<FirecrawlClient, ApiError> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let inner = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;
        Ok(FirecrawlClient {
            inner,
            base_url: self.base_url,
            api_key: self.api_key,
        })
    }
}
