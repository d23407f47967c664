//! Request and response shapes for the Firecrawl scrape and search endpoints.
//!
//! Request types serialize to the JSON bodies the service expects. Response
//! envelopes are deserialized leniently and normalized into [ScrapeResult] and
//! [SearchResult].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Content format requested from the scrape endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    #[default]
    Markdown,
    Html,
    Text,
}

/// Body of `POST /v1/scrape`.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRequest<'a> {
    pub url: &'a str,
    pub formats: &'a [ContentFormat],
    #[serde(rename = "onlyMainContent")]
    pub only_main_content: bool,
}

/// Body of `POST /v1/search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub limit: u32,
}

/// Top-level response envelope shared by both endpoints.
///
/// Untyped: `success` is tested for truthiness, and `data` is converted to its
/// endpoint shape only after that check passes.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub success: Value,
    pub data: Option<Value>,
    pub error: Option<Value>,
}

impl Envelope {
    /// `data` when `success` is truthy and `data` is present and not null.
    pub fn into_data(self) -> Result<Value, Option<String>> {
        let message = self.error_message();
        match self.data {
            Some(data) if is_truthy(&self.success) && !data.is_null() => Ok(data),
            _ => Err(message),
        }
    }

    /// Service-reported error text. Non-string errors are rendered as JSON.
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// JSON truthiness: false, null, 0, "", [] and {} are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// `data` object of a scrape response. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScrapeData {
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default)]
    pub links: Option<Vec<String>>,
}

/// Normalized scrape output. Missing strings are empty; missing collections are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeResult {
    pub markdown: String,
    pub html: String,
    pub metadata: Map<String, Value>,
    pub links: Vec<String>,
}

impl From<ScrapeData> for ScrapeResult {
    fn from(data: ScrapeData) -> Self {
        ScrapeResult {
            markdown: data.markdown.unwrap_or_default(),
            html: data.html.unwrap_or_default(),
            metadata: data.metadata.unwrap_or_default(),
            links: data.links.unwrap_or_default(),
        }
    }
}

impl ScrapeResult {
    /// String-valued metadata entry, if present and non-empty.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// One search hit. Known fields are typed; anything else the service sends is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchHit {
    /// Description if present, otherwise the snippet, otherwise empty.
    pub fn summary(&self) -> &str {
        self.description
            .as_deref()
            .or(self.snippet.as_deref())
            .unwrap_or("")
    }
}

/// Search results in the order the service ranked them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub results: Vec<SearchHit>,
}
