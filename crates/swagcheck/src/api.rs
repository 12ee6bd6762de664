//! HTTP API client and response expectations.
//!
//! ```ignore
//! ApiClient::request(AIRPORT_GAP_URL)?
//!     .get("/airports/KIX")
//!     .await?
//!     .expect_status(200)?
//!     .expect_header("content-type", "json")?
//!     .expect_json("/data/id", &json!("KIX"))?;
//! ```

use crate::result::{PageError, PageResult};
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Public Airport Gap API
pub const AIRPORT_GAP_URL: &str = "https://airportgap.dev-tester.com/api";

/// HTTP client bound to a base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Client for requests under `base_url`
    ///
    /// # Errors
    ///
    /// `Http` if the underlying client cannot be built (TLS backend setup).
    pub fn request(base_url: impl Into<String>) -> PageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Client with a custom reqwest client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` relative to the base URL
    ///
    /// Non-2xx statuses are returned as responses, not errors; check them
    /// with [`ApiResponse::expect_status`].
    pub async fn get(&self, path: &str) -> PageResult<ApiResponse> {
        let url = format!("{}{path}", self.base_url);
        let start = Instant::now();
        let resp = self.client.get(&url).send().await?;

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let text = resp.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        tracing::info!(%url, status, elapsed_ms = start.elapsed().as_millis() as u64, "GET");

        Ok(ApiResponse {
            url,
            status,
            headers,
            text,
            body,
        })
    }
}

/// A received response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Requested URL
    pub url: String,
    /// Status code
    pub status: u16,
    /// Headers, names lowercased
    pub headers: HashMap<String, String>,
    /// Raw body
    pub text: String,
    /// Body parsed as JSON, `Null` when it is not JSON
    pub body: Value,
}

impl ApiResponse {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// JSON value at `pointer` (RFC 6901, e.g. `/data/id`)
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.body.pointer(pointer)
    }

    /// Assert the status code
    pub fn expect_status(&self, expected: u16) -> PageResult<&Self> {
        if self.status != expected {
            return Err(PageError::mismatch(
                format!("status of {}", self.url),
                expected.to_string(),
                self.status.to_string(),
            ));
        }
        Ok(self)
    }

    /// Assert that header `name` matches the regex `pattern`
    pub fn expect_header(&self, name: &str, pattern: &str) -> PageResult<&Self> {
        let re = regex::Regex::new(pattern).map_err(|e| PageError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        let actual = self.header(name).unwrap_or_default();
        if !re.is_match(actual) {
            return Err(PageError::mismatch(
                format!("header {name}"),
                format!("/{pattern}/"),
                actual,
            ));
        }
        Ok(self)
    }

    /// Assert the JSON value at `pointer`
    pub fn expect_json(&self, pointer: &str, expected: &Value) -> PageResult<&Self> {
        let actual = self.pointer(pointer).unwrap_or(&Value::Null);
        if actual != expected {
            return Err(PageError::mismatch(
                format!("body {pointer}"),
                expected.to_string(),
                actual.to_string(),
            ));
        }
        Ok(self)
    }

    /// Assert the length of the JSON array at `pointer`
    pub fn expect_len(&self, pointer: &str, expected: usize) -> PageResult<&Self> {
        let actual = self.pointer(pointer).and_then(Value::as_array).map(Vec::len);
        if actual != Some(expected) {
            return Err(PageError::mismatch(
                format!("length of {pointer}"),
                expected.to_string(),
                actual.map_or_else(|| "no array".to_string(), |n| n.to_string()),
            ));
        }
        Ok(self)
    }
}
