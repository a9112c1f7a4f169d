//! HTTP resource fetching
//!
//! One [`Fetcher`] is built per [`Mirror`](crate::Mirror) and shared by all
//! three stage drivers; `reqwest::Client` is internally pooled so sharing one
//! instance across the fan-out workers is the cheap and correct thing to do.

use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Fetches remote resources (JSON documents or raw bytes) over HTTP
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Create a fetcher with an optional per-request timeout
    ///
    /// `None` disables the timeout; a fetch against an unresponsive remote
    /// can then block its stage indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client })
    }

    /// GET `url` and parse the body as a JSON document
    pub async fn fetch_json(&self, url: &str) -> Result<Value> {
        let body = self.get_text(url).await?;
        let value: Value = serde_json::from_str(&body)?;
        Ok(value)
    }

    /// GET `url`, parse the body as JSON, and persist the parsed document to
    /// `path`; returns the document for further in-memory use
    pub async fn fetch_json_to(&self, url: &str, path: &Path) -> Result<Value> {
        let value = self.fetch_json(url).await?;
        let serialized = serde_json::to_string(&value)?;
        tokio::fs::write(path, serialized).await?;
        debug!(url, path = %path.display(), "persisted JSON resource");
        Ok(value)
    }

    /// GET `url` and write the raw body bytes to `path` unmodified
    ///
    /// Used for resources that must not be reshaped in transit: the snapshot
    /// creation log and the gzip archive. Returns the number of bytes written.
    pub async fn fetch_bytes_to(&self, url: &str, path: &Path) -> Result<u64> {
        let response = self.get_checked(url).await?;
        let bytes = response.bytes().await?;
        tokio::fs::write(path, &bytes).await?;
        debug!(url, path = %path.display(), bytes = bytes.len(), "persisted raw resource");
        Ok(bytes.len() as u64)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get_checked(url).await?;
        let text = response.text().await?;
        Ok(text)
    }

    async fn get_checked(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status,
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}
