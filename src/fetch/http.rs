//! HTTP content fetcher built on `reqwest`.
//!
//! One shared client for the whole app. No retries and, unless configured,
//! no timeout: a slow server simply keeps the loading spinner up until the
//! user presses Back.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value;

use super::{ContentFetcher, FetchError};

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = match builder.build() {
            Ok(client) => client,
            Err(e) => {
                warn!("Failed to build configured HTTP client ({}), using defaults", e);
                reqwest::Client::new()
            }
        };
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

fn map_request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e.to_string())
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        info!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        debug!("Response status for {}: {}", url, status);

        if !status.is_success() {
            warn!("Content fetch failed: {} - HTTP {}", url, status.as_u16());
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                warn!("Malformed JSON from {}: {}", url, e);
                FetchError::Decode(e.to_string())
            } else {
                map_request_error(e)
            }
        })
    }
}
