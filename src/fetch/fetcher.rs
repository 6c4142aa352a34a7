use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// Errors that can occur while fetching a content document.
/// Every variant is recoverable from the user's point of view (Retry/Cancel).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The URL could not be parsed or joined onto the root URL.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// Network-level failure (DNS, connection refused, reset).
    #[error("network error: {0}")]
    Network(String),
    /// Server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    /// Body was not valid JSON.
    #[error("malformed JSON: {0}")]
    Decode(String),
    /// The configured fetch timeout elapsed.
    #[error("request timed out")]
    Timeout,
}

/// Loads JSON documents for the navigation engine.
///
/// Implementations do not retry; the retry policy belongs to the engine.
/// Cancellation is handled by the caller dropping the returned future.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Returns the name of the fetcher, used in logs.
    fn name(&self) -> &str;

    /// Performs a GET on an absolute URL and decodes the body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// Makes `raw` absolute. Absolute URLs pass through untouched, relative ones
/// are joined onto `base` (normally the application root URL).
pub fn absolute_url(base: Option<&Url>, raw: &str) -> Result<Url, FetchError> {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => base.join(raw).map_err(|e| FetchError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            }),
            None => Err(FetchError::InvalidUrl {
                url: raw.to_string(),
                reason: "relative URL with no root URL configured".to_string(),
            }),
        },
        Err(e) => Err(FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}
