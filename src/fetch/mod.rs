pub mod fetcher;
pub mod http;

pub use fetcher::{ContentFetcher, FetchError, absolute_url};
pub use http::HttpFetcher;
