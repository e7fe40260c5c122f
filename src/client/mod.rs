//! HTTP client adapter
//!
//! Issues single GET requests with a per-request timeout and classifies the
//! outcome into a small closed set. No retries happen at this layer.

mod fetcher;

pub use fetcher::{
    build_http_client, build_probe_client, BodyMode, FetchOutcome, Fetcher, ReqwestFetcher,
};
