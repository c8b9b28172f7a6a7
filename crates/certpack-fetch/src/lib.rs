//! # certpack-fetch
//!
//! HTTP collaborator for automatic chain resolution: fetches DER or PEM
//! issuer certificates pointed to by AIA URLs.
//!
//! Issuer endpoints frequently sit behind servers that refuse cross-origin
//! or otherwise awkward clients, so the fetcher tries the URL directly and,
//! on any failure, retries exactly once through a fixed CORS-proxy URL
//! template before reporting failure. Each attempt's connection is released
//! on success and failure alike (the response is either consumed or
//! dropped).

mod client;
mod error;

pub use client::{HttpFetcher, HttpFetcherBuilder, DEFAULT_PROXY_TEMPLATE};
pub use error::{FetchError, Result};
