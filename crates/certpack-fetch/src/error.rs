//! Error types for issuer fetching.

use thiserror::Error;

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors that can occur while fetching an issuer certificate.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP request itself failed (connect, TLS, timeout).
    #[error("http request failed: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("unexpected status {code} from {url}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Requested URL.
        url: String,
    },

    /// Both the direct route and the proxy route failed.
    #[error("direct fetch failed ({direct}); proxy fetch failed ({proxied})")]
    BothRoutesFailed {
        /// Failure of the direct attempt.
        direct: String,
        /// Failure of the proxied attempt.
        proxied: String,
    },
}
