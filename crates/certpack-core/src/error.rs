//! Error types for chain resolution and bundle validation.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in core operations.
///
/// None of these are fatal to a surrounding workflow: bundle ingestion
/// filters malformed blocks instead of failing, automatic resolution keeps
/// its partial chain, and validation folds problems into report findings.
/// An error here means a single, explicitly targeted input was unusable.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input is not a parseable certificate.
    #[error("certificate parse error: {0}")]
    CertParse(String),

    /// Input is not a parseable private key.
    #[error("private key parse error: {0}")]
    KeyParse(String),

    /// An issuer certificate could not be fetched.
    #[error("issuer fetch failed: {0}")]
    Fetch(String),
}
