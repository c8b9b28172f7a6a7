//! Bundle validation report.

use serde::Serialize;

/// Expiry classification of the bundle's certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityStatus {
    /// Within its validity interval, not close to expiry.
    Valid,
    /// Expires within the warning window.
    ExpiringSoon,
    /// Validity interval has ended.
    Expired,
}

impl std::fmt::Display for ValidityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::ExpiringSoon => write!(f, "expiring soon"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// Read-only summary of an unpacked archive's certificate material.
///
/// Created fresh per validation run; never mutated afterward. Tri-state
/// fields are `None` when the material needed for the check is absent.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// A certificate entry was present.
    pub has_certificate: bool,
    /// A private key entry was present.
    pub has_private_key: bool,
    /// A CA bundle entry was present.
    pub has_ca_bundle: bool,
    /// Whether the private key matches the certificate's public key
    /// (`None` when either is absent or the key type is not comparable).
    pub key_match: Option<bool>,
    /// Whether the CA bundle forms a complete chain from the certificate
    /// to a self-signed root (`None` when no bundle entry is present).
    pub chain_complete: Option<bool>,
    /// Expiry classification of the certificate (`None` when no
    /// certificate could be parsed).
    pub validity: Option<ValidityStatus>,
    /// Ordered human-readable findings.
    pub findings: Vec<String>,
}
