//! Parsed certificate representation.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Parsed representation of one certificate.
///
/// Immutable once parsed; owned by whichever chain slot holds it. Identity
/// is the [`fingerprint`](Self::fingerprint), a SHA-1 digest of the DER
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateRecord {
    /// Subject common name (empty if the certificate has none).
    pub common_name: String,
    /// Subject organization.
    pub organization: Option<String>,
    /// Subject distinguished name (human-readable).
    pub subject: String,
    /// Issuer distinguished name (human-readable).
    pub issuer: String,
    /// Not valid before.
    pub not_before: DateTime<Utc>,
    /// Not valid after.
    pub not_after: DateTime<Utc>,
    /// Serial number (hex).
    pub serial: String,
    /// Canonical PEM encoding (re-encoded from DER, LF line endings).
    pub pem: String,
    /// Raw DER encoding.
    #[serde(skip)]
    pub der: Vec<u8>,
    /// Issuer-certificate fetch URL from the Authority Information Access
    /// extension, when one with a certificate-file suffix is present.
    pub aia_url: Option<String>,
    /// SHA-1 of the DER encoding (lowercase hex), used for identity and
    /// deduplication.
    pub fingerprint: String,

    /// Subject DN attributes, normalized and sorted, for the loose
    /// issuer/subject fallback check.
    #[serde(skip)]
    pub(crate) subject_normalized: String,
    /// Issuer DN attributes, normalized and sorted.
    #[serde(skip)]
    pub(crate) issuer_normalized: String,
}

impl CertificateRecord {
    /// Whether the certificate's validity interval has ended.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.not_after
    }
}
