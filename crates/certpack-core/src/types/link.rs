//! Chain link types.

use serde::Serialize;
use uuid::Uuid;

use super::record::CertificateRecord;

/// Delivery status of a chain link.
///
/// Fetched links move `Pending -> Downloading -> {Success | Failed}`;
/// manually supplied links are `Uploaded` from the start. No state moves
/// back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    /// Queued for automatic resolution.
    Pending,
    /// Fetch in flight.
    Downloading,
    /// Fetched and parsed.
    Success,
    /// Fetch or parse failed.
    Failed,
    /// Supplied by the user (terminal).
    Uploaded,
}

/// Where a chain link came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSource {
    /// Uploaded or pasted by the user.
    Uploaded,
    /// Fetched via the issuer's AIA URL.
    Fetched,
    /// The terminal self-signed root.
    Root,
}

/// One entry in an assembled chain.
///
/// `signs_child = false` models a broken link that is kept visible rather
/// than discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainLink {
    /// Stable identifier for UI bookkeeping.
    pub id: Uuid,
    /// The certificate occupying this slot.
    pub record: CertificateRecord,
    /// Delivery status.
    pub status: LinkStatus,
    /// Provenance.
    pub source: LinkSource,
    /// Whether the certificate is self-signed.
    pub is_root: bool,
    /// Whether this certificate's signature validates the certificate
    /// immediately before it in the chain (or the leaf, for the first
    /// link).
    pub signs_child: bool,
}

impl ChainLink {
    /// Build a link for a manually supplied certificate.
    #[must_use]
    pub fn uploaded(record: CertificateRecord, signs_child: bool, is_root: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
            status: LinkStatus::Uploaded,
            source: if is_root {
                LinkSource::Root
            } else {
                LinkSource::Uploaded
            },
            is_root,
            signs_child,
        }
    }

    /// Build a link for a certificate fetched via AIA.
    #[must_use]
    pub fn fetched(record: CertificateRecord, signs_child: bool, is_root: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
            status: LinkStatus::Success,
            source: if is_root {
                LinkSource::Root
            } else {
                LinkSource::Fetched
            },
            is_root,
            signs_child,
        }
    }
}
