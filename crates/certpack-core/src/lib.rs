//! # certpack-core
//!
//! Builds and verifies X.509 certificate chains from an arbitrary leaf up
//! to a self-signed root, and validates unpacked certificate bundles.
//!
//! Chains are explicit values threaded through pure functions; nothing in
//! this crate holds shared mutable state. Broken links are kept visible
//! (`signs_child = false`) instead of discarded, so callers can show the
//! user exactly where trust breaks.
//!
//! ## Data Flow
//!
//! ```text
//! Forward (packaging):
//!   raw PEM/base64 text -> cert::parse_certificate / parse_bundle
//!   -> resolve::extend_manual or resolve::resolve_automatic
//!   -> Chain (ordered links, leaf-exclusive, root last)
//!   -> Chain::ca_bundle_pem() + certpack-archive::pack
//!
//! Reverse (validation):
//!   certpack-archive::unpack -> validate::validate_entries
//!   -> ValidationReport (presence, key match, chain completeness, expiry)
//! ```
//!
//! ## Trust model
//!
//! This is a packaging tool, not a relying party. When the signature
//! primitive itself cannot evaluate a link (legacy algorithm, malformed
//! structure), [`verify::verify_link`] can fall back to comparing
//! normalized issuer/subject distinguished names. The fallback is a
//! materially weaker guarantee; it sits behind
//! [`VerifyPolicy::dn_fallback`] and logs a warning every time it decides
//! a link.

pub mod cert;
pub mod error;
pub mod fingerprint;
pub mod keymatch;
pub mod resolve;
pub mod types;
pub mod validate;
pub mod verify;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{CoreError, Result};
pub use types::*;
pub use verify::{is_self_signed, verify_link, VerifyPolicy};

pub use cert::{parse_bundle, parse_certificate, BundleParse};
pub use keymatch::key_matches_certificate;
pub use resolve::{
    extend_manual, remove_link, resolve_automatic, AutoResolution, ExtendOutcome, IssuerFetcher,
    StopReason, MAX_AUTO_DEPTH,
};
pub use validate::{validate_entries, EXPIRY_WARNING_DAYS};
