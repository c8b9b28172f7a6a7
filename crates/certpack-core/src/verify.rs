//! Link verification between a certificate and its candidate issuer.
//!
//! The primary check is cryptographic: does the parent's public key
//! validate the child's signature? A clean mismatch is an ordinary `false`.
//! When the primitive itself cannot evaluate the pair -- a legacy signature
//! scheme, a structure it will not re-parse -- the policy may fall back to
//! comparing normalized issuer/subject names. DN equality is still strong
//! evidence of intended chain membership for a packaging tool, but it is a
//! materially weaker guarantee than a signature check, so the fallback is a
//! named policy switch and every acceptance through it is logged.

use tracing::{debug, warn};
use x509_parser::error::X509Error;
use x509_parser::prelude::*;

use crate::types::CertificateRecord;

/// Policy switches for link verification.
#[derive(Debug, Clone, Copy)]
pub struct VerifyPolicy {
    /// Accept a link on normalized issuer/subject DN equality when the
    /// signature primitive cannot evaluate it. Enabled by default.
    pub dn_fallback: bool,
}

impl Default for VerifyPolicy {
    fn default() -> Self {
        Self { dn_fallback: true }
    }
}

impl VerifyPolicy {
    /// Policy with the DN fallback disabled: a link only verifies when the
    /// signature check passes.
    #[must_use]
    pub const fn strict() -> Self {
        Self { dn_fallback: false }
    }
}

/// Outcome of the signature primitive for one child/parent pair.
enum SignatureCheck {
    Valid,
    Invalid,
    Unavailable(String),
}

/// Does `parent` sign `child`?
///
/// Returns `false` both for a clean cryptographic mismatch and for a
/// primitive failure under [`VerifyPolicy::strict`]. With the DN fallback
/// enabled, a primitive failure resolves to normalized issuer/subject
/// equality instead; the result is indistinguishable downstream, which is
/// why acceptance through the fallback is logged at `warn`.
#[must_use]
pub fn verify_link(
    child: &CertificateRecord,
    parent: &CertificateRecord,
    policy: &VerifyPolicy,
) -> bool {
    match signature_check(child, parent) {
        SignatureCheck::Valid => true,
        SignatureCheck::Invalid => false,
        SignatureCheck::Unavailable(reason) => {
            if !policy.dn_fallback {
                debug!(
                    child = %child.common_name,
                    parent = %parent.common_name,
                    reason,
                    "signature primitive unavailable and DN fallback disabled"
                );
                return false;
            }
            let matched = child.issuer_normalized == parent.subject_normalized;
            if matched {
                warn!(
                    child = %child.common_name,
                    parent = %parent.common_name,
                    reason,
                    "signature primitive unavailable; accepting link on issuer/subject equality"
                );
            }
            matched
        }
    }
}

/// A certificate is self-signed iff it verifies as its own issuer.
#[must_use]
pub fn is_self_signed(cert: &CertificateRecord, policy: &VerifyPolicy) -> bool {
    verify_link(cert, cert, policy)
}

fn signature_check(child: &CertificateRecord, parent: &CertificateRecord) -> SignatureCheck {
    let Ok((_, child_cert)) = X509Certificate::from_der(&child.der) else {
        return SignatureCheck::Unavailable("child certificate did not re-parse".into());
    };
    let Ok((_, parent_cert)) = X509Certificate::from_der(&parent.der) else {
        return SignatureCheck::Unavailable("parent certificate did not re-parse".into());
    };

    match child_cert.verify_signature(Some(parent_cert.public_key())) {
        Ok(()) => SignatureCheck::Valid,
        Err(X509Error::SignatureVerificationError) => SignatureCheck::Invalid,
        Err(e) => SignatureCheck::Unavailable(e.to_string()),
    }
}
