//! Certificate fingerprints via `ring::digest`.

use ring::digest::{digest, SHA1_FOR_LEGACY_USE_ONLY};

/// Compute the lowercase hex SHA-1 fingerprint of a DER encoding.
///
/// SHA-1 is the fingerprint format the surrounding tooling exchanges; it
/// is used for identity comparison and deduplication only, never as a
/// trust decision.
#[must_use]
pub fn sha1_hex(der: &[u8]) -> String {
    hex::encode(digest(&SHA1_FOR_LEGACY_USE_ONLY, der).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            sha1_hex(b"hello world"),
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(sha1_hex(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }
}
