//! Key-pair match between a PEM private key and a certificate.
//!
//! A key matches when its public half equals the certificate's
//! SubjectPublicKeyInfo bit string byte-for-byte. For RSA keys that is the
//! PKCS#1 `RSAPublicKey` encoding, i.e. modulus + exponent equality; for
//! ECDSA P-256/P-384 keys it is the uncompressed point. Key types outside
//! those yield the tri-state "unknown" (`None`) rather than an error, so
//! validation reports stay total.

use ring::rand::SystemRandom;
use ring::signature::{
    EcdsaKeyPair, KeyPair as _, RsaKeyPair, ECDSA_P256_ASN1_SIGNING, ECDSA_P384_ASN1_SIGNING,
};
use tracing::debug;
use x509_parser::prelude::*;

use crate::error::{CoreError, Result};
use crate::types::CertificateRecord;

/// rsaEncryption
const OID_RSA: &str = "1.2.840.113549.1.1.1";
/// id-ecPublicKey
const OID_EC: &str = "1.2.840.10045.2.1";

/// Does the PEM private key belong to the certificate?
///
/// Returns `Ok(Some(bool))` when the comparison could run, `Ok(None)` when
/// the key type is not comparable (unsupported algorithm or key size).
///
/// # Errors
///
/// Returns [`CoreError::KeyParse`] when the input is not a PEM private-key
/// block at all, and [`CoreError::CertParse`] when the certificate's DER
/// does not re-parse.
pub fn key_matches_certificate(
    key_pem: &str,
    cert: &CertificateRecord,
) -> Result<Option<bool>> {
    let block = pem::parse(key_pem).map_err(|e| CoreError::KeyParse(e.to_string()))?;
    let key_der = block.contents();

    let (_, x509) =
        X509Certificate::from_der(&cert.der).map_err(|e| CoreError::CertParse(e.to_string()))?;
    let spki = x509.public_key();
    let spki_alg = spki.algorithm.algorithm.to_id_string();
    let spki_bytes: &[u8] = &spki.subject_public_key.data;

    match block.tag() {
        // PKCS#1: RSA by definition
        "RSA PRIVATE KEY" => {
            let key = RsaKeyPair::from_der(key_der)
                .map_err(|e| CoreError::KeyParse(e.to_string()))?;
            Ok(Some(spki_alg == OID_RSA && key.public_key().as_ref() == spki_bytes))
        }
        // PKCS#8: try RSA first, then the ECDSA curves ring supports
        "PRIVATE KEY" => {
            if let Ok(key) = RsaKeyPair::from_pkcs8(key_der) {
                return Ok(Some(spki_alg == OID_RSA && key.public_key().as_ref() == spki_bytes));
            }
            let rng = SystemRandom::new();
            for alg in [&ECDSA_P256_ASN1_SIGNING, &ECDSA_P384_ASN1_SIGNING] {
                if let Ok(key) = EcdsaKeyPair::from_pkcs8(alg, key_der, &rng) {
                    return Ok(Some(
                        spki_alg == OID_EC && key.public_key().as_ref() == spki_bytes,
                    ));
                }
            }
            debug!("private key algorithm not comparable");
            Ok(None)
        }
        other => {
            debug!(tag = other, "unrecognized private key block tag");
            Ok(None)
        }
    }
}
