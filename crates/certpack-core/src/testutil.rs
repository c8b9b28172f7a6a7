//! Shared test helpers: rcgen-generated certificate hierarchies.

use rcgen::{
    BasicConstraints, Certificate, CertificateParams, CustomExtension, DistinguishedName, DnType,
    IsCa, KeyPair,
};

use crate::cert::parse_certificate;
use crate::types::CertificateRecord;

fn base_params(common_name: &str) -> CertificateParams {
    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name);
    dn.push(DnType::OrganizationName, "Certpack Test");
    params.distinguished_name = dn;
    params
}

/// Self-signed root CA.
pub(crate) fn root_ca(common_name: &str) -> (Certificate, KeyPair) {
    let key = KeyPair::generate().unwrap();
    let mut params = base_params(common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let cert = params.self_signed(&key).unwrap();
    (cert, key)
}

/// Self-signed root with a chosen DN attribute order.
pub(crate) fn root_ca_with_dn_order(common_name: &str, org_first: bool) -> (Certificate, KeyPair) {
    let key = KeyPair::generate().unwrap();
    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    if org_first {
        dn.push(DnType::OrganizationName, "Certpack Test");
        dn.push(DnType::CommonName, common_name);
    } else {
        dn.push(DnType::CommonName, common_name);
        dn.push(DnType::OrganizationName, "Certpack Test");
    }
    params.distinguished_name = dn;
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let cert = params.self_signed(&key).unwrap();
    (cert, key)
}

/// Intermediate CA signed by `issuer`.
pub(crate) fn child_ca(
    common_name: &str,
    issuer: &Certificate,
    issuer_key: &KeyPair,
) -> (Certificate, KeyPair) {
    let key = KeyPair::generate().unwrap();
    let mut params = base_params(common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let cert = params.signed_by(&key, issuer, issuer_key).unwrap();
    (cert, key)
}

/// Intermediate CA carrying an AIA CA-Issuers URL.
pub(crate) fn child_ca_with_aia(
    common_name: &str,
    aia_url: &str,
    issuer: &Certificate,
    issuer_key: &KeyPair,
) -> (Certificate, KeyPair) {
    let key = KeyPair::generate().unwrap();
    let mut params = base_params(common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.custom_extensions.push(aia_extension(aia_url));
    let cert = params.signed_by(&key, issuer, issuer_key).unwrap();
    (cert, key)
}

/// End-entity certificate signed by `issuer`.
pub(crate) fn end_entity(
    common_name: &str,
    issuer: &Certificate,
    issuer_key: &KeyPair,
) -> (Certificate, KeyPair) {
    let key = KeyPair::generate().unwrap();
    let mut params = base_params(common_name);
    params.is_ca = IsCa::NoCa;
    let cert = params.signed_by(&key, issuer, issuer_key).unwrap();
    (cert, key)
}

/// End-entity certificate carrying an AIA CA-Issuers URL.
pub(crate) fn end_entity_with_aia(
    common_name: &str,
    aia_url: &str,
    issuer: &Certificate,
    issuer_key: &KeyPair,
) -> (Certificate, KeyPair) {
    let key = KeyPair::generate().unwrap();
    let mut params = base_params(common_name);
    params.is_ca = IsCa::NoCa;
    params.custom_extensions.push(aia_extension(aia_url));
    let cert = params.signed_by(&key, issuer, issuer_key).unwrap();
    (cert, key)
}

/// End-entity certificate whose validity interval already ended.
pub(crate) fn expired_end_entity(
    common_name: &str,
    issuer: &Certificate,
    issuer_key: &KeyPair,
) -> (Certificate, KeyPair) {
    let key = KeyPair::generate().unwrap();
    let mut params = base_params(common_name);
    params.is_ca = IsCa::NoCa;
    params.not_before = time::OffsetDateTime::now_utc() - time::Duration::days(730);
    params.not_after = time::OffsetDateTime::now_utc() - time::Duration::days(365);
    let cert = params.signed_by(&key, issuer, issuer_key).unwrap();
    (cert, key)
}

/// End-entity certificate expiring within the warning window.
pub(crate) fn soon_expiring_end_entity(
    common_name: &str,
    issuer: &Certificate,
    issuer_key: &KeyPair,
) -> (Certificate, KeyPair) {
    let key = KeyPair::generate().unwrap();
    let mut params = base_params(common_name);
    params.is_ca = IsCa::NoCa;
    params.not_before = time::OffsetDateTime::now_utc() - time::Duration::days(30);
    params.not_after = time::OffsetDateTime::now_utc() + time::Duration::days(10);
    let cert = params.signed_by(&key, issuer, issuer_key).unwrap();
    (cert, key)
}

/// Parse an rcgen certificate into a [`CertificateRecord`].
pub(crate) fn record(cert: &Certificate) -> CertificateRecord {
    parse_certificate(cert.pem().as_bytes()).unwrap()
}

/// Minimal DER for an Authority Information Access extension holding a
/// single CA-Issuers URI.
fn aia_extension(url: &str) -> CustomExtension {
    // 1.3.6.1.5.5.7.48.2 (id-ad-caIssuers)
    const OID_CA_ISSUERS: &[u8] = &[0x2B, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x02];
    assert!(url.len() < 100, "test URL too long for single-byte DER lengths");

    let mut access = Vec::new();
    access.push(0x06);
    access.push(OID_CA_ISSUERS.len() as u8);
    access.extend_from_slice(OID_CA_ISSUERS);
    // [6] uniformResourceIdentifier, context-specific primitive
    access.push(0x86);
    access.push(url.len() as u8);
    access.extend_from_slice(url.as_bytes());

    let mut desc = vec![0x30, access.len() as u8];
    desc.extend_from_slice(&access);

    let mut aia = vec![0x30, desc.len() as u8];
    aia.extend_from_slice(&desc);

    CustomExtension::from_oid_content(&[1, 3, 6, 1, 5, 5, 7, 1, 1], aia)
}
