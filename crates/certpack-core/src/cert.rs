//! Certificate parsing adapter.
//!
//! Accepts PEM, bare base64 (wrapped on the fly), or raw DER, and produces
//! [`CertificateRecord`] values. Multi-certificate bundles are split by
//! scanning for paired BEGIN/END delimiters; malformed blocks are filtered
//! out and reported, never fatal.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;
use x509_parser::prelude::*;

use crate::error::{CoreError, Result};
use crate::fingerprint::sha1_hex;
use crate::types::CertificateRecord;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

/// Authority Information Access extension.
const OID_AUTHORITY_INFO_ACCESS: &str = "1.3.6.1.5.5.7.1.1";
/// CA Issuers access method within AIA.
const OID_AD_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";

/// URL suffixes accepted as issuer-certificate downloads.
const CERT_URL_SUFFIXES: &[&str] = &[".crt", ".cer", ".der", ".pem", ".p7c"];

/// Result of tolerant bundle ingestion.
#[derive(Debug, Default)]
pub struct BundleParse {
    /// Successfully parsed certificates, in input order.
    pub records: Vec<CertificateRecord>,
    /// Diagnostics for blocks that failed to parse.
    pub failures: Vec<String>,
}

/// Parse a single certificate from PEM, bare base64, or DER bytes.
///
/// Bare base64 input is treated as a certificate body missing its PEM
/// delimiters. This is the strict entry point: the input is the sole,
/// explicit target, so failures surface to the caller.
///
/// # Errors
///
/// Returns [`CoreError::CertParse`] when the input cannot be decoded as a
/// certificate in any of the accepted encodings.
pub fn parse_certificate(input: &[u8]) -> Result<CertificateRecord> {
    if let Ok(text) = std::str::from_utf8(input) {
        if text.contains(PEM_BEGIN) {
            let block = scan_pem_blocks(text)
                .into_iter()
                .next()
                .ok_or_else(|| CoreError::CertParse("unterminated PEM block".into()))?;
            let parsed = pem::parse(&block)
                .map_err(|e| CoreError::CertParse(format!("invalid PEM: {e}")))?;
            return record_from_der(parsed.into_contents());
        }

        let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if !cleaned.is_empty() {
            if let Ok(der) = B64.decode(cleaned.as_bytes()) {
                return record_from_der(der);
            }
        }
    }

    record_from_der(input.to_vec())
}

/// Tolerantly parse a bundle of 0..N certificate blocks.
///
/// Blocks that fail to parse are dropped and reported in
/// [`BundleParse::failures`]. Input without any PEM delimiters is treated
/// as a single bare candidate.
#[must_use]
pub fn parse_bundle(text: &str) -> BundleParse {
    let mut out = BundleParse::default();
    if text.trim().is_empty() {
        return out;
    }

    let blocks = scan_pem_blocks(text);
    if blocks.is_empty() {
        match parse_certificate(text.as_bytes()) {
            Ok(record) => out.records.push(record),
            Err(e) => out.failures.push(e.to_string()),
        }
        return out;
    }

    for (index, block) in blocks.iter().enumerate() {
        match parse_certificate(block.as_bytes()) {
            Ok(record) => out.records.push(record),
            Err(e) => {
                debug!(block = index + 1, error = %e, "skipping malformed bundle block");
                out.failures.push(format!("block {}: {e}", index + 1));
            }
        }
    }
    out
}

/// Extract every delimited certificate block from free-form text.
///
/// Plain substring scanning over paired BEGIN/END markers; an unterminated
/// trailing block is dropped.
#[must_use]
pub fn scan_pem_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(PEM_BEGIN) {
        let candidate = &rest[start..];
        let Some(end_offset) = candidate.find(PEM_END) else {
            break;
        };
        let end = end_offset + PEM_END.len();
        blocks.push(candidate[..end].to_string());
        rest = &candidate[end..];
    }
    blocks
}

/// Build a [`CertificateRecord`] from a DER encoding.
///
/// # Errors
///
/// Returns [`CoreError::CertParse`] when the bytes are not a valid X.509
/// certificate.
pub fn record_from_der(der: Vec<u8>) -> Result<CertificateRecord> {
    let (_, cert) =
        X509Certificate::from_der(&der).map_err(|e| CoreError::CertParse(e.to_string()))?;

    Ok(CertificateRecord {
        common_name: first_attr_str(cert.subject().iter_common_name()),
        organization: cert
            .subject()
            .iter_organization()
            .next()
            .and_then(|a| a.as_str().ok())
            .map(ToString::to_string),
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        not_before: asn1_to_utc(cert.validity().not_before),
        not_after: asn1_to_utc(cert.validity().not_after),
        serial: cert.raw_serial_as_string(),
        pem: canonical_pem(&der),
        aia_url: aia_issuer_url(&cert),
        fingerprint: sha1_hex(&der),
        subject_normalized: sorted_dn(cert.subject()),
        issuer_normalized: sorted_dn(cert.issuer()),
        der,
    })
}

/// First value of an attribute iterator, or empty.
fn first_attr_str<'a, 'b>(
    mut iter: impl Iterator<Item = &'a AttributeTypeAndValue<'b>>,
) -> String {
    iter.next()
        .and_then(|a| a.as_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Re-encode DER as canonical PEM (LF line endings, 64-column base64).
fn canonical_pem(der: &[u8]) -> String {
    let block = pem::Pem::new("CERTIFICATE", der);
    pem::encode_config(
        &block,
        pem::EncodeConfig::default().set_line_ending(pem::LineEnding::LF),
    )
}

/// Convert an ASN.1 `GeneralizedTime` / `UTCTime` to `DateTime<Utc>`.
fn asn1_to_utc(t: ASN1Time) -> DateTime<Utc> {
    let epoch = t.timestamp();
    Utc.timestamp_opt(epoch, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Issuer-certificate URL from the AIA extension's CA-Issuers entry.
///
/// Only HTTP(S) URLs with a recognized certificate-file suffix qualify.
fn aia_issuer_url(cert: &X509Certificate<'_>) -> Option<String> {
    for ext in cert.extensions() {
        if ext.oid.to_id_string() != OID_AUTHORITY_INFO_ACCESS {
            continue;
        }
        if let ParsedExtension::AuthorityInfoAccess(aia) = ext.parsed_extension() {
            for desc in &aia.accessdescs {
                if desc.access_method.to_id_string() != OID_AD_CA_ISSUERS {
                    continue;
                }
                if let GeneralName::URI(uri) = &desc.access_location {
                    if is_certificate_url(uri) {
                        return Some((*uri).to_string());
                    }
                }
            }
        }
    }
    None
}

fn is_certificate_url(uri: &str) -> bool {
    let lower = uri.to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://"))
        && CERT_URL_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

/// Render a distinguished name as its normalized, sorted attribute list.
///
/// Attribute order in the encoded name is irrelevant to the comparison the
/// loose fallback check performs.
pub(crate) fn sorted_dn(name: &X509Name<'_>) -> String {
    let mut attrs: Vec<String> = name
        .iter_attributes()
        .map(|attr| {
            let oid = attr.attr_type().to_id_string();
            let key = dn_short_name(&oid);
            let value = attr.as_str().unwrap_or_default().trim();
            format!("{key}={value}")
        })
        .collect();
    attrs.sort_unstable();
    attrs.join(";")
}

/// Short name for a DN attribute OID, or the dotted OID itself.
fn dn_short_name(oid: &str) -> &str {
    match oid {
        "2.5.4.3" => "CN",
        "2.5.4.6" => "C",
        "2.5.4.7" => "L",
        "2.5.4.8" => "ST",
        "2.5.4.10" => "O",
        "2.5.4.11" => "OU",
        "1.2.840.113549.1.9.1" => "E",
        _ => oid,
    }
}
