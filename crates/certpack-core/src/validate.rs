//! Validation of unpacked certificate bundles.
//!
//! Applies resolver-style pairwise link checks to the blobs of an unpacked
//! archive and folds everything into a [`ValidationReport`]. Nothing here
//! fails: missing or unusable material becomes findings and tri-state
//! `None` values.

use certpack_archive::{classify, ArchiveEntry, EntryRole};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::cert::{parse_bundle, parse_certificate};
use crate::keymatch::key_matches_certificate;
use crate::types::{CertificateRecord, ValidationReport, ValidityStatus};
use crate::verify::{is_self_signed, verify_link, VerifyPolicy};

/// Days before expiry at which a certificate is classified as expiring
/// soon.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// Validate the entries of an unpacked archive.
///
/// Scans for certificate / private key / CA bundle roles by entry suffix,
/// classifies the certificate's expiry, checks the key pair, and walks the
/// CA bundle pairwise from the certificate to (ideally) a self-signed
/// root. The report is created fresh per run and never mutated afterward.
#[must_use]
pub fn validate_entries(entries: &[ArchiveEntry], policy: &VerifyPolicy) -> ValidationReport {
    let cert_entry = find_role(entries, EntryRole::Certificate);
    let key_entry = find_role(entries, EntryRole::PrivateKey);
    let ca_entry = find_role(entries, EntryRole::CaBundle);

    let mut findings = Vec::new();
    push_presence(&mut findings, "certificate", cert_entry);
    push_presence(&mut findings, "private key", key_entry);
    push_presence(&mut findings, "CA bundle", ca_entry);

    let record = cert_entry.and_then(|entry| match parse_certificate(&entry.content) {
        Ok(record) => Some(record),
        Err(e) => {
            findings.push(format!("certificate could not be parsed: {e}"));
            None
        }
    });

    let validity = record
        .as_ref()
        .map(|r| classify_validity(r, Utc::now(), &mut findings));

    let key_match = match (key_entry, record.as_ref()) {
        (Some(entry), Some(record)) => check_key(entry, record, &mut findings),
        _ => None,
    };

    let chain_complete = match (ca_entry, record.as_ref()) {
        (Some(entry), Some(record)) => Some(check_chain(entry, record, policy, &mut findings)),
        (Some(_), None) => {
            findings.push("CA bundle present but there is no certificate to chain from".into());
            None
        }
        (None, _) => None,
    };

    ValidationReport {
        has_certificate: cert_entry.is_some(),
        has_private_key: key_entry.is_some(),
        has_ca_bundle: ca_entry.is_some(),
        key_match,
        chain_complete,
        validity,
        findings,
    }
}

fn find_role(entries: &[ArchiveEntry], role: EntryRole) -> Option<&ArchiveEntry> {
    entries.iter().find(|e| classify(&e.name) == Some(role))
}

fn push_presence(findings: &mut Vec<String>, what: &str, entry: Option<&ArchiveEntry>) {
    match entry {
        Some(e) => findings.push(format!("{what} entry found: {}", e.name)),
        None => findings.push(format!("no {what} entry found")),
    }
}

fn classify_validity(
    record: &CertificateRecord,
    now: DateTime<Utc>,
    findings: &mut Vec<String>,
) -> ValidityStatus {
    let expiry = record.not_after.format("%Y-%m-%d");
    if record.is_expired_at(now) {
        findings.push(format!("certificate expired on {expiry}"));
        ValidityStatus::Expired
    } else if now + Duration::days(EXPIRY_WARNING_DAYS) > record.not_after {
        findings.push(format!("certificate expires soon, on {expiry}"));
        ValidityStatus::ExpiringSoon
    } else {
        findings.push(format!("certificate is valid until {expiry}"));
        ValidityStatus::Valid
    }
}

fn check_key(
    entry: &ArchiveEntry,
    record: &CertificateRecord,
    findings: &mut Vec<String>,
) -> Option<bool> {
    let Ok(text) = std::str::from_utf8(&entry.content) else {
        findings.push("private key entry is not PEM text".into());
        return None;
    };
    match key_matches_certificate(text, record) {
        Ok(Some(true)) => {
            findings.push("private key matches the certificate".into());
            Some(true)
        }
        Ok(Some(false)) => {
            findings.push("private key does not match the certificate".into());
            Some(false)
        }
        Ok(None) => {
            findings.push("private key type cannot be compared to the certificate".into());
            None
        }
        Err(e) => {
            findings.push(format!("private key could not be parsed: {e}"));
            None
        }
    }
}

fn check_chain(
    entry: &ArchiveEntry,
    leaf: &CertificateRecord,
    policy: &VerifyPolicy,
    findings: &mut Vec<String>,
) -> bool {
    let text = String::from_utf8_lossy(&entry.content);
    let parsed = parse_bundle(&text);
    for failure in &parsed.failures {
        debug!(failure, "unusable block in CA bundle");
        findings.push(format!("CA bundle: {failure}"));
    }

    let Some(last) = parsed.records.last() else {
        findings.push("CA bundle contains no certificates".into());
        return false;
    };

    let mut links_ok = true;
    let mut tail = leaf;
    for (index, record) in parsed.records.iter().enumerate() {
        if !verify_link(tail, record, policy) {
            findings.push(format!(
                "chain link {} ({}) does not sign its predecessor",
                index + 1,
                display_name(record)
            ));
            links_ok = false;
        }
        tail = record;
    }

    let anchored = is_self_signed(last, policy);
    if !anchored {
        findings.push(format!(
            "chain does not terminate at a self-signed root (last: {})",
            display_name(last)
        ));
    }

    let complete = links_ok && anchored;
    if complete {
        findings.push(format!(
            "CA chain of {} certificate(s) is complete",
            parsed.records.len()
        ));
    }
    complete
}

fn display_name(record: &CertificateRecord) -> &str {
    if record.common_name.is_empty() {
        &record.subject
    } else {
        &record.common_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use certpack_archive::{bundle_names, pack_with_mtime, unpack};

    /// Root -> issuing -> leaf, with the leaf's key.
    struct Fixture {
        leaf_pem: String,
        key_pem: String,
        ca_pem: String,
    }

    fn fixture() -> Fixture {
        let (root, root_key) = testutil::root_ca("Validate Root");
        let (issuing, issuing_key) = testutil::child_ca("Validate Issuing CA", &root, &root_key);
        let (leaf, leaf_key) = testutil::end_entity("validate.example.com", &issuing, &issuing_key);

        Fixture {
            leaf_pem: leaf.pem(),
            key_pem: leaf_key.serialize_pem(),
            ca_pem: format!("{}\n{}", issuing.pem(), root.pem()),
        }
    }

    fn entries(fixture: &Fixture) -> Vec<ArchiveEntry> {
        let names = bundle_names("validate.example.com");
        vec![
            ArchiveEntry::new(names.certificate, fixture.leaf_pem.clone().into_bytes()),
            ArchiveEntry::new(names.private_key, fixture.key_pem.clone().into_bytes()),
            ArchiveEntry::new(names.ca_bundle, fixture.ca_pem.clone().into_bytes()),
        ]
    }

    #[test]
    fn complete_bundle_validates_cleanly() {
        let fixture = fixture();
        let report = validate_entries(&entries(&fixture), &VerifyPolicy::default());

        assert!(report.has_certificate);
        assert!(report.has_private_key);
        assert!(report.has_ca_bundle);
        assert_eq!(report.key_match, Some(true));
        assert_eq!(report.chain_complete, Some(true));
        assert_eq!(report.validity, Some(ValidityStatus::Valid));
    }

    #[test]
    fn report_survives_a_pack_unpack_round_trip() {
        let fixture = fixture();
        let packed = pack_with_mtime(&entries(&fixture), 1_700_000_000).unwrap();
        let report = validate_entries(&unpack(&packed), &VerifyPolicy::default());

        assert_eq!(report.key_match, Some(true));
        assert_eq!(report.chain_complete, Some(true));
    }

    #[test]
    fn expired_certificate_without_bundle() {
        let (root, root_key) = testutil::root_ca("Expired Root");
        let (leaf, _) = testutil::expired_end_entity("old.example.com", &root, &root_key);

        let entries = vec![ArchiveEntry::new("old.crt", leaf.pem().into_bytes())];
        let report = validate_entries(&entries, &VerifyPolicy::default());

        assert_eq!(report.validity, Some(ValidityStatus::Expired));
        assert_eq!(report.chain_complete, None);
        assert_eq!(report.key_match, None);
        assert!(report.findings.iter().any(|f| f.contains("expired")));
    }

    #[test]
    fn soon_expiring_certificate_is_flagged() {
        let (root, root_key) = testutil::root_ca("Soon Root");
        let (leaf, _) = testutil::soon_expiring_end_entity("soon.example.com", &root, &root_key);

        let entries = vec![ArchiveEntry::new("soon.crt", leaf.pem().into_bytes())];
        let report = validate_entries(&entries, &VerifyPolicy::default());
        assert_eq!(report.validity, Some(ValidityStatus::ExpiringSoon));
    }

    #[test]
    fn mismatched_key_is_reported() {
        let mut fixture = fixture();
        fixture.key_pem = rcgen::KeyPair::generate().unwrap().serialize_pem();

        let report = validate_entries(&entries(&fixture), &VerifyPolicy::default());
        assert_eq!(report.key_match, Some(false));
        assert!(report
            .findings
            .iter()
            .any(|f| f.contains("does not match")));
    }

    #[test]
    fn missing_key_leaves_the_tristate_unset() {
        let fixture = fixture();
        let entries: Vec<_> = entries(&fixture)
            .into_iter()
            .filter(|e| !e.name.ends_with(".prv"))
            .collect();

        let report = validate_entries(&entries, &VerifyPolicy::default());
        assert!(!report.has_private_key);
        assert_eq!(report.key_match, None);
    }

    #[test]
    fn truncated_bundle_is_incomplete() {
        let (root, root_key) = testutil::root_ca("Truncated Root");
        let (issuing, issuing_key) = testutil::child_ca("Truncated Issuing", &root, &root_key);
        let (leaf, _) = testutil::end_entity("short.example.com", &issuing, &issuing_key);

        // Bundle holds only the intermediate; no root
        let entries = vec![
            ArchiveEntry::new("short.crt", leaf.pem().into_bytes()),
            ArchiveEntry::new("short.ca", issuing.pem().into_bytes()),
        ];
        let report = validate_entries(&entries, &VerifyPolicy::default());

        assert_eq!(report.chain_complete, Some(false));
        assert!(report
            .findings
            .iter()
            .any(|f| f.contains("self-signed root")));
    }

    #[test]
    fn wrong_order_bundle_reports_broken_links() {
        let fixture = fixture();
        let mut items = entries(&fixture);
        // Reverse the bundle: root first, issuing last
        let reversed: String = {
            let blocks = crate::cert::scan_pem_blocks(&fixture.ca_pem);
            blocks.into_iter().rev().collect::<Vec<_>>().join("\n")
        };
        items[2] = ArchiveEntry::new("validate.example.com.ca", reversed.into_bytes());

        let report = validate_entries(&items, &VerifyPolicy::default());
        assert_eq!(report.chain_complete, Some(false));
    }

    #[test]
    fn empty_archive_reports_absence() {
        let report = validate_entries(&[], &VerifyPolicy::default());
        assert!(!report.has_certificate);
        assert_eq!(report.validity, None);
        assert_eq!(report.chain_complete, None);
        assert_eq!(report.key_match, None);
        assert_eq!(report.findings.len(), 3);
    }

    #[test]
    fn report_serializes_with_lowercase_validity() {
        let (root, root_key) = testutil::root_ca("Serde Root");
        let (leaf, _) = testutil::expired_end_entity("serde.example.com", &root, &root_key);
        let entries = vec![ArchiveEntry::new("serde.crt", leaf.pem().into_bytes())];

        let report = validate_entries(&entries, &VerifyPolicy::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["validity"], "expired");
        assert_eq!(json["chain_complete"], serde_json::Value::Null);
    }
}
