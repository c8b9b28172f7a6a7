//! Entry-name conventions for certificate bundles.
//!
//! A packed bundle uses `{basename}.crt` / `{basename}.prv` /
//! `{basename}.ca` for the certificate, private key, and CA chain. When
//! scanning an unpacked archive the recognized suffixes are wider, to
//! accept bundles produced by other tooling.

/// Role of an archive entry within a certificate bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRole {
    /// End-entity certificate (`.crt`, `.cer`, `.pem`).
    Certificate,
    /// Private key (`.key`, `.prv`).
    PrivateKey,
    /// CA chain bundle (`.ca`, `.bundle`).
    CaBundle,
}

/// Classify an entry name by its extension.
///
/// Returns `None` for names without a recognized certificate-bundle
/// suffix.
#[must_use]
pub fn classify(name: &str) -> Option<EntryRole> {
    let ext = name.rsplit_once('.').map(|(_, e)| e)?;
    match ext.to_ascii_lowercase().as_str() {
        "crt" | "cer" | "pem" => Some(EntryRole::Certificate),
        "key" | "prv" => Some(EntryRole::PrivateKey),
        "ca" | "bundle" => Some(EntryRole::CaBundle),
        _ => None,
    }
}

/// Writer-side entry names for a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleNames {
    /// Certificate entry name (`{basename}.crt`).
    pub certificate: String,
    /// Private key entry name (`{basename}.prv`).
    pub private_key: String,
    /// CA chain entry name (`{basename}.ca`).
    pub ca_bundle: String,
}

/// Build the conventional entry names for a bundle basename.
#[must_use]
pub fn bundle_names(basename: &str) -> BundleNames {
    BundleNames {
        certificate: format!("{basename}.crt"),
        private_key: format!("{basename}.prv"),
        ca_bundle: format!("{basename}.ca"),
    }
}
