//! Ordered certificate chain.

use serde::Serialize;

use super::link::ChainLink;

/// An ordered sequence of chain links, leaf-exclusive.
///
/// Insertion order is trust order: the leaf's closest issuer first, the
/// root last. Manual extension maintains the invariants that no two links
/// share a fingerprint and that the leaf's fingerprint never appears in
/// the chain.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Chain {
    links: Vec<ChainLink>,
}

impl Chain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain from pre-built links.
    #[must_use]
    pub fn from_links(links: Vec<ChainLink>) -> Self {
        Self { links }
    }

    /// The links, closest issuer first.
    #[must_use]
    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    /// Number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the chain has no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Append a link at the root end.
    pub fn push(&mut self, link: ChainLink) {
        self.links.push(link);
    }

    /// Append links at the root end, preserving their order.
    pub fn extend(&mut self, links: impl IntoIterator<Item = ChainLink>) {
        self.links.extend(links);
    }

    /// Whether any link holds a certificate with the given fingerprint.
    #[must_use]
    pub fn contains_fingerprint(&self, fingerprint: &str) -> bool {
        self.links.iter().any(|l| l.record.fingerprint == fingerprint)
    }

    /// A chain is complete iff its last link is a self-signed root.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.links.last().is_some_and(|l| l.is_root)
    }

    /// Newline-joined concatenation of every link's PEM, root last --
    /// the conventional `.ca` bundle content.
    #[must_use]
    pub fn ca_bundle_pem(&self) -> String {
        let mut bundle = self
            .links
            .iter()
            .map(|l| l.record.pem.trim_end())
            .collect::<Vec<_>>()
            .join("\n");
        if !bundle.is_empty() {
            bundle.push('\n');
        }
        bundle
    }
}
