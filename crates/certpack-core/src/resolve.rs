//! Chain assembly: manual bundle ingestion and automatic AIA resolution.
//!
//! Both paths grow a [`Chain`] from the leaf's closest issuer toward a
//! self-signed root and degrade gracefully: malformed bundle blocks are
//! filtered, unlinkable certificates are kept as visible broken links, and
//! a failed fetch leaves the partial chain intact for manual completion.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::cert::{parse_bundle, parse_certificate};
use crate::error::Result;
use crate::types::{CertificateRecord, Chain, ChainLink};
use crate::verify::{is_self_signed, verify_link, VerifyPolicy};

/// Maximum number of links automatic resolution will fetch.
pub const MAX_AUTO_DEPTH: usize = 5;

/// Fetches the raw bytes of an issuer certificate (DER or PEM).
///
/// Fetches during resolution are strictly sequential -- the next URL is
/// only known after parsing the previous response -- so implementations
/// need no internal ordering. Each fetch must release its connection on
/// both success and failure.
#[async_trait]
pub trait IssuerFetcher {
    /// Fetch one certificate by URL.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Why automatic resolution stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A self-signed certificate was fetched; the chain is complete.
    RootReached,
    /// The configured depth limit was reached.
    DepthExhausted,
    /// The fetched certificate was byte-identical to the current tail.
    Cycle,
    /// The current tail carries no usable AIA URL.
    NoIssuerUrl,
    /// A fetch failed (both routes, for HTTP fetchers).
    Fetch(String),
    /// A fetched payload was not a certificate.
    Parse(String),
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RootReached => write!(f, "root reached"),
            Self::DepthExhausted => write!(f, "depth exhausted"),
            Self::Cycle => write!(f, "issuer cycle detected"),
            Self::NoIssuerUrl => write!(f, "no issuer URL"),
            Self::Fetch(e) => write!(f, "fetch failed: {e}"),
            Self::Parse(e) => write!(f, "fetched data unusable: {e}"),
        }
    }
}

/// Result of one automatic resolution attempt.
///
/// The chain holds whatever resolved before the stopping condition;
/// callers fall back to manual mode from there.
#[derive(Debug)]
pub struct AutoResolution {
    /// Links resolved so far, closest issuer first.
    pub chain: Chain,
    /// Why resolution stopped.
    pub stop: StopReason,
}

impl AutoResolution {
    /// Whether resolution ended at a self-signed root.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stop == StopReason::RootReached
    }
}

/// Resolve the leaf's issuer chain by following AIA URLs.
///
/// Starting from the leaf, iteratively fetches the next issuer, appends a
/// link with `signs_child` reflecting the actual signing relationship, and
/// stops on a self-signed fetch, the depth limit, a byte-identical fetch
/// (cycle), or a fetch/parse error. Partial results are kept, never
/// discarded. No end-to-end re-verification pass runs after a root is
/// reached.
pub async fn resolve_automatic<F>(
    leaf: &CertificateRecord,
    fetcher: &F,
    policy: &VerifyPolicy,
    max_depth: usize,
) -> AutoResolution
where
    F: IssuerFetcher + ?Sized,
{
    let mut chain = Chain::new();
    let mut tail = leaf.clone();

    let stop = loop {
        let Some(url) = tail.aia_url.clone() else {
            break StopReason::NoIssuerUrl;
        };

        debug!(url, depth = chain.len(), "fetching issuer certificate");
        let bytes = match fetcher.fetch(&url).await {
            Ok(bytes) => bytes,
            Err(e) => break StopReason::Fetch(e.to_string()),
        };
        let record = match parse_certificate(&bytes) {
            Ok(record) => record,
            Err(e) => break StopReason::Parse(e.to_string()),
        };

        if record.der == tail.der {
            break StopReason::Cycle;
        }

        let signs_child = verify_link(&tail, &record, policy);
        let is_root = is_self_signed(&record, policy);
        chain.push(ChainLink::fetched(record.clone(), signs_child, is_root));

        if is_root {
            break StopReason::RootReached;
        }
        if chain.len() >= max_depth {
            break StopReason::DepthExhausted;
        }
        tail = record;
    };

    debug!(links = chain.len(), stop = %stop, "automatic resolution finished");
    AutoResolution { chain, stop }
}

/// Result of one manual extension batch.
#[derive(Debug)]
pub struct ExtendOutcome {
    /// Links to append, in chain order.
    pub links: Vec<ChainLink>,
    /// Diagnostics for bundle blocks that failed to parse.
    pub parse_failures: Vec<String>,
    /// Candidates dropped because their fingerprint was already present
    /// (leaf, existing chain, or earlier in the same batch).
    pub duplicates: usize,
}

impl ExtendOutcome {
    /// The batch produced no usable candidates because every block failed
    /// to parse.
    #[must_use]
    pub fn only_malformed(&self) -> bool {
        self.links.is_empty() && self.duplicates == 0 && !self.parse_failures.is_empty()
    }

    /// The batch produced no usable candidates because every parsed
    /// certificate was already present.
    #[must_use]
    pub fn only_duplicates(&self) -> bool {
        self.links.is_empty() && self.duplicates > 0
    }
}

/// Extend a chain with a pasted or uploaded bundle of candidate blocks.
///
/// Malformed blocks are filtered (reported in the outcome), candidates
/// already present by fingerprint are dropped, and the chain is grown
/// greedily: while some candidate signs the current tail it is appended
/// with `signs_child = true` and becomes the new tail. Leftover candidates
/// are appended afterwards in their original order, each with
/// `signs_child` computed against the then-current tail -- out-of-order
/// uploads surface as visible broken links instead of being rejected.
#[must_use]
pub fn extend_manual(
    chain: &Chain,
    bundle: &str,
    leaf: &CertificateRecord,
    policy: &VerifyPolicy,
) -> ExtendOutcome {
    let parsed = parse_bundle(bundle);

    let mut seen: HashSet<String> = chain
        .links()
        .iter()
        .map(|l| l.record.fingerprint.clone())
        .collect();
    seen.insert(leaf.fingerprint.clone());

    let mut pool = Vec::new();
    let mut duplicates = 0;
    for record in parsed.records {
        if seen.insert(record.fingerprint.clone()) {
            pool.push(record);
        } else {
            debug!(fingerprint = %record.fingerprint, "dropping duplicate candidate");
            duplicates += 1;
        }
    }

    let mut tail = chain
        .links()
        .last()
        .map_or_else(|| leaf.clone(), |l| l.record.clone());
    let mut links = Vec::new();

    // Greedy growth: keep consuming whichever candidate signs the tail
    while let Some(pos) = pool.iter().position(|c| verify_link(&tail, c, policy)) {
        let record = pool.remove(pos);
        let is_root = is_self_signed(&record, policy);
        tail = record.clone();
        links.push(ChainLink::uploaded(record, true, is_root));
    }

    // Leftovers stay, in original order, as visible broken links
    for record in pool {
        let signs_child = verify_link(&tail, &record, policy);
        let is_root = is_self_signed(&record, policy);
        tail = record.clone();
        links.push(ChainLink::uploaded(record, signs_child, is_root));
    }

    ExtendOutcome {
        links,
        parse_failures: parsed.failures,
        duplicates,
    }
}

/// Remove one link from a chain.
///
/// Neighboring `signs_child` flags are not re-validated or repaired; the
/// caller re-adds correct links instead. An out-of-range index is a no-op.
#[must_use]
pub fn remove_link(chain: &Chain, index: usize) -> Chain {
    let mut links = chain.links().to_vec();
    if index < links.len() {
        links.remove(index);
    }
    Chain::from_links(links)
}
