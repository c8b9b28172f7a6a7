//! Core types for chain building and bundle validation.

pub mod chain;
pub mod link;
pub mod record;
pub mod report;

pub use chain::Chain;
pub use link::{ChainLink, LinkSource, LinkStatus};
pub use record::CertificateRecord;
pub use report::{ValidationReport, ValidityStatus};
