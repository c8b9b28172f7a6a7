//! Error types for the archive codec.

use thiserror::Error;

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while writing an archive.
///
/// Reading never fails -- corrupt input degrades to a partial entry list.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Entry name does not fit the fixed header field.
    #[error("entry name exceeds {limit} bytes: {name}")]
    NameTooLong {
        /// The offending name.
        name: String,
        /// Maximum name length in bytes.
        limit: usize,
    },

    /// Entry content is too large for the octal size field.
    #[error("entry {name} is too large for the archive format ({size} bytes)")]
    EntryTooLarge {
        /// The offending entry name.
        name: String,
        /// Content size in bytes.
        size: usize,
    },
}
