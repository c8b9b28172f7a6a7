//! # certpack-archive
//!
//! Deterministic, dependency-free packing of named byte blobs into a single
//! linear archive, and the tolerant inverse.
//!
//! The format is the classic USTAR block layout: a 512-byte header per
//! entry (numeric fields as zero-padded octal text, NUL-terminated), the
//! raw content zero-padded to a block multiple, and two zero-filled blocks
//! as the terminator. Output is bit-exact so standard unarchiving tools can
//! read it.
//!
//! Writing verifies nothing beyond field widths; reading is deliberately
//! forgiving -- a truncated or corrupt archive yields every well-formed
//! entry found before the corruption point.
//!
//! ```rust
//! use certpack_archive::{pack, unpack, ArchiveEntry};
//!
//! let entries = vec![
//!     ArchiveEntry::new("server.crt", b"AAA".to_vec()),
//!     ArchiveEntry::new("server.prv", b"BBB".to_vec()),
//! ];
//! let bytes = pack(&entries).unwrap();
//! assert_eq!(unpack(&bytes), entries);
//! ```

mod error;
mod reader;
mod roles;
mod writer;

pub use error::{ArchiveError, Result};
pub use reader::unpack;
pub use roles::{bundle_names, classify, BundleNames, EntryRole};
pub use writer::{pack, pack_with_mtime};

/// Size of one archive block in bytes.
pub const BLOCK_SIZE: usize = 512;

/// One named blob inside an archive.
///
/// Lives only for the duration of a pack or unpack call; the surrounding
/// tooling owns the names and contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry file name (at most 100 bytes).
    pub name: String,
    /// Raw content bytes.
    pub content: Vec<u8>,
}

impl ArchiveEntry {
    /// Create an entry from a name and content bytes.
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }
}
