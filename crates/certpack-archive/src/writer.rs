//! Archive writer -- serializes entries into USTAR blocks.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ArchiveError, Result};
use crate::{ArchiveEntry, BLOCK_SIZE};

/// Maximum entry name length (header name field width).
const NAME_LEN: usize = 100;

/// Largest content size the 11-digit octal size field can express.
const MAX_ENTRY_SIZE: usize = 0o777_7777_7777;

/// Fixed file mode for every entry (rw-r--r--).
const MODE: &[u8; 8] = b"0000644\0";

/// Fixed owner/group id fields (root).
const OWNER: &[u8; 8] = b"0000000\0";

/// Pack entries into a single contiguous archive buffer.
///
/// Entry order is preserved. The current wall-clock time is stamped as
/// every entry's modification time; use [`pack_with_mtime`] when byte-exact
/// reproducibility matters.
///
/// # Errors
///
/// Returns [`ArchiveError::NameTooLong`] or [`ArchiveError::EntryTooLarge`]
/// when an entry does not fit the fixed header fields.
pub fn pack(entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
    let mtime = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    pack_with_mtime(entries, mtime)
}

/// Pack entries with an explicit modification timestamp (epoch seconds).
///
/// Output is a deterministic function of the entries and the timestamp.
///
/// # Errors
///
/// Returns [`ArchiveError::NameTooLong`] or [`ArchiveError::EntryTooLarge`]
/// when an entry does not fit the fixed header fields.
pub fn pack_with_mtime(entries: &[ArchiveEntry], mtime: u64) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(estimate_size(entries));

    for entry in entries {
        out.extend_from_slice(&header_block(entry, mtime)?);
        out.extend_from_slice(&entry.content);

        // Zero-pad content up to the next block boundary
        let remainder = entry.content.len() % BLOCK_SIZE;
        if remainder != 0 {
            out.resize(out.len() + BLOCK_SIZE - remainder, 0);
        }
    }

    // Terminator: two full zero blocks
    out.resize(out.len() + 2 * BLOCK_SIZE, 0);
    Ok(out)
}

/// Build the 512-byte header block for one entry.
fn header_block(entry: &ArchiveEntry, mtime: u64) -> Result<[u8; BLOCK_SIZE]> {
    let name = entry.name.as_bytes();
    if name.len() > NAME_LEN {
        return Err(ArchiveError::NameTooLong {
            name: entry.name.clone(),
            limit: NAME_LEN,
        });
    }
    if entry.content.len() > MAX_ENTRY_SIZE {
        return Err(ArchiveError::EntryTooLarge {
            name: entry.name.clone(),
            size: entry.content.len(),
        });
    }

    let mut header = [0u8; BLOCK_SIZE];

    header[..name.len()].copy_from_slice(name);
    header[100..108].copy_from_slice(MODE);
    header[108..116].copy_from_slice(OWNER);
    header[116..124].copy_from_slice(OWNER);
    write_octal(&mut header[124..136], entry.content.len() as u64);
    write_octal(&mut header[136..148], mtime);
    // Checksum field holds spaces while the sum is computed
    header[148..156].fill(b' ');
    header[156] = b'0'; // regular file
    header[257..263].copy_from_slice(b"ustar\0");
    header[263..265].copy_from_slice(b"00");

    let checksum: u32 = header.iter().map(|&b| u32::from(b)).sum();
    let chk = format!("{checksum:06o}\0 ");
    header[148..156].copy_from_slice(chk.as_bytes());

    Ok(header)
}

/// Write a zero-padded octal number, NUL-terminated and right-justified
/// within the field.
fn write_octal(field: &mut [u8], value: u64) {
    let digits = field.len() - 1;
    let text = format!("{value:0digits$o}\0");
    field.copy_from_slice(text.as_bytes());
}

/// Upper bound on the packed size, for buffer pre-allocation.
fn estimate_size(entries: &[ArchiveEntry]) -> usize {
    entries
        .iter()
        .map(|e| BLOCK_SIZE + e.content.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE)
        .sum::<usize>()
        + 2 * BLOCK_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fields_are_bit_exact() {
        let entry = ArchiveEntry::new("a.crt", b"AAA".to_vec());
        let bytes = pack_with_mtime(&[entry], 0).unwrap();

        assert_eq!(&bytes[..5], b"a.crt");
        assert_eq!(bytes[5], 0); // name is NUL-terminated within its field
        assert_eq!(&bytes[100..108], b"0000644\0");
        assert_eq!(&bytes[108..116], b"0000000\0");
        assert_eq!(&bytes[116..124], b"0000000\0");
        assert_eq!(&bytes[124..136], b"00000000003\0");
        assert_eq!(&bytes[136..148], b"00000000000\0");
        assert_eq!(bytes[156], b'0');
        assert_eq!(&bytes[257..263], b"ustar\0");
        assert_eq!(&bytes[263..265], b"00");
    }

    #[test]
    fn checksum_is_sum_with_spaces() {
        let entry = ArchiveEntry::new("a.crt", b"AAA".to_vec());
        let bytes = pack_with_mtime(&[entry], 0).unwrap();

        let mut header = [0u8; BLOCK_SIZE];
        header.copy_from_slice(&bytes[..BLOCK_SIZE]);
        header[148..156].fill(b' ');
        let expected: u32 = header.iter().map(|&b| u32::from(b)).sum();

        let field = std::str::from_utf8(&bytes[148..154]).unwrap();
        let stored = u32::from_str_radix(field, 8).unwrap();
        assert_eq!(stored, expected);
        assert_eq!(bytes[154], 0);
        assert_eq!(bytes[155], b' ');
    }

    #[test]
    fn archive_ends_with_two_zero_blocks() {
        let entry = ArchiveEntry::new("a.crt", b"AAA".to_vec());
        let bytes = pack_with_mtime(&[entry], 0).unwrap();

        // header + padded content + terminator
        assert_eq!(bytes.len(), BLOCK_SIZE * 4);
        assert!(bytes[BLOCK_SIZE * 2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn content_is_padded_to_block_boundary() {
        let entry = ArchiveEntry::new("big.ca", vec![0xAB; BLOCK_SIZE + 1]);
        let bytes = pack_with_mtime(&[entry], 0).unwrap();

        // header + two content blocks + terminator
        assert_eq!(bytes.len(), BLOCK_SIZE * 5);
        assert_eq!(bytes[BLOCK_SIZE + BLOCK_SIZE], 0xAB);
        assert!(bytes[BLOCK_SIZE * 2 + 1..BLOCK_SIZE * 3].iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_entry_list_is_just_the_terminator() {
        let bytes = pack_with_mtime(&[], 0).unwrap();
        assert_eq!(bytes, vec![0u8; 2 * BLOCK_SIZE]);
    }

    #[test]
    fn overlong_name_is_rejected() {
        let entry = ArchiveEntry::new("x".repeat(101), Vec::new());
        let err = pack_with_mtime(&[entry], 0).unwrap_err();
        assert!(matches!(err, ArchiveError::NameTooLong { .. }));
    }
}
