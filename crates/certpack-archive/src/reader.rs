//! Archive reader -- tolerant block-by-block decoding.

use tracing::{debug, warn};

use crate::{ArchiveEntry, BLOCK_SIZE};

/// Unpack an archive into its entries.
///
/// Scans fixed-size blocks sequentially. An all-zero block is the start of
/// the terminator only when the following block is also zero (or the buffer
/// ends); otherwise it is treated as alignment padding and skipped.
///
/// Decoding is tolerant of archives produced by other compliant writers:
/// only the block size, field widths, and NUL-termination are relied on.
/// Checksums are not re-verified. Truncated or corrupt input yields the
/// entries parsed before the corruption point rather than failing.
#[must_use]
pub fn unpack(data: &[u8]) -> Vec<ArchiveEntry> {
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset + BLOCK_SIZE <= data.len() {
        let block = &data[offset..offset + BLOCK_SIZE];

        if block.iter().all(|&b| b == 0) {
            match data.get(offset + BLOCK_SIZE..offset + 2 * BLOCK_SIZE) {
                // Confirmed second zero block, or end of buffer: terminator
                Some(next) if next.iter().all(|&b| b == 0) => break,
                None => break,
                // Lone zero block inside the stream: alignment padding
                Some(_) => {
                    debug!(offset, "skipping interior zero block");
                    offset += BLOCK_SIZE;
                    continue;
                }
            }
        }

        let Some(name) = decode_name(&block[..100]) else {
            warn!(offset, "unreadable entry name, stopping decode");
            break;
        };
        let Some(size) = parse_octal(&block[124..136]) else {
            warn!(offset, name, "unreadable size field, stopping decode");
            break;
        };

        let content_start = offset + BLOCK_SIZE;
        let Some(content) = data.get(content_start..content_start + size) else {
            warn!(offset, name, size, "truncated entry content, stopping decode");
            break;
        };

        // Regular files only; legacy writers mark them with NUL or space
        let type_flag = block[156];
        if matches!(type_flag, b'0' | 0 | b' ') {
            entries.push(ArchiveEntry::new(name, content.to_vec()));
        } else {
            debug!(name, type_flag, "skipping non-file entry");
        }

        offset = content_start + size.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
    }

    entries
}

/// Decode the NUL-terminated entry name from the header name field.
///
/// Returns `None` for an empty or non-UTF-8 name.
fn decode_name(field: &[u8]) -> Option<String> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    if end == 0 {
        return None;
    }
    std::str::from_utf8(&field[..end]).ok().map(str::to_owned)
}

/// Parse a NUL/space-terminated octal field.
fn parse_octal(field: &[u8]) -> Option<usize> {
    let text = std::str::from_utf8(field).ok()?;
    let trimmed = text.trim_matches(|c| c == '\0' || c == ' ');
    if trimmed.is_empty() {
        return Some(0);
    }
    usize::from_str_radix(trimmed, 8).ok()
}
