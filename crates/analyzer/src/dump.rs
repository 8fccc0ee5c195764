//! Text renderings of raw bytes.
//!
//! Hex dump lines look like `xxd` output without the grouping:
//!
//! ```text
//! 00000000  48 65 6c 6c 6f 00 ff 10 ...                        Hello...
//! ```

use config::AnalyzeConfig;
use std::fmt::Write;

/// Renders `bytes` as hex, `bytes_per_line` per line, each line followed by
/// its ASCII rendering. With `show_offsets` every line starts with the
/// 8-digit hex offset of its first byte.
///
/// A `bytes_per_line` of 0 is treated as 1.
#[must_use]
pub fn hex_dump(bytes: &[u8], bytes_per_line: usize, show_offsets: bool, placeholder: char) -> String {
    let per_line = bytes_per_line.max(1);
    let width = per_line * 3;
    let mut out = String::with_capacity(bytes.len() / per_line * (width + per_line + 12));

    for (line_no, chunk) in bytes.chunks(per_line).enumerate() {
        if line_no > 0 {
            out.push('\n');
        }
        if show_offsets {
            let _ = write!(out, "{:08x}  ", line_no * per_line);
        }
        let hex = chunk
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(out, "{:<width$} {}", hex, ascii_preview(chunk, chunk.len(), placeholder));
    }
    out
}

/// [`hex_dump`] with the layout from `cfg`, rendering at most
/// `cfg.dump_limit` bytes (`0` = all). A cut-short dump ends with a
/// `... (N more bytes)` line.
#[must_use]
pub fn hex_dump_limited(bytes: &[u8], cfg: &AnalyzeConfig) -> String {
    let shown = if cfg.dump_limit == 0 {
        bytes
    } else {
        &bytes[..bytes.len().min(cfg.dump_limit)]
    };
    let mut dump = hex_dump(shown, cfg.bytes_per_line, cfg.show_offsets, cfg.placeholder);
    if shown.len() < bytes.len() {
        let _ = write!(dump, "\n... ({} more bytes)", bytes.len() - shown.len());
    }
    dump
}

/// Renders the first `len` bytes as text, printable ASCII (`0x20..=0x7e`) as
/// itself and everything else as `placeholder`.
#[must_use]
pub fn ascii_preview(bytes: &[u8], len: usize, placeholder: char) -> String {
    bytes
        .iter()
        .take(len)
        .map(|&b| if (0x20..=0x7e).contains(&b) { b as char } else { placeholder })
        .collect()
}

/// Renders `bytes` as one contiguous lowercase hex string.
#[must_use]
pub fn raw_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}
