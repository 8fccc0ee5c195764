use bloom::BloomFilter;
use codec::{Header, HEADER_BYTES};
use std::fmt;

use crate::dump::raw_hex;

/// A filter's header, both decoded and as the exact bytes the codec writes.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub header: Header,
    pub raw: [u8; HEADER_BYTES],
}

/// Builds the header view for `bf`.
#[must_use]
pub fn interpret_header(bf: &BloomFilter) -> HeaderView {
    let header = Header::from_parameters(bf.parameters());
    HeaderView {
        raw: header.to_bytes(),
        header,
    }
}

impl fmt::Display for HeaderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;
        writeln!(f, "--- Header Interpretation (little-endian) ---")?;
        writeln!(f, "Magic: {}", String::from_utf8_lossy(&self.raw[..4]))?;
        writeln!(f, "Version: {}", h.version)?;
        writeln!(f, "Size (bits): {}", h.num_bits)?;
        writeln!(f, "Number of Hash Functions: {}", h.num_hashes)?;
        writeln!(f, "Number of Elements: {}", h.num_items)?;
        writeln!(f, "Error Rate: {:e}", h.false_positive_rate)?;
        write!(f, "Raw header: {}", raw_hex(&self.raw))
    }
}
