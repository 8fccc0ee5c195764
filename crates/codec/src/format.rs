//! Header constants and the fixed 33-byte header record.
//!
//! ```text
//! offset  size  field
//!      0     4  magic "BLMF"
//!      4     1  version
//!      5     8  num_bits (m)            u64 LE
//!     13     4  num_hashes (k)          u32 LE
//!     17     8  num_items (n)           u64 LE
//!     25     8  false_positive_rate (p) f64 LE
//! ```

use bloom::{byte_len_for, Parameters};
use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Read, Write};

use crate::{CodecError, FormatError};

/// Magic bytes identifying a bloom filter file (ASCII "BLMF").
pub const FILTER_MAGIC: [u8; 4] = *b"BLMF";

/// Current (and only) format revision.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the header in bytes: 4 (`magic`) + 1 (`version`) + 8 (`m`) +
/// 4 (`k`) + 8 (`n`) + 8 (`p`).
pub const HEADER_BYTES: usize = 4 + 1 + 8 + 4 + 8 + 8;

const VERSION_OFFSET: usize = 4;
const M_OFFSET: usize = 5;
const K_OFFSET: usize = 13;
const N_OFFSET: usize = 17;
const P_OFFSET: usize = 25;

/// Decoded header fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    pub version: u8,
    pub num_bits: u64,
    pub num_hashes: u32,
    pub num_items: u64,
    pub false_positive_rate: f64,
}

impl Header {
    /// The header describing a filter with `params`, at the current version.
    #[must_use]
    pub fn from_parameters(params: &Parameters) -> Self {
        Self {
            version: FORMAT_VERSION,
            num_bits: params.num_bits,
            num_hashes: params.num_hashes,
            num_items: params.num_items,
            false_positive_rate: params.false_positive_rate,
        }
    }

    #[must_use]
    pub fn parameters(&self) -> Parameters {
        Parameters {
            num_bits: self.num_bits,
            num_hashes: self.num_hashes,
            num_items: self.num_items,
            false_positive_rate: self.false_positive_rate,
        }
    }

    /// Length of the bit array that must follow: `ceil(m / 8)`.
    #[must_use]
    pub fn body_len(&self) -> u64 {
        byte_len_for(self.num_bits)
    }

    /// Serializes the header into its fixed layout.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_BYTES] {
        let mut buf = [0u8; HEADER_BYTES];
        buf[..VERSION_OFFSET].copy_from_slice(&FILTER_MAGIC);
        buf[VERSION_OFFSET] = self.version;
        LittleEndian::write_u64(&mut buf[M_OFFSET..K_OFFSET], self.num_bits);
        LittleEndian::write_u32(&mut buf[K_OFFSET..N_OFFSET], self.num_hashes);
        LittleEndian::write_u64(&mut buf[N_OFFSET..P_OFFSET], self.num_items);
        LittleEndian::write_f64(&mut buf[P_OFFSET..HEADER_BYTES], self.false_positive_rate);
        buf
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    /// Reads and validates a header from `r`, leaving `r` at the first body
    /// byte.
    ///
    /// Checks run in order and stop at the first failure: magic, version,
    /// header length, then field values (`m` in `1..=max_bits`, `k` in
    /// `1..=m`, `0 < p < 1`).
    pub fn read_from<R: Read>(r: &mut R, max_bits: u64) -> Result<Self, CodecError> {
        let mut buf = [0u8; HEADER_BYTES];

        let found = read_full(r, &mut buf[..VERSION_OFFSET])?;
        if buf[..found] != FILTER_MAGIC[..found] {
            return Err(FormatError::BadMagic {
                found: buf[..found].to_vec(),
            }
            .into());
        }
        if found < VERSION_OFFSET {
            return Err(truncated(found));
        }

        if read_full(r, &mut buf[VERSION_OFFSET..M_OFFSET])? == 0 {
            return Err(truncated(VERSION_OFFSET));
        }
        let version = buf[VERSION_OFFSET];
        if version != FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion(version).into());
        }

        let found = M_OFFSET + read_full(r, &mut buf[M_OFFSET..])?;
        if found < HEADER_BYTES {
            return Err(truncated(found));
        }

        let header = Self {
            version,
            num_bits: LittleEndian::read_u64(&buf[M_OFFSET..K_OFFSET]),
            num_hashes: LittleEndian::read_u32(&buf[K_OFFSET..N_OFFSET]),
            num_items: LittleEndian::read_u64(&buf[N_OFFSET..P_OFFSET]),
            false_positive_rate: LittleEndian::read_f64(&buf[P_OFFSET..HEADER_BYTES]),
        };
        header.validate(max_bits)?;
        Ok(header)
    }

    fn validate(&self, max_bits: u64) -> Result<(), FormatError> {
        if self.num_bits == 0 {
            return Err(FormatError::InvalidHeader {
                field: "num_bits",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.num_bits > max_bits {
            return Err(FormatError::InvalidHeader {
                field: "num_bits",
                reason: format!("{} exceeds the ceiling of {}", self.num_bits, max_bits),
            });
        }
        if self.num_hashes == 0 {
            return Err(FormatError::InvalidHeader {
                field: "num_hashes",
                reason: "must be at least 1".to_string(),
            });
        }
        if u64::from(self.num_hashes) > self.num_bits {
            return Err(FormatError::InvalidHeader {
                field: "num_hashes",
                reason: format!(
                    "{} exceeds the bit count {}",
                    self.num_hashes, self.num_bits
                ),
            });
        }
        let p = self.false_positive_rate;
        if !(p > 0.0 && p < 1.0) {
            return Err(FormatError::InvalidHeader {
                field: "false_positive_rate",
                reason: format!("{} is not in (0, 1)", p),
            });
        }
        Ok(())
    }
}

fn truncated(found: usize) -> CodecError {
    FormatError::TruncatedHeader {
        expected: HEADER_BYTES,
        found,
    }
    .into()
}

/// Fills `buf` from `r` until it is full or `r` hits EOF, returning the number
/// of bytes read. Unlike `read_exact`, a short read is reported as a count so
/// the caller can tell truncation apart from I/O failure.
pub(crate) fn read_full<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
