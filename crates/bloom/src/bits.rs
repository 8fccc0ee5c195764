//! Packed bit storage.
//!
//! Bit `i` lives in byte `i / 8` at position `i % 8` (least significant bit
//! first). The byte buffer is `ceil(m / 8)` long and never changes length.
//! Bits past `m` in the final byte are padding: they are never set by this
//! crate and are ignored by [`BitArray::popcount`], but bytes decoded from a
//! file are kept verbatim, padding included.

use crate::params::byte_len_for;
use crate::BloomError;
use rayon::prelude::*;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Bytes per rayon task when counting bits.
const POPCOUNT_CHUNK: usize = 64 * 1024;

/// A fixed-length array of `m` bits.
#[derive(Clone, PartialEq, Eq)]
pub struct BitArray {
    bytes: Vec<u8>,
    num_bits: u64,
}

impl BitArray {
    /// Allocates an all-zero array of `num_bits` bits.
    ///
    /// # Errors
    ///
    /// [`BloomError::InvalidParameter`] if `num_bits` is zero or the byte
    /// length does not fit in `usize`.
    pub fn new(num_bits: u64) -> Result<Self, BloomError> {
        let byte_len = checked_byte_len(num_bits)?;
        Ok(Self {
            bytes: vec![0u8; byte_len],
            num_bits,
        })
    }

    /// Wraps an existing buffer without touching its contents.
    ///
    /// # Errors
    ///
    /// [`BloomError::InvalidParameter`] if `bytes.len() != ceil(num_bits / 8)`.
    pub fn from_bytes(bytes: Vec<u8>, num_bits: u64) -> Result<Self, BloomError> {
        let expected = checked_byte_len(num_bits)?;
        if bytes.len() != expected {
            return Err(BloomError::InvalidParameter(format!(
                "{} bits need {} bytes, got {}",
                num_bits,
                expected,
                bytes.len()
            )));
        }
        Ok(Self { bytes, num_bits })
    }

    /// Number of addressable bits (`m`).
    #[must_use]
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Sets bit `idx`. Setting an already-set bit changes nothing.
    pub fn set(&mut self, idx: u64) -> Result<(), BloomError> {
        self.check(idx)?;
        self.set_bit(idx);
        Ok(())
    }

    /// Returns whether bit `idx` is set.
    pub fn test(&self, idx: u64) -> Result<bool, BloomError> {
        self.check(idx)?;
        Ok(self.get_bit(idx))
    }

    /// Number of set bits in `[0, m)`.
    #[must_use]
    pub fn popcount(&self) -> u64 {
        let total: u64 = self
            .bytes
            .par_chunks(POPCOUNT_CHUNK)
            .map(|chunk| chunk.iter().map(|b| b.count_ones() as u64).sum::<u64>())
            .sum();

        let used = (self.num_bits % 8) as u32;
        match self.bytes.last() {
            Some(&last) if used != 0 => total - (last >> used).count_ones() as u64,
            _ => total,
        }
    }

    /// Read-only view of the packed bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    // ---- Internal helpers ----

    /// Zero-length stand-in used while the real buffer is on loan to an
    /// [`AtomicBitArray`].
    pub(crate) fn placeholder() -> Self {
        Self {
            bytes: Vec::new(),
            num_bits: 0,
        }
    }

    fn check(&self, idx: u64) -> Result<(), BloomError> {
        if idx >= self.num_bits {
            return Err(BloomError::IndexOutOfBounds {
                index: idx,
                num_bits: self.num_bits,
            });
        }
        Ok(())
    }

    /// Unchecked set for positions produced by the hash family.
    pub(crate) fn set_bit(&mut self, idx: u64) {
        let byte_idx = (idx / 8) as usize;
        let bit_offset = (idx % 8) as u8;
        self.bytes[byte_idx] |= 1 << bit_offset;
    }

    pub(crate) fn get_bit(&self, idx: u64) -> bool {
        let byte_idx = (idx / 8) as usize;
        let bit_offset = (idx % 8) as u8;
        (self.bytes[byte_idx] >> bit_offset) & 1 == 1
    }
}

impl fmt::Debug for BitArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitArray")
            .field("num_bits", &self.num_bits)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Shared-reference view of a [`BitArray`] for concurrent insertion.
///
/// Every set is an atomic `fetch_or` on the owning byte, so any number of
/// threads may set bits at once. Setting bits commutes, so the final
/// contents do not depend on interleaving.
/// [`into_bit_array`](AtomicBitArray::into_bit_array) takes ownership back
/// once all writers are done.
pub struct AtomicBitArray {
    cells: Vec<AtomicU8>,
    num_bits: u64,
}

impl AtomicBitArray {
    #[must_use]
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Sets bit `idx` atomically.
    pub fn set(&self, idx: u64) -> Result<(), BloomError> {
        if idx >= self.num_bits {
            return Err(BloomError::IndexOutOfBounds {
                index: idx,
                num_bits: self.num_bits,
            });
        }
        self.set_bit(idx);
        Ok(())
    }

    pub(crate) fn set_bit(&self, idx: u64) {
        let byte_idx = (idx / 8) as usize;
        let bit_offset = (idx % 8) as u8;
        self.cells[byte_idx].fetch_or(1 << bit_offset, Ordering::Relaxed);
    }

    /// Returns the plain array once every writer has finished.
    #[must_use]
    pub fn into_bit_array(self) -> BitArray {
        BitArray {
            bytes: self.cells.into_iter().map(AtomicU8::into_inner).collect(),
            num_bits: self.num_bits,
        }
    }
}

impl From<BitArray> for AtomicBitArray {
    fn from(bits: BitArray) -> Self {
        Self {
            cells: bits.bytes.into_iter().map(AtomicU8::new).collect(),
            num_bits: bits.num_bits,
        }
    }
}

fn checked_byte_len(num_bits: u64) -> Result<usize, BloomError> {
    if num_bits == 0 {
        return Err(BloomError::InvalidParameter(
            "bit array length must be greater than 0".to_string(),
        ));
    }
    usize::try_from(byte_len_for(num_bits)).map_err(|_| {
        BloomError::InvalidParameter(format!(
            "{} bits cannot be addressed on this platform",
            num_bits
        ))
    })
}
