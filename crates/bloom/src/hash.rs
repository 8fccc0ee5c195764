//! Bit positions via double hashing.
//!
//! Two 64-bit base hashes are computed per element: FNV-1a started from two
//! different offset bases, each passed through the MurmurHash3 `fmix64`
//! finalizer so every input bit reaches every output bit. Position `i` is
//!
//! ```text
//! s   = h2 mod m, or 1 if that is 0
//! g_i = (h1 + i * s) mod m         for i in 0..k
//! ```
//!
//! which equals `(h1 + i * h2) mod m` except when `h2` is a multiple of `m`;
//! there a zero step would put all `k` positions on one bit. The sum is
//! evaluated in exact 128-bit integer arithmetic, so the result never
//! depends on wrapping behaviour or the platform. The same element and the
//! same `(m, k)` always produce the same positions, which is what makes a
//! persisted filter queryable after it is loaded again.

/// Offset basis for the first base hash (the standard FNV-1a 64-bit basis).
const BASIS_1: u64 = 0xcbf29ce484222325;
/// Offset basis for the second base hash.
const BASIS_2: u64 = 0x517cc1b727220a95;

/// Maps elements to `k` positions in a bit array of `m` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashFamily {
    num_bits: u64,
    num_hashes: u32,
}

impl HashFamily {
    /// Creates the family for an `m`-bit array and `k` positions.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is 0; there is no position to map to.
    pub fn new(num_bits: u64, num_hashes: u32) -> Self {
        assert!(num_bits > 0, "num_bits must be > 0");
        Self {
            num_bits,
            num_hashes,
        }
    }

    #[must_use]
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    #[must_use]
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Returns the two base hashes `(h1, h2)` of `key`.
    #[must_use]
    pub fn hash_pair(key: &[u8]) -> (u64, u64) {
        (fmix64(fnv1a_64(key, BASIS_1)), fmix64(fnv1a_64(key, BASIS_2)))
    }

    /// Iterates over the `k` positions of `key`, each in `[0, m)`.
    pub fn positions(&self, key: &[u8]) -> Positions {
        let (h1, h2) = Self::hash_pair(key);
        let step = match h2 % self.num_bits {
            0 => 1,
            s => s,
        };
        Positions {
            start: h1 % self.num_bits,
            step,
            num_bits: self.num_bits,
            next: 0,
            num_hashes: self.num_hashes,
        }
    }
}

/// Iterator returned by [`HashFamily::positions`].
#[derive(Debug, Clone)]
pub struct Positions {
    start: u64,
    step: u64,
    num_bits: u64,
    next: u32,
    num_hashes: u32,
}

impl Iterator for Positions {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next >= self.num_hashes {
            return None;
        }
        let i = self.next as u128;
        self.next += 1;
        let pos = (self.start as u128 + i * self.step as u128) % self.num_bits as u128;
        Some(pos as u64)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.num_hashes - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Positions {}

/// FNV-1a 64-bit hash with a configurable starting basis.
fn fnv1a_64(data: &[u8], basis: u64) -> u64 {
    const FNV_PRIME: u64 = 0x00000100000001b3;
    let mut hash = basis;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// MurmurHash3 finalization mix: force all bits of a hash block to avalanche.
#[inline]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^ (k >> 33)
}
