//! # Bloom Filter
//!
//! A space-efficient probabilistic data structure for set membership testing.
//!
//! A bloom filter can tell you with certainty that an element is **not** in
//! the set (no false negatives), but may occasionally report that an element
//! **is** in the set when it isn't (false positives). The false positive rate
//! depends on the number of bits and hash functions used.
//!
//! ## Components
//!
//! | Module     | Purpose                                                  |
//! |------------|----------------------------------------------------------|
//! | [`params`] | `m` and `k` from element count `n` and target rate `p`   |
//! | [`hash`]   | `k` bit positions per element via double hashing         |
//! | [`bits`]   | packed bit storage, plus an atomic view for parallel set |
//! | [`filter`] | [`BloomFilter`]: create, insert, query                   |
//!
//! Persistence lives in the `codec` crate and read-only inspection in the
//! `analyzer` crate; both work on the [`BloomFilter`] defined here.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bloom::BloomFilter;
//! use config::BuildConfig;
//!
//! let elements = ["1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy"];
//! let bf = BloomFilter::create(&elements, 0.01, &BuildConfig::default()).unwrap();
//! assert!(bf.may_contain(elements[0].as_bytes()));
//! ```

pub mod bits;
mod error;
pub mod filter;
pub mod hash;
pub mod params;

pub use bits::{AtomicBitArray, BitArray};
pub use error::BloomError;
pub use filter::BloomFilter;
pub use hash::HashFamily;
pub use params::{byte_len_for, optimal_parameters, Parameters};

#[cfg(test)]
mod tests;
