//! # Codec - persisted bloom filter files
//!
//! Converts a [`bloom::BloomFilter`] to and from its on-disk form.
//!
//! ## File layout (v1 - current)
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ HEADER (always first 33 bytes)                                │
//! │                                                               │
//! │ magic "BLMF" (4 B) | version (u8)                             │
//! │ num_bits m (u64 LE) | num_hashes k (u32 LE)                   │
//! │ num_items n (u64 LE) | false_positive_rate p (f64 LE)         │
//! ├───────────────────────────────────────────────────────────────┤
//! │ BITS (exactly ceil(m / 8) bytes)                              │
//! │                                                               │
//! │ bit i = byte i / 8, bit position i % 8 (LSB first)            │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers and the float are little-endian. Decoding checks the magic
//! first, then the version, then the header fields, and only then reads the
//! body, whose length must match `ceil(m / 8)` exactly. A decode either
//! returns a complete filter or an error; nothing half-built escapes.
//!
//! ## Version history
//!
//! | Version | Magic  | Header | Features                              |
//! |---------|--------|--------|---------------------------------------|
//! | v1      | `BLMF` | 33 B   | m, k, n, p + raw bit array            |

mod error;
mod format;
mod reader;
mod writer;

pub use error::{CodecError, FormatError};
pub use format::{Header, FILTER_MAGIC, FORMAT_VERSION, HEADER_BYTES};
pub use reader::{decode, load, probe_file, read_from, read_header};
pub use writer::{encode, encoded_len, save, write_to};

#[cfg(test)]
mod tests;
