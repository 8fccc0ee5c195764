//! # Analyzer - read-only inspection of bloom filters
//!
//! Recovers statistics and human-readable views from a filter, typically one
//! just decoded by the `codec` crate. Nothing here mutates a filter, so every
//! function can run on a shared `&BloomFilter` from any number of threads.
//!
//! ## Module Responsibilities
//!
//! | Module        | Purpose                                                  |
//! |---------------|----------------------------------------------------------|
//! | [`stats`]     | popcount, density, false-positive estimates, [`Stats`]   |
//! | [`dump`]      | hex dump, ASCII preview, raw hex                         |
//! | [`header`]    | labeled `(m, k, n, p)` next to the raw header bytes      |
//! | [`catalog`]   | header listing for every `.bf` file in a directory       |
//!
//! ## Example
//!
//! ```rust,no_run
//! use config::{AnalyzeConfig, BuildConfig};
//!
//! let bf = codec::load("addresses.bf", &BuildConfig::default()).unwrap();
//! let stats = analyzer::stats(&bf, &AnalyzeConfig::default());
//! println!("{}", stats);
//! ```

pub mod catalog;
pub mod dump;
pub mod header;
pub mod stats;

pub use catalog::{scan_dir, CatalogEntry};
pub use dump::{ascii_preview, hex_dump, hex_dump_limited, raw_hex};
pub use header::{interpret_header, HeaderView};
pub use stats::{
    checksum, density, density_false_positive_rate, estimated_false_positive_rate,
    expected_false_positive_rate, stats, Stats,
};
