//! Bit statistics and false-positive estimates.
//!
//! Three estimates are reported next to the configured rate `p`:
//!
//! ```text
//! estimated = 1 - (1 - density) ^ k       (textbook estimator on observed density)
//! density   = density ^ k                 (chance that k set positions all hit)
//! expected  = (1 - e^(-k * n / m)) ^ k    (from the recorded insert count)
//! ```
//!
//! All three come from the current bits or counts, not from `p`. The last
//! two agree for a filter built from distinct elements; they drift apart
//! when `n` counts repeated inserts.

use bloom::BloomFilter;
use config::AnalyzeConfig;
use crc32fast::Hasher as Crc32;
use log::debug;
use std::fmt;

use crate::dump::{ascii_preview, hex_dump_limited};
use crate::header::{interpret_header, HeaderView};

/// Everything the analysis views show for one filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    /// Set bits in `[0, m)`.
    pub popcount: u64,
    pub num_bits: u64,
    pub num_items: u64,
    /// `popcount / m`.
    pub density: f64,
    /// `1 - (1 - density) ^ k`.
    pub estimated_false_positive_rate: f64,
    /// `density ^ k`: the chance an absent element finds all `k` bits set.
    pub density_false_positive_rate: f64,
    /// False-positive rate implied by `n` inserts into `m` bits.
    pub expected_false_positive_rate: f64,
    /// The rate the filter was sized for.
    pub configured_false_positive_rate: f64,
    /// CRC32 of the raw bit array.
    pub checksum: u32,
    pub hex_dump: String,
    pub ascii_preview: String,
    pub header: HeaderView,
}

/// Computes all statistics and views for `bf`.
#[must_use]
pub fn stats(bf: &BloomFilter, cfg: &AnalyzeConfig) -> Stats {
    let bits = bf.bits();
    let bytes = bits.as_bytes();
    let popcount = bits.popcount();
    let d = density(popcount, bf.num_bits());

    debug!(
        "stats: popcount={} m={} density={:.6}",
        popcount,
        bf.num_bits(),
        d
    );

    Stats {
        popcount,
        num_bits: bf.num_bits(),
        num_items: bf.num_items(),
        density: d,
        estimated_false_positive_rate: estimated_false_positive_rate(d, bf.num_hashes()),
        density_false_positive_rate: density_false_positive_rate(d, bf.num_hashes()),
        expected_false_positive_rate: expected_false_positive_rate(
            bf.num_bits(),
            bf.num_hashes(),
            bf.num_items(),
        ),
        configured_false_positive_rate: bf.false_positive_rate(),
        checksum: checksum(bytes),
        hex_dump: hex_dump_limited(bytes, cfg),
        ascii_preview: ascii_preview(bytes, cfg.ascii_preview_len, cfg.placeholder),
        header: interpret_header(bf),
    }
}

/// Fraction of set bits; 0 for an empty array.
#[must_use]
pub fn density(popcount: u64, num_bits: u64) -> f64 {
    if num_bits == 0 {
        0.0
    } else {
        popcount as f64 / num_bits as f64
    }
}

/// `1 - (1 - density) ^ k`.
#[must_use]
pub fn estimated_false_positive_rate(density: f64, num_hashes: u32) -> f64 {
    1.0 - (1.0 - density).powi(exponent(num_hashes))
}

/// `density ^ k`.
#[must_use]
pub fn density_false_positive_rate(density: f64, num_hashes: u32) -> f64 {
    density.powi(exponent(num_hashes))
}

fn exponent(num_hashes: u32) -> i32 {
    i32::try_from(num_hashes).unwrap_or(i32::MAX)
}

/// `(1 - e^(-k n / m)) ^ k`.
#[must_use]
pub fn expected_false_positive_rate(num_bits: u64, num_hashes: u32, num_items: u64) -> f64 {
    if num_bits == 0 {
        return 0.0;
    }
    let k = num_hashes as f64;
    let fill = 1.0 - (-k * num_items as f64 / num_bits as f64).exp();
    fill.powf(k)
}

/// CRC32 of `bytes`.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u32 {
    let mut hasher = Crc32::new();
    hasher.update(bytes);
    hasher.finalize()
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Bloom Filter Statistics ---")?;
        writeln!(f, "Active bits (1s): {}", self.popcount)?;
        writeln!(f, "Total bits: {}", self.num_bits)?;
        writeln!(f, "Density: {:.6}%", self.density * 100.0)?;
        writeln!(f, "Number of inserted elements (n): {}", self.num_items)?;
        writeln!(
            f,
            "Configured false positive rate: {:e}",
            self.configured_false_positive_rate
        )?;
        writeln!(
            f,
            "Estimated false positive rate: {:e}",
            self.estimated_false_positive_rate
        )?;
        writeln!(
            f,
            "False positive rate from density (density^k): {:e}",
            self.density_false_positive_rate
        )?;
        writeln!(
            f,
            "Expected false positive rate (n inserts): {:e}",
            self.expected_false_positive_rate
        )?;
        writeln!(f, "CRC32 of bit array: {:08x}", self.checksum)?;
        writeln!(f)?;
        writeln!(f, "{}", self.header)?;
        writeln!(f)?;
        writeln!(f, "--- Hex Dump ---")?;
        writeln!(f, "{}", self.hex_dump)?;
        writeln!(f)?;
        writeln!(f, "--- ASCII Preview ---")?;
        write!(f, "{}", self.ascii_preview)
    }
}
