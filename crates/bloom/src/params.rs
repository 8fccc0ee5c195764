//! Optimal filter sizing.
//!
//! ```text
//! m = ceil(-(n * ln p) / ln(2)^2)
//! k = max(1, round((m / n) * ln 2))
//! ```
//!
//! All arithmetic is `f64`. Rates down to `1e-14` and well below stay finite:
//! `ln p` is only about `-32` there.

use crate::BloomError;
use log::debug;
use std::f64::consts::LN_2;

/// The four numbers that describe a filter.
///
/// `num_bits` and `num_hashes` are fixed once derived; `num_items` grows by
/// one with every insert call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Bit-array length (`m`).
    pub num_bits: u64,
    /// Number of hash positions per element (`k`).
    pub num_hashes: u32,
    /// Insert calls made so far (`n`).
    pub num_items: u64,
    /// Target false-positive probability the filter was sized for (`p`).
    pub false_positive_rate: f64,
}

impl Parameters {
    /// Sizes a filter for `expected_items` at `false_positive_rate`, with
    /// `num_items` starting at zero.
    pub fn optimal(
        expected_items: u64,
        false_positive_rate: f64,
        max_bits: u64,
    ) -> Result<Self, BloomError> {
        let (num_bits, num_hashes) = optimal_parameters(expected_items, false_positive_rate, max_bits)?;
        Ok(Self {
            num_bits,
            num_hashes,
            num_items: 0,
            false_positive_rate,
        })
    }

    /// Length in bytes of the packed bit array: `ceil(m / 8)`.
    #[must_use]
    pub fn byte_len(&self) -> u64 {
        byte_len_for(self.num_bits)
    }
}

/// Returns `ceil(num_bits / 8)`.
#[must_use]
pub fn byte_len_for(num_bits: u64) -> u64 {
    num_bits.div_ceil(8)
}

/// Computes `(m, k)` for `expected_items` elements at `false_positive_rate`.
///
/// # Errors
///
/// [`BloomError::InvalidParameter`] when `expected_items` is zero, when the
/// rate is not strictly inside `(0, 1)` (NaN included), or when `m` would
/// exceed `max_bits`.
pub fn optimal_parameters(
    expected_items: u64,
    false_positive_rate: f64,
    max_bits: u64,
) -> Result<(u64, u32), BloomError> {
    if expected_items == 0 {
        return Err(BloomError::InvalidParameter(
            "number of elements must be greater than 0".to_string(),
        ));
    }
    if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
        return Err(BloomError::InvalidParameter(format!(
            "false positive rate must be in (0, 1), got {}",
            false_positive_rate
        )));
    }

    let n = expected_items as f64;
    let m = (-(n * false_positive_rate.ln()) / LN_2.powi(2)).ceil();
    if !m.is_finite() || m > max_bits as f64 {
        return Err(BloomError::InvalidParameter(format!(
            "bit array of {} bits exceeds the ceiling of {} bits (n={}, p={})",
            m, max_bits, expected_items, false_positive_rate
        )));
    }
    let m = (m as u64).max(1);

    let k = ((m as f64 / n) * LN_2).round();
    if k > u32::MAX as f64 {
        return Err(BloomError::InvalidParameter(format!(
            "hash count {} does not fit in 32 bits",
            k
        )));
    }
    let k = (k as u32).max(1);

    debug!(
        "optimal parameters for n={} p={}: m={} k={}",
        expected_items, false_positive_rate, m, k
    );
    Ok((m, k))
}
