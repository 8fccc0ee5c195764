use thiserror::Error;

/// Errors raised while sizing, building or addressing a bloom filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BloomError {
    /// Bad `n` or `p`, a bit array above the configured ceiling, or parts
    /// that do not fit together. Always raised before anything is allocated.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A bit index outside `[0, m)`. Hash-derived positions never produce
    /// this, so seeing it means a caller broke the addressing contract.
    #[error("bit index {index} out of bounds for {num_bits}-bit array")]
    IndexOutOfBounds { index: u64, num_bits: u64 },
}
