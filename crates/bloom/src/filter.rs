use crate::bits::{AtomicBitArray, BitArray};
use crate::hash::HashFamily;
use crate::params::Parameters;
use crate::BloomError;
use config::BuildConfig;
use log::{debug, info};
use rayon::prelude::*;
use std::fmt;

/// A bloom filter: sizing parameters plus the bit array they describe.
///
/// `num_items` counts insert **calls**. Inserting the same element twice
/// leaves the bits unchanged but still bumps the count, since telling
/// repeats apart would need state outside the filter.
#[derive(Clone, PartialEq)]
pub struct BloomFilter {
    params: Parameters,
    bits: BitArray,
}

impl BloomFilter {
    /// Creates an empty filter sized for `expected_items` at
    /// `false_positive_rate`.
    ///
    /// # Errors
    ///
    /// [`BloomError::InvalidParameter`] for a zero item count, a rate outside
    /// `(0, 1)`, or a bit array above `cfg.max_bits`.
    pub fn new(
        expected_items: u64,
        false_positive_rate: f64,
        cfg: &BuildConfig,
    ) -> Result<Self, BloomError> {
        let params = Parameters::optimal(expected_items, false_positive_rate, cfg.max_bits)?;
        let bits = BitArray::new(params.num_bits)?;
        Ok(Self { params, bits })
    }

    /// Sizes a filter for exactly `elements.len()` elements and inserts all
    /// of them.
    ///
    /// Inputs of at least `cfg.parallel_threshold` elements are hashed on the
    /// rayon pool; the resulting bits are identical either way.
    pub fn create<E>(
        elements: &[E],
        false_positive_rate: f64,
        cfg: &BuildConfig,
    ) -> Result<Self, BloomError>
    where
        E: AsRef<[u8]> + Sync,
    {
        let mut bf = Self::new(elements.len() as u64, false_positive_rate, cfg)?;
        if elements.len() >= cfg.parallel_threshold {
            bf.insert_parallel(elements);
        } else {
            bf.insert_all(elements);
        }
        info!(
            "created bloom filter: n={} m={} k={} p={}",
            bf.params.num_items, bf.params.num_bits, bf.params.num_hashes, false_positive_rate
        );
        Ok(bf)
    }

    /// Reassembles a filter from decoded parts.
    ///
    /// # Errors
    ///
    /// [`BloomError::InvalidParameter`] if `k` is zero or the bit array length
    /// disagrees with `params.num_bits`.
    pub fn from_parts(params: Parameters, bits: BitArray) -> Result<Self, BloomError> {
        if params.num_hashes == 0 {
            return Err(BloomError::InvalidParameter(
                "number of hash functions must be at least 1".to_string(),
            ));
        }
        if params.num_bits != bits.num_bits() {
            return Err(BloomError::InvalidParameter(format!(
                "parameters declare {} bits but the array holds {}",
                params.num_bits,
                bits.num_bits()
            )));
        }
        Ok(Self { params, bits })
    }

    /// Inserts an element.
    pub fn insert(&mut self, key: &[u8]) {
        for pos in self.hash_family().positions(key) {
            self.bits.set_bit(pos);
        }
        self.params.num_items += 1;
    }

    /// Inserts every element of `iter` in order.
    pub fn insert_all<I>(&mut self, iter: I)
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        for key in iter {
            self.insert(key.as_ref());
        }
    }

    /// Inserts `elements` using every rayon worker.
    ///
    /// Positions are computed independently per element; the bits are set
    /// with atomic `fetch_or` on the shared byte storage.
    pub fn insert_parallel<E>(&mut self, elements: &[E])
    where
        E: AsRef<[u8]> + Sync,
    {
        let family = self.hash_family();
        let bits = std::mem::replace(&mut self.bits, BitArray::placeholder());
        let shared = AtomicBitArray::from(bits);

        elements.par_iter().for_each(|key| {
            for pos in family.positions(key.as_ref()) {
                shared.set_bit(pos);
            }
        });

        self.bits = shared.into_bit_array();
        self.params.num_items += elements.len() as u64;
        debug!("parallel insert of {} elements", elements.len());
    }

    /// Returns `true` if the element **might** be in the set, `false` if it
    /// is **definitely not** in the set.
    #[must_use]
    pub fn may_contain(&self, key: &[u8]) -> bool {
        self.hash_family()
            .positions(key)
            .all(|pos| self.bits.get_bit(pos))
    }

    /// The hash family matching this filter's `(m, k)`.
    #[must_use]
    pub fn hash_family(&self) -> HashFamily {
        HashFamily::new(self.params.num_bits, self.params.num_hashes)
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Returns the number of bits in the filter.
    #[must_use]
    pub fn num_bits(&self) -> u64 {
        self.params.num_bits
    }

    /// Returns the number of hash functions.
    #[must_use]
    pub fn num_hashes(&self) -> u32 {
        self.params.num_hashes
    }

    /// Returns the number of insert calls made so far.
    #[must_use]
    pub fn num_items(&self) -> u64 {
        self.params.num_items
    }

    #[must_use]
    pub fn false_positive_rate(&self) -> f64 {
        self.params.false_positive_rate
    }

    #[must_use]
    pub fn bits(&self) -> &BitArray {
        &self.bits
    }

    /// `true` until the first insert.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.num_items == 0
    }

    #[must_use]
    pub fn into_parts(self) -> (Parameters, BitArray) {
        (self.params, self.bits)
    }
}

impl fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("num_bits", &self.params.num_bits)
            .field("num_hashes", &self.params.num_hashes)
            .field("num_items", &self.params.num_items)
            .field("false_positive_rate", &self.params.false_positive_rate)
            .field("bytes", &self.bits.byte_len())
            .finish()
    }
}
