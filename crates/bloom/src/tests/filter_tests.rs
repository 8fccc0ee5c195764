use crate::*;
use config::BuildConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn cfg() -> BuildConfig {
    BuildConfig::default()
}

fn random_strings(rng: &mut StdRng, prefix: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| format!("{}{:016x}{:016x}", prefix, rng.gen::<u64>(), rng.gen::<u64>()))
        .collect()
}

// -------------------- Construction --------------------

#[test]
fn new_creates_empty_filter() {
    let bf = BloomFilter::new(100, 0.01, &cfg()).unwrap();
    assert!(bf.num_bits() > 0);
    assert!(bf.num_hashes() > 0);
    assert_eq!(bf.num_items(), 0);
    assert!(bf.is_empty());
    assert_eq!(bf.bits().popcount(), 0);
}

#[test]
fn new_rejects_bad_parameters() {
    assert!(BloomFilter::new(0, 0.01, &cfg()).is_err());
    assert!(BloomFilter::new(100, 0.0, &cfg()).is_err());
    assert!(BloomFilter::new(100, 1.0, &cfg()).is_err());
}

#[test]
fn create_respects_bit_ceiling() {
    let tight = BuildConfig {
        max_bits: 64,
        ..BuildConfig::default()
    };
    let elements = vec!["a"; 100];
    let err = BloomFilter::create(&elements, 0.01, &tight).unwrap_err();
    assert!(matches!(err, BloomError::InvalidParameter(_)));
}

#[test]
fn create_rejects_empty_input() {
    let elements: Vec<&[u8]> = Vec::new();
    assert!(BloomFilter::create(&elements, 0.01, &cfg()).is_err());
}

#[test]
fn create_sizes_for_input_and_counts_inserts() {
    let elements: Vec<String> = (0..1000).map(|i| format!("addr{}", i)).collect();
    let bf = BloomFilter::create(&elements, 0.01, &cfg()).unwrap();
    assert_eq!(bf.num_bits(), 9586);
    assert_eq!(bf.num_hashes(), 7);
    assert_eq!(bf.num_items(), 1000);
    assert_eq!(bf.false_positive_rate(), 0.01);
    assert!(!bf.is_empty());
}

#[test]
fn from_parts_validates() {
    let params = Parameters::optimal(10, 0.1, config::DEFAULT_MAX_BITS).unwrap();
    let good = BitArray::new(params.num_bits).unwrap();
    assert!(BloomFilter::from_parts(params, good).is_ok());

    let wrong = BitArray::new(params.num_bits + 8).unwrap();
    assert!(BloomFilter::from_parts(params, wrong).is_err());

    let no_hashes = Parameters {
        num_hashes: 0,
        ..params
    };
    let bits = BitArray::new(params.num_bits).unwrap();
    assert!(BloomFilter::from_parts(no_hashes, bits).is_err());
}

// -------------------- Insert / Contains --------------------

#[test]
fn inserted_key_is_found() {
    let mut bf = BloomFilter::new(100, 0.01, &cfg()).unwrap();
    bf.insert(b"hello");
    assert!(bf.may_contain(b"hello"));
    assert_eq!(bf.num_items(), 1);
}

#[test]
fn missing_key_is_not_found() {
    let bf = BloomFilter::new(100, 0.01, &cfg()).unwrap();
    assert!(!bf.may_contain(b"hello"));
}

#[test]
fn no_false_negatives() {
    let mut rng = StdRng::seed_from_u64(7);
    let elements = random_strings(&mut rng, "in-", 5000);
    let bf = BloomFilter::create(&elements, 1e-6, &cfg()).unwrap();
    for e in &elements {
        assert!(bf.may_contain(e.as_bytes()), "{} should be found", e);
    }
}

#[test]
fn empty_and_binary_keys() {
    let mut bf = BloomFilter::new(10, 0.01, &cfg()).unwrap();
    let key = vec![0u8, 1, 2, 255, 254, 253];
    bf.insert(b"");
    bf.insert(&key);
    assert!(bf.may_contain(b""));
    assert!(bf.may_contain(&key));
}

#[test]
fn duplicate_insert_is_idempotent_for_bits() {
    let mut once = BloomFilter::new(100, 0.01, &cfg()).unwrap();
    once.insert(b"dup");

    let mut twice = BloomFilter::new(100, 0.01, &cfg()).unwrap();
    twice.insert(b"dup");
    twice.insert(b"dup");

    assert_eq!(once.bits(), twice.bits());
    assert_eq!(twice.num_items(), 2);
}

#[test]
fn popcount_bounded_by_inserts_times_k() {
    let mut bf = BloomFilter::new(500, 0.05, &cfg()).unwrap();
    let k = bf.num_hashes() as u64;
    for j in 1..=500u64 {
        bf.insert(&j.to_le_bytes());
        let pc = bf.bits().popcount();
        assert!(pc <= bf.num_bits().min(j * k), "popcount {} after {} inserts", pc, j);
    }
}

#[test]
fn false_positive_rate_is_reasonable() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let inserted = random_strings(&mut rng, "in-", 1000);
    let absent = random_strings(&mut rng, "out-", 100_000);

    let bf = BloomFilter::create(&inserted, 0.01, &cfg()).unwrap();
    assert_eq!(bf.num_bits(), 9586);
    assert_eq!(bf.num_hashes(), 7);

    let false_positives = absent
        .iter()
        .filter(|p| bf.may_contain(p.as_bytes()))
        .count();
    let actual_fpr = false_positives as f64 / absent.len() as f64;

    // Allow up to 3x the target FPR (statistical variance)
    assert!(
        actual_fpr <= 0.03,
        "FPR too high: {:.4} (target 0.01)",
        actual_fpr
    );
}

#[test]
fn tiny_rate_single_item() {
    let elements = ["only"];
    let bf = BloomFilter::create(&elements, 1e-14, &cfg()).unwrap();
    assert!(bf.may_contain(b"only"));
    assert_eq!(bf.num_bits(), 68);
    assert_eq!(bf.num_hashes(), 47);
}

#[test]
fn insert_after_reassembly_extends_count() {
    let elements = ["a", "b"];
    let bf = BloomFilter::create(&elements, 0.01, &cfg()).unwrap();
    let (params, bits) = bf.into_parts();
    let mut loaded = BloomFilter::from_parts(params, bits).unwrap();
    loaded.insert(b"c");
    assert_eq!(loaded.num_items(), 3);
    assert!(loaded.may_contain(b"a"));
    assert!(loaded.may_contain(b"c"));
}

// -------------------- Parallel --------------------

#[test]
fn parallel_and_sequential_build_identical_bits() {
    let mut rng = StdRng::seed_from_u64(99);
    let elements = random_strings(&mut rng, "", 20_000);

    let sequential = BuildConfig {
        parallel_threshold: usize::MAX,
        ..BuildConfig::default()
    };
    let parallel = BuildConfig {
        parallel_threshold: 0,
        ..BuildConfig::default()
    };

    let a = BloomFilter::create(&elements, 0.001, &sequential).unwrap();
    let b = BloomFilter::create(&elements, 0.001, &parallel).unwrap();
    assert_eq!(a, b);
    assert_eq!(b.num_items(), 20_000);
}

#[test]
fn parallel_insert_keeps_buffer_length() {
    let mut bf = BloomFilter::new(1000, 0.01, &cfg()).unwrap();
    let before = bf.bits().byte_len();
    bf.insert_parallel(&["x", "y", "z"]);
    assert_eq!(bf.bits().byte_len(), before);
    assert_eq!(bf.bits().num_bits(), bf.num_bits());
    assert!(bf.may_contain(b"y"));
}

// -------------------- Debug --------------------

#[test]
fn debug_impl_works() {
    let bf = BloomFilter::new(100, 0.01, &cfg()).unwrap();
    let debug = format!("{:?}", bf);
    assert!(debug.contains("BloomFilter"));
    assert!(debug.contains("num_bits"));
    assert!(debug.contains("num_hashes"));
}
