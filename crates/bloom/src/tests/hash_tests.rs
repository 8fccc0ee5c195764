use crate::*;
use std::collections::HashSet;

#[test]
fn yields_exactly_k_positions_in_range() {
    let family = HashFamily::new(9586, 7);
    for i in 0..500u32 {
        let positions: Vec<u64> = family.positions(&i.to_le_bytes()).collect();
        assert_eq!(positions.len(), 7);
        assert!(positions.iter().all(|&p| p < 9586));
    }
}

#[test]
fn positions_are_deterministic() {
    let a = HashFamily::new(1 << 20, 13);
    let b = HashFamily::new(1 << 20, 13);
    let key = b"bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq";
    let pa: Vec<u64> = a.positions(key).collect();
    let pb: Vec<u64> = b.positions(key).collect();
    assert_eq!(pa, pb);
}

#[test]
fn positions_follow_double_hashing() {
    let m = 1_000_003u64;
    let family = HashFamily::new(m, 5);
    let key = b"double";
    let (h1, h2) = HashFamily::hash_pair(key);
    let expected: Vec<u64> = (0..5u128)
        .map(|i| ((h1 as u128 + i * h2 as u128) % m as u128) as u64)
        .collect();
    assert_ne!(h2 % m, 0);
    assert_eq!(family.positions(key).collect::<Vec<_>>(), expected);
}

#[test]
fn step_multiple_of_m_still_spreads_positions() {
    let m = 2u64;
    let family = HashFamily::new(m, 2);
    let mut degenerate = 0;
    for i in 0..200u32 {
        let key = format!("key{}", i);
        let (h1, h2) = HashFamily::hash_pair(key.as_bytes());
        if h2 % m != 0 {
            continue;
        }
        degenerate += 1;
        let positions: Vec<u64> = family.positions(key.as_bytes()).collect();
        assert_eq!(positions, vec![h1 % m, (h1 % m + 1) % m]);
    }
    // roughly half of all keys have an even h2
    assert!(degenerate > 0);
}

#[test]
fn base_hashes_differ_and_are_order_sensitive() {
    let (h1, h2) = HashFamily::hash_pair(b"abc");
    assert_ne!(h1, h2);
    assert_ne!(HashFamily::hash_pair(b"abc"), HashFamily::hash_pair(b"cba"));
    assert_ne!(HashFamily::hash_pair(b""), HashFamily::hash_pair(b"\0"));
}

#[test]
fn first_positions_spread_across_array() {
    let m = 1024u64;
    let family = HashFamily::new(m, 1);
    let hit: HashSet<u64> = (0..4096u32)
        .flat_map(|i| family.positions(format!("key{}", i).as_bytes()).collect::<Vec<_>>())
        .collect();
    // 4096 draws over 1024 slots should leave only ~2% of slots empty.
    assert!(hit.len() > 950, "only {} of {} slots hit", hit.len(), m);
}

#[test]
fn single_bit_array_maps_everything_to_zero() {
    let family = HashFamily::new(1, 3);
    assert_eq!(family.positions(b"x").collect::<Vec<_>>(), vec![0, 0, 0]);
}

#[test]
fn size_hint_is_exact() {
    let family = HashFamily::new(100, 4);
    let mut it = family.positions(b"k");
    assert_eq!(it.len(), 4);
    it.next();
    assert_eq!(it.len(), 3);
}

#[test]
#[should_panic(expected = "num_bits must be > 0")]
fn zero_bits_panics() {
    HashFamily::new(0, 3);
}
