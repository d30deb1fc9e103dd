//! Property-based tests for the key algebra
//!
//! ## Test Categories
//! 1. **Replica sets**: size, ordering and cycle closure
//! 2. **Encoding**: hex round trips and field preservation
//! 3. **Ranges**: membership and overlap agreement

use proptest::prelude::*;
use uks_core::{ArcKeyBuilder, ClassOfService, Key, KeyRange, U160};

// ─────────────────────────────────────────────────────────────────────────────
// Strategies
// ─────────────────────────────────────────────────────────────────────────────

fn any_value() -> impl Strategy<Value = U160> {
    prop::array::uniform20(any::<u8>()).prop_map(U160::from_be_bytes)
}

/// Replica set size per placement class
fn set_size(class: u8) -> u8 {
    match class {
        3 => 4,
        4 => 5,
        6 | 8 => 3,
        c => c + 1,
    }
}

/// Well-formed plain key with siblings: replica number below the set size
fn plain_key() -> impl Strategy<Value = Key> {
    (any_value(), prop::sample::select(vec![1u8, 2, 3, 4, 5, 6, 8]))
        .prop_flat_map(|(entropy, class)| (Just(entropy), Just(class), 0..set_size(class)))
        .prop_map(|(entropy, class, replica)| {
            let metadata = U160::from_u64(((class as u64) << 4) | replica as u64);
            Key::from_value(entropy >> 8 << 8 | metadata)
        })
}

/// Well-formed RAIN key
fn rain_key() -> impl Strategy<Value = Key> {
    (1u32..=20, 1u32..=10)
        .prop_flat_map(|(k, m)| {
            (
                any::<u64>(),
                Just(k),
                Just(m),
                (k + m)..=255,
                0..(k + m),
            )
        })
        .prop_map(|(hash, k, m, schema, replica)| {
            ArcKeyBuilder::new(U160::from_u64(hash))
                .with_fragments(k, m)
                .with_schema(schema)
                .with_replica(replica)
                .build()
                .unwrap()
        })
}

fn any_key() -> impl Strategy<Value = Key> {
    prop_oneof![plain_key(), rain_key()]
}

// ─────────────────────────────────────────────────────────────────────────────
// Property Tests: Replica Sets
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Plain classes 0..=5 with replica 0 have class + 1 members.
    #[test]
    fn prop_plain_set_size(entropy in any_value(), class in 0u8..=5) {
        let k = Key::from_value(entropy >> 8 << 8 | U160::from_u64((class as u64) << 4));
        let all = k.replicas(true, None).unwrap();
        prop_assert_eq!(all.len(), class as usize + 1);
        for (i, replica) in all.iter().enumerate() {
            prop_assert_eq!(replica.replica_number() as usize, i);
        }
    }

    /// Stepping forward then back lands on the starting key.
    #[test]
    fn prop_next_then_prev(k in any_key()) {
        let next = k.next_replica().unwrap().unwrap();
        prop_assert_eq!(next.prev_replica().unwrap(), Some(k));
    }

    /// A full walk returns to the starting key.
    #[test]
    fn prop_walk_is_a_cycle(k in any_key()) {
        let count = k.replica_count(false).unwrap();
        let mut current = k;
        for _ in 0..count {
            current = current.next_replica_with(false).unwrap().unwrap();
        }
        prop_assert_eq!(current, k);
    }

    /// Fragments keep the RAIN shape of the key they came from.
    #[test]
    fn prop_fragments_share_shape(k in rain_key()) {
        let all = k.replicas(true, None).unwrap();
        prop_assert_eq!(all.len() as u32, k.rain_params().unwrap().fragments());
        for fragment in &all {
            prop_assert!(fragment.is_rain());
            prop_assert_eq!(fragment.rain_params(), k.rain_params());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Property Tests: Encoding
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    /// Padded hex parses back to the same key.
    #[test]
    fn prop_hex_roundtrip(value in any_value()) {
        let k = Key::from_value(value);
        let hex = k.to_hex_padded();
        prop_assert_eq!(hex.len(), 40);
        prop_assert_eq!(Key::new(hex).unwrap(), k);
        prop_assert_eq!(Key::new(k.to_hex()).unwrap(), k);
    }

    /// Classic transforms keep the top 152 bits and clear the low nibble.
    #[test]
    fn prop_classic_transform(value in any_value(), class in 0u8..=7) {
        let k = Key::from_value(value);
        let t = ClassOfService::Classic { class }.transform(&k).unwrap();
        prop_assert_eq!(t.value() >> 8, k.value() >> 8);
        prop_assert_eq!(t.raw_class(), class);
        prop_assert_eq!(t.value().field(0, 4), 0);
        if class != 7 {
            prop_assert_eq!(t.replica_number(), 0);
        }
    }

    /// A classic class-7 key reads its replica high nibble from the kept bits 8-11.
    #[test]
    fn prop_classic_transform_to_rain(value in any_value()) {
        let k = Key::from_value(value);
        let t = ClassOfService::Classic { class: 7 }.transform(&k).unwrap();
        prop_assert!(t.is_rain());
        prop_assert_eq!(t.replica_number() as u64, k.value().field(8, 4) << 4);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Property Tests: Ranges
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    /// Every key is between itself and itself.
    #[test]
    fn prop_degenerate_range(value in any_value()) {
        let k = Key::from_value(value);
        prop_assert!(k.is_between(&k, &k));
    }

    /// A non-wrapping range contains both of its endpoints.
    #[test]
    fn prop_linear_range_endpoints(a in any_value(), b in any_value()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let r = KeyRange::new(lo, hi).unwrap();
        prop_assert!(r.contains(&r.start));
        prop_assert!(r.contains(&r.end));
    }

    /// Overlap of linear intervals with distinct endpoints matches brute force.
    #[test]
    fn prop_linear_overlap(a in 0u64..64, b in 0u64..64, c in 0u64..64, d in 0u64..64) {
        let (a, b) = (a.min(b), a.max(b));
        let (c, d) = (c.min(d), c.max(d));
        prop_assume!(a != b && c != d && a != c && a != d && b != c && b != d);

        let found = KeyRange::new(a, b).unwrap().overlap(&KeyRange::new(c, d).unwrap());
        let lo = a.max(c);
        let hi = b.min(d);
        if lo <= hi {
            prop_assert_eq!(found, vec![KeyRange::new(lo, hi).unwrap()]);
        } else {
            prop_assert!(found.is_empty());
        }
    }
}
