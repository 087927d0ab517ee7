use proptest::prelude::*;

use lien_types::{Address, Coin, Coins, Timestamp};

const DENOMS: &[&str] = &["ubld", "urun", "moola", "uist"];

fn arb_coins() -> impl Strategy<Value = Coins> {
    prop::collection::vec((0usize..DENOMS.len(), 0u128..1_000_000), 0..6).prop_map(|entries| {
        Coins::from_coins(entries.into_iter().map(|(i, a)| Coin::new(DENOMS[i], a))).unwrap()
    })
}

proptest! {
    /// Normalised coins never hold a zero entry.
    #[test]
    fn coins_never_store_zero(c in arb_coins()) {
        prop_assert!(c.iter().all(|(_, a)| a > 0));
    }

    /// Text form parses back to the same set.
    #[test]
    fn coins_text_roundtrip(c in arb_coins()) {
        let parsed: Coins = c.to_string().parse().unwrap();
        prop_assert_eq!(parsed, c);
    }

    /// bincode encoding goes through the strict decoder and still round trips.
    #[test]
    fn coins_bincode_roundtrip(c in arb_coins()) {
        let encoded = bincode::serialize(&c).unwrap();
        let decoded: Coins = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, c);
    }

    /// max(a, b) covers both inputs and is one of them per denomination.
    #[test]
    fn coins_max_dominates(a in arb_coins(), b in arb_coins()) {
        let m = a.max(&b);
        prop_assert!(m.is_all_gte(&a));
        prop_assert!(m.is_all_gte(&b));
        for (denom, amount) in m.iter() {
            prop_assert!(amount == a.amount_of(denom) || amount == b.amount_of(denom));
        }
    }

    /// (a + b) - b == a.
    #[test]
    fn coins_add_then_sub(a in arb_coins(), b in arb_coins()) {
        let sum = a.checked_add(&b).unwrap();
        prop_assert_eq!(sum.saturating_sub(&b), a);
    }

    /// min(a, b) is covered by both inputs.
    #[test]
    fn coins_min_is_covered(a in arb_coins(), b in arb_coins()) {
        let m = a.min(&b);
        prop_assert!(a.is_all_gte(&m));
        prop_assert!(b.is_all_gte(&m));
    }

    /// Address ordering agrees with raw byte ordering.
    #[test]
    fn address_ordering(
        a in prop::collection::vec(any::<u8>(), 1..40),
        b in prop::collection::vec(any::<u8>(), 1..40),
    ) {
        let aa = Address::new(a.clone()).unwrap();
        let ab = Address::new(b.clone()).unwrap();
        prop_assert_eq!(aa.cmp(&ab), a.cmp(&b));
        prop_assert_eq!(aa.to_string().parse::<Address>().unwrap(), aa);
    }

    /// Timestamp elapsed_since saturates to 0 when now < self.
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        prop_assert_eq!(t.elapsed_since(Timestamp::new(base + offset)), offset);
        prop_assert_eq!(Timestamp::new(base + offset + 1).elapsed_since(t), 0);
    }
}
