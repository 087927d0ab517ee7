use proptest::prelude::*;

use lien_keeper::{combine_locked, Lien};
use lien_nullables::NullLedger;
use lien_types::{Address, Coin, Coins};

const DENOMS: &[&str] = &["ubld", "urun", "moola"];

fn arb_coins() -> impl Strategy<Value = Coins> {
    prop::collection::vec((0usize..DENOMS.len(), 0u128..1_000_000), 0..5).prop_map(|entries| {
        Coins::from_coins(entries.into_iter().map(|(i, a)| Coin::new(DENOMS[i], a))).unwrap()
    })
}

fn arb_address() -> impl Strategy<Value = Address> {
    prop::collection::vec(any::<u8>(), 1..8).prop_map(|b| Address::new(b).unwrap())
}

proptest! {
    /// The effective lock covers both the account's own lock and the lien.
    #[test]
    fn combined_lock_covers_both(base in arb_coins(), liened in arb_coins()) {
        let combined = combine_locked(Some(&base), &liened);
        prop_assert!(combined.is_all_gte(&base));
        prop_assert!(combined.is_all_gte(&liened));
        prop_assert_eq!(combine_locked(None, &liened), liened);
    }

    /// Reading back a lien yields exactly what was written, and writing it
    /// again changes nothing.
    #[test]
    fn set_lien_round_trips_and_is_idempotent(address in arb_address(), coins in arb_coins()) {
        let mut ledger = NullLedger::new();
        let lien = Lien::new(coins);
        ledger.keeper.set_lien(&mut ledger.kv, &address, &lien).unwrap();
        let once = ledger.kv.clone();
        ledger.keeper.set_lien(&mut ledger.kv, &address, &lien).unwrap();
        prop_assert_eq!(&ledger.kv, &once);
        prop_assert_eq!(ledger.keeper.get_lien(&ledger.kv, &address).unwrap(), lien.clone());
        prop_assert_eq!(ledger.kv.is_empty(), lien.is_empty());
    }

    /// Iteration visits the last non-empty lien of every address, in order.
    #[test]
    fn iteration_matches_last_writes(
        writes in prop::collection::vec((0u8..6, arb_coins()), 0..20)
    ) {
        let mut ledger = NullLedger::new();
        let mut expected = std::collections::BTreeMap::new();
        for (seed, coins) in writes {
            let address = Address::new(vec![seed]).unwrap();
            ledger.keeper.set_lien(&mut ledger.kv, &address, &Lien::new(coins.clone())).unwrap();
            if coins.is_zero() {
                expected.remove(&address);
            } else {
                expected.insert(address, coins);
            }
        }

        let mut seen = Vec::new();
        ledger.keeper.iterate_liens(&ledger.kv, |address, lien| {
            seen.push((address.clone(), lien.coins.clone()));
            false
        }).unwrap();
        prop_assert_eq!(seen, expected.into_iter().collect::<Vec<_>>());
    }
}
