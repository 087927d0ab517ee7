//! Multi-denomination coin amounts.
//!
//! Amounts are unsigned integers (`u128`) in the smallest unit of their
//! denomination. A [`Coins`] value holds at most one entry per denomination
//! and never stores a zero amount, so "no coins" has exactly one
//! representation: the empty set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoinsError;

/// Check a denomination against `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn validate_denom(denom: &str) -> Result<(), CoinsError> {
    let bytes = denom.as_bytes();
    let valid = (3..=128).contains(&bytes.len())
        && bytes[0].is_ascii_alphabetic()
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-'));
    if valid {
        Ok(())
    } else {
        Err(CoinsError::InvalidDenom(denom.to_string()))
    }
}

/// A single denomination and amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinsError;

    /// Parse `<amount><denom>`, e.g. `123ubld`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoinsError::InvalidCoin(s.to_string()))?;
        if split == 0 {
            return Err(CoinsError::InvalidCoin(s.to_string()));
        }
        let (amount, denom) = s.split_at(split);
        let amount = amount
            .parse::<u128>()
            .map_err(|_| CoinsError::InvalidCoin(s.to_string()))?;
        validate_denom(denom)?;
        Ok(Coin::new(denom, amount))
    }
}

/// A normalised multiset of coins, sorted by denomination.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(BTreeMap<String, u128>);

impl Coins {
    /// The empty coin set.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A set holding one denomination. A zero amount yields the empty set.
    pub fn single(denom: impl Into<String>, amount: u128) -> Result<Self, CoinsError> {
        let mut coins = Self::new();
        coins.set_amount(denom, amount)?;
        Ok(coins)
    }

    /// Build a set from arbitrary coins, merging duplicates and dropping zeros.
    pub fn from_coins<I>(coins: I) -> Result<Self, CoinsError>
    where
        I: IntoIterator<Item = Coin>,
    {
        let mut out = Self::new();
        for coin in coins {
            validate_denom(&coin.denom)?;
            let current = out.amount_of(&coin.denom);
            let sum = current
                .checked_add(coin.amount)
                .ok_or_else(|| CoinsError::Overflow {
                    denom: coin.denom.clone(),
                })?;
            out.set_amount(coin.denom, sum)?;
        }
        Ok(out)
    }

    /// Amount held for `denom`, zero if absent.
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0.get(denom).copied().unwrap_or(0)
    }

    /// Replace the amount for `denom`; zero removes the entry.
    pub fn set_amount(&mut self, denom: impl Into<String>, amount: u128) -> Result<(), CoinsError> {
        let denom = denom.into();
        validate_denom(&denom)?;
        if amount == 0 {
            self.0.remove(&denom);
        } else {
            self.0.insert(denom, amount);
        }
        Ok(())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(denom, amount)` pairs in denomination order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u128)> + '_ {
        self.0.iter().map(|(d, a)| (d.as_str(), *a))
    }

    pub fn denoms(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    /// Per-denomination sum.
    pub fn checked_add(&self, other: &Coins) -> Result<Coins, CoinsError> {
        let mut out = self.clone();
        for (denom, amount) in other.iter() {
            let sum = out
                .amount_of(denom)
                .checked_add(amount)
                .ok_or_else(|| CoinsError::Overflow {
                    denom: denom.to_string(),
                })?;
            out.0.insert(denom.to_string(), sum);
        }
        Ok(out)
    }

    /// Per-denomination difference, clamped at zero.
    pub fn saturating_sub(&self, other: &Coins) -> Coins {
        let inner = self
            .iter()
            .filter_map(|(denom, amount)| {
                let left = amount.saturating_sub(other.amount_of(denom));
                (left > 0).then(|| (denom.to_string(), left))
            })
            .collect();
        Coins(inner)
    }

    /// Per-denomination maximum. Denominations present in one side pass through.
    pub fn max(&self, other: &Coins) -> Coins {
        let mut out = self.clone();
        for (denom, amount) in other.iter() {
            if amount > out.amount_of(denom) {
                out.0.insert(denom.to_string(), amount);
            }
        }
        out
    }

    /// Per-denomination minimum. Denominations missing from either side drop out.
    pub fn min(&self, other: &Coins) -> Coins {
        let inner = self
            .iter()
            .filter_map(|(denom, amount)| {
                let m = amount.min(other.amount_of(denom));
                (m > 0).then(|| (denom.to_string(), m))
            })
            .collect();
        Coins(inner)
    }

    /// Apply `f` to every amount; denominations mapped to zero drop out.
    pub fn map_amounts<F>(&self, mut f: F) -> Coins
    where
        F: FnMut(&str, u128) -> u128,
    {
        let inner = self
            .iter()
            .filter_map(|(denom, amount)| {
                let m = f(denom, amount);
                (m > 0).then(|| (denom.to_string(), m))
            })
            .collect();
        Coins(inner)
    }

    /// Whether every denomination of `other` is covered by `self`.
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other
            .iter()
            .all(|(denom, amount)| self.amount_of(denom) >= amount)
    }

    pub fn to_vec(&self) -> Vec<Coin> {
        self.iter().map(|(d, a)| Coin::new(d, a)).collect()
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = CoinsError;

    /// Strict conversion used when decoding: the input must already be
    /// normalised (no duplicates, no zeros, valid denominations).
    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        let mut inner = BTreeMap::new();
        for coin in coins {
            validate_denom(&coin.denom)?;
            if coin.amount == 0 {
                return Err(CoinsError::ZeroAmount(coin.denom));
            }
            if inner.insert(coin.denom.clone(), coin.amount).is_some() {
                return Err(CoinsError::DuplicateDenom(coin.denom));
            }
        }
        Ok(Self(inner))
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.to_vec()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (denom, amount) in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{amount}{denom}")?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coins({self})")
    }
}

impl FromStr for Coins {
    type Err = CoinsError;

    /// Parse a comma-separated list such as `123ubld,22moola`. The empty
    /// string is the empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Coins::new());
        }
        let coins = s
            .split(',')
            .map(Coin::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Coins::from_coins(coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    #[test]
    fn zero_amounts_are_never_stored() {
        assert!(Coins::single("ubld", 0).unwrap().is_zero());
        let mut c = coins("10ubld");
        c.set_amount("ubld", 0).unwrap();
        assert_eq!(c, Coins::new());
    }

    #[test]
    fn from_coins_merges_duplicates() {
        let c = Coins::from_coins(vec![
            Coin::new("ubld", 3),
            Coin::new("urun", 0),
            Coin::new("ubld", 4),
        ])
        .unwrap();
        assert_eq!(c, coins("7ubld"));
    }

    #[test]
    fn display_and_parse() {
        let c = coins("22moola, 5000urun");
        assert_eq!(c.to_string(), "22moola,5000urun");
        assert_eq!(coins(""), Coins::new());
        assert!("ubld".parse::<Coins>().is_err());
        assert!("12".parse::<Coins>().is_err());
        assert!("12x".parse::<Coins>().is_err());
    }

    #[test]
    fn denom_validation() {
        assert!(validate_denom("ubld").is_ok());
        assert!(validate_denom("ibc/27394FB092D2ECCD").is_ok());
        assert!(validate_denom("u1").is_err());
        assert!(validate_denom("1abc").is_err());
        assert!(validate_denom("ub ld").is_err());
    }

    #[test]
    fn max_and_min_per_denom() {
        let a = coins("50ubld,7moola");
        let b = coins("30ubld,9urun");
        assert_eq!(a.max(&b), coins("50ubld,7moola,9urun"));
        assert_eq!(a.min(&b), coins("30ubld"));
    }

    #[test]
    fn saturating_sub_clamps() {
        let a = coins("50ubld,7moola");
        let b = coins("80ubld,2moola,1urun");
        assert_eq!(a.saturating_sub(&b), coins("5moola"));
    }

    #[test]
    fn checked_add_detects_overflow() {
        let a = Coins::single("ubld", u128::MAX).unwrap();
        let b = coins("1ubld");
        assert_eq!(
            a.checked_add(&b),
            Err(CoinsError::Overflow {
                denom: "ubld".into()
            })
        );
    }

    #[test]
    fn is_all_gte_ignores_extra_denoms() {
        let a = coins("50ubld,7moola");
        assert!(a.is_all_gte(&coins("50ubld")));
        assert!(!a.is_all_gte(&coins("51ubld")));
        assert!(!a.is_all_gte(&coins("1urun")));
        assert!(a.is_all_gte(&Coins::new()));
    }

    #[test]
    fn strict_decode_rejects_unnormalised_input() {
        assert_eq!(
            Coins::try_from(vec![Coin::new("ubld", 0)]),
            Err(CoinsError::ZeroAmount("ubld".into()))
        );
        assert_eq!(
            Coins::try_from(vec![Coin::new("ubld", 1), Coin::new("ubld", 2)]),
            Err(CoinsError::DuplicateDenom("ubld".into()))
        );
    }

    #[test]
    fn map_amounts_drops_zeros() {
        let halved = coins("10ubld,1urun").map_amounts(|_, a| a / 2);
        assert_eq!(halved, coins("5ubld"));
    }
}
