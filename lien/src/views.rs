//! Read-only ports onto the bank and staking modules.
//!
//! The keeper never sees the concrete bank or staking keepers; it is built
//! with these narrow views at wiring time so tests can substitute fakes.
//! Every query runs inside the caller's transaction.

use lien_store::{ReadTxn, StoreError};
use primitive_types::U256;
use lien_types::{Address, Coins, Timestamp};

/// Balances held in the fungible-token ledger.
pub trait BankView: Send + Sync {
    fn all_balances(&self, txn: &dyn ReadTxn, address: &Address) -> Result<Coins, StoreError>;
}

/// Delegation bookkeeping of the staking module.
pub trait StakingView: Send + Sync {
    /// Denomination that delegations are made in.
    fn bond_denom(&self, txn: &dyn ReadTxn) -> Result<String, StoreError>;

    fn delegations(
        &self,
        txn: &dyn ReadTxn,
        delegator: &Address,
    ) -> Result<Vec<Delegation>, StoreError>;

    fn unbonding_delegations(
        &self,
        txn: &dyn ReadTxn,
        delegator: &Address,
    ) -> Result<Vec<UnbondingDelegation>, StoreError>;

    /// `None` when the validator is gone (e.g. removed from the set).
    fn validator(&self, txn: &dyn ReadTxn, operator: &Address)
        -> Result<Option<Validator>, StoreError>;
}

/// An active delegation, held as validator shares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delegation {
    pub delegator: Address,
    pub validator: Address,
    pub shares: u128,
}

/// A delegation in its unbonding cooldown. Entries are already in tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnbondingDelegation {
    pub delegator: Address,
    pub validator: Address,
    pub entries: Vec<UnbondingEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnbondingEntry {
    pub completion_time: Timestamp,
    pub balance: u128,
}

/// The share/token exchange rate of one validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validator {
    pub operator: Address,
    pub tokens: u128,
    pub delegator_shares: u128,
}

impl Validator {
    /// Convert delegator shares to tokens at the current rate, truncating.
    ///
    /// The product is taken in 256 bits, so only a result that does not fit
    /// `u128` is reported as `None`. A validator with no shares outstanding
    /// converts everything to zero.
    pub fn tokens_from_shares(&self, shares: u128) -> Option<u128> {
        if self.delegator_shares == 0 {
            return Some(0);
        }
        let product = U256::from(shares) * U256::from(self.tokens);
        let tokens = product / U256::from(self.delegator_shares);
        if tokens > U256::from(u128::MAX) {
            return None;
        }
        Some(tokens.low_u128())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(tokens: u128, delegator_shares: u128) -> Validator {
        Validator {
            operator: Address::new(vec![9u8; 20]).unwrap(),
            tokens,
            delegator_shares,
        }
    }

    #[test]
    fn one_to_one_rate() {
        assert_eq!(validator(1000, 1000).tokens_from_shares(250), Some(250));
    }

    #[test]
    fn slashed_validator_converts_at_discount() {
        // 10% slash: 900 tokens back 1000 shares.
        assert_eq!(validator(900, 1000).tokens_from_shares(500), Some(450));
        // Truncates.
        assert_eq!(validator(2, 3).tokens_from_shares(1), Some(0));
        assert_eq!(validator(2, 3).tokens_from_shares(4), Some(2));
    }

    #[test]
    fn no_shares_outstanding_is_zero() {
        assert_eq!(validator(100, 0).tokens_from_shares(5), Some(0));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(validator(u128::MAX, 1).tokens_from_shares(2), None);
    }

    #[test]
    fn large_balances_convert_exactly() {
        // (2^70)^2 does not fit u128 but the quotient does.
        let big = 1u128 << 70;
        assert_eq!(validator(big, big + 1).tokens_from_shares(big), Some(big - 1));
        assert_eq!(validator(big, big).tokens_from_shares(big), Some(big));
        assert_eq!(
            validator(u128::MAX, u128::MAX).tokens_from_shares(u128::MAX),
            Some(u128::MAX)
        );
        assert_eq!(validator(u128::MAX, 2).tokens_from_shares(2), Some(u128::MAX));
        assert_eq!(validator(u128::MAX, 2).tokens_from_shares(4), None);
    }
}
