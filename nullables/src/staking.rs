//! Nullable staking module.

use lien_keeper::{Delegation, StakingView, UnbondingDelegation, UnbondingEntry, Validator};
use lien_store::{ReadTxn, StoreError};
use lien_types::{Address, Timestamp};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory delegations and validators, configured directly by tests.
pub struct NullStaking {
    bond_denom: String,
    validators: Mutex<BTreeMap<Address, Validator>>,
    delegations: Mutex<Vec<Delegation>>,
    unbonding: Mutex<Vec<UnbondingDelegation>>,
}

impl NullStaking {
    pub fn new(bond_denom: impl Into<String>) -> Self {
        Self {
            bond_denom: bond_denom.into(),
            validators: Mutex::new(BTreeMap::new()),
            delegations: Mutex::new(Vec::new()),
            unbonding: Mutex::new(Vec::new()),
        }
    }

    /// Register a validator with `tokens` backing `delegator_shares`.
    pub fn add_validator(&self, operator: Address, tokens: u128, delegator_shares: u128) {
        self.validators.lock().unwrap().insert(
            operator.clone(),
            Validator {
                operator,
                tokens,
                delegator_shares,
            },
        );
    }

    pub fn remove_validator(&self, operator: &Address) {
        self.validators.lock().unwrap().remove(operator);
    }

    /// Record a delegation of `shares`. Does not touch the validator's totals.
    pub fn delegate(&self, delegator: Address, validator: Address, shares: u128) {
        self.delegations.lock().unwrap().push(Delegation {
            delegator,
            validator,
            shares,
        });
    }

    /// Record `balance` tokens unbonding until `completion_time`.
    pub fn unbond(
        &self,
        delegator: Address,
        validator: Address,
        balance: u128,
        completion_time: Timestamp,
    ) {
        let mut unbonding = self.unbonding.lock().unwrap();
        let entry = UnbondingEntry {
            completion_time,
            balance,
        };
        match unbonding
            .iter_mut()
            .find(|u| u.delegator == delegator && u.validator == validator)
        {
            Some(existing) => existing.entries.push(entry),
            None => unbonding.push(UnbondingDelegation {
                delegator,
                validator,
                entries: vec![entry],
            }),
        }
    }
}

impl Default for NullStaking {
    fn default() -> Self {
        Self::new("ubld")
    }
}

impl StakingView for NullStaking {
    fn bond_denom(&self, _txn: &dyn ReadTxn) -> Result<String, StoreError> {
        Ok(self.bond_denom.clone())
    }

    fn delegations(
        &self,
        _txn: &dyn ReadTxn,
        delegator: &Address,
    ) -> Result<Vec<Delegation>, StoreError> {
        Ok(self
            .delegations
            .lock()
            .unwrap()
            .iter()
            .filter(|d| &d.delegator == delegator)
            .cloned()
            .collect())
    }

    fn unbonding_delegations(
        &self,
        _txn: &dyn ReadTxn,
        delegator: &Address,
    ) -> Result<Vec<UnbondingDelegation>, StoreError> {
        Ok(self
            .unbonding
            .lock()
            .unwrap()
            .iter()
            .filter(|u| &u.delegator == delegator)
            .cloned()
            .collect())
    }

    fn validator(
        &self,
        _txn: &dyn ReadTxn,
        operator: &Address,
    ) -> Result<Option<Validator>, StoreError> {
        Ok(self.validators.lock().unwrap().get(operator).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullKv;

    fn addr(b: u8) -> Address {
        Address::new(vec![b; 20]).unwrap()
    }

    #[test]
    fn unbonding_entries_group_by_pair() {
        let staking = NullStaking::default();
        staking.unbond(addr(1), addr(9), 5, Timestamp::new(10));
        staking.unbond(addr(1), addr(9), 6, Timestamp::new(20));
        staking.unbond(addr(2), addr(9), 7, Timestamp::new(20));

        let kv = NullKv::new();
        let ubds = staking.unbonding_delegations(&kv, &addr(1)).unwrap();
        assert_eq!(ubds.len(), 1);
        assert_eq!(ubds[0].entries.len(), 2);
    }

    #[test]
    fn removed_validator_is_gone() {
        let staking = NullStaking::default();
        staking.add_validator(addr(9), 100, 100);
        let kv = NullKv::new();
        assert!(staking.validator(&kv, &addr(9)).unwrap().is_some());
        staking.remove_validator(&addr(9));
        assert!(staking.validator(&kv, &addr(9)).unwrap().is_none());
        assert_eq!(staking.bond_denom(&kv).unwrap(), "ubld");
    }
}
