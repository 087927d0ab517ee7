//! Nullable account source and a vesting account fixture.

use lien_keeper::{Account, AccountSource};
use lien_store::{ReadTxn, StoreError};
use lien_types::{Address, Coins, Timestamp};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// An in-memory auth module.
///
/// Accounts registered here are shared: every load hands out a view of the
/// same instance.
#[derive(Default)]
pub struct NullAccounts {
    accounts: Mutex<HashMap<Address, Arc<dyn Account>>>,
}

impl NullAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, account: impl Account + 'static) {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.address().clone(), Arc::new(account));
    }

    pub fn remove(&self, address: &Address) {
        self.accounts.lock().unwrap().remove(address);
    }
}

impl AccountSource for NullAccounts {
    fn load_account(
        &self,
        _txn: &dyn ReadTxn,
        address: &Address,
    ) -> Result<Option<Box<dyn Account>>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .map(|a| Box::new(SharedAccount(a)) as Box<dyn Account>))
    }
}

#[derive(Debug)]
struct SharedAccount(Arc<dyn Account>);

impl Account for SharedAccount {
    fn address(&self) -> &Address {
        self.0.address()
    }

    fn base_locked_coins(&self, at: Timestamp) -> Option<Coins> {
        self.0.base_locked_coins(at)
    }

    fn locked_coins(&self, at: Timestamp) -> Coins {
        self.0.locked_coins(at)
    }
}

/// Unlocks `original_vesting` linearly between `start` and `end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContinuousVestingAccount {
    pub address: Address,
    pub original_vesting: Coins,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl ContinuousVestingAccount {
    pub fn new(address: Address, original_vesting: Coins, start: Timestamp, end: Timestamp) -> Self {
        Self {
            address,
            original_vesting,
            start,
            end,
        }
    }

    /// Coins still vesting at `at`.
    pub fn vesting_coins(&self, at: Timestamp) -> Coins {
        if at <= self.start {
            return self.original_vesting.clone();
        }
        if at >= self.end {
            return Coins::new();
        }
        let duration = u128::from(self.end.as_secs() - self.start.as_secs());
        let remaining = u128::from(self.end.as_secs() - at.as_secs());
        // Split to keep the product below u128::MAX.
        self.original_vesting.map_amounts(|_, amount| {
            (amount / duration) * remaining + (amount % duration) * remaining / duration
        })
    }
}

impl Account for ContinuousVestingAccount {
    fn address(&self) -> &Address {
        &self.address
    }

    fn base_locked_coins(&self, at: Timestamp) -> Option<Coins> {
        Some(self.vesting_coins(at))
    }
}
