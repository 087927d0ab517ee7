//! The account-loading path.
//!
//! Every account load goes through [`WrappedAccountKeeper`], which passes
//! the raw account from the [`AccountSource`] through one [`AccountWrapper`]
//! fixed at construction. The bank asks the loaded account for its locked
//! coins and only lets the remainder move, so whatever the wrapper reports
//! as locked is enforced on every transfer.

use std::fmt;
use std::sync::Arc;

use lien_store::{ReadTxn, StoreError};
use lien_types::{Address, Coins, Timestamp};

use crate::error::LienError;

/// An account as seen by the bank.
pub trait Account: fmt::Debug + Send + Sync {
    fn address(&self) -> &Address;

    /// Coins locked by the account's own policy (e.g. a vesting schedule),
    /// or `None` for accounts without one.
    fn base_locked_coins(&self, _at: Timestamp) -> Option<Coins> {
        None
    }

    /// Coins that may not leave the account at `at`.
    fn locked_coins(&self, at: Timestamp) -> Coins {
        self.base_locked_coins(at).unwrap_or_default()
    }
}

/// A plain account with no lock policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseAccount {
    pub address: Address,
}

impl BaseAccount {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl Account for BaseAccount {
    fn address(&self) -> &Address {
        &self.address
    }
}

/// Where raw accounts come from (the auth module).
pub trait AccountSource: Send + Sync {
    fn load_account(
        &self,
        txn: &dyn ReadTxn,
        address: &Address,
    ) -> Result<Option<Box<dyn Account>>, StoreError>;
}

/// Decorates every loaded account.
pub trait AccountWrapper: Send + Sync {
    fn wrap(&self, txn: &dyn ReadTxn, account: Box<dyn Account>)
        -> Result<Box<dyn Account>, LienError>;
}

/// A wrapper that returns accounts unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityWrapper;

impl AccountWrapper for IdentityWrapper {
    fn wrap(
        &self,
        _txn: &dyn ReadTxn,
        account: Box<dyn Account>,
    ) -> Result<Box<dyn Account>, LienError> {
        Ok(account)
    }
}

/// The account keeper every other module loads accounts through.
pub struct WrappedAccountKeeper {
    source: Arc<dyn AccountSource>,
    wrapper: Arc<dyn AccountWrapper>,
}

impl WrappedAccountKeeper {
    pub fn new(source: Arc<dyn AccountSource>, wrapper: Arc<dyn AccountWrapper>) -> Self {
        Self { source, wrapper }
    }

    /// Load and wrap the account at `address`, `None` if it does not exist.
    pub fn get_account(
        &self,
        txn: &dyn ReadTxn,
        address: &Address,
    ) -> Result<Option<Box<dyn Account>>, LienError> {
        match self.source.load_account(txn, address)? {
            Some(account) => Ok(Some(self.wrapper.wrap(txn, account)?)),
            None => Ok(None),
        }
    }

    /// Load and wrap the account at `address`. An address with no stored
    /// account is treated as a [`BaseAccount`], so it is still wrapped.
    pub fn get_or_base_account(
        &self,
        txn: &dyn ReadTxn,
        address: &Address,
    ) -> Result<Box<dyn Account>, LienError> {
        let account = self
            .source
            .load_account(txn, address)?
            .unwrap_or_else(|| Box::new(BaseAccount::new(address.clone())) as Box<dyn Account>);
        self.wrapper.wrap(txn, account)
    }

    /// Locked coins of `address` at `at`.
    pub fn locked_coins(
        &self,
        txn: &dyn ReadTxn,
        address: &Address,
        at: Timestamp,
    ) -> Result<Coins, LienError> {
        Ok(self.get_or_base_account(txn, address)?.locked_coins(at))
    }

    /// The part of `balance` that may be transferred at `at`.
    pub fn spendable_coins(
        &self,
        txn: &dyn ReadTxn,
        address: &Address,
        balance: &Coins,
        at: Timestamp,
    ) -> Result<Coins, LienError> {
        let locked = self.locked_coins(txn, address, at)?;
        Ok(balance.saturating_sub(&locked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lien_nullables::NullKv;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct OneAccount(Address);

    impl AccountSource for OneAccount {
        fn load_account(
            &self,
            _: &dyn ReadTxn,
            address: &Address,
        ) -> Result<Option<Box<dyn Account>>, StoreError> {
            Ok((address == &self.0).then(|| Box::new(BaseAccount::new(address.clone())) as Box<dyn Account>))
        }
    }

    #[derive(Default)]
    struct CountingWrapper(AtomicUsize);

    impl AccountWrapper for CountingWrapper {
        fn wrap(
            &self,
            _: &dyn ReadTxn,
            account: Box<dyn Account>,
        ) -> Result<Box<dyn Account>, LienError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(account)
        }
    }

    fn addr(b: u8) -> Address {
        Address::new(vec![b; 20]).unwrap()
    }

    #[test]
    fn every_load_passes_through_the_wrapper() {
        let wrapper = Arc::new(CountingWrapper::default());
        let keeper = WrappedAccountKeeper::new(Arc::new(OneAccount(addr(1))), wrapper.clone());
        let kv = NullKv::new();

        assert!(keeper.get_account(&kv, &addr(1)).unwrap().is_some());
        assert!(keeper.get_account(&kv, &addr(2)).unwrap().is_none());
        keeper.locked_coins(&kv, &addr(2), Timestamp::EPOCH).unwrap();
        keeper.locked_coins(&kv, &addr(1), Timestamp::EPOCH).unwrap();

        // The missing account was not wrapped by get_account, but was wrapped
        // as a base account by locked_coins.
        assert_eq!(wrapper.0.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn plain_accounts_lock_nothing() {
        let keeper = WrappedAccountKeeper::new(Arc::new(OneAccount(addr(1))), Arc::new(IdentityWrapper));
        let kv = NullKv::new();
        let balance: Coins = "10ubld".parse().unwrap();
        assert!(keeper.locked_coins(&kv, &addr(1), Timestamp::EPOCH).unwrap().is_zero());
        assert_eq!(
            keeper.spendable_coins(&kv, &addr(1), &balance, Timestamp::EPOCH).unwrap(),
            balance
        );
    }
}
