//! Nullable bank: balances kept in the caller's transaction.
//!
//! Transfers run the same spendable-balance check a real bank does: the
//! sender's account is loaded through the [`WrappedAccountKeeper`] and only
//! `balance - locked` may leave it.

use lien_keeper::{BankView, LienError, WrappedAccountKeeper};
use lien_store::{ReadTxn, StoreError, WriteTxn};
use lien_types::{Address, Coins, CoinsError, Timestamp};
use std::sync::Arc;
use thiserror::Error;

/// Key namespace for balances, disjoint from the lien namespace.
pub const BALANCE_PREFIX: u8 = 0x02;

#[derive(Debug, Error)]
pub enum BankError {
    #[error("insufficient funds: {spendable} spendable, {requested} requested")]
    InsufficientFunds { spendable: Coins, requested: Coins },

    #[error("coins error: {0}")]
    Coins(#[from] CoinsError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("account error: {0}")]
    Account(#[from] LienError),
}

pub struct NullBank {
    accounts: Arc<WrappedAccountKeeper>,
}

impl NullBank {
    pub fn new(accounts: Arc<WrappedAccountKeeper>) -> Self {
        Self { accounts }
    }

    /// Credit `coins` to `address` out of thin air.
    pub fn mint(
        &self,
        txn: &mut dyn WriteTxn,
        address: &Address,
        coins: &Coins,
    ) -> Result<(), BankError> {
        let balance = self.balance(txn.as_read_txn(), address)?.checked_add(coins)?;
        self.store_balance(txn, address, &balance)
    }

    /// Move `amount` from `from` to `to`, refusing to touch locked coins.
    pub fn send(
        &self,
        txn: &mut dyn WriteTxn,
        from: &Address,
        to: &Address,
        amount: &Coins,
        at: Timestamp,
    ) -> Result<(), BankError> {
        let balance = self.balance(txn.as_read_txn(), from)?;
        let spendable = self
            .accounts
            .spendable_coins(txn.as_read_txn(), from, &balance, at)?;
        if !spendable.is_all_gte(amount) {
            return Err(BankError::InsufficientFunds {
                spendable,
                requested: amount.clone(),
            });
        }
        self.store_balance(txn, from, &balance.saturating_sub(amount))?;
        let credited = self.balance(txn.as_read_txn(), to)?.checked_add(amount)?;
        self.store_balance(txn, to, &credited)
    }

    pub fn balance(&self, txn: &dyn ReadTxn, address: &Address) -> Result<Coins, BankError> {
        match txn.get(&balance_key(address))? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map_err(|e| BankError::Store(StoreError::Corruption(e.to_string()))),
            None => Ok(Coins::new()),
        }
    }

    fn store_balance(
        &self,
        txn: &mut dyn WriteTxn,
        address: &Address,
        balance: &Coins,
    ) -> Result<(), BankError> {
        let key = balance_key(address);
        if balance.is_zero() {
            txn.delete(&key)?;
        } else {
            let bytes = bincode::serialize(balance)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            txn.put(&key, &bytes)?;
        }
        Ok(())
    }
}

impl BankView for NullBank {
    fn all_balances(&self, txn: &dyn ReadTxn, address: &Address) -> Result<Coins, StoreError> {
        self.balance(txn, address).map_err(|e| match e {
            BankError::Store(e) => e,
            other => StoreError::Backend(other.to_string()),
        })
    }
}

fn balance_key(address: &Address) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + address.as_bytes().len());
    key.push(BALANCE_PREFIX);
    key.extend_from_slice(address.as_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NullAccounts, NullKv};
    use lien_keeper::IdentityWrapper;

    fn addr(b: u8) -> Address {
        Address::new(vec![b; 20]).unwrap()
    }

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    fn bank() -> NullBank {
        NullBank::new(Arc::new(WrappedAccountKeeper::new(
            Arc::new(NullAccounts::new()),
            Arc::new(IdentityWrapper),
        )))
    }

    #[test]
    fn mint_and_send() {
        let bank = bank();
        let mut kv = NullKv::new();
        bank.mint(&mut kv, &addr(1), &coins("10ubld,3urun")).unwrap();
        bank.send(&mut kv, &addr(1), &addr(2), &coins("4ubld"), Timestamp::EPOCH)
            .unwrap();
        assert_eq!(bank.all_balances(&kv, &addr(1)).unwrap(), coins("6ubld,3urun"));
        assert_eq!(bank.all_balances(&kv, &addr(2)).unwrap(), coins("4ubld"));
    }

    #[test]
    fn overdraft_is_refused() {
        let bank = bank();
        let mut kv = NullKv::new();
        bank.mint(&mut kv, &addr(1), &coins("10ubld")).unwrap();
        let err = bank
            .send(&mut kv, &addr(1), &addr(2), &coins("11ubld"), Timestamp::EPOCH)
            .unwrap_err();
        assert!(matches!(err, BankError::InsufficientFunds { .. }));
        assert_eq!(bank.all_balances(&kv, &addr(1)).unwrap(), coins("10ubld"));
    }

    #[test]
    fn emptied_balance_is_deleted() {
        let bank = bank();
        let mut kv = NullKv::new();
        bank.mint(&mut kv, &addr(1), &coins("10ubld")).unwrap();
        bank.send(&mut kv, &addr(1), &addr(2), &coins("10ubld"), Timestamp::EPOCH)
            .unwrap();
        assert_eq!(kv.len(), 1);
    }
}
