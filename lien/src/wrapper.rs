//! The lien account wrapper.
//!
//! Installed into [`crate::WrappedAccountKeeper`] at construction, the
//! wrapper looks up the lien of every loaded account and, when there is one,
//! returns a [`LienAccount`] whose locked coins include it. Accounts without
//! a lien come back untouched.

use lien_store::{LienStore, ReadTxn};
use lien_types::{Coins, Timestamp};

use crate::account::{Account, AccountWrapper};
use crate::error::LienError;

/// Combine an account's own lock with its lien.
///
/// Per denomination the result is the larger of the two amounts; a
/// denomination present on one side only passes through unchanged. Coins
/// locked by a vesting schedule can back a lien at the same time, so the two
/// locks overlap rather than add up.
pub fn combine_locked(base: Option<&Coins>, liened: &Coins) -> Coins {
    match base {
        Some(base) => base.max(liened),
        None => liened.clone(),
    }
}

/// An account carrying a lien.
#[derive(Debug)]
pub struct LienAccount {
    inner: Box<dyn Account>,
    liened: Coins,
}

impl LienAccount {
    pub fn new(inner: Box<dyn Account>, liened: Coins) -> Self {
        Self { inner, liened }
    }

    /// The account as loaded, before wrapping.
    pub fn inner(&self) -> &dyn Account {
        self.inner.as_ref()
    }

    pub fn liened(&self) -> &Coins {
        &self.liened
    }
}

impl Account for LienAccount {
    fn address(&self) -> &lien_types::Address {
        self.inner.address()
    }

    fn base_locked_coins(&self, at: Timestamp) -> Option<Coins> {
        self.inner.base_locked_coins(at)
    }

    fn locked_coins(&self, at: Timestamp) -> Coins {
        combine_locked(self.inner.base_locked_coins(at).as_ref(), &self.liened)
    }
}

/// Wraps every loaded account that has a lien in a [`LienAccount`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LienAccountWrapper;

impl LienAccountWrapper {
    pub fn new() -> Self {
        Self
    }
}

impl AccountWrapper for LienAccountWrapper {
    fn wrap(
        &self,
        txn: &dyn ReadTxn,
        account: Box<dyn Account>,
    ) -> Result<Box<dyn Account>, LienError> {
        let lien = txn.get_lien(account.address())?;
        if lien.is_empty() {
            return Ok(account);
        }
        tracing::trace!(address = %account.address(), liened = %lien.coins, "wrapping liened account");
        Ok(Box::new(LienAccount::new(account, lien.coins)))
    }
}
