//! The lien keeper.

use std::sync::Arc;

use lien_store::{LienStore, LienStoreMut, ReadTxn, WriteTxn};
use lien_types::{Address, Coins, CoinsError};

use crate::controller::{Controller, ControllerRequest};
use crate::error::LienError;
use crate::state::AccountState;
use crate::views::{BankView, StakingView};
use crate::Lien;

/// Reads and writes liens and aggregates account state.
///
/// The keeper is the sole mutation entry point for lien records: every write
/// ends in [`LienKeeper::write_lien`]. It performs no authorisation there;
/// callers such as the port handler or genesis decide whether a change is
/// allowed. It holds no mutable
/// state of its own: every call works inside the transaction it is handed.
pub struct LienKeeper {
    bank: Arc<dyn BankView>,
    staking: Arc<dyn StakingView>,
    controller: Arc<dyn Controller>,
}

impl LienKeeper {
    pub fn new(
        bank: Arc<dyn BankView>,
        staking: Arc<dyn StakingView>,
        controller: Arc<dyn Controller>,
    ) -> Self {
        Self {
            bank,
            staking,
            controller,
        }
    }

    /// The lien on `address`, empty if there is none.
    pub fn get_lien(&self, txn: &dyn ReadTxn, address: &Address) -> Result<Lien, LienError> {
        Self::read_lien(txn, address)
    }

    /// Replace the lien on `address`. An empty lien deletes the record.
    pub fn set_lien(
        &self,
        txn: &mut dyn WriteTxn,
        address: &Address,
        lien: &Lien,
    ) -> Result<(), LienError> {
        Self::write_lien(txn, address, lien)
    }

    /// Visit every non-empty lien in ascending address order. The visitor
    /// returns `true` to stop early.
    pub fn iterate_liens<F>(&self, txn: &dyn ReadTxn, visit: F) -> Result<(), LienError>
    where
        F: FnMut(&Address, &Lien) -> bool,
    {
        Self::scan_liens(txn, visit)
    }

    // ── Record access without collaborators ─────────────────────────────
    //
    // Genesis and operator tooling touch only the lien records, so they
    // go through these instead of building bank and staking views.

    pub fn read_lien(txn: &dyn ReadTxn, address: &Address) -> Result<Lien, LienError> {
        Ok(txn.get_lien(address)?)
    }

    /// The one place lien records are written.
    pub fn write_lien(
        txn: &mut dyn WriteTxn,
        address: &Address,
        lien: &Lien,
    ) -> Result<(), LienError> {
        txn.set_lien(address, lien)?;
        if lien.is_empty() {
            tracing::info!(%address, "lien released");
        } else {
            tracing::info!(%address, coins = %lien.coins, "lien set");
        }
        Ok(())
    }

    pub fn scan_liens<F>(txn: &dyn ReadTxn, mut visit: F) -> Result<(), LienError>
    where
        F: FnMut(&Address, &Lien) -> bool,
    {
        Ok(txn.iter_liens(&mut visit)?)
    }

    /// Aggregate the bank, staking and lien state of `address`.
    pub fn get_account_state(
        &self,
        txn: &dyn ReadTxn,
        address: &Address,
    ) -> Result<AccountState, LienError> {
        let state = AccountState {
            total: self.bank.all_balances(txn, address)?,
            bonded: self.bonded_coins(txn, address)?,
            unbonding: self.unbonding_coins(txn, address)?,
            liened: self.get_lien(txn, address)?.coins,
        };
        tracing::debug!(
            %address,
            total = %state.total,
            bonded = %state.bonded,
            unbonding = %state.unbonding,
            liened = %state.liened,
            "computed account state"
        );
        Ok(state)
    }

    /// Denomination delegations are made in.
    pub fn bond_denom(&self, txn: &dyn ReadTxn) -> Result<String, LienError> {
        Ok(self.staking.bond_denom(txn)?)
    }

    /// Value of the active delegations of `delegator`, in the bond denom.
    ///
    /// Delegations to validators that no longer exist are skipped.
    pub fn bonded_coins(&self, txn: &dyn ReadTxn, delegator: &Address) -> Result<Coins, LienError> {
        let denom = self.staking.bond_denom(txn)?;
        let mut bonded: u128 = 0;
        for delegation in self.staking.delegations(txn, delegator)? {
            let Some(validator) = self.staking.validator(txn, &delegation.validator)? else {
                tracing::warn!(
                    %delegator,
                    validator = %delegation.validator,
                    "skipping delegation to unknown validator"
                );
                continue;
            };
            let tokens = validator
                .tokens_from_shares(delegation.shares)
                .ok_or_else(|| CoinsError::Overflow {
                    denom: denom.clone(),
                })?;
            bonded = bonded
                .checked_add(tokens)
                .ok_or_else(|| CoinsError::Overflow {
                    denom: denom.clone(),
                })?;
        }
        Ok(Coins::single(denom, bonded)?)
    }

    /// Tokens of `delegator` still in the unbonding cooldown, in the bond denom.
    pub fn unbonding_coins(
        &self,
        txn: &dyn ReadTxn,
        delegator: &Address,
    ) -> Result<Coins, LienError> {
        let denom = self.staking.bond_denom(txn)?;
        let mut unbonding: u128 = 0;
        for ubd in self.staking.unbonding_delegations(txn, delegator)? {
            for entry in &ubd.entries {
                unbonding = unbonding
                    .checked_add(entry.balance)
                    .ok_or_else(|| CoinsError::Overflow {
                        denom: denom.clone(),
                    })?;
            }
        }
        Ok(Coins::single(denom, unbonding)?)
    }

    /// Bonded amount of each address in `denom`.
    pub fn bonded_amounts(
        &self,
        txn: &dyn ReadTxn,
        addresses: &[Address],
        denom: &str,
    ) -> Result<Vec<u128>, LienError> {
        addresses
            .iter()
            .map(|a| Ok(self.bonded_coins(txn, a)?.amount_of(denom)))
            .collect()
    }

    /// Move the lien of `address` in `denom` to `new_amount`, leaving the
    /// other denominations alone, and return the amount now liened.
    ///
    /// Increases must stay within what the address holds, has bonded or is
    /// unbonding in that denomination. Decreases are always accepted.
    pub fn change_lien(
        &self,
        txn: &mut dyn WriteTxn,
        address: &Address,
        denom: &str,
        new_amount: u128,
    ) -> Result<u128, LienError> {
        let mut lien = self.get_lien(txn.as_read_txn(), address)?;
        let old_amount = lien.coins.amount_of(denom);
        if new_amount == old_amount {
            return Ok(new_amount);
        }
        if new_amount > old_amount {
            let state = self.get_account_state(txn.as_read_txn(), address)?;
            let available = state
                .coverage_of(denom)
                .ok_or_else(|| CoinsError::Overflow {
                    denom: denom.to_string(),
                })?;
            if new_amount > available {
                return Err(LienError::InsufficientCoverage {
                    denom: denom.to_string(),
                    wanted: new_amount,
                    available,
                });
            }
        }
        lien.coins.set_amount(denom, new_amount)?;
        self.set_lien(txn, address, &lien)?;
        Ok(new_amount)
    }

    /// Ask the controller to approve a lien change and apply what it approves.
    ///
    /// A controller failure or an unreadable response leaves the lien untouched.
    pub fn request_lien_change(
        &self,
        txn: &mut dyn WriteTxn,
        address: &Address,
        denom: &str,
        amount: u128,
    ) -> Result<u128, LienError> {
        let request = ControllerRequest::RequestChange {
            address: address.to_hex(),
            denom: denom.to_string(),
            amount: amount.to_string(),
        };
        let request = serde_json::to_string(&request)
            .map_err(|e| LienError::InvalidMessage(e.to_string()))?;
        let response = self.call_controller(&request)?;
        let approved: String = serde_json::from_str(&response)
            .map_err(|e| LienError::InvalidResponse(format!("{response:?}: {e}")))?;
        let approved = approved
            .parse::<u128>()
            .map_err(|e| LienError::InvalidResponse(format!("{approved:?}: {e}")))?;
        self.change_lien(txn, address, denom, approved)
    }

    /// Make a blocking call to the controller.
    pub fn call_controller(&self, request: &str) -> Result<String, LienError> {
        self.controller.invoke(request).map_err(|e| {
            tracing::warn!(error = %e, "controller call failed");
            LienError::Controller(e)
        })
    }
}
