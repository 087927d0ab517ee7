//! Lien keeper for the ledger.
//!
//! A lien records coins that must stay in an account even though the account
//! owns them. This crate holds everything that gives liens meaning:
//! - [`LienKeeper`]: the only writer of lien records, and the aggregator of an
//!   address's total, bonded, unbonding and liened coins;
//! - [`views`]: the narrow read-only ports onto the bank and staking modules;
//! - [`wrapper`]: the account decorator that folds a lien into the locked
//!   coins every account reports, so the bank's ordinary spendable-balance
//!   check enforces it;
//! - [`account`]: the account-loading path the wrapper is injected into;
//! - [`handler`] and [`controller`]: the message surface shared with the
//!   external controller that decides when liens change;
//! - [`genesis`]: import and export of the whole lien set.

pub mod account;
pub mod controller;
pub mod error;
pub mod genesis;
pub mod handler;
pub mod keeper;
pub mod state;
pub mod views;
pub mod wrapper;

pub use account::{
    Account, AccountSource, AccountWrapper, BaseAccount, IdentityWrapper, WrappedAccountKeeper,
};
pub use controller::{Controller, ControllerError};
pub use error::LienError;
pub use genesis::{export_genesis, init_genesis, AccountLien, GenesisState};
pub use handler::{AccountStateResponse, LienMessage, PortHandler, StakingResponse};
pub use keeper::LienKeeper;
pub use lien_store::Lien;
pub use state::AccountState;
pub use views::{BankView, Delegation, StakingView, UnbondingDelegation, UnbondingEntry, Validator};
pub use wrapper::{combine_locked, LienAccount, LienAccountWrapper};
