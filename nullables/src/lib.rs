//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator of the lien keeper (storage, accounts, bank, staking,
//! controller, clock) has an in-memory implementation here that:
//! - returns deterministic values
//! - can be controlled programmatically
//! - never touches the filesystem
//!
//! Usage: swap real implementations for nullables in tests, or take the
//! fully wired [`NullLedger`].

pub mod accounts;
pub mod bank;
pub mod clock;
pub mod controller;
pub mod harness;
pub mod staking;
pub mod store;

pub use accounts::{ContinuousVestingAccount, NullAccounts};
pub use bank::{BankError, NullBank};
pub use clock::NullClock;
pub use controller::NullController;
pub use harness::NullLedger;
pub use staking::NullStaking;
pub use store::{NullKv, NullTxn};
