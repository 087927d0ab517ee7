//! Fundamental types for the lien ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account addresses, multi-denomination coin sets and timestamps.

pub mod address;
pub mod coins;
pub mod error;
pub mod time;

pub use address::Address;
pub use coins::{Coin, Coins};
pub use error::{AddressError, CoinsError};
pub use time::Timestamp;
