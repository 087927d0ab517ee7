//! LMDB storage backend for the lien ledger.
//!
//! Implements the transaction traits from `lien-store` using the `heed` LMDB
//! bindings. All lien state lives in one named database inside a single
//! environment; a [`LmdbWriteTxn`] is the transactional context handed to
//! the keeper, and dropping it without [`LmdbWriteTxn::commit`] aborts every
//! write made through it.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod transaction;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use transaction::{LmdbReadTxn, LmdbWriteTxn};
