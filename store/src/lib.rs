//! Transactional storage traits for the lien ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements
//! [`ReadTxn`] and [`WriteTxn`]. The lien store and every other piece of
//! state logic is written against these traits only, and always runs inside
//! the transaction the caller hands in. Commit and rollback belong to the
//! backend that created the transaction.

pub mod error;
pub mod keys;
pub mod lien;

pub use error::StoreError;
pub use lien::{Lien, LienStore, LienStoreMut};

/// Read access to an ordered byte-keyed store inside one transaction.
pub trait ReadTxn {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Visit every entry whose key starts with `prefix`, in ascending key
    /// order. The visitor returns `true` to stop the scan.
    fn scan_prefix(
        &self,
        prefix: &[u8],
        visit: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    ) -> Result<(), StoreError>;
}

/// Writable transaction handle (extends ReadTxn).
pub trait WriteTxn: ReadTxn {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Remove `key`. Deleting an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// View this transaction through its read-only half.
    fn as_read_txn(&self) -> &dyn ReadTxn;
}
