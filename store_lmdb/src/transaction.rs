//! LMDB implementations of the transaction traits.

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};

use lien_store::{ReadTxn, StoreError, WriteTxn};

use crate::LmdbError;

fn get(db: &Database<Bytes, Bytes>, txn: &RoTxn, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
    let value = db.get(txn, key).map_err(LmdbError::from)?;
    Ok(value.map(<[u8]>::to_vec))
}

fn scan_prefix(
    db: &Database<Bytes, Bytes>,
    txn: &RoTxn,
    prefix: &[u8],
    visit: &mut dyn FnMut(&[u8], &[u8]) -> bool,
) -> Result<(), StoreError> {
    // LMDB rejects zero-length keys, so a full scan cannot go through a range seek.
    if prefix.is_empty() {
        for entry in db.iter(txn).map_err(LmdbError::from)? {
            let (key, value) = entry.map_err(LmdbError::from)?;
            if visit(key, value) {
                break;
            }
        }
        return Ok(());
    }
    for entry in db.prefix_iter(txn, prefix).map_err(LmdbError::from)? {
        let (key, value) = entry.map_err(LmdbError::from)?;
        if visit(key, value) {
            break;
        }
    }
    Ok(())
}

/// A read-only snapshot of the lien database.
pub struct LmdbReadTxn<'e> {
    txn: RoTxn<'e>,
    db: Database<Bytes, Bytes>,
}

impl<'e> LmdbReadTxn<'e> {
    pub(crate) fn new(txn: RoTxn<'e>, db: Database<Bytes, Bytes>) -> Self {
        Self { txn, db }
    }

    /// Number of entries in the lien database.
    pub fn len(&self) -> Result<u64, StoreError> {
        Ok(self.db.len(&self.txn).map_err(LmdbError::from)?)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl ReadTxn for LmdbReadTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        get(&self.db, &self.txn, key)
    }

    fn scan_prefix(
        &self,
        prefix: &[u8],
        visit: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    ) -> Result<(), StoreError> {
        scan_prefix(&self.db, &self.txn, prefix, visit)
    }
}

/// A write transaction over the lien database.
///
/// If the transaction is dropped without calling [`LmdbWriteTxn::commit`],
/// all writes are rolled back (the underlying LMDB transaction is aborted).
pub struct LmdbWriteTxn<'e> {
    txn: RwTxn<'e>,
    db: Database<Bytes, Bytes>,
}

impl<'e> LmdbWriteTxn<'e> {
    pub(crate) fn new(txn: RwTxn<'e>, db: Database<Bytes, Bytes>) -> Self {
        Self { txn, db }
    }

    /// Make every write in this transaction durable.
    pub fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    /// Discard every write in this transaction.
    pub fn abort(self) {
        self.txn.abort();
    }
}

impl ReadTxn for LmdbWriteTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        get(&self.db, &self.txn, key)
    }

    fn scan_prefix(
        &self,
        prefix: &[u8],
        visit: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    ) -> Result<(), StoreError> {
        scan_prefix(&self.db, &self.txn, prefix, visit)
    }
}

impl WriteTxn for LmdbWriteTxn<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.db
            .put(&mut self.txn, key, value)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.db.delete(&mut self.txn, key).map_err(LmdbError::from)?;
        Ok(())
    }

    fn as_read_txn(&self) -> &dyn ReadTxn {
        self
    }
}
