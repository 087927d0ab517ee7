//! Lien record storage.
//!
//! The store is blanket-implemented for every transaction type, so the LMDB
//! backend and the in-memory nullable share one encoding and one set of
//! invariants:
//! - absent and all-zero liens read back as the same empty [`Lien`];
//! - writing an empty lien deletes the record;
//! - iteration never yields an empty lien.

use lien_types::{Address, Coins};
use serde::{Deserialize, Serialize};

use crate::keys::{address_from_lien_key, lien_key, LIEN_BY_ADDRESS_PREFIX};
use crate::{ReadTxn, StoreError, WriteTxn};

/// Coins that must stay encumbered in an account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lien {
    pub coins: Coins,
}

impl Lien {
    pub fn new(coins: Coins) -> Self {
        Self { coins }
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_zero()
    }
}

/// Encode a lien record value.
pub fn encode_lien(lien: &Lien) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(lien).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a lien record value. Any failure, including an empty coin set,
/// is corruption: an empty lien is never written.
pub fn decode_lien(bytes: &[u8]) -> Result<Lien, StoreError> {
    let lien: Lien = bincode::deserialize(bytes)
        .map_err(|e| StoreError::Corruption(format!("undecodable lien record: {e}")))?;
    if lien.is_empty() {
        return Err(StoreError::Corruption("empty lien record stored".into()));
    }
    Ok(lien)
}

/// Read side of the lien store.
pub trait LienStore: ReadTxn {
    /// The stored lien for `address`, or the empty lien.
    fn get_lien(&self, address: &Address) -> Result<Lien, StoreError> {
        match self.get(&lien_key(address))? {
            Some(bytes) => decode_lien(&bytes).map_err(|e| {
                tracing::error!(%address, error = %e, "corrupt lien record");
                e
            }),
            None => Ok(Lien::default()),
        }
    }

    /// Visit every stored lien in ascending address order until the visitor
    /// returns `true`.
    ///
    /// A corrupt record aborts the scan with [`StoreError::Corruption`].
    fn iter_liens(
        &self,
        visit: &mut dyn FnMut(&Address, &Lien) -> bool,
    ) -> Result<(), StoreError> {
        let mut failure = None;
        self.scan_prefix(LIEN_BY_ADDRESS_PREFIX, &mut |key, value| {
            let decoded = address_from_lien_key(key)
                .and_then(|address| decode_lien(value).map(|lien| (address, lien)));
            match decoded {
                Ok((address, lien)) => visit(&address, &lien),
                Err(e) => {
                    tracing::error!(key = ?key, error = %e, "corrupt lien record during iteration");
                    failure = Some(e);
                    true
                }
            }
        })?;
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<T: ReadTxn + ?Sized> LienStore for T {}

/// Write side of the lien store.
pub trait LienStoreMut: WriteTxn {
    /// Store `lien` for `address`; an empty lien deletes the record.
    fn set_lien(&mut self, address: &Address, lien: &Lien) -> Result<(), StoreError> {
        let key = lien_key(address);
        if lien.is_empty() {
            self.delete(&key)
        } else {
            self.put(&key, &encode_lien(lien)?)
        }
    }
}

impl<T: WriteTxn + ?Sized> LienStoreMut for T {}
