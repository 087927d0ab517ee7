//! Nullable store: an in-memory ordered key-value context.

use lien_store::{ReadTxn, StoreError, WriteTxn};
use std::collections::BTreeMap;

/// An in-memory key-value context for testing.
///
/// `NullKv` is itself a [`WriteTxn`] whose writes apply immediately. For
/// commit/rollback behaviour, open a [`NullTxn`] with [`NullKv::begin`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullKv {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl NullKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start a transaction. Its writes reach this store only on
    /// [`NullTxn::commit`]; dropping it discards them.
    pub fn begin(&mut self) -> NullTxn<'_> {
        NullTxn {
            working: self.entries.clone(),
            base: self,
        }
    }
}

impl ReadTxn for NullKv {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn scan_prefix(
        &self,
        prefix: &[u8],
        visit: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    ) -> Result<(), StoreError> {
        scan(&self.entries, prefix, visit);
        Ok(())
    }
}

impl WriteTxn for NullKv {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn as_read_txn(&self) -> &dyn ReadTxn {
        self
    }
}

/// A write transaction over a [`NullKv`].
pub struct NullTxn<'a> {
    base: &'a mut NullKv,
    working: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl NullTxn<'_> {
    /// Publish every write made through this transaction.
    pub fn commit(self) {
        self.base.entries = self.working;
    }
}

impl ReadTxn for NullTxn<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.working.get(key).cloned())
    }

    fn scan_prefix(
        &self,
        prefix: &[u8],
        visit: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    ) -> Result<(), StoreError> {
        scan(&self.working, prefix, visit);
        Ok(())
    }
}

impl WriteTxn for NullTxn<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.working.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.working.remove(key);
        Ok(())
    }

    fn as_read_txn(&self) -> &dyn ReadTxn {
        self
    }
}

fn scan(
    entries: &BTreeMap<Vec<u8>, Vec<u8>>,
    prefix: &[u8],
    visit: &mut dyn FnMut(&[u8], &[u8]) -> bool,
) {
    for (key, value) in entries.range(prefix.to_vec()..) {
        if !key.starts_with(prefix) || visit(key, value) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(txn: &dyn ReadTxn, prefix: &[u8]) -> Vec<Vec<u8>> {
        let mut keys = Vec::new();
        txn.scan_prefix(prefix, &mut |k, _| {
            keys.push(k.to_vec());
            false
        })
        .unwrap();
        keys
    }

    #[test]
    fn put_get_delete() {
        let mut kv = NullKv::new();
        kv.put(b"a", b"1").unwrap();
        assert_eq!(kv.get(b"a").unwrap(), Some(b"1".to_vec()));
        kv.delete(b"a").unwrap();
        kv.delete(b"a").unwrap();
        assert_eq!(kv.get(b"a").unwrap(), None);
        assert!(kv.is_empty());
    }

    #[test]
    fn scan_stays_inside_prefix_in_order() {
        let mut kv = NullKv::new();
        for key in [&b"\x02b"[..], &b"\x01b"[..], &b"\x01a"[..], &b"\x00z"[..], &b"\x01"[..]] {
            kv.put(key, b"v").unwrap();
        }
        assert_eq!(
            collect(&kv, b"\x01"),
            vec![b"\x01".to_vec(), b"\x01a".to_vec(), b"\x01b".to_vec()]
        );
        assert_eq!(collect(&kv, b"").len(), 5);
    }

    #[test]
    fn scan_stops_when_visitor_asks() {
        let mut kv = NullKv::new();
        for key in [b"k1", b"k2", b"k3"] {
            kv.put(key, b"v").unwrap();
        }
        let mut seen = 0;
        kv.scan_prefix(b"k", &mut |_, _| {
            seen += 1;
            seen == 2
        })
        .unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn committed_transaction_is_visible() {
        let mut kv = NullKv::new();
        let mut txn = kv.begin();
        txn.put(b"a", b"1").unwrap();
        assert_eq!(txn.get(b"a").unwrap(), Some(b"1".to_vec()));
        txn.commit();
        assert_eq!(kv.get(b"a").unwrap(), Some(b"1".to_vec()));
    }

    #[test]
    fn dropped_transaction_leaves_no_trace() {
        let mut kv = NullKv::new();
        kv.put(b"keep", b"1").unwrap();
        {
            let mut txn = kv.begin();
            txn.put(b"a", b"1").unwrap();
            txn.delete(b"keep").unwrap();
        }
        assert_eq!(kv.get(b"a").unwrap(), None);
        assert_eq!(kv.get(b"keep").unwrap(), Some(b"1".to_vec()));
        assert_eq!(kv.len(), 1);
    }
}
