//! Key layout of the lien namespace.
//!
//! One entry per address with a non-empty lien:
//! `LIEN_BY_ADDRESS_PREFIX ++ raw address bytes` → `bincode(Lien)`.
//! Keys sort lexicographically, so iteration order is address byte order.

use lien_types::Address;

use crate::StoreError;

/// Namespace prefix for lien records.
pub const LIEN_BY_ADDRESS_PREFIX: &[u8] = &[0x01];

/// Build the store key for `address`.
pub fn lien_key(address: &Address) -> Vec<u8> {
    let mut key = Vec::with_capacity(LIEN_BY_ADDRESS_PREFIX.len() + address.as_bytes().len());
    key.extend_from_slice(LIEN_BY_ADDRESS_PREFIX);
    key.extend_from_slice(address.as_bytes());
    key
}

/// Recover the address from a full lien key.
pub fn address_from_lien_key(key: &[u8]) -> Result<Address, StoreError> {
    let raw = key
        .strip_prefix(LIEN_BY_ADDRESS_PREFIX)
        .ok_or_else(|| StoreError::Corruption(format!("key {key:02x?} outside lien namespace")))?;
    Address::new(raw.to_vec()).map_err(|e| StoreError::Corruption(format!("lien key: {e}")))
}

/// Smallest key strictly greater than every key starting with `prefix`,
/// or `None` when the prefix is all `0xff`.
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < 0xff {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}
