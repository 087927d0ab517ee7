//! Genesis import and export of the lien set.
//!
//! The exported state lists every lien in ascending address order, so
//! exporting the same ledger twice yields byte-identical JSON.

use std::collections::BTreeSet;

use lien_store::{ReadTxn, WriteTxn};
use lien_types::{Address, Coins};
use serde::{Deserialize, Serialize};

use crate::error::LienError;
use crate::keeper::LienKeeper;
use crate::Lien;

/// The lien of one address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLien {
    pub address: Address,
    pub coins: Coins,
}

/// Everything the lien module persists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub liens: Vec<AccountLien>,
}

impl GenesisState {
    /// Reject duplicate addresses and empty liens.
    pub fn validate(&self) -> Result<(), LienError> {
        let mut seen = BTreeSet::new();
        for entry in &self.liens {
            if entry.coins.is_zero() {
                return Err(LienError::InvalidGenesis(format!(
                    "empty lien for {}",
                    entry.address
                )));
            }
            if !seen.insert(&entry.address) {
                return Err(LienError::InvalidGenesis(format!(
                    "duplicate lien for {}",
                    entry.address
                )));
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, LienError> {
        serde_json::from_str(json).map_err(|e| LienError::InvalidGenesis(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, LienError> {
        serde_json::to_string_pretty(self).map_err(|e| LienError::InvalidGenesis(e.to_string()))
    }
}

/// Validate `state` and write every lien it holds.
pub fn init_genesis(txn: &mut dyn WriteTxn, state: &GenesisState) -> Result<(), LienError> {
    state.validate()?;
    for entry in &state.liens {
        LienKeeper::write_lien(txn, &entry.address, &Lien::new(entry.coins.clone()))?;
    }
    tracing::info!(liens = state.liens.len(), "lien genesis imported");
    Ok(())
}

/// Collect every stored lien.
pub fn export_genesis(txn: &dyn ReadTxn) -> Result<GenesisState, LienError> {
    let mut liens = Vec::new();
    LienKeeper::scan_liens(txn, |address, lien| {
        liens.push(AccountLien {
            address: address.clone(),
            coins: lien.coins.clone(),
        });
        false
    })?;
    tracing::debug!(liens = liens.len(), "lien genesis exported");
    Ok(GenesisState { liens })
}
