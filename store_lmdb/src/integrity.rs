//! LMDB database integrity checks.
//!
//! Run on startup (and by `lien-cli check`) to detect corruption early,
//! before any transaction reads a lien record.

use std::path::Path;

use lien_store::keys::{address_from_lien_key, LIEN_BY_ADDRESS_PREFIX};
use lien_store::lien::decode_lien;
use lien_store::ReadTxn;

use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub total_entries: u64,
    pub liens_checked: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Decode every record in the lien database.
///
/// Undecodable records and keys outside the lien namespace are collected in
/// the report rather than aborting the scan, so an operator sees all of them.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();
    let rtxn = env.read_txn()?;
    report.total_entries = rtxn.len().map_err(|e| LmdbError::DataDir(e.to_string()))?;

    rtxn.scan_prefix(&[], &mut |key, value| {
        if !key.starts_with(LIEN_BY_ADDRESS_PREFIX) {
            report
                .errors
                .push(format!("unexpected key {} outside lien namespace", hex_key(key)));
            return false;
        }
        report.liens_checked += 1;
        if let Err(e) = address_from_lien_key(key).and_then(|_| decode_lien(value)) {
            report.errors.push(format!("key {}: {}", hex_key(key), e));
        }
        false
    })
    .map_err(|e| LmdbError::DataDir(e.to_string()))?;

    if report.is_healthy() {
        tracing::info!(liens = report.liens_checked, "lien database integrity check passed");
    } else {
        tracing::error!(
            errors = report.errors.len(),
            "lien database integrity check failed"
        );
    }
    Ok(report)
}

fn hex_key(key: &[u8]) -> String {
    key.iter().map(|b| format!("{b:02x}")).collect()
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent or empty) directory. Returns an
/// error if the directory has content but `data.mdb` is missing, which
/// suggests corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let has_content = path
        .read_dir()
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?
        .next()
        .is_some();
    if has_content && !path.join("data.mdb").exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
