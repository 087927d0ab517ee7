//! LMDB environment setup.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::transaction::{LmdbReadTxn, LmdbWriteTxn};
use crate::LmdbError;

/// Name of the database holding the lien namespace.
pub const LIEN_DB_NAME: &str = "liens";

/// Wraps the LMDB environment and the lien database handle.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) lien_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        crate::integrity::check_data_dir(path).map_err(LmdbError::DataDir)?;
        fs::create_dir_all(path).map_err(|e| LmdbError::DataDir(e.to_string()))?;

        // SAFETY: the environment is opened once per path by this process and
        // the memory map is never handed out beyond heed's own borrows.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let lien_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(LIEN_DB_NAME))?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(Self {
            env: Arc::new(env),
            lien_db,
        })
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    /// Begin a read-only transaction.
    pub fn read_txn(&self) -> Result<LmdbReadTxn<'_>, LmdbError> {
        let txn = self.env.read_txn()?;
        Ok(LmdbReadTxn::new(txn, self.lien_db))
    }

    /// Begin a write transaction. LMDB admits one writer at a time, which
    /// serialises lien mutations across the process.
    pub fn write_txn(&self) -> Result<LmdbWriteTxn<'_>, LmdbError> {
        let txn = self.env.write_txn()?;
        Ok(LmdbWriteTxn::new(txn, self.lien_db))
    }
}
