use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("invalid data directory: {0}")]
    DataDir(String),
}

impl From<LmdbError> for lien_store::StoreError {
    fn from(e: LmdbError) -> Self {
        lien_store::StoreError::Backend(e.to_string())
    }
}
