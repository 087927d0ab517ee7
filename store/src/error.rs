use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}

impl StoreError {
    /// Corruption means replicas may have diverged; callers must halt.
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::Corruption(_))
    }
}
