//! Lien keeper errors.

use lien_store::StoreError;
use lien_types::CoinsError;
use thiserror::Error;

use crate::controller::ControllerError;

#[derive(Debug, Error)]
pub enum LienError {
    #[error("lien state is corrupted: {0}")]
    Corrupted(String),

    #[error("storage error: {0}")]
    Storage(StoreError),

    #[error("coins error: {0}")]
    Coins(#[from] CoinsError),

    #[error("controller call failed: {0}")]
    Controller(#[from] ControllerError),

    #[error("invalid controller response: {0}")]
    InvalidResponse(String),

    #[error("lien of {wanted}{denom} exceeds the {available}{denom} held, bonded or unbonding")]
    InsufficientCoverage {
        denom: String,
        wanted: u128,
        available: u128,
    },

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("invalid genesis: {0}")]
    InvalidGenesis(String),
}

impl LienError {
    /// Whether the process must halt instead of aborting only the current
    /// transaction. Replicas that keep running on corrupted state diverge.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LienError::Corrupted(_))
    }
}

impl From<StoreError> for LienError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Corruption(msg) => LienError::Corrupted(msg),
            other => LienError::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corruption_is_fatal() {
        let err = LienError::from(StoreError::Corruption("bad record".into()));
        assert!(err.is_fatal());
        let err = LienError::from(StoreError::Backend("disk full".into()));
        assert!(!err.is_fatal());
        assert!(!LienError::Controller(ControllerError::new("no")).is_fatal());
    }
}
