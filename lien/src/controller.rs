//! Synchronous port to the external controller.
//!
//! The controller decides when liens are established or released. The keeper
//! reaches it through one blocking call: an opaque request string in, an
//! opaque response string or an error out. A failure aborts the lien change
//! and, through the caller, the enclosing transaction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ControllerError(pub String);

impl ControllerError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// The controller call.
pub trait Controller: Send + Sync {
    fn invoke(&self, request: &str) -> Result<String, ControllerError>;
}

impl<F> Controller for F
where
    F: Fn(&str) -> Result<String, ControllerError> + Send + Sync,
{
    fn invoke(&self, request: &str) -> Result<String, ControllerError> {
        self(request)
    }
}

/// Requests the keeper sends to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControllerRequest {
    /// Ask for approval to move the lien of `address` in `denom` to `amount`.
    /// The response is the approved amount as a JSON string.
    #[serde(rename = "LIEN_REQUEST_CHANGE")]
    RequestChange {
        address: String,
        denom: String,
        amount: String,
    },
}
