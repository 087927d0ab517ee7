//! Nullable controller: scripted responses, recorded requests.

use lien_keeper::{Controller, ControllerError};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A controller for testing.
///
/// Scripted responses are returned in order. Once they run out, change
/// requests are approved in full: the response echoes the requested amount.
#[derive(Default)]
pub struct NullController {
    responses: Mutex<VecDeque<Result<String, ControllerError>>>,
    requests: Mutex<Vec<String>>,
}

impl NullController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response.
    pub fn respond(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    /// Queue a failure.
    pub fn fail(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ControllerError::new(message)));
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Controller for NullController {
    fn invoke(&self, request: &str) -> Result<String, ControllerError> {
        self.requests.lock().unwrap().push(request.to_string());
        if let Some(scripted) = self.responses.lock().unwrap().pop_front() {
            return scripted;
        }
        let parsed: serde_json::Value =
            serde_json::from_str(request).map_err(|e| ControllerError::new(e.to_string()))?;
        match parsed.get("amount") {
            Some(amount) => Ok(amount.to_string()),
            None => Err(ControllerError::new("no scripted response")),
        }
    }
}
