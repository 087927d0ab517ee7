//! Nullable clock: a block time that only moves when told to.

use lien_types::Timestamp;
use std::cell::Cell;

/// A deterministic block clock for testing.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    /// The current block time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    /// Advance by `secs` seconds.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get().saturating_add(secs));
    }

    pub fn set(&self, secs: u64) {
        self.current.set(secs);
    }
}
