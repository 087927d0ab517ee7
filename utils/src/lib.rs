//! Shared utilities for the lien ledger.

pub mod config;
pub mod logging;

pub use config::{ConfigError, LienConfig};
pub use logging::{init_logging, LogFormat};
