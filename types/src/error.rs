//! Errors raised while constructing or combining fundamental types.

use thiserror::Error;

/// Errors produced by [`crate::Coins`] construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinsError {
    #[error("invalid denomination: {0:?}")]
    InvalidDenom(String),

    #[error("invalid coin expression: {0:?}")]
    InvalidCoin(String),

    #[error("duplicate denomination: {0}")]
    DuplicateDenom(String),

    #[error("zero amount stored for denomination {0}")]
    ZeroAmount(String),

    #[error("arithmetic overflow adding {denom}")]
    Overflow { denom: String },
}

/// Errors produced when parsing an [`crate::Address`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address must not be empty")]
    Empty,

    #[error("address is {0} bytes, maximum is 255")]
    TooLong(usize),

    #[error("address is not valid hex: {0}")]
    InvalidHex(String),
}
