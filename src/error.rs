//! Unified error types for the exchange.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type, so a caller can match on one enum whether the failure came
//! from the registry, a pool, the pricing primitives or a ledger.
//!
//! Every error aborts the call that produced it: no reserve, share or
//! balance mutation is observable afterwards.

use thiserror::Error;

use crate::domain::{Address, Amount};

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every way an exchange operation can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    // -- registry -----------------------------------------------------------
    /// The token identity is the zero address.
    #[error("invalid token address")]
    InvalidTokenAddress,

    /// A pool is already registered for this token.
    #[error("a pool already exists for this token")]
    AlreadyExistAnExchangeForThisToken,

    // -- pricing ------------------------------------------------------------
    /// Pricing was attempted against an empty or nonexistent pool.
    #[error("invalid reserves")]
    InvalidReserves,

    /// A quote was requested for a zero input amount.
    #[error("invalid token amount sold")]
    InvalidTokenAmountSold,

    /// A swap was requested with zero tokens sold.
    #[error("insufficient token sold")]
    InsufficientTokenSold,

    // -- liquidity ----------------------------------------------------------
    /// The deposited token amount is below what the current ratio requires.
    #[error("insufficient token amount: required {required}, provided {provided}")]
    InsufficientTokenAmount {
        /// Token amount needed to preserve the pool price.
        required: Amount,
        /// Token amount the provider declared.
        provided: Amount,
    },

    /// A deposit of zero native, or one that would mint no shares.
    #[error("invalid amount to add")]
    InvalidAmountToAdd,

    /// A share redemption of zero was requested.
    #[error("invalid amount to remove")]
    InvalidAmountToRemove,

    // -- swaps --------------------------------------------------------------
    /// The computed output fell below the caller's slippage floor.
    #[error("insufficient output amount: got {got}, minimum {minimum}")]
    InsufficientOutputAmount {
        /// Output the pool would pay.
        got: Amount,
        /// Floor declared by the caller.
        minimum: Amount,
    },

    // -- ledger -------------------------------------------------------------
    /// The account balance does not cover the transfer.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// The approved allowance does not cover the transfer.
    #[error("insufficient allowance")]
    InsufficientAllowance,

    /// The zero address cannot hold or approve balances.
    #[error("zero address is not a valid account")]
    ZeroAddress,

    /// No ledger is deployed for this token address.
    #[error("unknown token: {0}")]
    UnknownToken(Address),

    /// No pool is registered for this token or address.
    #[error("unknown pool: {0}")]
    UnknownPool(Address),

    // -- arithmetic ---------------------------------------------------------
    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    // -- configuration ------------------------------------------------------
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// The configuration text could not be parsed.
    #[error("configuration parse error: {0}")]
    Config(String),
}

impl AmmError {
    /// Returns `true` for the slippage-floor failure.
    #[must_use]
    pub const fn is_slippage(&self) -> bool {
        matches!(self, Self::InsufficientOutputAmount { .. })
    }
}
