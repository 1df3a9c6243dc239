//! The fungible-ledger seam pools are written against.
//!
//! A pool never stores its reserves: it reads its own balances from two
//! ledgers (the native asset and its token) and moves value with the
//! standard mint/burn/transfer/allowance operations defined here.
//!
//! # Pre-checks
//!
//! [`ensure_transfer`](FungibleLedger::ensure_transfer) and
//! [`ensure_transfer_from`](FungibleLedger::ensure_transfer_from) report
//! whether a transfer would succeed without performing it.  Pool
//! operations run every pre-check before their first mutation so a call
//! either applies completely or not at all.
//!
//! # Notifications
//!
//! Every mutating method returns the [`Event`] it produced; the caller
//! decides whether it is committed.

use crate::domain::{Address, Amount, Asset, Event};
use crate::error::AmmError;

/// Per-account balances of one fungible asset with allowances.
pub trait FungibleLedger {
    /// Identity of the asset this ledger tracks.
    #[must_use]
    fn asset(&self) -> Asset;

    /// Balance held by `account` (zero if never credited).
    #[must_use]
    fn balance_of(&self, account: &Address) -> Amount;

    /// Sum of all balances.
    #[must_use]
    fn total_supply(&self) -> Amount;

    /// Amount `spender` may still move out of `owner`'s balance.
    #[must_use]
    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Checks that `from` can send `amount`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InsufficientBalance`] if the balance is too low.
    fn ensure_transfer(&self, from: &Address, amount: Amount) -> Result<(), AmmError>;

    /// Checks that `spender` can move `amount` out of `owner`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too low.
    /// - [`AmmError::InsufficientBalance`] if the balance is too low.
    fn ensure_transfer_from(
        &self,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Credits `amount` to `to` out of thin air.
    ///
    /// # Errors
    ///
    /// [`AmmError::Overflow`] if the supply would overflow.
    fn mint(&mut self, to: Address, amount: Amount) -> Result<Event, AmmError>;

    /// Destroys `amount` of `from`'s balance.
    ///
    /// # Errors
    ///
    /// [`AmmError::InsufficientBalance`] if the balance is too low.
    fn burn(&mut self, from: Address, amount: Amount) -> Result<Event, AmmError>;

    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InsufficientBalance`] if the balance is too low.
    fn transfer(&mut self, from: Address, to: Address, amount: Amount)
        -> Result<Event, AmmError>;

    /// Sets the allowance of `spender` over `owner`'s balance.
    ///
    /// # Errors
    ///
    /// Implementations may reject approvals involving the zero address.
    fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<Event, AmmError>;

    /// Raises an existing allowance by `added`.
    ///
    /// # Errors
    ///
    /// [`AmmError::Overflow`] if the allowance would overflow.
    fn increase_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        added: Amount,
    ) -> Result<Event, AmmError>;

    /// Moves `amount` from `owner` to `to` on `spender`'s authority,
    /// consuming allowance.
    ///
    /// # Errors
    ///
    /// Same as [`ensure_transfer_from`](Self::ensure_transfer_from).
    fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Event, AmmError>;
}
