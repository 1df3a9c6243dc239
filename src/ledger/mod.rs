//! Balance-keeping collaborator the pools settle on.
//!
//! [`TokenLedger`] is a plain in-memory implementation of
//! [`FungibleLedger`](crate::traits::FungibleLedger).  Mint and burn are
//! open to any caller; gating them is the host's concern.

mod token_ledger;

pub use token_ledger::TokenLedger;
