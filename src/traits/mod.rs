//! Core trait abstractions.
//!
//! [`FungibleLedger`] is the seam between the pricing engine and the
//! balance-keeping primitive it settles on.

mod fungible_ledger;

pub use fungible_ledger::FungibleLedger;
