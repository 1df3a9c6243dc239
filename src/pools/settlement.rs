//! Mutable view of the ledgers one pool call settles against.

use crate::domain::{Address, Event, Reserves};
use crate::traits::FungibleLedger;

/// The native ledger, the pool's token ledger and the event buffer of
/// the call in progress.
///
/// Pools never own balances; every operation reads and moves them
/// through a `Settlement`.  The event buffer belongs to the caller, who
/// commits it only when the whole call succeeds.
#[derive(Debug)]
pub struct Settlement<'a, L: ?Sized> {
    /// Ledger of the native asset.
    pub native: &'a mut L,
    /// Ledger of the pool's token.
    pub token: &'a mut L,
    /// Events produced so far by this call.
    pub events: &'a mut Vec<Event>,
}

impl<'a, L: FungibleLedger + ?Sized> Settlement<'a, L> {
    /// Bundles the ledgers and event buffer for one call.
    pub fn new(native: &'a mut L, token: &'a mut L, events: &'a mut Vec<Event>) -> Self {
        Self {
            native,
            token,
            events,
        }
    }

    /// Reads both reserves of the pool at `pool` in one snapshot.
    #[must_use]
    pub fn reserves(&self, pool: Address) -> Reserves {
        Reserves::new(self.native.balance_of(&pool), self.token.balance_of(&pool))
    }
}
