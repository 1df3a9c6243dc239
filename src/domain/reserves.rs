//! Point-in-time snapshot of a pool's two reserves.

use super::Amount;

/// The native and token balances held by a pool account, read once at
/// the top of a call.
///
/// Every price computed during a call uses the same snapshot, so no
/// mutation made later in the call can leak into its own pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reserves {
    /// Native balance of the pool account.
    pub native: Amount,
    /// Token balance of the pool account.
    pub token: Amount,
}

impl Reserves {
    /// Creates a snapshot from the two balances.
    pub const fn new(native: Amount, token: Amount) -> Self {
        Self { native, token }
    }

    /// Returns `true` when the pool holds no token, i.e. the next deposit
    /// sets the initial price.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.token.is_zero()
    }

    /// Constant-product invariant `native × token`, or `None` on overflow.
    #[must_use]
    pub fn product(&self) -> Option<Amount> {
        self.native.checked_mul(&self.token)
    }
}
