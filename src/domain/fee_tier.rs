//! Swap fee tier built on [`BasisPoints`].

use core::fmt;

use serde::{Deserialize, Serialize};

use super::basis_points::MAX_BPS;
use super::{Amount, BasisPoints};

/// The fee a pool retains from the input side of every swap.
///
/// The fee is applied multiplicatively: a swap prices
/// `input × (10 000 − fee_bps)` against reserves scaled by `10 000`, so
/// the retained fraction never leaves the pool.  The exchange default is
/// [`TIER_1_00_PERCENT`](Self::TIER_1_00_PERCENT), which reproduces the
/// classic `input × 990 / 1000` quote exactly.
///
/// # Examples
///
/// ```
/// use native_amm::domain::{Amount, FeeTier};
///
/// let tier = FeeTier::default();
/// assert_eq!(tier.basis_points().get(), 100);
/// assert_eq!(tier.input_factor(), Some(Amount::from(9_900u64)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTier(BasisPoints);

impl FeeTier {
    /// 0.30% fee (30 bp).
    pub const TIER_0_30_PERCENT: Self = Self(BasisPoints::new(30));

    /// 1.00% fee (100 bp), the exchange default.
    pub const TIER_1_00_PERCENT: Self = Self(BasisPoints::new(100));

    /// Creates a new `FeeTier` from arbitrary [`BasisPoints`].
    pub const fn new(basis_points: BasisPoints) -> Self {
        Self(basis_points)
    }

    /// Returns the underlying [`BasisPoints`].
    #[must_use]
    pub const fn basis_points(&self) -> BasisPoints {
        self.0
    }

    /// Denominator the fee is expressed against (`10 000`).
    pub fn scale() -> Amount {
        Amount::from(u64::from(MAX_BPS))
    }

    /// Multiplier applied to a swap input, `10 000 − fee_bps`.
    ///
    /// Returns `None` when the fee exceeds 100%.
    #[must_use]
    pub fn input_factor(&self) -> Option<Amount> {
        self.0
            .complement()
            .map(|bp| Amount::from(u64::from(bp.get())))
    }
}

impl Default for FeeTier {
    fn default() -> Self {
        Self::TIER_1_00_PERCENT
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeTier({})", self.0)
    }
}
