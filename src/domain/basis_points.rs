//! Basis-point representation for percentages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Value that represents 100%.
pub(crate) const MAX_BPS: u32 = 10_000;

/// A percentage expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// All `u32` values are representable, but values above 10 000 are
/// meaningless as percentages; [`is_valid_percent`](Self::is_valid_percent)
/// tells them apart.
///
/// # Examples
///
/// ```
/// use native_amm::domain::BasisPoints;
///
/// let bp = BasisPoints::new(100);
/// assert_eq!(bp.get(), 100);
/// assert_eq!(bp.complement(), Some(BasisPoints::new(9_900)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the value is in the valid percentage range (`0..=10_000`).
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Returns `100% - self`, or `None` if `self` exceeds 100%.
    #[must_use]
    pub const fn complement(&self) -> Option<Self> {
        match MAX_BPS.checked_sub(self.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
