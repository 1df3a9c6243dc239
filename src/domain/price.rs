//! Fixed-point price ratio between two reserves.

use core::fmt;

use super::{Amount, Rounding};

/// Default fixed-point scale: three fractional digits.
pub const DEFAULT_PRICE_SCALE: u64 = 1_000;

/// A reserve ratio `a / b` held as the integer `a × scale / b`.
///
/// Keeps fractional precision without floating point: with the default
/// scale of 1 000 a ratio of `1 / 100` reads as `10`, i.e. `0.010`.
///
/// # Examples
///
/// ```
/// use native_amm::domain::{Amount, ScaledPrice};
///
/// let p = ScaledPrice::from_reserves(Amount::from(3u64), Amount::from(300u64), 1_000)
///     .expect("non-zero reserves");
/// assert_eq!(p.raw(), Amount::from(10u64));
/// assert_eq!(p.to_string(), "0.010");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScaledPrice {
    raw: Amount,
    scale: u64,
}

impl ScaledPrice {
    /// Returns `true` if `scale` is a non-zero power of ten.
    #[must_use]
    pub const fn is_valid_scale(scale: u64) -> bool {
        match scale.checked_ilog10() {
            Some(exp) => 10u64.pow(exp) == scale,
            None => false,
        }
    }

    /// Computes `numerator × scale / denominator`, rounded down.
    ///
    /// Returns `None` if `denominator` is zero, `scale` is not a power of
    /// ten or the product overflows.
    #[must_use]
    pub fn from_reserves(numerator: Amount, denominator: Amount, scale: u64) -> Option<Self> {
        if !Self::is_valid_scale(scale) {
            return None;
        }
        let raw = numerator
            .checked_mul(&Amount::from(scale))?
            .checked_div(&denominator, Rounding::Down)?;
        Some(Self { raw, scale })
    }

    /// Returns the scaled integer value.
    pub const fn raw(&self) -> Amount {
        self.raw
    }

    /// Returns the fixed-point scale.
    #[must_use]
    pub const fn scale(&self) -> u64 {
        self.scale
    }
}

impl fmt::Display for ScaledPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // scale is a power of ten by construction
        let scale = Amount::from(self.scale);
        let whole = self
            .raw
            .checked_div(&scale, Rounding::Down)
            .unwrap_or(Amount::ZERO);
        let frac = whole
            .checked_mul(&scale)
            .and_then(|w| self.raw.checked_sub(&w))
            .unwrap_or(Amount::ZERO);
        let digits = self.scale.ilog10() as usize;
        if digits == 0 {
            return write!(f, "{whole}");
        }
        write!(f, "{whole}.{:0>digits$}", frac.to_string())
    }
}
