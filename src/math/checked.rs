//! Checked arithmetic trait for [`Amount`].
//!
//! [`CheckedArithmetic`] turns the `Option`-returning checked methods on
//! [`Amount`] into [`Result<Amount, AmmError>`](crate::error::AmmError)
//! with a context string, so pricing code can chain with `?`.
//!
//! # Examples
//!
//! ```
//! use native_amm::domain::{Amount, Rounding};
//! use native_amm::math::CheckedArithmetic;
//!
//! let a = Amount::from(100u64);
//! let q = a.mul_div(&Amount::from(3u64), &Amount::from(7u64), Rounding::Down);
//! assert_eq!(q, Ok(Amount::from(42u64)));
//! ```

use crate::domain::{Amount, Rounding};
use crate::error::AmmError;

/// Fallible arithmetic for amounts.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked division with explicit [`Rounding`] direction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError>;

    /// `self × numerator / denominator`, the proportional-share pattern.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] or [`AmmError::DivisionByZero`].
    fn mul_div(
        &self,
        numerator: &Self,
        denominator: &Self,
        rounding: Rounding,
    ) -> Result<Self, AmmError> {
        self.safe_mul(numerator)?.safe_div(denominator, rounding)
    }
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_mul(other)
            .ok_or(AmmError::Overflow("amount multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, AmmError> {
        self.checked_div(other, rounding)
            .ok_or(AmmError::DivisionByZero)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn amt(v: u64) -> Amount {
        Amount::from(v)
    }

    #[test]
    fn add_ok_and_overflow() {
        assert_eq!(amt(100).safe_add(&amt(200)), Ok(amt(300)));
        let Err(AmmError::Overflow(_)) = Amount::MAX.safe_add(&amt(1)) else {
            panic!("expected Overflow");
        };
    }

    #[test]
    fn sub_ok_and_underflow() {
        assert_eq!(amt(300).safe_sub(&amt(100)), Ok(amt(200)));
        let Err(AmmError::Underflow(_)) = amt(1).safe_sub(&amt(2)) else {
            panic!("expected Underflow");
        };
    }

    #[test]
    fn mul_ok_and_overflow() {
        assert_eq!(amt(100).safe_mul(&amt(200)), Ok(amt(20_000)));
        let Err(AmmError::Overflow(_)) = Amount::MAX.safe_mul(&amt(2)) else {
            panic!("expected Overflow");
        };
    }

    #[test]
    fn div_rounding_and_zero() {
        assert_eq!(amt(10).safe_div(&amt(3), Rounding::Down), Ok(amt(3)));
        assert_eq!(amt(10).safe_div(&amt(3), Rounding::Up), Ok(amt(4)));
        assert_eq!(
            amt(10).safe_div(&Amount::ZERO, Rounding::Down),
            Err(AmmError::DivisionByZero)
        );
    }

    #[test]
    fn mul_div_proportional_share() {
        // 2 shares of 3 total on a reserve of 300 -> 200
        assert_eq!(amt(300).mul_div(&amt(2), &amt(3), Rounding::Down), Ok(amt(200)));
        assert_eq!(amt(10).mul_div(&amt(1), &amt(3), Rounding::Down), Ok(amt(3)));
        assert_eq!(amt(10).mul_div(&amt(1), &amt(3), Rounding::Up), Ok(amt(4)));
    }

    #[test]
    fn mul_div_zero_denominator() {
        assert_eq!(
            amt(1).mul_div(&amt(1), &Amount::ZERO, Rounding::Down),
            Err(AmmError::DivisionByZero)
        );
    }
}
