//! Raw asset amount with checked 256-bit arithmetic.

use core::fmt;
use core::str::FromStr;

use ethereum_types::U256;

use super::Rounding;
use crate::error::AmmError;

/// A raw amount in the smallest unit of an asset (wei or equivalent).
///
/// Backed by a 256-bit unsigned integer: the constant-product formula
/// multiplies two 18-decimal reserves by a fee factor, which does not fit
/// in 128 bits.  `Amount` never interprets decimals.
///
/// Arithmetic methods are checked: they return `None` on overflow,
/// underflow, or division by zero instead of panicking.
///
/// # Examples
///
/// ```
/// use native_amm::domain::{Amount, Rounding};
///
/// let a = Amount::from(100u64);
/// let b = Amount::from(200u64);
/// assert_eq!(a.checked_add(&b), Some(Amount::from(300u64)));
/// assert_eq!(b.checked_div(&a, Rounding::Down), Some(Amount::from(2u64)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct Amount(U256);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(U256([0; 4]));

    /// Maximum representable amount.
    pub const MAX: Self = Self(U256::MAX);

    /// Creates a new `Amount` from a raw `U256` value.
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// Creates an amount of `whole` units of an asset with `decimals`
    /// fractional digits, e.g. `from_units(3, 18)` is three ether in wei.
    ///
    /// Returns `None` on overflow.
    #[must_use]
    pub fn from_units(whole: u64, decimals: u32) -> Option<Self> {
        let scale = U256::from(10u8).checked_pow(U256::from(decimals))?;
        U256::from(whole).checked_mul(scale).map(Self)
    }

    /// Returns the underlying `U256` value.
    #[must_use]
    pub const fn get(&self) -> U256 {
        self.0
    }

    /// Returns the value as `u128` if it fits.
    #[must_use]
    pub fn to_u128(&self) -> Option<u128> {
        if self.0 > U256::from(u128::MAX) {
            None
        } else {
            Some(self.0.low_u128())
        }
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Checked multiplication. Returns `None` on overflow.
    #[must_use]
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        self.0.checked_mul(other.0).map(Self)
    }

    /// Checked division with explicit rounding direction.
    ///
    /// - [`Rounding::Down`]: floor division.
    /// - [`Rounding::Up`]: ceiling division, computed as `q + (r != 0)` so
    ///   it cannot overflow.
    ///
    /// Returns `None` if `divisor` is zero.
    #[must_use]
    pub fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        if divisor.0.is_zero() {
            return None;
        }
        let (q, r) = self.0.div_mod(divisor.0);
        match rounding {
            Rounding::Down => Some(Self(q)),
            // q < MAX whenever r != 0, so the increment cannot overflow.
            Rounding::Up if !r.is_zero() => Some(Self(q + U256::one())),
            Rounding::Up => Some(Self(q)),
        }
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmmError;

    /// Parses a base-10 integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_dec_str(s)
            .map(Self)
            .map_err(|_| AmmError::InvalidConfiguration("amount is not a base-10 integer"))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn amt(v: u128) -> Amount {
        Amount::from(v)
    }

    // -- Construction & accessors -------------------------------------------

    #[test]
    fn constants() {
        assert!(Amount::ZERO.is_zero());
        assert_eq!(Amount::MAX.get(), U256::MAX);
        assert_eq!(Amount::default(), Amount::ZERO);
    }

    #[test]
    fn from_units_scales_by_decimals() {
        let Some(three_ether) = Amount::from_units(3, 18) else {
            panic!("fits in 256 bits");
        };
        assert_eq!(three_ether, amt(3_000_000_000_000_000_000));
        assert_eq!(Amount::from_units(7, 0), Some(amt(7)));
    }

    #[test]
    fn from_units_overflow() {
        assert_eq!(Amount::from_units(u64::MAX, 77), None);
    }

    #[test]
    fn to_u128_bounds() {
        assert_eq!(amt(42).to_u128(), Some(42));
        assert_eq!(Amount::MAX.to_u128(), None);
    }

    // -- Display / FromStr --------------------------------------------------

    #[test]
    fn display_is_decimal() {
        assert_eq!(amt(1_000_000).to_string(), "1000000");
    }

    #[test]
    fn parse_decimal() {
        let Ok(a) = "744360902255639097".parse::<Amount>() else {
            panic!("valid decimal");
        };
        assert_eq!(a, amt(744_360_902_255_639_097));
        assert!("12ab".parse::<Amount>().is_err());
    }

    // -- checked arithmetic -------------------------------------------------

    #[test]
    fn add_and_overflow() {
        assert_eq!(amt(100).checked_add(&amt(200)), Some(amt(300)));
        assert_eq!(Amount::MAX.checked_add(&amt(1)), None);
    }

    #[test]
    fn sub_and_underflow() {
        assert_eq!(amt(300).checked_sub(&amt(100)), Some(amt(200)));
        assert_eq!(amt(1).checked_sub(&amt(2)), None);
    }

    #[test]
    fn mul_beyond_u128() {
        // 100e18 * 990 * 3e18 does not fit in u128 but does in U256.
        let Some(p) = amt(100_000_000_000_000_000_000)
            .checked_mul(&amt(990))
            .and_then(|x| x.checked_mul(&amt(3_000_000_000_000_000_000)))
        else {
            panic!("fits in 256 bits");
        };
        assert_eq!(p.to_u128(), None);
        assert_eq!(Amount::MAX.checked_mul(&amt(2)), None);
    }

    #[test]
    fn div_rounding() {
        assert_eq!(amt(10).checked_div(&amt(3), Rounding::Down), Some(amt(3)));
        assert_eq!(amt(10).checked_div(&amt(3), Rounding::Up), Some(amt(4)));
        assert_eq!(amt(9).checked_div(&amt(3), Rounding::Up), Some(amt(3)));
        assert_eq!(amt(0).checked_div(&amt(3), Rounding::Up), Some(amt(0)));
    }

    #[test]
    fn div_by_zero() {
        assert_eq!(amt(100).checked_div(&Amount::ZERO, Rounding::Down), None);
        assert_eq!(amt(100).checked_div(&Amount::ZERO, Rounding::Up), None);
    }

    #[test]
    fn div_max_round_up_does_not_overflow() {
        let Some(ceil) = Amount::MAX.checked_div(&amt(2), Rounding::Up) else {
            panic!("divisor non-zero");
        };
        let Some(floor) = Amount::MAX.checked_div(&amt(2), Rounding::Down) else {
            panic!("divisor non-zero");
        };
        assert_eq!(floor.checked_add(&amt(1)), Some(ceil));
    }

    #[test]
    fn ordering() {
        assert!(amt(1) < amt(2));
        assert_eq!(amt(5), amt(5));
    }
}
