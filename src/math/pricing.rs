//! Constant-product pricing primitives.
//!
//! Pure functions of their arguments: callers pass the reserve snapshot
//! explicitly, so every quote can be tested without a pool.
//!
//! # Output formula (exact input)
//!
//! ```text
//! input_with_fee = input × (10 000 − fee_bps)
//! denominator    = input_reserve × 10 000 + input_with_fee
//! output         = ⌊input_with_fee × output_reserve / denominator⌋
//! ```
//!
//! With the default 100 bp fee this is exactly `input × 990` against a
//! `1000` scale.  The fee is removed from the effective input before the
//! `x · y = k` curve is evaluated, so `native × token` never decreases
//! across a swap, and truncation only ever favours the pool.

use crate::domain::{Amount, FeeTier, Rounding, ScaledPrice, DEFAULT_PRICE_SCALE};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// `reserve_a × 1000 / reserve_b`, rounded down.
///
/// # Errors
///
/// Returns [`AmmError::InvalidReserves`] if either reserve is zero.
///
/// # Examples
///
/// ```
/// use native_amm::domain::Amount;
/// use native_amm::math::quote_price;
///
/// let p = quote_price(Amount::from(300u64), Amount::from(3u64)).expect("non-zero");
/// assert_eq!(p.raw(), Amount::from(100_000u64));
/// ```
pub fn quote_price(reserve_a: Amount, reserve_b: Amount) -> Result<ScaledPrice, AmmError> {
    quote_price_scaled(reserve_a, reserve_b, DEFAULT_PRICE_SCALE)
}

/// [`quote_price`] with an explicit fixed-point scale.
///
/// # Errors
///
/// - [`AmmError::InvalidReserves`] if either reserve is zero.
/// - [`AmmError::InvalidConfiguration`] if `scale` is not a power of ten.
/// - [`AmmError::Overflow`] if `reserve_a × scale` overflows.
pub fn quote_price_scaled(
    reserve_a: Amount,
    reserve_b: Amount,
    scale: u64,
) -> Result<ScaledPrice, AmmError> {
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(AmmError::InvalidReserves);
    }
    if !ScaledPrice::is_valid_scale(scale) {
        return Err(AmmError::InvalidConfiguration(
            "price scale must be a power of ten",
        ));
    }
    ScaledPrice::from_reserves(reserve_a, reserve_b, scale)
        .ok_or(AmmError::Overflow("price numerator overflow"))
}

/// Output of selling `input` into a pool at the default 1% fee.
///
/// # Errors
///
/// See [`quote_output_amount_with_fee`].
///
/// # Examples
///
/// ```
/// use native_amm::domain::Amount;
/// use native_amm::math::quote_output_amount;
///
/// let e18: Amount = "1000000000000000000".parse().expect("decimal");
/// let k = |n: u64| Amount::from(n).checked_mul(&e18).expect("fits");
/// let out = quote_output_amount(k(100), k(300), k(3)).expect("priced");
/// assert_eq!(out.to_string(), "744360902255639097");
/// ```
pub fn quote_output_amount(
    input: Amount,
    input_reserve: Amount,
    output_reserve: Amount,
) -> Result<Amount, AmmError> {
    quote_output_amount_with_fee(input, input_reserve, output_reserve, FeeTier::default())
}

/// Constant-product output with the fee taken from the input side.
///
/// # Errors
///
/// - [`AmmError::InvalidReserves`] if either reserve is zero.
/// - [`AmmError::InvalidTokenAmountSold`] if `input` is zero.
/// - [`AmmError::InvalidConfiguration`] if the fee exceeds 100%.
/// - [`AmmError::Overflow`] if an intermediate product overflows 256 bits.
pub fn quote_output_amount_with_fee(
    input: Amount,
    input_reserve: Amount,
    output_reserve: Amount,
    fee: FeeTier,
) -> Result<Amount, AmmError> {
    if input_reserve.is_zero() || output_reserve.is_zero() {
        return Err(AmmError::InvalidReserves);
    }
    if input.is_zero() {
        return Err(AmmError::InvalidTokenAmountSold);
    }
    let factor = fee
        .input_factor()
        .ok_or(AmmError::InvalidConfiguration("fee exceeds 100%"))?;

    let input_with_fee = input
        .checked_mul(&factor)
        .ok_or(AmmError::Overflow("input with fee overflow"))?;
    let denominator = input_reserve
        .checked_mul(&FeeTier::scale())
        .and_then(|r| r.checked_add(&input_with_fee))
        .ok_or(AmmError::Overflow("output denominator overflow"))?;

    input_with_fee
        .checked_mul(&output_reserve)
        .ok_or(AmmError::Overflow("output numerator overflow"))?
        .safe_div(&denominator, Rounding::Down)
}

/// Input needed to buy exactly `output` from a pool at the default fee.
///
/// # Errors
///
/// See [`quote_input_amount_with_fee`].
pub fn quote_input_amount(
    output: Amount,
    input_reserve: Amount,
    output_reserve: Amount,
) -> Result<Amount, AmmError> {
    quote_input_amount_with_fee(output, input_reserve, output_reserve, FeeTier::default())
}

/// Inverse of [`quote_output_amount_with_fee`], rounded up so that
/// selling the returned input yields at least `output`.
///
/// ```text
/// input = ⌈input_reserve × output × 10 000 / ((output_reserve − output) × (10 000 − fee_bps))⌉
/// ```
///
/// # Errors
///
/// - [`AmmError::InvalidReserves`] if either reserve is zero or `output`
///   would drain the output reserve.
/// - [`AmmError::InvalidTokenAmountSold`] if `output` is zero.
/// - [`AmmError::InvalidConfiguration`] if the fee is 100% or more.
/// - [`AmmError::Overflow`] if an intermediate product overflows.
pub fn quote_input_amount_with_fee(
    output: Amount,
    input_reserve: Amount,
    output_reserve: Amount,
    fee: FeeTier,
) -> Result<Amount, AmmError> {
    if input_reserve.is_zero() || output_reserve.is_zero() || output >= output_reserve {
        return Err(AmmError::InvalidReserves);
    }
    if output.is_zero() {
        return Err(AmmError::InvalidTokenAmountSold);
    }
    let factor = fee
        .input_factor()
        .filter(|f| !f.is_zero())
        .ok_or(AmmError::InvalidConfiguration("fee must be below 100%"))?;

    let numerator = input_reserve
        .safe_mul(&output)?
        .safe_mul(&FeeTier::scale())?;
    let denominator = output_reserve.safe_sub(&output)?.safe_mul(&factor)?;
    numerator.safe_div(&denominator, Rounding::Up)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BasisPoints;

    fn ether(n: u64) -> Amount {
        let Some(a) = Amount::from_units(n, 18) else {
            panic!("fits");
        };
        a
    }

    fn dec(s: &str) -> Amount {
        let Ok(a) = s.parse() else {
            panic!("valid decimal");
        };
        a
    }

    // -- quote_price ----------------------------------------------------------

    #[test]
    fn price_of_native_in_tokens() {
        let Ok(p) = quote_price(ether(300), ether(3)) else {
            panic!("expected Ok");
        };
        assert_eq!(p.raw(), Amount::from(100_000u64));
    }

    #[test]
    fn price_of_token_in_native() {
        let Ok(p) = quote_price(ether(3), ether(300)) else {
            panic!("expected Ok");
        };
        assert_eq!(p.raw(), Amount::from(10u64));
    }

    #[test]
    fn price_rejects_zero_reserves() {
        assert_eq!(
            quote_price(Amount::ZERO, ether(3)),
            Err(AmmError::InvalidReserves)
        );
        assert_eq!(
            quote_price(ether(3), Amount::ZERO),
            Err(AmmError::InvalidReserves)
        );
    }

    #[test]
    fn price_rejects_scale_that_is_not_a_power_of_ten() {
        for bad in [0u64, 1_500] {
            assert!(matches!(
                quote_price_scaled(ether(1), ether(1), bad),
                Err(AmmError::InvalidConfiguration(_))
            ));
        }
        let Ok(p) = quote_price_scaled(ether(3), ether(2), 100) else {
            panic!("valid scale");
        };
        assert_eq!(p.to_string(), "1.50");
    }

    // -- quote_output_amount --------------------------------------------------

    #[test]
    fn selling_tokens_for_native() {
        // 100 * 990 * 3 / (300 * 1000 + 100 * 990), in 18-decimal units
        assert_eq!(
            quote_output_amount(ether(100), ether(300), ether(3)),
            Ok(dec("744360902255639097"))
        );
    }

    #[test]
    fn selling_native_for_tokens() {
        assert_eq!(
            quote_output_amount(ether(100), ether(3), ether(300)),
            Ok(dec("291176470588235294117"))
        );
    }

    #[test]
    fn small_integer_reserves() {
        // 10 * 990 * 1e18 / (100 * 1000 + 10 * 990)
        assert_eq!(
            quote_output_amount(Amount::from(10u64), Amount::from(100u64), ether(1)),
            Ok(dec("90081892629663330"))
        );
    }

    #[test]
    fn zero_input_reserve_is_invalid() {
        assert_eq!(
            quote_output_amount(ether(1), Amount::ZERO, ether(1)),
            Err(AmmError::InvalidReserves)
        );
    }

    #[test]
    fn zero_output_reserve_is_invalid() {
        assert_eq!(
            quote_output_amount(ether(1), ether(1), Amount::ZERO),
            Err(AmmError::InvalidReserves)
        );
    }

    #[test]
    fn zero_input_is_invalid() {
        assert_eq!(
            quote_output_amount(Amount::ZERO, ether(1), ether(1)),
            Err(AmmError::InvalidTokenAmountSold)
        );
    }

    #[test]
    fn reserve_check_precedes_input_check() {
        assert_eq!(
            quote_output_amount(Amount::ZERO, Amount::ZERO, ether(1)),
            Err(AmmError::InvalidReserves)
        );
    }

    #[test]
    fn zero_fee_matches_plain_constant_product() {
        let free = FeeTier::new(BasisPoints::ZERO);
        // 100 * 200 / (100 + 100) = 100
        assert_eq!(
            quote_output_amount_with_fee(
                Amount::from(100u64),
                Amount::from(100u64),
                Amount::from(200u64),
                free
            ),
            Ok(Amount::from(100u64))
        );
    }

    #[test]
    fn fee_above_one_hundred_percent_rejected() {
        let bad = FeeTier::new(BasisPoints::new(10_001));
        assert!(matches!(
            quote_output_amount_with_fee(ether(1), ether(1), ether(1), bad),
            Err(AmmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn overflow_is_reported() {
        assert!(matches!(
            quote_output_amount(Amount::MAX, ether(1), ether(1)),
            Err(AmmError::Overflow(_))
        ));
    }

    // -- quote_input_amount ---------------------------------------------------

    #[test]
    fn input_for_exact_output_rounds_up() {
        // ceil(300e18 * 1e18 * 10_000 / (2e18 * 9_900))
        assert_eq!(
            quote_input_amount(ether(1), ether(300), ether(3)),
            Ok(dec("151515151515151515152"))
        );
    }

    #[test]
    fn quoted_input_buys_at_least_the_output() {
        let Ok(input) = quote_input_amount(ether(1), ether(300), ether(3)) else {
            panic!("expected Ok");
        };
        let Ok(out) = quote_output_amount(input, ether(300), ether(3)) else {
            panic!("expected Ok");
        };
        assert!(out >= ether(1));
    }

    #[test]
    fn input_for_whole_reserve_is_invalid() {
        assert_eq!(
            quote_input_amount(ether(3), ether(300), ether(3)),
            Err(AmmError::InvalidReserves)
        );
    }

    #[test]
    fn input_for_zero_output_is_invalid() {
        assert_eq!(
            quote_input_amount(Amount::ZERO, ether(300), ether(3)),
            Err(AmmError::InvalidTokenAmountSold)
        );
    }
}
