//! Property-based tests for the pricing and pool invariants.
//!
//! 1. **Quote monotonicity**: a larger input never yields a smaller output.
//! 2. **Fee cost**: the fee-adjusted output is strictly below the no-fee
//!    constant-product output.
//! 3. **Invariant preservation**: `native × token` never decreases across
//!    a swap.
//! 4. **Liquidity round trip**: a first deposit removed in full returns
//!    exactly what was deposited.
//! 5. **Exact-output quote**: selling the quoted input buys at least the
//!    requested output.

use proptest::prelude::*;

use crate::domain::{Address, Amount, Asset, BasisPoints, Event, FeeTier, Rounding};
use crate::ledger::TokenLedger;
use crate::math::{
    quote_input_amount, quote_output_amount, quote_output_amount_with_fee, CheckedArithmetic,
};
use crate::pools::{ExchangePool, Settlement};
use crate::traits::FungibleLedger;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn trader() -> Address {
    Address::from_low_u64_be(0xa1)
}

fn token_addr() -> Address {
    Address::from_low_u64_be(0x70)
}

fn amt(v: u128) -> Amount {
    Amount::from(v)
}

/// Reserves between 1e3 and 1e27 raw units.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000u128..1_000_000_000_000_000_000_000_000_000u128
}

fn input_strategy() -> impl Strategy<Value = u128> {
    1u128..1_000_000_000_000_000_000_000_000u128
}

struct Harness {
    pool: ExchangePool,
    native: TokenLedger,
    token: TokenLedger,
    events: Vec<Event>,
}

/// Pool seeded by `trader` with the given reserves; the trader keeps a
/// second copy of each to swap with.
fn seeded(native_reserve: u128, token_reserve: u128) -> Harness {
    let Ok(pool) = ExchangePool::new(
        Address::from_low_u64_be(0xee),
        token_addr(),
        FeeTier::default(),
        1_000,
    ) else {
        panic!("valid pool");
    };
    let mut native = TokenLedger::new(Asset::Native, "Ether", "ETH");
    let mut token = TokenLedger::new(Asset::Token(token_addr()), "Token", "TKN");
    let Ok(_) = native.mint(trader(), amt(native_reserve * 2)) else {
        panic!("mint native");
    };
    let Ok(_) = token.mint(trader(), amt(token_reserve * 2)) else {
        panic!("mint token");
    };
    let Ok(_) = token.approve(trader(), pool.address(), Amount::MAX) else {
        panic!("approve");
    };
    let mut m = Harness {
        pool,
        native,
        token,
        events: Vec::new(),
    };
    let mut s = Settlement::new(&mut m.native, &mut m.token, &mut m.events);
    let Ok(_) = m
        .pool
        .add_liquidity(&mut s, trader(), amt(token_reserve), amt(native_reserve))
    else {
        panic!("seed deposit");
    };
    m
}

// ---------------------------------------------------------------------------
// Properties 1 & 2: quote shape
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_quote_is_monotone(
        ri in reserve_strategy(),
        ro in reserve_strategy(),
        a in input_strategy(),
        b in input_strategy(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let Ok(out_lo) = quote_output_amount(amt(lo), amt(ri), amt(ro)) else {
            return Ok(());
        };
        let Ok(out_hi) = quote_output_amount(amt(hi), amt(ri), amt(ro)) else {
            return Ok(());
        };
        prop_assert!(out_lo <= out_hi, "out({lo})={out_lo} > out({hi})={out_hi}");
    }

    #[test]
    fn prop_fee_output_below_no_fee_output(
        ri in reserve_strategy(),
        ro in reserve_strategy(),
        input in input_strategy(),
    ) {
        let Ok(with_fee) = quote_output_amount(amt(input), amt(ri), amt(ro)) else {
            return Ok(());
        };
        let free = FeeTier::new(BasisPoints::ZERO);
        let Ok(no_fee) = quote_output_amount_with_fee(amt(input), amt(ri), amt(ro), free) else {
            return Ok(());
        };
        // exact no-fee output is ro·in/(ri+in); compare against its ceiling
        let Ok(exact_ceil) = amt(ro).mul_div(
            &amt(input),
            &amt(ri).safe_add(&amt(input)).unwrap_or(Amount::MAX),
            Rounding::Up,
        ) else {
            return Ok(());
        };
        prop_assert!(with_fee <= no_fee);
        prop_assert!(with_fee < exact_ceil || exact_ceil.is_zero());
    }
}

// ---------------------------------------------------------------------------
// Property 3: invariant preservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_product_non_decreasing_token_to_native(
        rn in reserve_strategy(),
        rt in reserve_strategy(),
        sold in input_strategy(),
    ) {
        let mut m = seeded(rn, rt);
        let Some(k_before) = m.pool.reserves(&m.native, &m.token).product() else {
            return Ok(());
        };
        let sold = amt(sold.min(rt));
        let mut s = Settlement::new(&mut m.native, &mut m.token, &mut m.events);
        if m.pool.token_to_native_swap(&mut s, trader(), sold, Amount::ZERO).is_err() {
            return Ok(());
        }
        let Some(k_after) = m.pool.reserves(&m.native, &m.token).product() else {
            return Ok(());
        };
        prop_assert!(k_after >= k_before, "k shrank: {k_before} -> {k_after}");
    }

    #[test]
    fn prop_product_non_decreasing_native_to_token(
        rn in reserve_strategy(),
        rt in reserve_strategy(),
        sent in input_strategy(),
    ) {
        let mut m = seeded(rn, rt);
        let Some(k_before) = m.pool.reserves(&m.native, &m.token).product() else {
            return Ok(());
        };
        let sent = amt(sent.min(rn));
        let mut s = Settlement::new(&mut m.native, &mut m.token, &mut m.events);
        if m.pool.native_to_token_swap(&mut s, trader(), sent, Amount::ZERO).is_err() {
            return Ok(());
        }
        let Some(k_after) = m.pool.reserves(&m.native, &m.token).product() else {
            return Ok(());
        };
        prop_assert!(k_after >= k_before, "k shrank: {k_before} -> {k_after}");
    }
}

// ---------------------------------------------------------------------------
// Property 4: liquidity round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_first_deposit_round_trip(
        rn in reserve_strategy(),
        rt in reserve_strategy(),
    ) {
        let mut m = seeded(rn, rt);
        let shares = m.pool.balance_of(&trader());
        prop_assert_eq!(shares, amt(rn));
        let mut s = Settlement::new(&mut m.native, &mut m.token, &mut m.events);
        let Ok(out) = m.pool.remove_liquidity(&mut s, trader(), shares) else {
            return Err(TestCaseError::fail("remove all shares"));
        };
        prop_assert_eq!(out.native, amt(rn));
        prop_assert_eq!(out.token, amt(rt));
        prop_assert!(m.pool.total_shares().is_zero());
    }
}

// ---------------------------------------------------------------------------
// Property 5: exact-output quote
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_quoted_input_buys_requested_output(
        ri in reserve_strategy(),
        ro in reserve_strategy(),
        want in input_strategy(),
    ) {
        let want = amt(want % ro.max(2)).max(amt(1));
        let Ok(input) = quote_input_amount(want, amt(ri), amt(ro)) else {
            return Ok(());
        };
        let Ok(got) = quote_output_amount(input, amt(ri), amt(ro)) else {
            return Ok(());
        };
        prop_assert!(got >= want, "input {input} bought {got} < {want}");
    }
}
