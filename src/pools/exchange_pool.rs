//! Native/token exchange pool.
//!
//! One pool trades a single token against the native asset.  Its
//! reserves are not stored: they are the balances the pool's address
//! holds on the native ledger and on the token ledger, read once per
//! call into a [`Reserves`] snapshot.  Liquidity providers receive pool
//! shares, a fungible claim tracked on the pool's own [`TokenLedger`].
//!
//! # Call shape
//!
//! Every mutating operation follows the same order:
//!
//! 1. snapshot the reserves;
//! 2. price and validate against the snapshot (amounts, slippage floor,
//!    balances and allowances);
//! 3. apply the ledger mutations and push their events.
//!
//! No step-3 mutation starts before every step-2 check has passed, so a
//! failing call leaves the ledgers and the share supply unchanged.

use tracing::{debug, info};

use crate::domain::{Address, Amount, Asset, Event, FeeTier, Reserves, Rounding, ScaledPrice};
use crate::error::AmmError;
use crate::ledger::TokenLedger;
use crate::math::{
    quote_input_amount_with_fee, quote_output_amount_with_fee, quote_price_scaled,
    CheckedArithmetic,
};
use crate::pools::Settlement;
use crate::traits::FungibleLedger;

const SHARE_NAME: &str = "Exchange Pool Share";
const SHARE_SYMBOL: &str = "EPS";

/// Assets paid out by [`ExchangePool::remove_liquidity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Withdrawal {
    /// Native amount paid to the share holder.
    pub native: Amount,
    /// Token amount paid to the share holder.
    pub token: Amount,
}

/// A constant-product pool between the native asset and one token.
///
/// # Example
///
/// ```rust
/// use native_amm::domain::{Address, Amount, Asset, FeeTier};
/// use native_amm::ledger::TokenLedger;
/// use native_amm::pools::{ExchangePool, Settlement};
/// use native_amm::traits::FungibleLedger;
///
/// let token = Address::from_low_u64_be(0x70);
/// let alice = Address::from_low_u64_be(1);
/// let pool_addr = Address::from_low_u64_be(0xee);
/// let mut pool =
///     ExchangePool::new(pool_addr, token, FeeTier::default(), 1_000).expect("valid pool");
///
/// let mut native = TokenLedger::new(Asset::Native, "Ether", "ETH");
/// let mut tokens = TokenLedger::new(Asset::Token(token), "Token", "TKN");
/// native.mint(alice, Amount::from(1u64)).expect("mint");
/// tokens.mint(alice, Amount::from(100u64)).expect("mint");
/// tokens.approve(alice, pool.address(), Amount::from(100u64)).expect("approve");
///
/// let mut events = Vec::new();
/// let mut settlement = Settlement::new(&mut native, &mut tokens, &mut events);
/// let shares = pool
///     .add_liquidity(&mut settlement, alice, Amount::from(100u64), Amount::from(1u64))
///     .expect("first deposit");
/// assert_eq!(shares, Amount::from(1u64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangePool {
    address: Address,
    token: Address,
    fee_tier: FeeTier,
    price_scale: u64,
    shares: TokenLedger,
}

impl ExchangePool {
    /// Creates an empty pool at `address` trading `token`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidTokenAddress`] if `token` is zero.
    /// - [`AmmError::ZeroAddress`] if `address` is zero.
    /// - [`AmmError::InvalidConfiguration`] if the fee is 100% or more, or
    ///   the price scale is not a power of ten.
    pub fn new(
        address: Address,
        token: Address,
        fee_tier: FeeTier,
        price_scale: u64,
    ) -> Result<Self, AmmError> {
        if token.is_zero() {
            return Err(AmmError::InvalidTokenAddress);
        }
        if address.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        if fee_tier.input_factor().filter(|f| !f.is_zero()).is_none() {
            return Err(AmmError::InvalidConfiguration("fee must be below 100%"));
        }
        if !ScaledPrice::is_valid_scale(price_scale) {
            return Err(AmmError::InvalidConfiguration(
                "price scale must be a power of ten",
            ));
        }
        Ok(Self {
            address,
            token,
            fee_tier,
            price_scale,
            shares: TokenLedger::new(Asset::Token(address), SHARE_NAME, SHARE_SYMBOL),
        })
    }

    /// Account holding the pool's reserves.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Token traded by this pool.
    #[must_use]
    pub const fn token(&self) -> Address {
        self.token
    }

    /// Fee retained from every swap input.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }

    /// Fixed-point scale of [`price`](Self::price) quotes.
    #[must_use]
    pub const fn price_scale(&self) -> u64 {
        self.price_scale
    }

    /// The share ledger.
    #[must_use]
    pub const fn shares(&self) -> &TokenLedger {
        &self.shares
    }

    /// Outstanding shares.
    #[must_use]
    pub fn total_shares(&self) -> Amount {
        self.shares.total_supply()
    }

    /// Shares held by `holder`.
    #[must_use]
    pub fn balance_of(&self, holder: &Address) -> Amount {
        self.shares.balance_of(holder)
    }

    /// Snapshot of both reserves.
    #[must_use]
    pub fn reserves<L: FungibleLedger + ?Sized>(&self, native: &L, token: &L) -> Reserves {
        Reserves::new(native.balance_of(&self.address), token.balance_of(&self.address))
    }

    /// Token reserve.
    #[must_use]
    pub fn token_supply<L: FungibleLedger + ?Sized>(&self, token: &L) -> Amount {
        token.balance_of(&self.address)
    }

    /// Native reserve.
    #[must_use]
    pub fn native_reserve<L: FungibleLedger + ?Sized>(&self, native: &L) -> Amount {
        native.balance_of(&self.address)
    }

    // -- views --------------------------------------------------------------

    /// `reserve_a / reserve_b` at this pool's price scale.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidReserves`] if either reserve is zero.
    pub fn price(&self, reserve_a: Amount, reserve_b: Amount) -> Result<ScaledPrice, AmmError> {
        quote_price_scaled(reserve_a, reserve_b, self.price_scale)
    }

    /// Native paid for selling `tokens_sold` against `reserves`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidReserves`] on an empty pool,
    /// [`AmmError::InvalidTokenAmountSold`] for a zero amount.
    pub fn native_amount_for(
        &self,
        tokens_sold: Amount,
        reserves: Reserves,
    ) -> Result<Amount, AmmError> {
        quote_output_amount_with_fee(tokens_sold, reserves.token, reserves.native, self.fee_tier)
    }

    /// Tokens paid for selling `native_sold` against `reserves`.
    ///
    /// # Errors
    ///
    /// Same as [`native_amount_for`](Self::native_amount_for).
    pub fn token_amount_for(
        &self,
        native_sold: Amount,
        reserves: Reserves,
    ) -> Result<Amount, AmmError> {
        quote_output_amount_with_fee(native_sold, reserves.native, reserves.token, self.fee_tier)
    }

    /// Tokens that must be sold to receive exactly `native_out`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidReserves`] if `native_out` would drain the pool.
    pub fn tokens_needed_for(
        &self,
        native_out: Amount,
        reserves: Reserves,
    ) -> Result<Amount, AmmError> {
        quote_input_amount_with_fee(native_out, reserves.token, reserves.native, self.fee_tier)
    }

    /// Native that must be sold to receive exactly `tokens_out`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidReserves`] if `tokens_out` would drain the pool.
    pub fn native_needed_for(
        &self,
        tokens_out: Amount,
        reserves: Reserves,
    ) -> Result<Amount, AmmError> {
        quote_input_amount_with_fee(tokens_out, reserves.native, reserves.token, self.fee_tier)
    }

    // -- liquidity ----------------------------------------------------------

    /// Deposits `native_sent` plus the matching token amount and mints
    /// shares to `provider`.
    ///
    /// On an empty pool the deposit sets the price: all of `max_tokens`
    /// is pulled and one share is minted per native unit.  Otherwise
    /// exactly `native_sent × token_reserve / native_reserve` tokens are
    /// pulled and `max_tokens` only bounds that amount.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidAmountToAdd`] if `native_sent` is zero, if
    ///   the first deposit carries no tokens, or if no share would be
    ///   minted.
    /// - [`AmmError::InsufficientTokenAmount`] if `max_tokens` is below
    ///   the amount the current ratio requires.
    /// - Ledger errors if `provider` lacks the balance or allowance.
    pub fn add_liquidity<L: FungibleLedger + ?Sized>(
        &mut self,
        settlement: &mut Settlement<'_, L>,
        provider: Address,
        max_tokens: Amount,
        native_sent: Amount,
    ) -> Result<Amount, AmmError> {
        if native_sent.is_zero() {
            return Err(AmmError::InvalidAmountToAdd);
        }
        let reserves = settlement.reserves(self.address);

        let (token_used, minted) = if reserves.is_empty() {
            if max_tokens.is_zero() {
                return Err(AmmError::InvalidAmountToAdd);
            }
            (max_tokens, native_sent)
        } else {
            if reserves.native.is_zero() {
                return Err(AmmError::InvalidReserves);
            }
            let required =
                native_sent.mul_div(&reserves.token, &reserves.native, Rounding::Down)?;
            if max_tokens < required {
                return Err(AmmError::InsufficientTokenAmount {
                    required,
                    provided: max_tokens,
                });
            }
            let minted =
                self.total_shares()
                    .mul_div(&native_sent, &reserves.native, Rounding::Down)?;
            (required, minted)
        };
        if minted.is_zero() {
            return Err(AmmError::InvalidAmountToAdd);
        }
        // share supply is checked before either ledger moves
        let total_shares = self.total_shares().safe_add(&minted)?;
        settlement.native.ensure_transfer(&provider, native_sent)?;
        settlement
            .token
            .ensure_transfer_from(&provider, &self.address, token_used)?;

        let moved = settlement
            .native
            .transfer(provider, self.address, native_sent)?;
        settlement.events.push(moved);
        let pulled =
            settlement
                .token
                .transfer_from(self.address, provider, self.address, token_used)?;
        settlement.events.push(pulled);
        let issued = self.shares.mint(provider, minted)?;
        settlement.events.push(issued);
        settlement.events.push(Event::LiquidityAdded {
            pool: self.address,
            provider,
            token_amount: token_used,
            native_amount: native_sent,
            shares: minted,
        });

        info!(
            pool = %self.address,
            provider = %provider,
            token_amount = %token_used,
            native_amount = %native_sent,
            shares = %minted,
            total_shares = %total_shares,
            "liquidity added"
        );
        Ok(minted)
    }

    /// Burns `shares` of `provider` and pays out the proportional part
    /// of both reserves, rounded down.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidAmountToRemove`] if `shares` is zero.
    /// - [`AmmError::InsufficientBalance`] if `provider` holds fewer
    ///   shares.
    pub fn remove_liquidity<L: FungibleLedger + ?Sized>(
        &mut self,
        settlement: &mut Settlement<'_, L>,
        provider: Address,
        shares: Amount,
    ) -> Result<Withdrawal, AmmError> {
        if shares.is_zero() {
            return Err(AmmError::InvalidAmountToRemove);
        }
        self.shares.ensure_transfer(&provider, shares)?;
        let reserves = settlement.reserves(self.address);
        let total = self.total_shares();

        let payout = Withdrawal {
            native: reserves.native.mul_div(&shares, &total, Rounding::Down)?,
            token: reserves.token.mul_div(&shares, &total, Rounding::Down)?,
        };
        settlement
            .native
            .ensure_transfer(&self.address, payout.native)?;
        settlement.token.ensure_transfer(&self.address, payout.token)?;

        let burned = self.shares.burn(provider, shares)?;
        settlement.events.push(burned);
        let paid = settlement
            .native
            .transfer(self.address, provider, payout.native)?;
        settlement.events.push(paid);
        let paid = settlement
            .token
            .transfer(self.address, provider, payout.token)?;
        settlement.events.push(paid);
        settlement.events.push(Event::LiquidityRemoved {
            pool: self.address,
            provider,
            native_amount: payout.native,
            token_amount: payout.token,
            shares,
        });

        info!(
            pool = %self.address,
            provider = %provider,
            native_amount = %payout.native,
            token_amount = %payout.token,
            shares = %shares,
            "liquidity removed"
        );
        Ok(payout)
    }

    // -- swaps --------------------------------------------------------------

    /// Sells `tokens_sold` of `seller` for native.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientTokenSold`] if `tokens_sold` is zero.
    /// - [`AmmError::InvalidReserves`] on an empty pool.
    /// - [`AmmError::InsufficientOutputAmount`] below `min_native`.
    /// - Ledger errors if `seller` lacks the balance or allowance.
    pub fn token_to_native_swap<L: FungibleLedger + ?Sized>(
        &self,
        settlement: &mut Settlement<'_, L>,
        seller: Address,
        tokens_sold: Amount,
        min_native: Amount,
    ) -> Result<Amount, AmmError> {
        if tokens_sold.is_zero() {
            return Err(AmmError::InsufficientTokenSold);
        }
        let reserves = settlement.reserves(self.address);
        let native_out = self.native_amount_for(tokens_sold, reserves)?;
        ensure_floor(native_out, min_native)?;
        settlement
            .token
            .ensure_transfer_from(&seller, &self.address, tokens_sold)?;
        settlement.native.ensure_transfer(&self.address, native_out)?;

        let pulled =
            settlement
                .token
                .transfer_from(self.address, seller, self.address, tokens_sold)?;
        settlement.events.push(pulled);
        let paid = settlement
            .native
            .transfer(self.address, seller, native_out)?;
        settlement.events.push(paid);
        settlement.events.push(Event::NativePurchase {
            pool: self.address,
            buyer: seller,
            tokens_sold,
            native_bought: native_out,
        });

        debug!(
            pool = %self.address,
            seller = %seller,
            tokens_sold = %tokens_sold,
            native_out = %native_out,
            "token to native swap"
        );
        Ok(native_out)
    }

    /// Sells `native_sent` of `buyer` for tokens paid to `buyer`.
    ///
    /// # Errors
    ///
    /// See [`native_to_token_transfer`](Self::native_to_token_transfer).
    pub fn native_to_token_swap<L: FungibleLedger + ?Sized>(
        &self,
        settlement: &mut Settlement<'_, L>,
        buyer: Address,
        native_sent: Amount,
        min_tokens: Amount,
    ) -> Result<Amount, AmmError> {
        self.native_to_token_transfer(settlement, buyer, buyer, native_sent, min_tokens)
    }

    /// Sells `native_sent` of `payer` for tokens paid to `recipient`.
    ///
    /// The quote uses the native reserve as it stood before `native_sent`
    /// arrives.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAddress`] if `recipient` is zero.
    /// - [`AmmError::InvalidReserves`] on an empty pool.
    /// - [`AmmError::InvalidTokenAmountSold`] if `native_sent` is zero.
    /// - [`AmmError::InsufficientOutputAmount`] below `min_tokens`.
    /// - [`AmmError::InsufficientBalance`] if `payer` cannot pay.
    pub fn native_to_token_transfer<L: FungibleLedger + ?Sized>(
        &self,
        settlement: &mut Settlement<'_, L>,
        payer: Address,
        recipient: Address,
        native_sent: Amount,
        min_tokens: Amount,
    ) -> Result<Amount, AmmError> {
        if recipient.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        let reserves = settlement.reserves(self.address);
        let tokens_out = self.token_amount_for(native_sent, reserves)?;
        ensure_floor(tokens_out, min_tokens)?;
        settlement.native.ensure_transfer(&payer, native_sent)?;
        settlement.token.ensure_transfer(&self.address, tokens_out)?;

        let received = settlement
            .native
            .transfer(payer, self.address, native_sent)?;
        settlement.events.push(received);
        let paid = settlement
            .token
            .transfer(self.address, recipient, tokens_out)?;
        settlement.events.push(paid);
        settlement.events.push(Event::TokenPurchase {
            pool: self.address,
            buyer: payer,
            recipient,
            native_sold: native_sent,
            tokens_bought: tokens_out,
        });

        debug!(
            pool = %self.address,
            payer = %payer,
            recipient = %recipient,
            native_sent = %native_sent,
            tokens_out = %tokens_out,
            "native to token swap"
        );
        Ok(tokens_out)
    }

    // -- token-to-token legs ------------------------------------------------

    /// First leg of a token-to-token swap: pulls `tokens_sold` from
    /// `seller` and returns the native amount this pool owes the second
    /// leg, priced against the reserves before the pull.
    ///
    /// The native amount stays in this pool until the second leg spends
    /// it from [`address`](Self::address).
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientTokenSold`] if `tokens_sold` is zero.
    /// - [`AmmError::InvalidReserves`] on an empty pool.
    /// - Ledger errors if `seller` lacks the balance or allowance.
    pub fn bridge_out<L: FungibleLedger + ?Sized>(
        &self,
        settlement: &mut Settlement<'_, L>,
        seller: Address,
        tokens_sold: Amount,
    ) -> Result<Amount, AmmError> {
        if tokens_sold.is_zero() {
            return Err(AmmError::InsufficientTokenSold);
        }
        let reserves = settlement.reserves(self.address);
        let bridged = self.native_amount_for(tokens_sold, reserves)?;
        settlement
            .token
            .ensure_transfer_from(&seller, &self.address, tokens_sold)?;

        let pulled =
            settlement
                .token
                .transfer_from(self.address, seller, self.address, tokens_sold)?;
        settlement.events.push(pulled);

        debug!(
            pool = %self.address,
            seller = %seller,
            tokens_sold = %tokens_sold,
            native_bridged = %bridged,
            "bridge leg priced"
        );
        Ok(bridged)
    }

    /// Undoes [`bridge_out`](Self::bridge_out): returns the tokens to
    /// `seller` and restores the allowance the pull consumed.
    ///
    /// # Errors
    ///
    /// Ledger errors only; the pool holds the tokens it is returning.
    pub fn refund_bridge<L: FungibleLedger + ?Sized>(
        &self,
        settlement: &mut Settlement<'_, L>,
        seller: Address,
        tokens_sold: Amount,
    ) -> Result<(), AmmError> {
        let returned = settlement
            .token
            .transfer(self.address, seller, tokens_sold)?;
        settlement.events.push(returned);
        let restored = settlement
            .token
            .increase_allowance(seller, self.address, tokens_sold)?;
        settlement.events.push(restored);
        Ok(())
    }
}

/// Slippage floor check.
fn ensure_floor(got: Amount, minimum: Amount) -> Result<(), AmmError> {
    if got < minimum {
        return Err(AmmError::InsufficientOutputAmount { got, minimum });
    }
    Ok(())
}
