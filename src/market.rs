//! The hosting environment: ledgers, registry and committed event log.
//!
//! A [`Market`] executes every call atomically.  Pool operations validate
//! against a reserve snapshot before mutating anything, and their events
//! are collected in a per-call buffer that is appended to the log only
//! when the call succeeds.  The one call that mutates before it can know
//! whether it will succeed, [`Market::token_to_token_swap`], undoes its
//! first leg explicitly when the second leg fails.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::{MarketConfig, TOKEN_DEPLOYER};
use crate::domain::{Address, Amount, Asset, Event, Reserves, ScaledPrice};
use crate::error::AmmError;
use crate::factory::Registry;
use crate::ledger::TokenLedger;
use crate::pools::{ExchangePool, Settlement, Withdrawal};
use crate::traits::FungibleLedger;

/// Native ledger, token ledgers, pool registry and event log.
///
/// # Example
///
/// ```rust
/// use native_amm::config::MarketConfig;
/// use native_amm::domain::{Address, Amount};
/// use native_amm::market::Market;
///
/// let mut market = Market::new(MarketConfig::default()).expect("valid config");
/// let alice = Address::from_low_u64_be(1);
///
/// let token = market.deploy_token("Token", "TKN").expect("deployed");
/// market.create_pool(token).expect("pool created");
/// let pool = market.lookup(&token).expect("registered");
///
/// market.fund_native(alice, Amount::from(1u64)).expect("funded");
/// market.mint(token, alice, Amount::from(100u64)).expect("minted");
/// market.approve(token, alice, pool, Amount::from(100u64)).expect("approved");
///
/// let shares = market
///     .add_liquidity(token, alice, Amount::from(100u64), Amount::from(1u64))
///     .expect("deposit");
/// assert_eq!(shares, Amount::from(1u64));
/// assert_eq!(market.token_supply(&token), Ok(Amount::from(100u64)));
/// ```
#[derive(Debug, Clone)]
pub struct Market {
    config: MarketConfig,
    native: TokenLedger,
    tokens: BTreeMap<Address, TokenLedger>,
    registry: Registry,
    events: Vec<Event>,
    deployed: u64,
}

impl Market {
    /// Creates an empty market.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(config: MarketConfig) -> Result<Self, AmmError> {
        let registry = Registry::new(&config)?;
        let native = TokenLedger::new(
            Asset::Native,
            config.native_name.clone(),
            config.native_symbol.clone(),
        );
        Ok(Self {
            config,
            native,
            tokens: BTreeMap::new(),
            registry,
            events: Vec::new(),
            deployed: 0,
        })
    }

    /// Deployment configuration.
    #[must_use]
    pub const fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// The pool registry.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Committed events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Removes and returns every committed event.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // -- ledgers ------------------------------------------------------------

    /// Deploys a new token ledger at a derived address.
    ///
    /// # Errors
    ///
    /// [`AmmError::Overflow`] if the deployment counter is exhausted.
    pub fn deploy_token(
        &mut self,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Result<Address, AmmError> {
        let mut address = TOKEN_DEPLOYER.derive(self.deployed)?;
        while self.is_address_in_use(&address) {
            self.deployed = self
                .deployed
                .checked_add(1)
                .ok_or(AmmError::Overflow("token nonce overflow"))?;
            address = TOKEN_DEPLOYER.derive(self.deployed)?;
        }
        self.deploy_token_at(address, name, symbol)?;
        self.deployed += 1;
        Ok(address)
    }

    /// Deploys a new token ledger at `address`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidTokenAddress`] if `address` is zero.
    /// - [`AmmError::InvalidConfiguration`] if `address` already hosts a
    ///   token or a pool.
    pub fn deploy_token_at(
        &mut self,
        address: Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Result<(), AmmError> {
        if address.is_zero() {
            return Err(AmmError::InvalidTokenAddress);
        }
        if self.is_address_in_use(&address) {
            return Err(AmmError::InvalidConfiguration("address already in use"));
        }
        let ledger = TokenLedger::new(Asset::Token(address), name, symbol);
        info!(token = %address, symbol = ledger.symbol(), "token deployed");
        self.tokens.insert(address, ledger);
        Ok(())
    }

    /// Returns `true` if `address` hosts a token ledger or a pool.
    #[must_use]
    pub fn is_address_in_use(&self, address: &Address) -> bool {
        self.tokens.contains_key(address) || self.registry.is_pool(address)
    }

    /// Ledger of `token`, if deployed.
    #[must_use]
    pub fn token_ledger(&self, token: &Address) -> Option<&TokenLedger> {
        self.tokens.get(token)
    }

    /// The native ledger.
    #[must_use]
    pub const fn native_ledger(&self) -> &TokenLedger {
        &self.native
    }

    /// Credits `amount` of the native asset to `account`.
    ///
    /// # Errors
    ///
    /// [`AmmError::ZeroAddress`] or [`AmmError::Overflow`].
    pub fn fund_native(&mut self, account: Address, amount: Amount) -> Result<(), AmmError> {
        let event = self.native.mint(account, amount)?;
        self.events.push(event);
        Ok(())
    }

    /// Moves native from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InsufficientBalance`] or [`AmmError::ZeroAddress`].
    pub fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let event = self.native.transfer(from, to, amount)?;
        self.events.push(event);
        Ok(())
    }

    /// Mints `amount` of `token` to `to`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] or any ledger error.
    pub fn mint(&mut self, token: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        let event = self.ledger_mut(token)?.mint(to, amount)?;
        self.events.push(event);
        Ok(())
    }

    /// Burns `amount` of `from`'s `token` balance.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] or any ledger error.
    pub fn burn(
        &mut self,
        token: Address,
        from: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let event = self.ledger_mut(token)?.burn(from, amount)?;
        self.events.push(event);
        Ok(())
    }

    /// Sets `spender`'s allowance over `owner`'s `token` balance.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] or any ledger error.
    pub fn approve(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let event = self.ledger_mut(token)?.approve(owner, spender, amount)?;
        self.events.push(event);
        Ok(())
    }

    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] or any ledger error.
    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let event = self.ledger_mut(token)?.transfer(from, to, amount)?;
        self.events.push(event);
        Ok(())
    }

    /// Native balance of `account`.
    #[must_use]
    pub fn native_balance(&self, account: &Address) -> Amount {
        self.native.balance_of(account)
    }

    /// `token` balance of `account`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] if `token` is not deployed.
    pub fn token_balance(&self, token: &Address, account: &Address) -> Result<Amount, AmmError> {
        Ok(self.ledger(*token)?.balance_of(account))
    }

    /// `spender`'s remaining allowance over `owner`'s `token` balance.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] if `token` is not deployed.
    pub fn allowance(
        &self,
        token: &Address,
        owner: &Address,
        spender: &Address,
    ) -> Result<Amount, AmmError> {
        Ok(self.ledger(*token)?.allowance(owner, spender))
    }

    // -- registry -----------------------------------------------------------

    /// Creates the pool for `token` at an address no token ledger occupies.
    ///
    /// # Errors
    ///
    /// See [`Registry::create_pool_avoiding`].
    pub fn create_pool(&mut self, token: Address) -> Result<Address, AmmError> {
        let mut buffered = Vec::new();
        let tokens = &self.tokens;
        let pool = self.registry.create_pool_avoiding(
            token,
            |a| tokens.contains_key(a),
            &mut buffered,
        )?;
        self.events.append(&mut buffered);
        Ok(pool)
    }

    /// Pool address for `token`, if any.
    #[must_use]
    pub fn lookup(&self, token: &Address) -> Option<Address> {
        self.registry.lookup(token)
    }

    /// Pool trading `token`, if any.
    #[must_use]
    pub fn pool(&self, token: &Address) -> Option<&ExchangePool> {
        self.registry.pool(token)
    }

    // -- pool views ---------------------------------------------------------

    /// Reserve snapshot of the pool trading `token`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownPool`] or [`AmmError::UnknownToken`].
    pub fn reserves(&self, token: &Address) -> Result<Reserves, AmmError> {
        let pool = self.pool_for(token)?;
        Ok(pool.reserves(&self.native, self.ledger(*token)?))
    }

    /// Token reserve of the pool trading `token`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownPool`] or [`AmmError::UnknownToken`].
    pub fn token_supply(&self, token: &Address) -> Result<Amount, AmmError> {
        Ok(self.reserves(token)?.token)
    }

    /// Native reserve of the pool trading `token`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownPool`] or [`AmmError::UnknownToken`].
    pub fn native_reserve(&self, token: &Address) -> Result<Amount, AmmError> {
        Ok(self.reserves(token)?.native)
    }

    /// `reserve_a / reserve_b` at the market's price scale.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidReserves`] if either reserve is zero.
    pub fn price(&self, reserve_a: Amount, reserve_b: Amount) -> Result<ScaledPrice, AmmError> {
        crate::math::quote_price_scaled(reserve_a, reserve_b, self.config.price_scale)
    }

    /// Native paid for selling `tokens_sold` into the pool right now.
    ///
    /// # Errors
    ///
    /// Lookup errors, or the pricing errors of
    /// [`ExchangePool::native_amount_for`].
    pub fn native_amount_for(
        &self,
        token: &Address,
        tokens_sold: Amount,
    ) -> Result<Amount, AmmError> {
        let reserves = self.reserves(token)?;
        self.pool_for(token)?.native_amount_for(tokens_sold, reserves)
    }

    /// Tokens paid for selling `native_sold` into the pool right now.
    ///
    /// # Errors
    ///
    /// Lookup errors, or the pricing errors of
    /// [`ExchangePool::token_amount_for`].
    pub fn token_amount_for(
        &self,
        token: &Address,
        native_sold: Amount,
    ) -> Result<Amount, AmmError> {
        let reserves = self.reserves(token)?;
        self.pool_for(token)?.token_amount_for(native_sold, reserves)
    }

    /// Tokens to sell for exactly `native_out`.
    ///
    /// # Errors
    ///
    /// Lookup errors, or [`AmmError::InvalidReserves`] if `native_out`
    /// would drain the pool.
    pub fn tokens_needed_for(
        &self,
        token: &Address,
        native_out: Amount,
    ) -> Result<Amount, AmmError> {
        let reserves = self.reserves(token)?;
        self.pool_for(token)?.tokens_needed_for(native_out, reserves)
    }

    /// Native to sell for exactly `tokens_out`.
    ///
    /// # Errors
    ///
    /// Lookup errors, or [`AmmError::InvalidReserves`] if `tokens_out`
    /// would drain the pool.
    pub fn native_needed_for(
        &self,
        token: &Address,
        tokens_out: Amount,
    ) -> Result<Amount, AmmError> {
        let reserves = self.reserves(token)?;
        self.pool_for(token)?.native_needed_for(tokens_out, reserves)
    }

    /// Shares of `holder` in the pool trading `token`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownPool`].
    pub fn share_balance(&self, token: &Address, holder: &Address) -> Result<Amount, AmmError> {
        Ok(self.pool_for(token)?.balance_of(holder))
    }

    /// Outstanding shares of the pool trading `token`.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownPool`].
    pub fn total_shares(&self, token: &Address) -> Result<Amount, AmmError> {
        Ok(self.pool_for(token)?.total_shares())
    }

    // -- pool calls ---------------------------------------------------------

    /// Deposits liquidity into the pool trading `token`.
    ///
    /// # Errors
    ///
    /// See [`ExchangePool::add_liquidity`].
    pub fn add_liquidity(
        &mut self,
        token: Address,
        provider: Address,
        max_tokens: Amount,
        native_sent: Amount,
    ) -> Result<Amount, AmmError> {
        self.settle(token, "add_liquidity", |pool, s| {
            pool.add_liquidity(s, provider, max_tokens, native_sent)
        })
    }

    /// Redeems `shares` from the pool trading `token`.
    ///
    /// # Errors
    ///
    /// See [`ExchangePool::remove_liquidity`].
    pub fn remove_liquidity(
        &mut self,
        token: Address,
        provider: Address,
        shares: Amount,
    ) -> Result<Withdrawal, AmmError> {
        self.settle(token, "remove_liquidity", |pool, s| {
            pool.remove_liquidity(s, provider, shares)
        })
    }

    /// Sells `tokens_sold` for native.
    ///
    /// # Errors
    ///
    /// See [`ExchangePool::token_to_native_swap`].
    pub fn token_to_native_swap(
        &mut self,
        token: Address,
        seller: Address,
        tokens_sold: Amount,
        min_native: Amount,
    ) -> Result<Amount, AmmError> {
        self.settle(token, "token_to_native_swap", |pool, s| {
            pool.token_to_native_swap(s, seller, tokens_sold, min_native)
        })
    }

    /// Sells `native_sent` for tokens.
    ///
    /// # Errors
    ///
    /// See [`ExchangePool::native_to_token_swap`].
    pub fn native_to_token_swap(
        &mut self,
        token: Address,
        buyer: Address,
        native_sent: Amount,
        min_tokens: Amount,
    ) -> Result<Amount, AmmError> {
        self.settle(token, "native_to_token_swap", |pool, s| {
            pool.native_to_token_swap(s, buyer, native_sent, min_tokens)
        })
    }

    /// Sells `native_sent` for tokens paid to `recipient`.
    ///
    /// # Errors
    ///
    /// See [`ExchangePool::native_to_token_transfer`].
    pub fn native_to_token_transfer(
        &mut self,
        token: Address,
        buyer: Address,
        recipient: Address,
        native_sent: Amount,
        min_tokens: Amount,
    ) -> Result<Amount, AmmError> {
        self.settle(token, "native_to_token_transfer", |pool, s| {
            pool.native_to_token_transfer(s, buyer, recipient, native_sent, min_tokens)
        })
    }

    /// Sells `tokens_sold` of `token` for `other_token`, bridging through
    /// the native asset.
    ///
    /// The first leg pulls the tokens into `token`'s pool and prices the
    /// native it owes; the second leg spends that native in
    /// `other_token`'s pool and pays `seller`.  If the second leg fails,
    /// the first is undone before the error is returned.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidReserves`] if `other_token` has no pool.
    /// - [`AmmError::InsufficientOutputAmount`] below `min_other_out`.
    /// - Any error of either leg.
    pub fn token_to_token_swap(
        &mut self,
        token: Address,
        seller: Address,
        tokens_sold: Amount,
        min_other_out: Amount,
        other_token: Address,
    ) -> Result<Amount, AmmError> {
        let mut buffered = Vec::new();
        let result = self.route(
            token,
            other_token,
            seller,
            tokens_sold,
            min_other_out,
            &mut buffered,
        );
        match result {
            Ok(out) => {
                self.events.append(&mut buffered);
                Ok(out)
            }
            Err(err) => {
                warn!(
                    token = %token,
                    other = %other_token,
                    error = %err,
                    "token_to_token_swap rolled back"
                );
                Err(err)
            }
        }
    }

    fn route(
        &mut self,
        token: Address,
        other_token: Address,
        seller: Address,
        tokens_sold: Amount,
        min_other_out: Amount,
        events: &mut Vec<Event>,
    ) -> Result<Amount, AmmError> {
        let first = self
            .registry
            .pool(&token)
            .ok_or(AmmError::UnknownPool(token))?;
        let second = self
            .registry
            .pool(&other_token)
            .ok_or(AmmError::InvalidReserves)?;

        let ledger = self
            .tokens
            .get_mut(&token)
            .ok_or(AmmError::UnknownToken(token))?;
        let bridged = first.bridge_out(
            &mut Settlement::new(&mut self.native, ledger, events),
            seller,
            tokens_sold,
        )?;

        let second_leg = match self.tokens.get_mut(&other_token) {
            Some(ledger) => second.native_to_token_transfer(
                &mut Settlement::new(&mut self.native, ledger, events),
                first.address(),
                seller,
                bridged,
                min_other_out,
            ),
            None => Err(AmmError::UnknownToken(other_token)),
        };

        match second_leg {
            Ok(out) => {
                events.push(Event::TokenToToken {
                    pool: first.address(),
                    tokens_sold,
                });
                debug!(
                    pool = %first.address(),
                    other_pool = %second.address(),
                    tokens_sold = %tokens_sold,
                    native_bridged = %bridged,
                    tokens_out = %out,
                    "token to token swap"
                );
                Ok(out)
            }
            Err(err) => {
                warn!(
                    pool = %first.address(),
                    seller = %seller,
                    tokens_sold = %tokens_sold,
                    error = %err,
                    "second leg failed, refunding first leg"
                );
                let ledger = self
                    .tokens
                    .get_mut(&token)
                    .ok_or(AmmError::UnknownToken(token))?;
                first.refund_bridge(
                    &mut Settlement::new(&mut self.native, ledger, events),
                    seller,
                    tokens_sold,
                )?;
                Err(err)
            }
        }
    }

    // -- internals ----------------------------------------------------------

    fn ledger(&self, token: Address) -> Result<&TokenLedger, AmmError> {
        self.tokens.get(&token).ok_or(AmmError::UnknownToken(token))
    }

    fn ledger_mut(&mut self, token: Address) -> Result<&mut TokenLedger, AmmError> {
        self.tokens
            .get_mut(&token)
            .ok_or(AmmError::UnknownToken(token))
    }

    fn pool_for(&self, token: &Address) -> Result<&ExchangePool, AmmError> {
        self.registry
            .pool(token)
            .ok_or(AmmError::UnknownPool(*token))
    }

    /// Runs one pool call and commits its events only if it succeeds.
    fn settle<R>(
        &mut self,
        token: Address,
        call: &'static str,
        op: impl FnOnce(&mut ExchangePool, &mut Settlement<'_, TokenLedger>) -> Result<R, AmmError>,
    ) -> Result<R, AmmError> {
        let pool = self
            .registry
            .pool_mut(&token)
            .ok_or(AmmError::UnknownPool(token))?;
        let ledger = self
            .tokens
            .get_mut(&token)
            .ok_or(AmmError::UnknownToken(token))?;

        let mut buffered = Vec::new();
        let result = op(
            pool,
            &mut Settlement::new(&mut self.native, ledger, &mut buffered),
        );
        match result {
            Ok(value) => {
                self.events.append(&mut buffered);
                Ok(value)
            }
            Err(err) => {
                warn!(token = %token, call, error = %err, "call rejected");
                Err(err)
            }
        }
    }
}
