//! # Native AMM
//!
//! Constant-product exchange between a native settlement asset and
//! fungible tokens, with a registry that allows at most one pool per
//! token.
//!
//! This crate provides domain types, the constant-product pricing
//! primitives, an in-memory fungible ledger, the exchange pool, the pool
//! registry and a [`Market`](market::Market) host that runs every call
//! atomically.
//!
//! # Quick Start
//!
//! ```rust
//! use native_amm::config::MarketConfig;
//! use native_amm::domain::{Address, Amount};
//! use native_amm::market::Market;
//!
//! let alice = Address::from_low_u64_be(1);
//! let bob = Address::from_low_u64_be(2);
//! let ether = |n: u64| Amount::from_units(n, 18).expect("fits");
//!
//! // 1. Deploy a token and create its pool
//! let mut market = Market::new(MarketConfig::default()).expect("valid config");
//! let token = market.deploy_token("Token", "TKN").expect("deployed");
//! let pool = market.create_pool(token).expect("pool created");
//!
//! // 2. Seed the pool: 300 tokens for 3 native
//! market.fund_native(alice, ether(10)).expect("funded");
//! market.mint(token, alice, ether(300)).expect("minted");
//! market.approve(token, alice, pool, ether(300)).expect("approved");
//! market.add_liquidity(token, alice, ether(300), ether(3)).expect("deposit");
//!
//! // 3. Swap 1 native for tokens with a slippage floor of 70 tokens
//! market.fund_native(bob, ether(1)).expect("funded");
//! let out = market
//!     .native_to_token_swap(token, bob, ether(1), ether(70))
//!     .expect("swap");
//! assert_eq!(out.to_string(), "74436090225563909774");
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Market     │  ledgers, event log, atomic calls
//! └──────┬──────┘
//!        │ create_pool / lookup
//!        ▼
//! ┌─────────────┐
//! │  Registry    │  one pool per token
//! └──────┬──────┘
//!        │ Settlement (ledgers + event buffer)
//!        ▼
//! ┌─────────────┐
//! │ ExchangePool │  liquidity, swaps, shares
//! └──────┬──────┘
//!        │ quote_output_amount, quote_price
//!        ▼
//! ┌─────────────┐
//! │    Math      │  checked 256-bit arithmetic
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`Address`](domain::Address), [`FeeTier`](domain::FeeTier), [`Event`](domain::Event) |
//! | [`math`]   | Checked arithmetic and constant-product pricing |
//! | [`traits`] | The [`FungibleLedger`](traits::FungibleLedger) seam |
//! | [`ledger`] | In-memory [`TokenLedger`](ledger::TokenLedger) |
//! | [`pools`]  | [`ExchangePool`](pools::ExchangePool) and [`Settlement`](pools::Settlement) |
//! | [`factory`] | The pool [`Registry`](factory::Registry) |
//! | [`config`] | [`MarketConfig`](config::MarketConfig), loadable from TOML |
//! | [`market`] | The [`Market`](market::Market) host |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports |
//!
//! # Logging
//!
//! Pool creation and liquidity changes are logged at `info`, swaps at
//! `debug`, and rejected or rolled-back calls at `warn`, through
//! [`tracing`].  The crate never installs a subscriber.

pub mod config;
pub mod domain;
pub mod error;
pub mod factory;
pub mod ledger;
pub mod market;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
