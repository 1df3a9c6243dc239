//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use native_amm::prelude::*;
//!
//! let market = Market::new(MarketConfig::default()).expect("valid config");
//! assert!(market.registry().is_empty());
//! ```

pub use crate::config::MarketConfig;
pub use crate::domain::{Address, Amount, Asset, Event, FeeTier, Reserves, Rounding, ScaledPrice};
pub use crate::error::{AmmError, Result};
pub use crate::factory::Registry;
pub use crate::ledger::TokenLedger;
pub use crate::market::Market;
pub use crate::math::{quote_output_amount, quote_price, CheckedArithmetic};
pub use crate::pools::{ExchangePool, Settlement, Withdrawal};
pub use crate::traits::FungibleLedger;
