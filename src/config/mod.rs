//! Market deployment configuration.
//!
//! [`MarketConfig`] is the declarative blueprint a market is deployed
//! from: the swap fee, the price scale and the registry identity.

mod market_config;

pub use market_config::{MarketConfig, TOKEN_DEPLOYER};
