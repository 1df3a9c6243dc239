//! Deployment configuration of a market.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, BasisPoints, FeeTier, ScaledPrice, DEFAULT_PRICE_SCALE};
use crate::error::AmmError;

/// Account that derives the addresses of tokens deployed by a market.
pub const TOKEN_DEPLOYER: Address = Address::from_bytes([0x7e; 20]);

/// Immutable parameters a market is deployed with.
///
/// Every pool created by the market's registry inherits the same fee
/// and price scale; neither can be chosen per call.  Defaults reproduce
/// the classic exchange: 1% fee, prices with three fractional digits,
/// native asset named Ether.
///
/// # TOML
///
/// ```toml
/// fee_bps = 100
/// price_scale = 1000
/// registry_address = "0x00000000000000000000000000000000000000fa"
/// native_name = "Ether"
/// native_symbol = "ETH"
/// ```
///
/// Missing keys fall back to their defaults; unknown keys are rejected.
///
/// # Validation
///
/// - The fee must be strictly below 100%.
/// - The price scale must be a non-zero power of ten.
/// - The registry address must not be zero, and must not derive pool
///   addresses in the range [`TOKEN_DEPLOYER`] derives token addresses in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketConfig {
    /// Fee retained from every swap input.
    #[serde(rename = "fee_bps")]
    pub fee_tier: FeeTier,
    /// Fixed-point scale of [`ScaledPrice`](crate::domain::ScaledPrice) quotes.
    pub price_scale: u64,
    /// Address of the registry; pool addresses are derived from it.
    pub registry_address: Address,
    /// Name of the native asset.
    pub native_name: String,
    /// Symbol of the native asset.
    pub native_symbol: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            fee_tier: FeeTier::default(),
            price_scale: DEFAULT_PRICE_SCALE,
            registry_address: Address::from_low_u64_be(0xfa),
            native_name: "Ether".to_owned(),
            native_symbol: "ETH".to_owned(),
        }
    }
}

impl MarketConfig {
    /// Creates a validated configuration with default metadata.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(fee_tier: FeeTier, price_scale: u64) -> Result<Self, AmmError> {
        let config = Self {
            fee_tier,
            price_scale,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Config`] if the text is not valid TOML for this shape.
    /// - Any error from [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> Result<Self, AmmError> {
        let config: Self = toml::from_str(text).map_err(|e| AmmError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] naming the first
    /// violated invariant.
    pub fn validate(&self) -> Result<(), AmmError> {
        let bps = self.fee_tier.basis_points();
        if !bps.is_valid_percent() || bps == BasisPoints::MAX_PERCENT {
            return Err(AmmError::InvalidConfiguration("fee must be below 100%"));
        }
        if !ScaledPrice::is_valid_scale(self.price_scale) {
            return Err(AmmError::InvalidConfiguration(
                "price scale must be a power of ten",
            ));
        }
        if self.registry_address.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "registry address must not be zero",
            ));
        }
        if self.registry_address.shares_derive_space(&TOKEN_DEPLOYER) {
            return Err(AmmError::InvalidConfiguration(
                "registry address overlaps the token deployer",
            ));
        }
        Ok(())
    }
}
