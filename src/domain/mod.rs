//! Fundamental domain value types used throughout the exchange.
//!
//! Identities ([`Address`], [`Asset`]), quantities ([`Amount`],
//! [`BasisPoints`], [`FeeTier`], [`ScaledPrice`]), the per-call
//! [`Reserves`] snapshot and the [`Event`] notifications.  All numeric
//! types are newtypes with checked arithmetic.

mod address;
mod amount;
mod asset;
mod basis_points;
mod event;
mod fee_tier;
mod price;
mod reserves;
mod rounding;

pub use address::{Address, ADDRESS_LEN};
pub use amount::Amount;
pub use asset::Asset;
pub use basis_points::BasisPoints;
pub use event::Event;
pub use fee_tier::FeeTier;
pub use price::{ScaledPrice, DEFAULT_PRICE_SCALE};
pub use reserves::Reserves;
pub use rounding::Rounding;
