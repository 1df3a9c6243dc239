//! Pool creation and lookup.
//!
//! The [`Registry`] is the only way to create an
//! [`ExchangePool`](crate::pools::ExchangePool): it rejects the zero
//! token, refuses a second pool for the same token and hands every pool
//! the market's fee and price scale.

mod registry;

pub use registry::Registry;
