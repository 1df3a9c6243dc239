//! The native/token exchange pool.
//!
//! [`ExchangePool`] holds the pricing and share-accounting logic; it
//! never owns balances.  Each call borrows the ledgers it settles on
//! through a [`Settlement`], which also carries the call's event buffer.
//!
//! | Operation | Moves |
//! |-----------|-------|
//! | [`add_liquidity`](ExchangePool::add_liquidity) | native + token in, shares minted |
//! | [`remove_liquidity`](ExchangePool::remove_liquidity) | shares burned, native + token out |
//! | [`token_to_native_swap`](ExchangePool::token_to_native_swap) | token in, native out |
//! | [`native_to_token_swap`](ExchangePool::native_to_token_swap) | native in, token out |
//! | [`native_to_token_transfer`](ExchangePool::native_to_token_transfer) | native in, token out to a third party |
//! | [`bridge_out`](ExchangePool::bridge_out) / [`refund_bridge`](ExchangePool::refund_bridge) | first leg of a token-to-token swap and its undo |

mod exchange_pool;
mod settlement;

#[cfg(test)]
mod proptest_properties;

pub use exchange_pool::{ExchangePool, Withdrawal};
pub use settlement::Settlement;
