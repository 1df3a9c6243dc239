//! Notifications emitted by ledgers, pools and the registry.

use core::fmt;

use super::{Address, Amount, Asset};

/// An observable state change.
///
/// Events are buffered while a call runs and committed to the market's
/// log only if the call succeeds, so a failed call leaves no trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Balance moved on a ledger.  Mints come from, and burns go to, the
    /// zero address.
    Transfer {
        /// Ledger the transfer happened on.
        asset: Asset,
        /// Debited account.
        from: Address,
        /// Credited account.
        to: Address,
        /// Amount moved.
        amount: Amount,
    },
    /// An allowance was set.
    Approval {
        /// Token ledger.
        token: Address,
        /// Account whose balance may be spent.
        owner: Address,
        /// Account allowed to spend.
        spender: Address,
        /// New allowance.
        amount: Amount,
    },
    /// The registry created a pool.
    PoolCreated {
        /// Token the pool trades.
        token: Address,
        /// Address of the new pool.
        pool: Address,
    },
    /// Liquidity was deposited.
    LiquidityAdded {
        /// Pool receiving the deposit.
        pool: Address,
        /// Depositor.
        provider: Address,
        /// Token amount actually pulled.
        token_amount: Amount,
        /// Native amount deposited.
        native_amount: Amount,
        /// Shares minted.
        shares: Amount,
    },
    /// Liquidity was withdrawn.
    LiquidityRemoved {
        /// Pool paying out.
        pool: Address,
        /// Share holder.
        provider: Address,
        /// Native amount paid.
        native_amount: Amount,
        /// Token amount paid.
        token_amount: Amount,
        /// Shares burned.
        shares: Amount,
    },
    /// Native was sold for tokens.
    TokenPurchase {
        /// Pool.
        pool: Address,
        /// Account that paid the native amount.
        buyer: Address,
        /// Account that received the tokens.
        recipient: Address,
        /// Native amount sold.
        native_sold: Amount,
        /// Tokens bought.
        tokens_bought: Amount,
    },
    /// Tokens were sold for native.
    NativePurchase {
        /// Pool.
        pool: Address,
        /// Seller.
        buyer: Address,
        /// Tokens sold.
        tokens_sold: Amount,
        /// Native amount bought.
        native_bought: Amount,
    },
    /// A token-to-token swap routed through this pool.
    TokenToToken {
        /// Pool the tokens were sold into.
        pool: Address,
        /// Tokens sold.
        tokens_sold: Amount,
    },
}

impl Event {
    /// Short event name, as it would appear in a log.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::PoolCreated { .. } => "PoolCreated",
            Self::LiquidityAdded { .. } => "LiquidityAdded",
            Self::LiquidityRemoved { .. } => "LiquidityRemoved",
            Self::TokenPurchase { .. } => "TokenPurchase",
            Self::NativePurchase { .. } => "NativePurchase",
            Self::TokenToToken { .. } => "TokenToToken",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer {
                asset,
                from,
                to,
                amount,
            } => write!(f, "Transfer({asset}, {from} -> {to}, {amount})"),
            Self::Approval {
                owner,
                spender,
                amount,
                ..
            } => write!(f, "Approval({owner} -> {spender}, {amount})"),
            Self::PoolCreated { token, pool } => write!(f, "PoolCreated({token} => {pool})"),
            Self::LiquidityAdded {
                token_amount,
                native_amount,
                shares,
                ..
            } => write!(f, "LiquidityAdded({token_amount}, {native_amount}, {shares})"),
            Self::LiquidityRemoved {
                native_amount,
                token_amount,
                shares,
                ..
            } => write!(f, "LiquidityRemoved({native_amount}, {token_amount}, {shares})"),
            Self::TokenPurchase {
                native_sold,
                tokens_bought,
                ..
            } => write!(f, "TokenPurchase({native_sold} -> {tokens_bought})"),
            Self::NativePurchase {
                tokens_sold,
                native_bought,
                ..
            } => write!(f, "NativePurchase({tokens_sold} -> {native_bought})"),
            Self::TokenToToken { tokens_sold, .. } => write!(f, "TokenToToken({tokens_sold})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        let e = Event::TokenToToken {
            pool: Address::zero(),
            tokens_sold: Amount::from(10u64),
        };
        assert_eq!(e.name(), "TokenToToken");
        assert_eq!(e.to_string(), "TokenToToken(10)");
    }

    #[test]
    fn liquidity_added_display_lists_amounts() {
        let e = Event::LiquidityAdded {
            pool: Address::zero(),
            provider: Address::zero(),
            token_amount: Amount::from(100u64),
            native_amount: Amount::from(1u64),
            shares: Amount::from(1u64),
        };
        assert_eq!(e.to_string(), "LiquidityAdded(100, 1, 1)");
    }
}
