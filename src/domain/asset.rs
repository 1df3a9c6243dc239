//! Asset identity: the native settlement asset or a fungible token.

use core::fmt;

use super::Address;

/// Which ledger an amount is denominated in.
///
/// Pool shares are themselves a fungible token whose identity is the
/// pool's address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Asset {
    /// The native settlement asset.
    Native,
    /// A fungible token identified by its ledger address.
    Token(Address),
}

impl Asset {
    /// Returns the token address, or `None` for the native asset.
    #[must_use]
    pub const fn token(&self) -> Option<Address> {
        match self {
            Self::Native => None,
            Self::Token(addr) => Some(*addr),
        }
    }

    /// Returns `true` for [`Asset::Native`].
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Token(addr) => write!(f, "token:{addr}"),
        }
    }
}
