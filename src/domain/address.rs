//! Account, token and pool identity.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account identity.
///
/// The same identity space covers externally owned accounts, token
/// ledgers and pools: a pool's reserves are simply the balances held
/// by its address.  The all-zero address is reserved as the mint source
/// and burn sink and is never a valid token identity.
///
/// # Examples
///
/// ```
/// use native_amm::domain::Address;
///
/// let addr = Address::from_bytes([1u8; 20]);
/// assert_eq!(addr.as_bytes(), [1u8; 20]);
/// assert!(!addr.is_zero());
/// assert!(Address::zero().is_zero());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 20-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; ADDRESS_LEN] {
        self.0
    }

    /// Returns the all-zero address.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; ADDRESS_LEN])
    }

    /// Returns `true` if every byte is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Builds an address whose low eight bytes hold `value` big-endian.
    ///
    /// Handy for fixtures and for deterministic address derivation.
    #[must_use]
    pub fn from_low_u64_be(value: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Derives the address of the `nonce`-th account created by `self`.
    ///
    /// The trailing eight bytes carry `nonce + 1` and the first byte of the
    /// creator is flipped, so distinct nonces never collide and never yield
    /// the creator itself or the zero address.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] when `nonce` is `u64::MAX`.
    pub fn derive(&self, nonce: u64) -> Result<Self, AmmError> {
        let seq = nonce
            .checked_add(1)
            .ok_or(AmmError::Overflow("address nonce overflow"))?;
        let mut bytes = self.0;
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&seq.to_be_bytes());
        // keep derived accounts out of the creator's own slot
        bytes[0] ^= 0xa5;
        Ok(Self(bytes))
    }

    /// Returns `true` if [`derive`](Self::derive) on `self` and `other`
    /// can produce the same address.
    #[must_use]
    pub fn shares_derive_space(&self, other: &Self) -> bool {
        self.0[..ADDRESS_LEN - 8] == other.0[..ADDRESS_LEN - 8]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits)
            .map_err(|_| AmmError::InvalidConfiguration("address is not valid hex"))?;
        let bytes: [u8; ADDRESS_LEN] = raw
            .try_into()
            .map_err(|_| AmmError::InvalidConfiguration("address must be 20 bytes"))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AmmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_round_trip() {
        let bytes = [42u8; ADDRESS_LEN];
        let addr = Address::from_bytes(bytes);
        assert_eq!(addr.as_bytes(), bytes);
    }

    #[test]
    fn zero_is_all_zeros() {
        assert_eq!(Address::zero().as_bytes(), [0u8; ADDRESS_LEN]);
        assert!(Address::zero().is_zero());
        assert_eq!(Address::default(), Address::zero());
    }

    #[test]
    fn low_u64_places_value_at_the_end() {
        let addr = Address::from_low_u64_be(0x0102);
        let bytes = addr.as_bytes();
        assert_eq!(bytes[18], 0x01);
        assert_eq!(bytes[19], 0x02);
        assert!(bytes[..18].iter().all(|b| *b == 0));
    }

    #[test]
    fn derive_is_unique_per_nonce() {
        let creator = Address::from_low_u64_be(7);
        let Ok(a) = creator.derive(0) else {
            panic!("derive ok");
        };
        let Ok(b) = creator.derive(1) else {
            panic!("derive ok");
        };
        assert_ne!(a, b);
        assert_ne!(a, creator);
        assert!(!a.is_zero());
    }

    #[test]
    fn derive_from_zero_creator_is_not_zero() {
        let Ok(a) = Address::zero().derive(0) else {
            panic!("derive ok");
        };
        assert!(!a.is_zero());
    }

    #[test]
    fn derive_rejects_nonce_overflow() {
        let creator = Address::from_low_u64_be(7);
        assert!(matches!(
            creator.derive(u64::MAX),
            Err(AmmError::Overflow(_))
        ));
    }

    #[test]
    fn derive_space_ignores_the_nonce_bytes() {
        let a = Address::from_low_u64_be(7);
        let b = Address::from_low_u64_be(8);
        assert!(a.shares_derive_space(&b));
        let (Ok(from_a), Ok(from_b)) = (a.derive(3), b.derive(3)) else {
            panic!("derive ok");
        };
        assert_eq!(from_a, from_b);

        let c = Address::from_bytes([0x7e; ADDRESS_LEN]);
        assert!(!a.shares_derive_space(&c));
    }

    #[test]
    fn display_is_prefixed_hex() {
        let addr = Address::from_low_u64_be(0xff);
        assert_eq!(
            addr.to_string(),
            "0x00000000000000000000000000000000000000ff"
        );
    }

    #[test]
    fn parse_round_trip() {
        let addr = Address::from_low_u64_be(0xdead_beef);
        let Ok(parsed) = addr.to_string().parse::<Address>() else {
            panic!("valid hex");
        };
        assert_eq!(parsed, addr);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("zz".parse::<Address>().is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let lo = Address::from_bytes([0u8; ADDRESS_LEN]);
        let hi = Address::from_bytes([1u8; ADDRESS_LEN]);
        assert!(lo < hi);
    }
}
