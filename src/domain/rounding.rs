//! Explicit rounding direction for integer division.

/// Rounding direction for division on [`Amount`](super::Amount).
///
/// Every division in the exchange names its direction.  Quantities paid
/// out by a pool (swap outputs, redemptions, minted shares) round
/// [`Down`](Self::Down); quantities a caller must pay in for an exact
/// output round [`Up`](Self::Up).  Either way the pool never loses value
/// to truncation.
///
/// # Examples
///
/// ```
/// use native_amm::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert!(Rounding::Down.is_down());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }
}
