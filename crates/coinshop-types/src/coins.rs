//! Coin amounts
//!
//! Amounts are unsigned integers of indivisible units. Arithmetic is always
//! checked: a balance can neither overflow nor go below zero without the
//! caller seeing it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of coins.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Coins(u64);

impl Coins {
    /// Create an amount from raw units.
    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    /// The zero amount.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Raw units.
    pub const fn units(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition; `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction; `None` if the result would go below zero.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Coins {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

/// Conversion from a signed database integer. Fails on negative values,
/// which the schema forbids but a corrupted store could still produce.
impl TryFrom<i64> for Coins {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value).map(Self).map_err(|_| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_arithmetic() {
        let a = Coins::new(100);
        let b = Coins::new(40);

        assert_eq!(a.checked_add(b), Some(Coins::new(140)));
        assert_eq!(a.checked_sub(b), Some(Coins::new(60)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(Coins::new(u64::MAX).checked_add(Coins::new(1)), None);
    }

    #[test]
    fn ordering() {
        assert!(Coins::new(100) > Coins::new(50));
        assert!(Coins::zero().is_zero());
    }

    #[test]
    fn negative_db_value_rejected() {
        assert_eq!(Coins::try_from(42i64), Ok(Coins::new(42)));
        assert!(Coins::try_from(-1i64).is_err());
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&Coins::new(250)).unwrap();
        assert_eq!(json, "250");
    }
}
