//! Prices

use std::fmt;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::{Deserialize, Serialize};

/// Represents a price in minor currency units (pence/cents/paise).
///
/// Catalog payloads and the order service speak in decimal major units;
/// conversion happens at those boundaries so that cart arithmetic stays
/// exact integer arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// A price of nothing.
    pub const ZERO: Price = Price(0);

    /// Upper bound on a normalised unit price, chosen so that a line
    /// total stays within `u64` at the largest representable quantity.
    const MAX_MINOR_UNITS: u64 = u64::MAX / u32::MAX as u64;

    /// Creates a new price from minor units.
    #[must_use]
    pub fn from_minor(value: u64) -> Self {
        Price(value)
    }

    /// Normalise a raw decimal amount, as found in catalog payloads, into
    /// minor units. Returns `None` for amounts that are negative, not
    /// finite, or too large to price a cart line.
    #[must_use]
    pub fn from_raw(amount: f64) -> Option<Self> {
        let amount = Decimal::from_f64(amount)?;
        (amount.round_dp(2) * Decimal::ONE_HUNDRED)
            .to_u64()
            .filter(|minor| *minor <= Self::MAX_MINOR_UNITS)
            .map(Price)
    }

    /// The amount in minor units.
    #[must_use]
    pub fn minor_units(&self) -> u64 {
        self.0
    }

    /// The amount in decimal major units, as the order service expects it.
    #[must_use]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.0), 2)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
