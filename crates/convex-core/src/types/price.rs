//! Price type for bond pricing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

use super::Currency;
use crate::error::{ConvexError, ConvexResult};

/// A bond price with currency.
///
/// Prices are typically quoted as a percentage of face value (e.g., 98.50 = 98.50%).
///
/// # Example
///
/// ```rust
/// use convex_core::types::{Price, Currency};
/// use rust_decimal_macros::dec;
///
/// let price = Price::new(dec!(98.50), Currency::USD);
/// assert_eq!(price.as_percentage(), dec!(98.50));
/// assert_eq!(price.as_decimal(), dec!(0.9850));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Price as a percentage of par (e.g., 98.50 for 98.50%)
    value: Decimal,
    /// Currency of the price
    currency: Currency,
}

impl Price {
    /// Creates a new price from a percentage value.
    ///
    /// The value should be expressed as a percentage of par (e.g., 98.50 for 98.50%).
    #[must_use]
    pub fn new(percentage: Decimal, currency: Currency) -> Self {
        Self {
            value: percentage,
            currency,
        }
    }

    /// Creates a price from a decimal value (0.985 = 98.5%).
    #[must_use]
    pub fn from_decimal(decimal: Decimal, currency: Currency) -> Self {
        Self {
            value: decimal * Decimal::ONE_HUNDRED,
            currency,
        }
    }

    /// Validates that the price is positive.
    ///
    /// # Errors
    ///
    /// Returns `ConvexError::InvalidPrice` if the price is not positive.
    pub fn validate(&self) -> ConvexResult<()> {
        if self.value <= Decimal::ZERO {
            return Err(ConvexError::InvalidPrice {
                value: self.value,
                reason: "Price must be positive".into(),
            });
        }
        Ok(())
    }

    /// Returns the price as a percentage of par.
    #[must_use]
    pub fn as_percentage(&self) -> Decimal {
        self.value
    }

    /// Returns the price as a decimal (percentage / 100).
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        self.value / Decimal::ONE_HUNDRED
    }

    /// Returns the currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the bond is trading at par.
    #[must_use]
    pub fn is_at_par(&self) -> bool {
        self.value == Decimal::ONE_HUNDRED
    }

    /// Returns true if the bond is trading at a discount.
    #[must_use]
    pub fn is_discount(&self) -> bool {
        self.value < Decimal::ONE_HUNDRED
    }

    /// Returns true if the bond is trading at a premium.
    #[must_use]
    pub fn is_premium(&self) -> bool {
        self.value > Decimal::ONE_HUNDRED
    }

    /// Creates a par price (100) in the given currency.
    #[must_use]
    pub fn par(currency: Currency) -> Self {
        Self {
            value: Decimal::ONE_HUNDRED,
            currency,
        }
    }

    /// Calculates the price difference from par.
    ///
    /// Positive for premium bonds, negative for discount bonds.
    #[must_use]
    pub fn discount_or_premium(&self) -> Decimal {
        self.value - Decimal::ONE_HUNDRED
    }

    /// Calculates dirty price from clean price and accrued interest.
    ///
    /// # Arguments
    ///
    /// * `accrued` - Accrued interest as percentage of par
    #[must_use]
    pub fn to_dirty(&self, accrued: Decimal) -> Self {
        Self {
            value: self.value + accrued,
            currency: self.currency,
        }
    }

    /// Calculates clean price from dirty price and accrued interest.
    ///
    /// # Arguments
    ///
    /// * `accrued` - Accrued interest as percentage of par
    #[must_use]
    pub fn to_clean(&self, accrued: Decimal) -> Self {
        Self {
            value: self.value - accrued,
            currency: self.currency,
        }
    }

    /// Calculates the dollar value for a given face amount.
    ///
    /// # Arguments
    ///
    /// * `face_value` - Face value of the position
    #[must_use]
    pub fn dollar_value(&self, face_value: Decimal) -> Decimal {
        self.as_decimal() * face_value
    }

    /// Rounds the price to the specified number of decimal places.
    #[must_use]
    pub fn round(&self, decimal_places: u32) -> Self {
        Self {
            value: self.value.round_dp(decimal_places),
            currency: self.currency,
        }
    }

    /// Returns true if prices have the same currency.
    #[must_use]
    pub fn same_currency(&self, other: &Self) -> bool {
        self.currency == other.currency
    }
}

impl Add<Decimal> for Price {
    type Output = Self;

    /// Adds a decimal value to the price.
    fn add(self, rhs: Decimal) -> Self::Output {
        Self {
            value: self.value + rhs,
            currency: self.currency,
        }
    }
}

impl Sub<Decimal> for Price {
    type Output = Self;

    /// Subtracts a decimal value from the price.
    fn sub(self, rhs: Decimal) -> Self::Output {
        Self {
            value: self.value - rhs,
            currency: self.currency,
        }
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency != other.currency {
            None // Can't compare prices in different currencies
        } else {
            self.value.partial_cmp(&other.value)
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} {}", self.value, self.currency)
    }
}
