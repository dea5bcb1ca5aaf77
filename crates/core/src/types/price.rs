//! Type-safe price representation using decimal arithmetic.
//!
//! Every money value that reaches the CRM goes through [`round_cents`], so
//! sums like `price * quantity` never carry floating-point residue such as
//! `1499.9700000000003` into a deal's `Amount`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round a decimal amount to whole cents, half away from zero.
///
/// ```
/// use rust_decimal::Decimal;
/// use tgf_core::round_cents;
///
/// assert_eq!(round_cents(Decimal::new(10_005, 3)), Decimal::new(1_001, 2));
/// ```
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price from a number of cents.
    #[must_use]
    pub fn usd_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2), CurrencyCode::USD)
    }

    /// Returns the amount rounded to cents.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        round_cents(self.amount)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.rounded())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    CAD,
}

impl CurrencyCode {
    /// Currency symbol used in descriptions.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD => "$",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents_half_away_from_zero() {
        assert_eq!(round_cents(Decimal::new(12_345, 3)), Decimal::new(1_235, 2));
        assert_eq!(round_cents(Decimal::new(-12_345, 3)), Decimal::new(-1_235, 2));
        assert_eq!(round_cents(Decimal::new(12_344, 3)), Decimal::new(1_234, 2));
    }

    #[test]
    fn test_round_cents_keeps_exact_values() {
        assert_eq!(round_cents(Decimal::new(49_999, 2)), Decimal::new(49_999, 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::usd_cents(64_999).display(), "$649.99");
        assert_eq!(
            Price::new(Decimal::new(5, 0), CurrencyCode::USD).display(),
            "$5.00"
        );
    }
}
