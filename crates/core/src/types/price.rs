//! Money and currency types.
//!
//! Prices use decimal arithmetic (`rust_decimal::Decimal`) in the currency's
//! standard unit. The payment gateway bills in minor units (paise for INR),
//! so the conversion lives here next to the currency type.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the store.
///
/// The store sells in rupees; the other codes exist for display and for the
/// gateway's currency field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// The ISO 4217 code as a static string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// The display symbol for this currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INR" => Ok(Self::INR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(format!("unsupported currency code: {s}")),
        }
    }
}

/// Convert an amount in the currency's standard unit to minor units
/// (rupees → paise, dollars → cents).
///
/// Returns `None` if the amount does not fit in an `i64` after scaling.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (amount * Decimal::ONE_HUNDRED).round().to_i64()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units_whole_amount() {
        assert_eq!(to_minor_units(Decimal::from(1299)), Some(129_900));
    }

    #[test]
    fn test_minor_units_fractional_amount() {
        // 499.50 rupees = 49950 paise
        assert_eq!(to_minor_units(Decimal::new(49_950, 2)), Some(49_950));
    }

    #[test]
    fn test_minor_units_rounds_sub_paise() {
        // 10.005 scales to 1000.5 paise; the midpoint rounds to even (1000)
        assert_eq!(to_minor_units(Decimal::new(10_005, 3)), Some(1000));
    }

    #[test]
    fn test_currency_code_round_trip() {
        for code in [
            CurrencyCode::INR,
            CurrencyCode::USD,
            CurrencyCode::EUR,
            CurrencyCode::GBP,
        ] {
            assert_eq!(code.code().parse::<CurrencyCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_currency_code_rejects_unknown() {
        assert!("JPY".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_default_currency_is_inr() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::INR);
    }
}
