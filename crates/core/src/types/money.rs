//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupiah or dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
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

    /// Format for display, e.g. `Rp 15.000` or `$1,234.50`.
    #[must_use]
    pub fn display(&self) -> String {
        let currency = self.currency_code;
        let rounded = self
            .amount
            .abs()
            .round_dp_with_strategy(currency.minor_units(), RoundingStrategy::MidpointAwayFromZero);

        let text = format!("{rounded:.prec$}", prec = currency.minor_units() as usize);
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
        let grouped = group_thousands(whole, currency.thousands_separator());

        let sign = if self.amount.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        if fraction.is_empty() {
            format!("{sign}{}{grouped}", currency.symbol())
        } else {
            format!(
                "{sign}{}{grouped}{}{fraction}",
                currency.symbol(),
                currency.decimal_separator()
            )
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes supported by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    IDR,
    USD,
    EUR,
}

impl CurrencyCode {
    pub const ALL: [Self; 3] = [Self::IDR, Self::USD, Self::EUR];

    /// Display prefix.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::IDR => "Rp ",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::IDR => "IDR",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }

    /// Number of decimal places shown.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::IDR => 0,
            Self::USD | Self::EUR => 2,
        }
    }

    const fn thousands_separator(self) -> char {
        match self {
            Self::IDR => '.',
            Self::USD | Self::EUR => ',',
        }
    }

    const fn decimal_separator(self) -> char {
        match self {
            Self::IDR => ',',
            Self::USD | Self::EUR => '.',
        }
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IDR" => Ok(Self::IDR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn price(amount: &str, currency: CurrencyCode) -> Price {
        Price::new(Decimal::from_str(amount).unwrap(), currency)
    }

    #[test]
    fn test_idr_has_no_minor_units() {
        assert_eq!(price("15000", CurrencyCode::IDR).display(), "Rp 15.000");
        assert_eq!(price("1250000.4", CurrencyCode::IDR).display(), "Rp 1.250.000");
        assert_eq!(price("999.5", CurrencyCode::IDR).display(), "Rp 1.000");
    }

    #[test]
    fn test_usd_two_decimals_and_grouping() {
        assert_eq!(price("1234.5", CurrencyCode::USD).display(), "$1,234.50");
        assert_eq!(price("0", CurrencyCode::USD).display(), "$0.00");
        assert_eq!(price("12", CurrencyCode::EUR).display(), "€12.00");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(price("-5000", CurrencyCode::IDR).display(), "-Rp 5.000");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(CurrencyCode::from_str("idr").unwrap(), CurrencyCode::IDR);
        assert!(CurrencyCode::from_str("JPY").is_err());
    }
}
