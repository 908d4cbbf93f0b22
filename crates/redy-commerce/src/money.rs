//! Money type for representing monetary values.
//!
//! Uses integer amounts in the smallest currency unit to avoid
//! floating-point precision issues in monetary calculations. The
//! marketplace trades in Chilean pesos, which have no decimal places.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Chilean peso.
    #[default]
    CLP,
    USD,
}

impl Currency {
    /// Get the currency code (e.g., "CLP").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::CLP => "CLP",
            Currency::USD => "USD",
        }
    }

    /// Get the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::CLP => "$",
            Currency::USD => "US$",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::CLP => 0,
            Currency::USD => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "CLP" => Some(Currency::CLP),
            "USD" => Some(Currency::USD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (whole pesos
/// for CLP, cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
    pub amount: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value.
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create a CLP amount.
    ///
    /// ```
    /// use redy_commerce::money::Money;
    /// let price = Money::clp(15990);
    /// assert_eq!(price.amount, 15990);
    /// ```
    pub fn clp(amount: i64) -> Self {
        Self::new(amount, Currency::CLP)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// Format as a display string (e.g., "$15.990" for CLP).
    pub fn display(&self) -> String {
        match self.currency.decimal_places() {
            0 => format!("{}{}", self.currency.symbol(), group_thousands(self.amount)),
            places => {
                let divisor = 10_i64.pow(places);
                format!(
                    "{}{}.{:0width$}",
                    self.currency.symbol(),
                    self.amount / divisor,
                    (self.amount % divisor).abs(),
                    width = places as usize
                )
            }
        }
    }

    /// Try to add another Money value, returning None if currencies don't match.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount.checked_add(other.amount)?;
        Some(Money::new(amount, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount.checked_sub(other.amount)?;
        Some(Money::new(amount, self.currency))
    }

    /// Calculate a fraction of this amount given in basis points,
    /// rounding half away from zero.
    ///
    /// ```
    /// use redy_commerce::money::Money;
    /// let price = Money::clp(100_000);
    /// assert_eq!(price.percentage_bp(1500).amount, 15_000); // 15%
    /// ```
    pub fn percentage_bp(&self, basis_points: i64) -> Money {
        let scaled = self.amount as i128 * basis_points as i128;
        let rounded = if scaled >= 0 {
            (scaled + 5_000) / 10_000
        } else {
            (scaled - 5_000) / 10_000
        };
        Money::new(rounded as i64, self.currency)
    }

    /// Sum an iterator of Money values, returning None on currency
    /// mismatch or overflow.
    pub fn try_sum<'a>(iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        let mut acc = Money::zero(currency);
        for m in iter {
            acc = acc.try_add(m)?;
        }
        Some(acc)
    }
}

impl Add for Money {
    type Output = Money;

    /// # Panics
    /// Panics if currencies don't match. Use `try_add` for fallible addition.
    fn add(self, other: Money) -> Money {
        match self.try_add(&other) {
            Some(m) => m,
            None => panic!("Currency mismatch in addition"),
        }
    }
}

impl Sub for Money {
    type Output = Money;

    /// # Panics
    /// Panics if currencies don't match. Use `try_subtract` for fallible subtraction.
    fn sub(self, other: Money) -> Money {
        match self.try_subtract(&other) {
            Some(m) => m,
            None => panic!("Currency mismatch in subtraction"),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Insert thousands separators into a whole amount (e.g., 15990 -> "15.990").
fn group_thousands(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::new();
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
