//! Exact monetary amounts in minor units.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when constructing or combining money values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Amounts are never negative.
    #[error("Money amount cannot be negative: {amount}")]
    NegativeAmount { amount: i64 },

    /// Currency codes are three ASCII letters.
    #[error("Invalid currency code: '{code}'")]
    InvalidCurrency { code: String },

    /// Arithmetic between two different currencies.
    #[error("Currency mismatch: {left} and {right}")]
    CurrencyMismatch { left: String, right: String },

    /// The result does not fit in the amount range.
    #[error("Money amount overflow")]
    Overflow,
}

/// A non-negative amount of money in minor units (e.g. cents) plus an
/// ISO-style currency code.
///
/// Immutable: every operation returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMoney", into = "RawMoney")]
pub struct Money {
    amount: i64,
    currency: String,
}

/// Wire form, validated on the way in.
#[derive(Serialize, Deserialize)]
struct RawMoney {
    amount: i64,
    currency: String,
}

impl TryFrom<RawMoney> for Money {
    type Error = MoneyError;

    fn try_from(raw: RawMoney) -> Result<Self, Self::Error> {
        Money::new(raw.amount, &raw.currency)
    }
}

impl From<Money> for RawMoney {
    fn from(money: Money) -> Self {
        RawMoney {
            amount: money.amount,
            currency: money.currency,
        }
    }
}

impl Money {
    /// Creates a money value from minor units.
    ///
    /// The currency code is normalised to uppercase.
    pub fn new(amount: i64, currency: &str) -> Result<Self, MoneyError> {
        if amount < 0 {
            return Err(MoneyError::NegativeAmount { amount });
        }
        Ok(Self {
            amount,
            currency: normalize_currency(currency)?,
        })
    }

    /// Returns zero in the given currency.
    pub fn zero(currency: &str) -> Result<Self, MoneyError> {
        Self::new(0, currency)
    }

    /// Returns the amount in minor units.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Returns the currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the whole major units, rounding down (1495 cents -> 14).
    pub fn major_units(&self) -> i64 {
        self.amount / 100
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// Returns true if both values share a currency.
    pub fn same_currency(&self, other: &Money) -> bool {
        self.currency == other.currency
    }

    /// Adds two amounts of the same currency.
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Money {
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Subtracts an amount of the same currency. Fails if the result would
    /// be negative.
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self.amount - other.amount;
        if amount < 0 {
            return Err(MoneyError::NegativeAmount { amount });
        }
        Ok(Money {
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Result<Money, MoneyError> {
        let amount = self
            .amount
            .checked_mul(i64::from(quantity))
            .ok_or(MoneyError::Overflow)?;
        Ok(Money {
            amount,
            currency: self.currency.clone(),
        })
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.same_currency(other) {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            })
        }
    }
}

fn normalize_currency(code: &str) -> Result<String, MoneyError> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(MoneyError::InvalidCurrency {
            code: code.to_string(),
        });
    }
    Ok(code.to_ascii_uppercase())
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.amount / 100,
            self.amount % 100,
            self.currency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(amount: i64) -> Money {
        Money::new(amount, "USD").unwrap()
    }

    #[test]
    fn test_new_rejects_negative_amount() {
        assert_eq!(
            Money::new(-1, "USD"),
            Err(MoneyError::NegativeAmount { amount: -1 })
        );
    }

    #[test]
    fn test_new_validates_currency() {
        assert!(matches!(
            Money::new(100, ""),
            Err(MoneyError::InvalidCurrency { .. })
        ));
        assert!(matches!(
            Money::new(100, "US"),
            Err(MoneyError::InvalidCurrency { .. })
        ));
        assert!(matches!(
            Money::new(100, "U$D"),
            Err(MoneyError::InvalidCurrency { .. })
        ));
        assert_eq!(Money::new(100, "eur").unwrap().currency(), "EUR");
    }

    #[test]
    fn test_add_same_currency() {
        assert_eq!(usd(1000).checked_add(&usd(495)).unwrap(), usd(1495));
    }

    #[test]
    fn test_add_different_currency_fails() {
        let eur = Money::new(100, "EUR").unwrap();
        assert!(matches!(
            usd(100).checked_add(&eur),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_sub_below_zero_fails() {
        assert_eq!(usd(500).checked_sub(&usd(200)).unwrap(), usd(300));
        assert!(usd(100).checked_sub(&usd(200)).is_err());
    }

    #[test]
    fn test_multiply() {
        assert_eq!(usd(299).multiply(5).unwrap(), usd(1495));
        assert_eq!(usd(299).multiply(0).unwrap(), usd(0));
        assert_eq!(Money::new(i64::MAX, "USD").unwrap().multiply(2), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_major_units_rounds_down() {
        assert_eq!(usd(1495).major_units(), 14);
        assert_eq!(usd(99).major_units(), 0);
        assert_eq!(usd(500).major_units(), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(usd(1234).to_string(), "12.34 USD");
        assert_eq!(usd(5).to_string(), "0.05 USD");
        assert_eq!(usd(100).to_string(), "1.00 USD");
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_value(usd(299)).unwrap();
        assert_eq!(json, serde_json::json!({ "amount": 299, "currency": "USD" }));
    }

    #[test]
    fn test_deserialization_validates() {
        let bad: Result<Money, _> =
            serde_json::from_value(serde_json::json!({ "amount": -5, "currency": "USD" }));
        assert!(bad.is_err());

        let good: Money =
            serde_json::from_value(serde_json::json!({ "amount": 5, "currency": "usd" })).unwrap();
        assert_eq!(good, usd(5));
    }
}
