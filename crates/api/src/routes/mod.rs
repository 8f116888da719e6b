//! HTTP route handlers and their shared wire types.

pub mod customers;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod stores;

use std::fmt::Display;
use std::str::FromStr;

use common::{Address, Money};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Money on the wire: minor units plus currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyBody {
    pub amount: i64,
    pub currency: String,
}

impl MoneyBody {
    pub fn into_money(self) -> Result<Money, ApiError> {
        Ok(Money::new(self.amount, &self.currency)?)
    }
}

impl From<&Money> for MoneyBody {
    fn from(money: &Money) -> Self {
        Self {
            amount: money.amount(),
            currency: money.currency().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBody {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl AddressBody {
    pub fn into_address(self) -> Result<Address, ApiError> {
        Ok(Address::new(
            self.street,
            self.city,
            self.state,
            self.zip_code,
            self.country,
        )?)
    }
}

impl From<&Address> for AddressBody {
    fn from(address: &Address) -> Self {
        Self {
            street: address.street().to_string(),
            city: address.city().to_string(),
            state: address.state().to_string(),
            zip_code: address.zip_code().to_string(),
            country: address.country().to_string(),
        }
    }
}

/// Parses a path or body identifier, reporting which one was malformed.
pub(crate) fn parse_id<T>(raw: &str, field: &str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid {field}: {e}")))
}
