//! Product entity owned by a store.

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

use super::StoreError;

/// Validated product name, 3 to 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductName(String);

impl ProductName {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 100;

    pub fn new(name: impl Into<String>) -> Result<Self, StoreError> {
        let name = name.into();
        let length = name.chars().count();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&length) {
            return Err(StoreError::InvalidProductName { length });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A product sold by a store. Identity is scoped to the owning store.
///
/// Products are never removed; deactivation is a soft delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: ProductName,
    description: String,
    price: Money,
    active: bool,
}

impl Product {
    pub(crate) fn new(
        name: ProductName,
        description: impl Into<String>,
        price: Money,
    ) -> Result<Self, StoreError> {
        if !price.is_positive() {
            return Err(StoreError::InvalidPrice {
                amount: price.amount(),
            });
        }

        Ok(Self {
            id: ProductId::new(),
            name,
            description: description.into(),
            price,
            active: true,
        })
    }

    pub(crate) fn set_price(&mut self, price: Money) -> Result<(), StoreError> {
        if !price.is_positive() {
            return Err(StoreError::InvalidPrice {
                amount: price.amount(),
            });
        }
        if !price.same_currency(&self.price) {
            return Err(StoreError::CurrencyMismatch {
                expected: self.price.currency().to_string(),
                actual: price.currency().to_string(),
            });
        }
        self.price = price;
        Ok(())
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &ProductName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> &Money {
        &self.price
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
