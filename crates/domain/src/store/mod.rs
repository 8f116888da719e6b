//! Store aggregate: catalogue and inventory of one shop.

mod aggregate;
pub mod events;
mod product;

pub use aggregate::Store;
pub use events::{
    InventoryAddedData, InventoryReservedData, ProductAddedData, ProductDeactivatedData,
    ProductPriceUpdatedData, StoreCreatedData, StoreEvent,
};
pub use product::{Product, ProductName};

use common::{MoneyError, ProductId};
use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store name is required.
    #[error("Store name is required")]
    NameRequired,

    #[error("Product name must be between 3 and 100 characters (got {length})")]
    InvalidProductName { length: usize },

    #[error("Product price must be greater than zero (got {amount})")]
    InvalidPrice { amount: i64 },

    /// The store prices its whole catalogue in one currency.
    #[error("Currency mismatch: store uses {expected}, got {actual}")]
    CurrencyMismatch { expected: String, actual: String },

    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// An active product already carries this name.
    #[error("Product with name '{name}' already exists")]
    DuplicateProduct { name: String },

    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: ProductId },

    #[error("Product is inactive: {product_id}")]
    ProductInactive { product_id: ProductId },

    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("Inventory level overflow for product {product_id}")]
    InventoryOverflow { product_id: ProductId },

    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::DuplicateProduct { .. } => ErrorKind::Conflict,
            StoreError::ProductNotFound { .. } => ErrorKind::NotFound,
            StoreError::ProductInactive { .. } => ErrorKind::Inactive,
            StoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            StoreError::NameRequired
            | StoreError::InvalidProductName { .. }
            | StoreError::InvalidPrice { .. }
            | StoreError::CurrencyMismatch { .. }
            | StoreError::InvalidQuantity { .. }
            | StoreError::InventoryOverflow { .. }
            | StoreError::Money(_) => ErrorKind::Validation,
        }
    }
}
