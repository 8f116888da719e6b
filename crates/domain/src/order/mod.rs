//! Order aggregate and related types.

mod aggregate;
pub mod events;
mod item;
mod policy;
mod state;

pub use aggregate::Order;
pub use events::{
    OrderCancelledData, OrderCompletedData, OrderConfirmedData, OrderCreatedData, OrderEvent,
    OrderPreparationStartedData, OrderReadyData,
};
pub use item::{OrderItem, OrderItemSnapshot};
pub use policy::{And, LargeOrder, OrderSpecification, RushOrder, StandardOrderPolicy};
pub use state::{OrderStatus, ParseOrderStatusError};

use common::{MoneyError, OrderItemId};
use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The transition table does not allow this move.
    #[error("Invalid state transition: cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Items can only change while the order is pending.
    #[error("Cannot modify items of an order in {status} status")]
    ItemsLocked { status: OrderStatus },

    /// Item not found in order.
    #[error("Item not found: {item_id}")]
    ItemNotFound { item_id: OrderItemId },

    /// Invalid quantity.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Order has no items.
    #[error("Order has no items")]
    NoItems,

    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::InvalidTransition { .. } | OrderError::ItemsLocked { .. } => {
                ErrorKind::InvalidTransition
            }
            OrderError::ItemNotFound { .. } => ErrorKind::NotFound,
            OrderError::InvalidQuantity { .. } | OrderError::NoItems | OrderError::Money(_) => {
                ErrorKind::Validation
            }
        }
    }
}
