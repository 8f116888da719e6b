//! Identifiers and value objects shared by every aggregate.

pub mod address;
pub mod money;
pub mod types;

pub use address::{Address, AddressError};
pub use money::{Money, MoneyError};
pub use types::{CustomerId, EventId, OrderId, OrderItemId, ProductId, StoreId};
