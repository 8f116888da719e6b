//! Domain layer of the order fulfillment core.
//!
//! This crate provides:
//! - the [`Aggregate`] trait and [`EventBuffer`] shared by every aggregate root
//! - the [`DomainEvent`] envelope and its [`EventPayload`] variants
//! - the Store, Order and Customer aggregates with their invariants
//! - the [`DomainError`] taxonomy used across every layer

pub mod aggregate;
pub mod customer;
pub mod error;
pub mod event;
pub mod order;
pub mod store;

pub use aggregate::{Aggregate, EventBuffer};
pub use common::{
    Address, AddressError, CustomerId, EventId, Money, MoneyError, OrderId, OrderItemId,
    ProductId, StoreId,
};
pub use customer::{Customer, CustomerError, CustomerEvent, CustomerTier, Email, PhoneNumber};
pub use error::{DomainError, ErrorKind, Result};
pub use event::{DomainEvent, EventPayload};
pub use order::{
    LargeOrder, Order, OrderError, OrderEvent, OrderItem, OrderItemSnapshot, OrderSpecification,
    OrderStatus, RushOrder, StandardOrderPolicy,
};
pub use store::{Product, ProductName, Store, StoreError, StoreEvent};
