//! Repository contracts, one per aggregate type.
//!
//! Repositories hand out copies: a loaded aggregate is private to the caller
//! until it is saved back, so dropping a copy is all it takes to abandon a
//! change. Buffered domain events are never persisted.

use async_trait::async_trait;
use common::{CustomerId, OrderId, StoreId};
use domain::{Customer, CustomerTier, Email, Order, OrderStatus, Result, Store};

use crate::lock::AggregateLock;

#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Inserts or replaces a store.
    async fn save(&self, store: &Store) -> Result<()>;

    /// Loads a store, failing with `NotFound` if it does not exist.
    async fn find_by_id(&self, id: StoreId) -> Result<Store>;

    async fn find_all(&self) -> Result<Vec<Store>>;

    /// Locks one store for a load-mutate-save sequence.
    async fn lock(&self, id: StoreId) -> AggregateLock;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn save(&self, order: &Order) -> Result<()>;

    async fn find_by_id(&self, id: OrderId) -> Result<Order>;

    /// Returns the customer's orders, oldest first.
    async fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>>;

    /// Returns the orders in the given status, oldest first.
    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>>;

    async fn lock(&self, id: OrderId) -> AggregateLock;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Inserts or replaces a customer.
    ///
    /// Fails with `Conflict` if another customer already uses the email.
    async fn save(&self, customer: &Customer) -> Result<()>;

    async fn find_by_id(&self, id: CustomerId) -> Result<Customer>;

    async fn find_by_email(&self, email: &Email) -> Result<Customer>;

    async fn find_by_tier(&self, tier: CustomerTier) -> Result<Vec<Customer>>;

    async fn lock(&self, id: CustomerId) -> AggregateLock;
}
