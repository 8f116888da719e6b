//! In-memory repositories.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CustomerId, OrderId, StoreId};
use domain::{
    Aggregate, Customer, CustomerError, CustomerTier, DomainError, Email, Order, OrderStatus,
    Result, Store,
};
use tokio::sync::RwLock;

use crate::lock::{AggregateLock, LockRegistry};
use crate::repository::{CustomerRepository, OrderRepository, StoreRepository};

/// In-memory repository for any aggregate type.
///
/// The collection is guarded by a reader/writer lock; individual aggregates
/// are guarded by a [`LockRegistry`]. Cloning shares the same storage.
pub struct InMemoryRepository<A: Aggregate> {
    items: Arc<RwLock<HashMap<A::Id, A>>>,
    locks: Arc<LockRegistry<A::Id>>,
}

pub type InMemoryStoreRepository = InMemoryRepository<Store>;
pub type InMemoryOrderRepository = InMemoryRepository<Order>;
pub type InMemoryCustomerRepository = InMemoryRepository<Customer>;

impl<A: Aggregate> Clone for InMemoryRepository<A> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<A: Aggregate> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
            locks: Arc::new(LockRegistry::default()),
        }
    }
}

impl<A> InMemoryRepository<A>
where
    A: Aggregate + Clone,
    A::Id: Eq + Hash + Send + Sync,
{
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored aggregates.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Removes every stored aggregate.
    pub async fn clear(&self) {
        self.items.write().await.clear();
    }

    async fn insert(&self, aggregate: &A) {
        let stored = detached(aggregate);
        self.items.write().await.insert(aggregate.id(), stored);
        tracing::debug!(
            aggregate_type = A::aggregate_type(),
            aggregate_id = %aggregate.id(),
            "Aggregate saved"
        );
    }

    async fn get(&self, id: A::Id) -> Result<A> {
        self.items
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(A::aggregate_type(), id))
    }

    async fn filter<F>(&self, predicate: F) -> Vec<A>
    where
        F: Fn(&A) -> bool,
    {
        self.items
            .read()
            .await
            .values()
            .filter(|a| predicate(a))
            .cloned()
            .collect()
    }

    async fn acquire(&self, id: A::Id) -> AggregateLock {
        self.locks.acquire(id).await
    }
}

/// Copy of the aggregate without its undispatched events.
fn detached<A: Aggregate + Clone>(aggregate: &A) -> A {
    let mut copy = aggregate.clone();
    copy.event_buffer_mut().clear();
    copy
}

#[async_trait]
impl StoreRepository for InMemoryStoreRepository {
    async fn save(&self, store: &Store) -> Result<()> {
        self.insert(store).await;
        Ok(())
    }

    async fn find_by_id(&self, id: StoreId) -> Result<Store> {
        self.get(id).await
    }

    async fn find_all(&self) -> Result<Vec<Store>> {
        let mut stores = self.filter(|_| true).await;
        stores.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(stores)
    }

    async fn lock(&self, id: StoreId) -> AggregateLock {
        self.acquire(id).await
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &Order) -> Result<()> {
        self.insert(order).await;
        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Order> {
        self.get(id).await
    }

    async fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        let mut orders = self.filter(|o| o.customer_id() == customer_id).await;
        orders.sort_by_key(|o| o.placed_at());
        Ok(orders)
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let mut orders = self.filter(|o| o.status() == status).await;
        orders.sort_by_key(|o| o.placed_at());
        Ok(orders)
    }

    async fn lock(&self, id: OrderId) -> AggregateLock {
        self.acquire(id).await
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn save(&self, customer: &Customer) -> Result<()> {
        let mut items = self.items.write().await;
        let taken = items
            .values()
            .any(|c| c.email() == customer.email() && c.id() != customer.id());
        if taken {
            return Err(CustomerError::EmailTaken {
                email: customer.email().to_string(),
            }
            .into());
        }

        items.insert(customer.id(), detached(customer));
        tracing::debug!(customer_id = %customer.id(), "Customer saved");
        Ok(())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Customer> {
        self.get(id).await
    }

    async fn find_by_email(&self, email: &Email) -> Result<Customer> {
        self.filter(|c| c.email() == email)
            .await
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found(Customer::aggregate_type(), email))
    }

    async fn find_by_tier(&self, tier: CustomerTier) -> Result<Vec<Customer>> {
        let mut customers = self.filter(|c| c.tier() == tier).await;
        customers.sort_by_key(|c| c.registered_at());
        Ok(customers)
    }

    async fn lock(&self, id: CustomerId) -> AggregateLock {
        self.acquire(id).await
    }
}
