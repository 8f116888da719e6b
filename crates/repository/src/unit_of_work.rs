//! Unit of work: the request-scoped guard around one orchestration.
//!
//! A unit of work does not snapshot aggregate state. Orchestrators only call
//! `save` once every domain mutation of a step has succeeded; on an error
//! path they roll back and drop their loaded copies.

use std::sync::atomic::{AtomicBool, Ordering};

use domain::{DomainError, Result};

use crate::memory::{InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryStoreRepository};
use crate::repository::{CustomerRepository, OrderRepository, StoreRepository};

/// Single-writer transaction boundary with access to the three repositories.
pub trait UnitOfWork: Send + Sync {
    type Stores: StoreRepository;
    type Orders: OrderRepository;
    type Customers: CustomerRepository;

    /// Starts the unit. Fails if one is already in progress.
    fn begin(&self) -> Result<()>;

    /// Finishes the unit. Fails if none is in progress.
    fn commit(&self) -> Result<()>;

    /// Abandons the unit. Always safe to call.
    fn rollback(&self);

    fn is_active(&self) -> bool;

    fn stores(&self) -> &Self::Stores;

    fn orders(&self) -> &Self::Orders;

    fn customers(&self) -> &Self::Customers;
}

/// Creates one unit of work per orchestration.
pub trait UnitOfWorkFactory: Send + Sync {
    type Uow: UnitOfWork;

    fn create(&self) -> Self::Uow;
}

/// The three in-memory repositories, shared by every unit of work created
/// from them.
#[derive(Clone, Default)]
pub struct InMemoryRepositories {
    pub stores: InMemoryStoreRepository,
    pub orders: InMemoryOrderRepository,
    pub customers: InMemoryCustomerRepository,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnitOfWorkFactory for InMemoryRepositories {
    type Uow = InMemoryUnitOfWork;

    fn create(&self) -> InMemoryUnitOfWork {
        InMemoryUnitOfWork::new(self.clone())
    }
}

/// Unit of work over the in-memory repositories.
pub struct InMemoryUnitOfWork {
    repositories: InMemoryRepositories,
    in_progress: AtomicBool,
}

impl InMemoryUnitOfWork {
    pub fn new(repositories: InMemoryRepositories) -> Self {
        Self {
            repositories,
            in_progress: AtomicBool::new(false),
        }
    }
}

impl UnitOfWork for InMemoryUnitOfWork {
    type Stores = InMemoryStoreRepository;
    type Orders = InMemoryOrderRepository;
    type Customers = InMemoryCustomerRepository;

    fn begin(&self) -> Result<()> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| DomainError::UnitOfWork("transaction already in progress".to_string()))
    }

    fn commit(&self) -> Result<()> {
        self.in_progress
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| DomainError::UnitOfWork("no transaction in progress".to_string()))
    }

    fn rollback(&self) {
        if self.in_progress.swap(false, Ordering::AcqRel) {
            tracing::debug!("Unit of work rolled back");
        }
    }

    fn is_active(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    fn stores(&self) -> &InMemoryStoreRepository {
        &self.repositories.stores
    }

    fn orders(&self) -> &InMemoryOrderRepository {
        &self.repositories.orders
    }

    fn customers(&self) -> &InMemoryCustomerRepository {
        &self.repositories.customers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Aggregate;

    #[test]
    fn test_begin_twice_fails() {
        let uow = InMemoryRepositories::new().create();
        uow.begin().unwrap();
        assert!(uow.is_active());

        let err = uow.begin().unwrap_err();
        assert!(matches!(err, DomainError::UnitOfWork(_)));
        assert!(uow.is_active());
    }

    #[test]
    fn test_commit_without_begin_fails() {
        let uow = InMemoryRepositories::new().create();
        assert!(matches!(uow.commit(), Err(DomainError::UnitOfWork(_))));

        uow.begin().unwrap();
        uow.commit().unwrap();
        assert!(!uow.is_active());
        assert!(uow.commit().is_err());
    }

    #[test]
    fn test_rollback_is_always_safe() {
        let uow = InMemoryRepositories::new().create();
        uow.rollback();
        uow.rollback();

        uow.begin().unwrap();
        uow.rollback();
        assert!(!uow.is_active());
        uow.begin().unwrap();
    }

    #[test]
    fn test_units_are_independent() {
        let repositories = InMemoryRepositories::new();
        let a = repositories.create();
        let b = repositories.create();

        a.begin().unwrap();
        b.begin().unwrap();
        a.commit().unwrap();
        assert!(b.is_active());
    }

    #[tokio::test]
    async fn test_units_share_storage() {
        let repositories = InMemoryRepositories::new();
        let customer = domain::Customer::register("jane@example.com", "Jane", "Doe").unwrap();

        let uow = repositories.create();
        uow.customers().save(&customer).await.unwrap();

        let other = repositories.create();
        let loaded = other.customers().find_by_id(customer.id()).await.unwrap();
        assert_eq!(loaded.email(), customer.email());
    }
}
