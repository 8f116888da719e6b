//! Persistence layer for the Store, Order and Customer aggregates.
//!
//! This crate provides:
//! - repository traits, one per aggregate type
//! - [`LockRegistry`], the per-aggregate critical section used around
//!   load-mutate-save sequences
//! - the [`UnitOfWork`] contract and its request-scoped factory
//! - in-memory implementations of all of the above

pub mod lock;
pub mod memory;
pub mod repository;
pub mod unit_of_work;

pub use domain::{DomainError, Result};
pub use lock::{AggregateLock, LockRegistry};
pub use memory::{
    InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryRepository,
    InMemoryStoreRepository,
};
pub use repository::{CustomerRepository, OrderRepository, StoreRepository};
pub use unit_of_work::{InMemoryRepositories, InMemoryUnitOfWork, UnitOfWork, UnitOfWorkFactory};
