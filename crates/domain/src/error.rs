//! Domain error types.

use common::{AddressError, MoneyError};
use thiserror::Error;

use crate::customer::CustomerError;
use crate::order::OrderError;
use crate::store::StoreError;

/// Result type for domain and application operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred building a money value.
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// An error occurred building an address.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    /// An error occurred in the store aggregate.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An error occurred in the order aggregate.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// An error occurred in the customer aggregate.
    #[error("Customer error: {0}")]
    Customer(#[from] CustomerError),

    /// Aggregate not found.
    #[error("Aggregate not found: {aggregate_type} with id {aggregate_id}")]
    NotFound {
        aggregate_type: &'static str,
        aggregate_id: String,
    },

    /// Input rejected before reaching an aggregate.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Misuse of a unit of work.
    #[error("Unit of work error: {0}")]
    UnitOfWork(String),

    /// Storage or dispatch failure.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

/// Coarse classification of a [`DomainError`].
///
/// Callers branch on the kind rather than on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InvalidTransition,
    InsufficientStock,
    Inactive,
    Conflict,
    Infrastructure,
}

impl DomainError {
    /// Creates a not-found error for the given aggregate.
    pub fn not_found(aggregate_type: &'static str, aggregate_id: impl ToString) -> Self {
        DomainError::NotFound {
            aggregate_type,
            aggregate_id: aggregate_id.to_string(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Money(_) | DomainError::Address(_) | DomainError::Validation(_) => {
                ErrorKind::Validation
            }
            DomainError::Store(e) => e.kind(),
            DomainError::Order(e) => e.kind(),
            DomainError::Customer(e) => e.kind(),
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::UnitOfWork(_) | DomainError::Infrastructure(_) => {
                ErrorKind::Infrastructure
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_insufficient_stock(&self) -> bool {
        self.kind() == ErrorKind::InsufficientStock
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::InsufficientStock => "insufficient_stock",
            ErrorKind::Inactive => "inactive",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Infrastructure => "infrastructure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
