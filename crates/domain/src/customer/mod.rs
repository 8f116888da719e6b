//! Customer aggregate: identity, contact details and loyalty state.

mod aggregate;
pub mod events;
mod value_objects;

pub use aggregate::Customer;
pub use events::{
    CustomerContactUpdatedData, CustomerDeactivatedData, CustomerEvent, CustomerRegisteredData,
    PointsAwardedData, PointsRedeemedData, TierChangedData,
};
pub use value_objects::{CustomerTier, Email, PhoneNumber};

use common::CustomerId;
use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur during customer operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomerError {
    #[error("First and last name are required")]
    NameRequired,

    #[error("Invalid email address: '{email}'")]
    InvalidEmail { email: String },

    #[error("Invalid phone number: '{phone}'")]
    InvalidPhone { phone: String },

    #[error("Points must be greater than zero")]
    InvalidPoints,

    #[error("Insufficient loyalty points: requested {requested}, available {available}")]
    InsufficientPoints { requested: u32, available: u32 },

    #[error("Loyalty point balance overflow")]
    PointsOverflow,

    #[error("Customer is inactive: {customer_id}")]
    Inactive { customer_id: CustomerId },

    /// Another customer is registered with this email.
    #[error("Email already registered: {email}")]
    EmailTaken { email: String },
}

impl CustomerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CustomerError::Inactive { .. } => ErrorKind::Inactive,
            CustomerError::EmailTaken { .. } => ErrorKind::Conflict,
            CustomerError::NameRequired
            | CustomerError::InvalidEmail { .. }
            | CustomerError::InvalidPhone { .. }
            | CustomerError::InvalidPoints
            | CustomerError::InsufficientPoints { .. }
            | CustomerError::PointsOverflow => ErrorKind::Validation,
        }
    }
}
