//! Postal address value object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when an address component is missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Address field '{field}' is required")]
pub struct AddressError {
    pub field: &'static str,
}

/// A physical address. Two addresses with the same components are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    street: String,
    city: String,
    state: String,
    zip_code: String,
    country: String,
}

impl Address {
    /// Creates an address, requiring every component to be non-blank.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, AddressError> {
        let address = Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip_code: zip_code.into(),
            country: country.into(),
        };

        for (field, value) in [
            ("street", &address.street),
            ("city", &address.city),
            ("state", &address.state),
            ("zip_code", &address.zip_code),
            ("country", &address.country),
        ] {
            if value.trim().is_empty() {
                return Err(AddressError { field });
            }
        }

        Ok(address)
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {} {}, {}",
            self.street, self.city, self.state, self.zip_code, self.country
        )
    }
}
