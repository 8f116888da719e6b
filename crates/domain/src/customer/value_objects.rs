//! Customer value objects.

use serde::{Deserialize, Serialize};

use super::CustomerError;

/// Syntactically valid email address, trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(email: &str) -> Result<Self, CustomerError> {
        let normalized = email.trim().to_lowercase();
        if !validator::validate_email(normalized.as_str()) {
            return Err(CustomerError::InvalidEmail {
                email: email.to_string(),
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Phone number of at least ten characters made of digits, `+`, `-`,
/// parentheses and spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub const MIN_LEN: usize = 10;

    pub fn new(phone: &str) -> Result<Self, CustomerError> {
        let phone = phone.trim();
        let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' ');
        if phone.len() < Self::MIN_LEN || !phone.chars().all(allowed) {
            return Err(CustomerError::InvalidPhone {
                phone: phone.to_string(),
            });
        }
        Ok(Self(phone.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Loyalty tier, derived from the point balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CustomerTier {
    #[default]
    Regular,
    Premium,
    #[serde(rename = "VIP")]
    Vip,
}

impl CustomerTier {
    pub const PREMIUM_POINTS: u32 = 500;
    pub const VIP_POINTS: u32 = 1000;

    /// Returns the tier a balance of `points` earns.
    pub fn for_points(points: u32) -> Self {
        match points {
            p if p >= Self::VIP_POINTS => CustomerTier::Vip,
            p if p >= Self::PREMIUM_POINTS => CustomerTier::Premium,
            _ => CustomerTier::Regular,
        }
    }

    /// Discount granted to the tier, in percent.
    pub fn discount_percent(&self) -> u8 {
        match self {
            CustomerTier::Vip => 20,
            CustomerTier::Premium => 10,
            CustomerTier::Regular => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerTier::Regular => "REGULAR",
            CustomerTier::Premium => "PREMIUM",
            CustomerTier::Vip => "VIP",
        }
    }
}

impl std::fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
