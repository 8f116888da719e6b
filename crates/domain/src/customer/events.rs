//! Customer domain events.

use common::{Address, CustomerId};
use serde::{Deserialize, Serialize};

use super::CustomerTier;

pub const CUSTOMER_REGISTERED: &str = "customer.registered";
pub const CUSTOMER_CONTACT_UPDATED: &str = "customer.contact_updated";
pub const CUSTOMER_POINTS_AWARDED: &str = "customer.points_awarded";
pub const CUSTOMER_POINTS_REDEEMED: &str = "customer.points_redeemed";
pub const CUSTOMER_TIER_CHANGED: &str = "customer.tier_changed";
pub const CUSTOMER_DEACTIVATED: &str = "customer.deactivated";

/// Events that can occur on a customer aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CustomerEvent {
    CustomerRegistered(CustomerRegisteredData),
    CustomerContactUpdated(CustomerContactUpdatedData),
    PointsAwarded(PointsAwardedData),
    PointsRedeemed(PointsRedeemedData),

    /// Raised whenever a point change moves the customer to another tier,
    /// upwards or downwards.
    TierChanged(TierChangedData),

    CustomerDeactivated(CustomerDeactivatedData),
}

impl CustomerEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            CustomerEvent::CustomerRegistered(_) => CUSTOMER_REGISTERED,
            CustomerEvent::CustomerContactUpdated(_) => CUSTOMER_CONTACT_UPDATED,
            CustomerEvent::PointsAwarded(_) => CUSTOMER_POINTS_AWARDED,
            CustomerEvent::PointsRedeemed(_) => CUSTOMER_POINTS_REDEEMED,
            CustomerEvent::TierChanged(_) => CUSTOMER_TIER_CHANGED,
            CustomerEvent::CustomerDeactivated(_) => CUSTOMER_DEACTIVATED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRegisteredData {
    pub customer_id: CustomerId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerContactUpdatedData {
    pub customer_id: CustomerId,
    pub phone_number: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsAwardedData {
    pub customer_id: CustomerId,
    pub points: u32,
    pub total_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsRedeemedData {
    pub customer_id: CustomerId,
    pub points_redeemed: u32,
    pub remaining_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierChangedData {
    pub customer_id: CustomerId,
    pub old_tier: CustomerTier,
    pub new_tier: CustomerTier,
    pub total_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDeactivatedData {
    pub customer_id: CustomerId,
}
