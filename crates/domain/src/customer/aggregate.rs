//! Customer aggregate implementation.

use chrono::{DateTime, Utc};
use common::{Address, CustomerId};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, EventBuffer};

use super::{
    CustomerError, CustomerEvent, CustomerTier, Email, PhoneNumber,
    events::{
        CustomerContactUpdatedData, CustomerDeactivatedData, CustomerRegisteredData,
        PointsAwardedData, PointsRedeemedData, TierChangedData,
    },
};

/// Customer aggregate root.
///
/// The tier is a pure function of the loyalty point balance and is
/// recomputed on every point change, so redeeming points can downgrade it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    email: Email,
    first_name: String,
    last_name: String,
    phone_number: Option<PhoneNumber>,
    address: Option<Address>,
    tier: CustomerTier,
    loyalty_points: u32,
    registered_at: DateTime<Utc>,
    active: bool,

    #[serde(skip)]
    events: EventBuffer,
}

impl Aggregate for Customer {
    type Id = CustomerId;

    fn aggregate_type() -> &'static str {
        "Customer"
    }

    fn id(&self) -> CustomerId {
        self.id
    }

    fn event_buffer(&self) -> &EventBuffer {
        &self.events
    }

    fn event_buffer_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

impl Customer {
    /// Registers a new regular customer with no points.
    pub fn register(email: &str, first_name: &str, last_name: &str) -> Result<Self, CustomerError> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(CustomerError::NameRequired);
        }
        let email = Email::new(email)?;

        let mut customer = Self {
            id: CustomerId::new(),
            email,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone_number: None,
            address: None,
            tier: CustomerTier::Regular,
            loyalty_points: 0,
            registered_at: Utc::now(),
            active: true,
            events: EventBuffer::new(),
        };

        customer.raise(CustomerEvent::CustomerRegistered(CustomerRegisteredData {
            customer_id: customer.id,
            email: customer.email.to_string(),
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
        }));

        Ok(customer)
    }

    pub fn update_contact_info(&mut self, phone: &str, address: Address) -> Result<(), CustomerError> {
        self.ensure_active()?;
        let phone_number = PhoneNumber::new(phone)?;

        self.phone_number = Some(phone_number.clone());
        self.address = Some(address.clone());
        self.raise(CustomerEvent::CustomerContactUpdated(
            CustomerContactUpdatedData {
                customer_id: self.id,
                phone_number: phone_number.to_string(),
                address,
            },
        ));
        Ok(())
    }

    /// Credits loyalty points and recomputes the tier.
    pub fn add_loyalty_points(&mut self, points: u32) -> Result<(), CustomerError> {
        if points == 0 {
            return Err(CustomerError::InvalidPoints);
        }
        self.ensure_active()?;
        let total = self
            .loyalty_points
            .checked_add(points)
            .ok_or(CustomerError::PointsOverflow)?;

        self.loyalty_points = total;
        self.raise(CustomerEvent::PointsAwarded(PointsAwardedData {
            customer_id: self.id,
            points,
            total_points: total,
        }));
        self.recompute_tier();
        Ok(())
    }

    /// Spends loyalty points and recomputes the tier.
    pub fn redeem_points(&mut self, points: u32) -> Result<(), CustomerError> {
        if points == 0 {
            return Err(CustomerError::InvalidPoints);
        }
        self.ensure_active()?;
        if points > self.loyalty_points {
            return Err(CustomerError::InsufficientPoints {
                requested: points,
                available: self.loyalty_points,
            });
        }

        self.loyalty_points -= points;
        self.raise(CustomerEvent::PointsRedeemed(PointsRedeemedData {
            customer_id: self.id,
            points_redeemed: points,
            remaining_points: self.loyalty_points,
        }));
        self.recompute_tier();
        Ok(())
    }

    pub fn deactivate(&mut self) -> Result<(), CustomerError> {
        self.ensure_active()?;

        self.active = false;
        self.raise(CustomerEvent::CustomerDeactivated(CustomerDeactivatedData {
            customer_id: self.id,
        }));
        Ok(())
    }

    fn recompute_tier(&mut self) {
        let new_tier = CustomerTier::for_points(self.loyalty_points);
        if new_tier == self.tier {
            return;
        }

        let old_tier = std::mem::replace(&mut self.tier, new_tier);
        tracing::debug!(
            customer_id = %self.id,
            %old_tier,
            %new_tier,
            points = self.loyalty_points,
            "Customer tier changed"
        );
        self.raise(CustomerEvent::TierChanged(TierChangedData {
            customer_id: self.id,
            old_tier,
            new_tier,
            total_points: self.loyalty_points,
        }));
    }

    fn ensure_active(&self) -> Result<(), CustomerError> {
        if !self.active {
            return Err(CustomerError::Inactive {
                customer_id: self.id,
            });
        }
        Ok(())
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn phone_number(&self) -> Option<&PhoneNumber> {
        self.phone_number.as_ref()
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn tier(&self) -> CustomerTier {
        self.tier
    }

    pub fn loyalty_points(&self) -> u32 {
        self.loyalty_points
    }

    pub fn discount_percent(&self) -> u8 {
        self.tier.discount_percent()
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
