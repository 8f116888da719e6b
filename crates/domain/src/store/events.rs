//! Store domain events.

use common::{Address, Money, ProductId, StoreId};
use serde::{Deserialize, Serialize};

pub const STORE_CREATED: &str = "store.created";
pub const PRODUCT_ADDED: &str = "product.added";
pub const PRODUCT_PRICE_UPDATED: &str = "product.price_updated";
pub const PRODUCT_DEACTIVATED: &str = "product.deactivated";
pub const INVENTORY_ADDED: &str = "inventory.added";
pub const INVENTORY_RESERVED: &str = "inventory.reserved";

/// Events that can occur on a store aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StoreEvent {
    /// Store was opened.
    StoreCreated(StoreCreatedData),

    /// Product was added to the catalogue.
    ProductAdded(ProductAddedData),

    /// Product price changed.
    ProductPriceUpdated(ProductPriceUpdatedData),

    /// Product was withdrawn from sale.
    ProductDeactivated(ProductDeactivatedData),

    /// Stock was added, by restocking or by releasing a reservation.
    InventoryAdded(InventoryAddedData),

    /// Stock was reserved for an order.
    InventoryReserved(InventoryReservedData),
}

impl StoreEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            StoreEvent::StoreCreated(_) => STORE_CREATED,
            StoreEvent::ProductAdded(_) => PRODUCT_ADDED,
            StoreEvent::ProductPriceUpdated(_) => PRODUCT_PRICE_UPDATED,
            StoreEvent::ProductDeactivated(_) => PRODUCT_DEACTIVATED,
            StoreEvent::InventoryAdded(_) => INVENTORY_ADDED,
            StoreEvent::InventoryReserved(_) => INVENTORY_RESERVED,
        }
    }

    pub fn store_id(&self) -> StoreId {
        match self {
            StoreEvent::StoreCreated(d) => d.store_id,
            StoreEvent::ProductAdded(d) => d.store_id,
            StoreEvent::ProductPriceUpdated(d) => d.store_id,
            StoreEvent::ProductDeactivated(d) => d.store_id,
            StoreEvent::InventoryAdded(d) => d.store_id,
            StoreEvent::InventoryReserved(d) => d.store_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreCreatedData {
    pub store_id: StoreId,
    pub name: String,
    pub location: Address,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAddedData {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPriceUpdatedData {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub old_price: Money,
    pub new_price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDeactivatedData {
    pub store_id: StoreId,
    pub product_id: ProductId,
}

/// Data for InventoryAdded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryAddedData {
    pub store_id: StoreId,
    pub product_id: ProductId,

    /// Units added by this operation.
    pub quantity_added: u32,

    /// Stock level after the addition.
    pub new_total: u32,
}

/// Data for InventoryReserved event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReservedData {
    pub store_id: StoreId,
    pub product_id: ProductId,

    /// Units taken out of available stock.
    pub quantity_reserved: u32,

    /// Stock level left after the reservation.
    pub remaining_quantity: u32,
}
