//! Command types accepted by the handlers.

use common::{Address, CustomerId, Money, OrderId, ProductId, StoreId};

/// One requested line of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Command to place and confirm an order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub customer_id: CustomerId,
    pub store_id: StoreId,

    /// Lines in the order they are reserved.
    pub items: Vec<OrderLine>,
}

impl CreateOrder {
    pub fn new(customer_id: CustomerId, store_id: StoreId) -> Self {
        Self {
            customer_id,
            store_id,
            items: Vec::new(),
        }
    }

    /// Adds a requested line.
    pub fn with_item(mut self, product_id: ProductId, quantity: u32) -> Self {
        self.items.push(OrderLine {
            product_id,
            quantity,
        });
        self
    }
}

/// Command to cancel an order and release its stock.
#[derive(Debug, Clone)]
pub struct CancelOrder {
    pub order_id: OrderId,
    pub reason: String,
}

impl CancelOrder {
    pub fn new(order_id: OrderId, reason: impl Into<String>) -> Self {
        Self {
            order_id,
            reason: reason.into(),
        }
    }
}

/// Forward steps of a confirmed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTransition {
    StartPreparing,
    MarkReady,
    Complete,
}

impl OrderTransition {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderTransition::StartPreparing => "start_preparing",
            OrderTransition::MarkReady => "mark_ready",
            OrderTransition::Complete => "complete",
        }
    }
}

impl std::fmt::Display for OrderTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CreateStore {
    pub name: String,
    pub location: Address,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct AddProduct {
    pub store_id: StoreId,
    pub name: String,
    pub description: String,
    pub price: Money,
}

#[derive(Debug, Clone, Copy)]
pub struct AddInventory {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct UpdateProductPrice {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub price: Money,
}

#[derive(Debug, Clone, Copy)]
pub struct DeactivateProduct {
    pub store_id: StoreId,
    pub product_id: ProductId,
}

#[derive(Debug, Clone)]
pub struct RegisterCustomer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCustomerContact {
    pub customer_id: CustomerId,
    pub phone_number: String,
    pub address: Address,
}

#[derive(Debug, Clone, Copy)]
pub struct RedeemPoints {
    pub customer_id: CustomerId,
    pub points: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct DeactivateCustomer {
    pub customer_id: CustomerId,
}
