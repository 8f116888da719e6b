//! Store aggregate implementation.

use std::collections::HashMap;

use common::{Address, Money, ProductId, StoreId};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, EventBuffer};

use super::{
    Product, ProductName, StoreError, StoreEvent,
    events::{
        InventoryAddedData, InventoryReservedData, ProductAddedData, ProductDeactivatedData,
        ProductPriceUpdatedData, StoreCreatedData,
    },
};

/// Store aggregate root.
///
/// Owns the product catalogue and the stock level of every product. Every
/// key in the inventory map has a matching product, and stock never drops
/// below zero: [`reserve_inventory`](Store::reserve_inventory) is the only
/// path that decrements it and it refuses to oversell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    id: StoreId,
    name: String,
    location: Address,

    /// Currency every product of this store is priced in.
    currency: String,

    products: HashMap<ProductId, Product>,
    inventory: HashMap<ProductId, u32>,

    #[serde(skip)]
    events: EventBuffer,
}

impl Aggregate for Store {
    type Id = StoreId;

    fn aggregate_type() -> &'static str {
        "Store"
    }

    fn id(&self) -> StoreId {
        self.id
    }

    fn event_buffer(&self) -> &EventBuffer {
        &self.events
    }

    fn event_buffer_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

impl Store {
    /// Opens a new store with an empty catalogue.
    pub fn new(
        name: impl Into<String>,
        location: Address,
        currency: &str,
    ) -> Result<Self, StoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StoreError::NameRequired);
        }
        let currency = Money::zero(currency)?.currency().to_string();

        let mut store = Self {
            id: StoreId::new(),
            name,
            location,
            currency,
            products: HashMap::new(),
            inventory: HashMap::new(),
            events: EventBuffer::new(),
        };

        let data = StoreCreatedData {
            store_id: store.id,
            name: store.name.clone(),
            location: store.location.clone(),
            currency: store.currency.clone(),
        };
        store.raise(StoreEvent::StoreCreated(data));

        Ok(store)
    }

    // =========================================================================
    // Catalogue
    // =========================================================================

    /// Adds a product with zero stock.
    ///
    /// Fails if the name is malformed, the price is not positive or not in the
    /// store currency, or an active product already uses the name.
    pub fn add_product(
        &mut self,
        name: &str,
        description: &str,
        price: Money,
    ) -> Result<Product, StoreError> {
        let name = ProductName::new(name)?;
        if price.currency() != self.currency {
            return Err(StoreError::CurrencyMismatch {
                expected: self.currency.clone(),
                actual: price.currency().to_string(),
            });
        }
        if self
            .products
            .values()
            .any(|p| p.is_active() && p.name() == &name)
        {
            return Err(StoreError::DuplicateProduct {
                name: name.to_string(),
            });
        }

        let product = Product::new(name, description, price)?;
        let product_id = product.id();
        self.products.insert(product_id, product.clone());
        self.inventory.insert(product_id, 0);

        let data = ProductAddedData {
            store_id: self.id,
            product_id,
            product_name: product.name().to_string(),
            price: product.price().clone(),
        };
        self.raise(StoreEvent::ProductAdded(data));

        Ok(product)
    }

    /// Changes the price of an active product. Existing order lines keep the
    /// price they were added with.
    pub fn update_product_price(
        &mut self,
        product_id: ProductId,
        price: Money,
    ) -> Result<(), StoreError> {
        let store_id = self.id;
        let product = self.active_product_mut(product_id)?;
        let old_price = product.price().clone();
        product.set_price(price)?;
        let new_price = product.price().clone();

        self.raise(StoreEvent::ProductPriceUpdated(ProductPriceUpdatedData {
            store_id,
            product_id,
            old_price,
            new_price,
        }));
        Ok(())
    }

    /// Withdraws a product from sale. Its stock level is kept.
    pub fn deactivate_product(&mut self, product_id: ProductId) -> Result<(), StoreError> {
        let store_id = self.id;
        self.active_product_mut(product_id)?.deactivate();

        self.raise(StoreEvent::ProductDeactivated(ProductDeactivatedData {
            store_id,
            product_id,
        }));
        Ok(())
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Adds stock to an active product.
    ///
    /// Also the release path when a reservation is compensated.
    pub fn add_inventory(&mut self, product_id: ProductId, quantity: u32) -> Result<(), StoreError> {
        if quantity == 0 {
            return Err(StoreError::InvalidQuantity { quantity });
        }
        self.active_product(product_id)?;

        let current = self.available_quantity(product_id)?;
        let new_total = current
            .checked_add(quantity)
            .ok_or(StoreError::InventoryOverflow { product_id })?;
        self.inventory.insert(product_id, new_total);

        self.raise(StoreEvent::InventoryAdded(InventoryAddedData {
            store_id: self.id,
            product_id,
            quantity_added: quantity,
            new_total,
        }));
        Ok(())
    }

    /// Takes stock out of the available quantity for an order.
    ///
    /// The check and the decrement happen in one call on one store value, so
    /// two reservations serialised by the store's lock can never both pass
    /// against the same remaining quantity.
    pub fn reserve_inventory(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), StoreError> {
        if quantity == 0 {
            return Err(StoreError::InvalidQuantity { quantity });
        }
        self.active_product(product_id)?;

        let available = self.available_quantity(product_id)?;
        if quantity > available {
            return Err(StoreError::InsufficientStock {
                product_id,
                requested: quantity,
                available,
            });
        }
        let remaining = available - quantity;
        self.inventory.insert(product_id, remaining);

        self.raise(StoreEvent::InventoryReserved(InventoryReservedData {
            store_id: self.id,
            product_id,
            quantity_reserved: quantity,
            remaining_quantity: remaining,
        }));
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_product(&self, product_id: ProductId) -> Result<&Product, StoreError> {
        self.products
            .get(&product_id)
            .ok_or(StoreError::ProductNotFound { product_id })
    }

    pub fn available_quantity(&self, product_id: ProductId) -> Result<u32, StoreError> {
        self.inventory
            .get(&product_id)
            .copied()
            .ok_or(StoreError::ProductNotFound { product_id })
    }

    /// Returns the product if it exists and is on sale.
    pub fn active_product(&self, product_id: ProductId) -> Result<&Product, StoreError> {
        let product = self.get_product(product_id)?;
        if !product.is_active() {
            return Err(StoreError::ProductInactive { product_id });
        }
        Ok(product)
    }

    fn active_product_mut(&mut self, product_id: ProductId) -> Result<&mut Product, StoreError> {
        let product = self
            .products
            .get_mut(&product_id)
            .ok_or(StoreError::ProductNotFound { product_id })?;
        if !product.is_active() {
            return Err(StoreError::ProductInactive { product_id });
        }
        Ok(product)
    }

    /// Iterates over every product, active or not, in no particular order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Address {
        &self.location
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}
