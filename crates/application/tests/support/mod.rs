//! Shared wiring for the application integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use application::{
    AddInventory, AddProduct, CancelOrderHandler, CreateOrderHandler, CreateStore,
    CustomerCommandHandler, OrderLifecycleHandler, RegisterCustomer, StoreCommandHandler,
    subscribe_default_handlers,
};
use async_trait::async_trait;
use domain::{
    Address, Aggregate, CustomerId, DomainError, DomainEvent, Money, Order, OrderId, OrderStatus,
    ProductId, Result, Store, StoreId,
};
use event_bus::{EventDispatcher, EventHandler};
use repository::{
    AggregateLock, InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryRepositories,
    InMemoryStoreRepository, InMemoryUnitOfWork, OrderRepository, StoreRepository, UnitOfWork,
    UnitOfWorkFactory,
};

pub type Dispatcher = Arc<EventDispatcher>;

pub struct App {
    pub repositories: InMemoryRepositories,
    pub dispatcher: Dispatcher,
    pub orders: CreateOrderHandler<InMemoryRepositories, Dispatcher>,
    pub cancellations: CancelOrderHandler<InMemoryRepositories, Dispatcher>,
    pub lifecycle: OrderLifecycleHandler<InMemoryRepositories, Dispatcher>,
    pub stores: StoreCommandHandler<InMemoryRepositories, Dispatcher>,
    pub customers: CustomerCommandHandler<InMemoryRepositories, Dispatcher>,
}

pub async fn app() -> App {
    let repositories = InMemoryRepositories::new();
    let dispatcher = Arc::new(EventDispatcher::new());
    subscribe_default_handlers(&dispatcher, repositories.customers.clone()).await;

    App {
        orders: CreateOrderHandler::new(repositories.clone(), Arc::clone(&dispatcher)),
        cancellations: CancelOrderHandler::new(repositories.clone(), Arc::clone(&dispatcher)),
        lifecycle: OrderLifecycleHandler::new(repositories.clone(), Arc::clone(&dispatcher)),
        stores: StoreCommandHandler::new(repositories.clone(), Arc::clone(&dispatcher)),
        customers: CustomerCommandHandler::new(repositories.clone(), Arc::clone(&dispatcher)),
        repositories,
        dispatcher,
    }
}

pub fn usd(amount: i64) -> Money {
    Money::new(amount, "USD").unwrap()
}

pub async fn store(app: &App) -> StoreId {
    let location = Address::new("123 Main St", "Lemonade City", "CA", "12345", "USA").unwrap();
    app.stores
        .create_store(CreateStore {
            name: "Main Street Lemonade Stand".to_string(),
            location,
            currency: "USD".to_string(),
        })
        .await
        .unwrap()
        .id()
}

pub async fn product(app: &App, store_id: StoreId, name: &str, price: i64, stock: u32) -> ProductId {
    let product = app
        .stores
        .add_product(AddProduct {
            store_id,
            name: name.to_string(),
            description: String::new(),
            price: usd(price),
        })
        .await
        .unwrap();
    if stock > 0 {
        app.stores
            .add_inventory(AddInventory {
                store_id,
                product_id: product.id(),
                quantity: stock,
            })
            .await
            .unwrap();
    }
    product.id()
}

/// A store selling Classic Lemonade at 299 cents with 100 units in stock.
pub async fn lemonade_stand(app: &App) -> (StoreId, ProductId) {
    let store_id = store(app).await;
    let product_id = product(app, store_id, "Classic Lemonade", 299, 100).await;
    (store_id, product_id)
}

pub async fn customer(app: &App, email: &str) -> CustomerId {
    app.customers
        .register(RegisterCustomer {
            email: email.to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
        })
        .await
        .unwrap()
        .id()
}

pub async fn stock(app: &App, store_id: StoreId, product_id: ProductId) -> u32 {
    app.repositories
        .stores
        .find_by_id(store_id)
        .await
        .unwrap()
        .available_quantity(product_id)
        .unwrap()
}

/// Records the names of the events it receives.
#[derive(Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<&'static str>>>,
}

impl Recorder {
    pub async fn listen(&self, dispatcher: &EventDispatcher, names: &[&str]) {
        for name in names {
            dispatcher.subscribe(name, Arc::new(self.clone())).await;
        }
    }

    pub fn seen(&self) -> Vec<&'static str> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventHandler for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<()> {
        self.seen.lock().unwrap().push(event.event_name());
        Ok(())
    }
}

/// Shares the in-memory storage of an [`App`] but can refuse writes.
#[derive(Clone)]
pub struct FailingRepositories {
    inner: InMemoryRepositories,
    fail_store_saves: bool,
    fail_order_saves: bool,
}

impl FailingRepositories {
    pub fn store_saves(app: &App) -> Self {
        Self {
            inner: app.repositories.clone(),
            fail_store_saves: true,
            fail_order_saves: false,
        }
    }

    pub fn order_saves(app: &App) -> Self {
        Self {
            inner: app.repositories.clone(),
            fail_store_saves: false,
            fail_order_saves: true,
        }
    }
}

impl UnitOfWorkFactory for FailingRepositories {
    type Uow = FailingUnitOfWork;

    fn create(&self) -> FailingUnitOfWork {
        FailingUnitOfWork {
            stores: FailingStores {
                inner: self.inner.stores.clone(),
                fail: self.fail_store_saves,
            },
            orders: FailingOrders {
                inner: self.inner.orders.clone(),
                fail: self.fail_order_saves,
            },
            inner: InMemoryUnitOfWork::new(self.inner.clone()),
        }
    }
}

pub struct FailingUnitOfWork {
    inner: InMemoryUnitOfWork,
    stores: FailingStores,
    orders: FailingOrders,
}

impl UnitOfWork for FailingUnitOfWork {
    type Stores = FailingStores;
    type Orders = FailingOrders;
    type Customers = InMemoryCustomerRepository;

    fn begin(&self) -> Result<()> {
        self.inner.begin()
    }

    fn commit(&self) -> Result<()> {
        self.inner.commit()
    }

    fn rollback(&self) {
        self.inner.rollback()
    }

    fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    fn stores(&self) -> &FailingStores {
        &self.stores
    }

    fn orders(&self) -> &FailingOrders {
        &self.orders
    }

    fn customers(&self) -> &InMemoryCustomerRepository {
        self.inner.customers()
    }
}

fn disk_full() -> DomainError {
    DomainError::Infrastructure("disk full".to_string())
}

pub struct FailingStores {
    inner: InMemoryStoreRepository,
    fail: bool,
}

#[async_trait]
impl StoreRepository for FailingStores {
    async fn save(&self, store: &Store) -> Result<()> {
        if self.fail {
            return Err(disk_full());
        }
        self.inner.save(store).await
    }

    async fn find_by_id(&self, id: StoreId) -> Result<Store> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Store>> {
        self.inner.find_all().await
    }

    async fn lock(&self, id: StoreId) -> AggregateLock {
        self.inner.lock(id).await
    }
}

pub struct FailingOrders {
    inner: InMemoryOrderRepository,
    fail: bool,
}

#[async_trait]
impl OrderRepository for FailingOrders {
    async fn save(&self, order: &Order) -> Result<()> {
        if self.fail {
            return Err(disk_full());
        }
        self.inner.save(order).await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Order> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        self.inner.find_by_customer(customer_id).await
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        self.inner.find_by_status(status).await
    }

    async fn lock(&self, id: OrderId) -> AggregateLock {
        self.inner.lock(id).await
    }
}
