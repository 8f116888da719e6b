//! HTTP adapter for the order fulfillment core.
//!
//! Translates JSON requests into application commands, with structured
//! logging (tracing) and Prometheus metrics. Holds no business rules.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use application::{
    AddInventory, AddProduct, CancelOrderHandler, CreateOrderHandler, CreateStore,
    CustomerCommandHandler, OrderLifecycleHandler, StoreCommandHandler,
    subscribe_default_handlers,
};
use axum::Router;
use axum::routing::{get, post, put};
use domain::{Address, Aggregate, DomainError, Money, StoreId};
use event_bus::EventDispatcher;
use metrics_exporter_prometheus::PrometheusHandle;
use repository::InMemoryRepositories;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

type Dispatcher = Arc<EventDispatcher>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub repositories: InMemoryRepositories,
    pub dispatcher: Dispatcher,
    pub orders: CreateOrderHandler<InMemoryRepositories, Dispatcher>,
    pub cancellations: CancelOrderHandler<InMemoryRepositories, Dispatcher>,
    pub lifecycle: OrderLifecycleHandler<InMemoryRepositories, Dispatcher>,
    pub stores: StoreCommandHandler<InMemoryRepositories, Dispatcher>,
    pub customers: CustomerCommandHandler<InMemoryRepositories, Dispatcher>,

    /// Currency for stores created without an explicit one.
    pub default_currency: String,
}

impl AppState {
    /// Wires every handler over one set of repositories and one dispatcher.
    pub fn new(
        repositories: InMemoryRepositories,
        dispatcher: Dispatcher,
        config: &Config,
    ) -> Self {
        Self {
            orders: CreateOrderHandler::new(repositories.clone(), Arc::clone(&dispatcher)),
            cancellations: CancelOrderHandler::new(repositories.clone(), Arc::clone(&dispatcher)),
            lifecycle: OrderLifecycleHandler::new(repositories.clone(), Arc::clone(&dispatcher)),
            stores: StoreCommandHandler::new(repositories.clone(), Arc::clone(&dispatcher)),
            customers: CustomerCommandHandler::new(repositories.clone(), Arc::clone(&dispatcher)),
            default_currency: config.default_currency.clone(),
            repositories,
            dispatcher,
        }
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/stores", post(routes::stores::create).get(routes::stores::list))
        .route("/stores/{id}", get(routes::stores::get))
        .route("/stores/{id}/products", post(routes::stores::add_product))
        .route(
            "/stores/{id}/products/{pid}/price",
            put(routes::stores::update_price),
        )
        .route(
            "/stores/{id}/products/{pid}/deactivate",
            post(routes::stores::deactivate_product),
        )
        .route(
            "/stores/{id}/products/{pid}/inventory",
            post(routes::stores::add_inventory),
        )
        .route("/customers", post(routes::customers::register))
        .route("/customers/{id}", get(routes::customers::get))
        .route("/customers/{id}/contact", put(routes::customers::update_contact))
        .route("/customers/{id}/redeem", post(routes::customers::redeem))
        .route("/customers/{id}/deactivate", post(routes::customers::deactivate))
        .route("/orders", post(routes::orders::create).get(routes::orders::list))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/cancel", post(routes::orders::cancel))
        .route("/orders/{id}/prepare", post(routes::orders::prepare))
        .route("/orders/{id}/ready", post(routes::orders::ready))
        .route("/orders/{id}/complete", post(routes::orders::complete))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default in-memory state with the loyalty handler subscribed.
pub async fn create_default_state(config: &Config) -> Arc<AppState> {
    let repositories = InMemoryRepositories::new();
    let dispatcher = Arc::new(EventDispatcher::new());
    subscribe_default_handlers(&dispatcher, repositories.customers.clone()).await;

    Arc::new(AppState::new(repositories, dispatcher, config))
}

/// Seeds the "Main Street Lemonade Stand" with three lemonades, 100 units each.
#[tracing::instrument(skip(state))]
pub async fn seed_sample_data(state: &AppState) -> Result<StoreId, DomainError> {
    let store = state
        .stores
        .create_store(CreateStore {
            name: "Main Street Lemonade Stand".to_string(),
            location: Address::new("123 Main St", "Lemonade City", "CA", "12345", "USA")?,
            currency: "USD".to_string(),
        })
        .await?;

    let catalogue = [
        ("Classic Lemonade", "Fresh squeezed, lightly sweetened", 299),
        ("Strawberry Lemonade", "Classic with crushed strawberries", 349),
        ("Pink Lemonade", "A splash of cranberry", 329),
    ];
    for (name, description, price) in catalogue {
        let product = state
            .stores
            .add_product(AddProduct {
                store_id: store.id(),
                name: name.to_string(),
                description: description.to_string(),
                price: Money::new(price, "USD")?,
            })
            .await?;
        state
            .stores
            .add_inventory(AddInventory {
                store_id: store.id(),
                product_id: product.id(),
                quantity: 100,
            })
            .await?;
    }

    tracing::info!(store_id = %store.id(), "Sample data seeded");
    Ok(store.id())
}
