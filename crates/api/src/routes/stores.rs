//! Store and catalogue endpoints.

use std::sync::Arc;

use application::{AddInventory, AddProduct, CreateStore, DeactivateProduct, UpdateProductPrice};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::{Aggregate, Product, ProductId, Store, StoreId};
use repository::StoreRepository;
use serde::{Deserialize, Serialize};

use super::{AddressBody, MoneyBody, parse_id};
use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateStoreRequest {
    pub name: String,
    pub location: AddressBody,
    /// Falls back to the configured default currency.
    pub currency: Option<String>,
}

#[derive(Deserialize)]
pub struct AddProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: MoneyBody,
}

#[derive(Deserialize)]
pub struct UpdatePriceRequest {
    pub price: MoneyBody,
}

#[derive(Deserialize)]
pub struct AddInventoryRequest {
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct StoreResponse {
    pub id: StoreId,
    pub name: String,
    pub location: AddressBody,
    pub currency: String,
    pub products: Vec<ProductResponse>,
}

impl StoreResponse {
    fn from_store(store: &Store) -> Self {
        let mut products: Vec<ProductResponse> = store
            .products()
            .map(|product| ProductResponse::from_product(store, product))
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(b.active.cmp(&a.active)));

        Self {
            id: store.id(),
            name: store.name().to_string(),
            location: AddressBody::from(store.location()),
            currency: store.currency().to_string(),
            products,
        }
    }
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: MoneyBody,
    pub active: bool,
    pub available_quantity: u32,
}

impl ProductResponse {
    fn from_product(store: &Store, product: &Product) -> Self {
        Self {
            id: product.id(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            price: MoneyBody::from(product.price()),
            active: product.is_active(),
            available_quantity: store.available_quantity(product.id()).unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
pub struct InventoryResponse {
    pub product_id: ProductId,
    pub available_quantity: u32,
}

// -- Handlers --

/// POST /stores
#[tracing::instrument(skip(state, req), fields(name = %req.name))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<StoreResponse>), ApiError> {
    let store = state
        .stores
        .create_store(CreateStore {
            name: req.name,
            location: req.location.into_address()?,
            currency: req
                .currency
                .unwrap_or_else(|| state.default_currency.clone()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(StoreResponse::from_store(&store))))
}

/// GET /stores
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoreResponse>>, ApiError> {
    let stores = state.repositories.stores.find_all().await?;
    Ok(Json(stores.iter().map(StoreResponse::from_store).collect()))
}

/// GET /stores/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoreResponse>, ApiError> {
    let store_id: StoreId = parse_id(&id, "store id")?;
    let store = state.repositories.stores.find_by_id(store_id).await?;
    Ok(Json(StoreResponse::from_store(&store)))
}

/// POST /stores/{id}/products
#[tracing::instrument(skip(state, req))]
pub async fn add_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let store_id: StoreId = parse_id(&id, "store id")?;
    let product = state
        .stores
        .add_product(AddProduct {
            store_id,
            name: req.name,
            description: req.description,
            price: req.price.into_money()?,
        })
        .await?;

    let response = ProductResponse {
        id: product.id(),
        name: product.name().to_string(),
        description: product.description().to_string(),
        price: MoneyBody::from(product.price()),
        active: product.is_active(),
        available_quantity: 0,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /stores/{id}/products/{pid}/price
#[tracing::instrument(skip(state, req))]
pub async fn update_price(
    State(state): State<Arc<AppState>>,
    Path((id, pid)): Path<(String, String)>,
    Json(req): Json<UpdatePriceRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let store_id: StoreId = parse_id(&id, "store id")?;
    let product_id: ProductId = parse_id(&pid, "product id")?;
    state
        .stores
        .update_product_price(UpdateProductPrice {
            store_id,
            product_id,
            price: req.price.into_money()?,
        })
        .await?;

    product_view(&state, store_id, product_id).await
}

/// POST /stores/{id}/products/{pid}/deactivate
#[tracing::instrument(skip(state))]
pub async fn deactivate_product(
    State(state): State<Arc<AppState>>,
    Path((id, pid)): Path<(String, String)>,
) -> Result<Json<ProductResponse>, ApiError> {
    let store_id: StoreId = parse_id(&id, "store id")?;
    let product_id: ProductId = parse_id(&pid, "product id")?;
    state
        .stores
        .deactivate_product(DeactivateProduct {
            store_id,
            product_id,
        })
        .await?;

    product_view(&state, store_id, product_id).await
}

/// POST /stores/{id}/products/{pid}/inventory
#[tracing::instrument(skip(state, req))]
pub async fn add_inventory(
    State(state): State<Arc<AppState>>,
    Path((id, pid)): Path<(String, String)>,
    Json(req): Json<AddInventoryRequest>,
) -> Result<Json<InventoryResponse>, ApiError> {
    let store_id: StoreId = parse_id(&id, "store id")?;
    let product_id: ProductId = parse_id(&pid, "product id")?;
    let available_quantity = state
        .stores
        .add_inventory(AddInventory {
            store_id,
            product_id,
            quantity: req.quantity,
        })
        .await?;

    Ok(Json(InventoryResponse {
        product_id,
        available_quantity,
    }))
}

async fn product_view(
    state: &AppState,
    store_id: StoreId,
    product_id: ProductId,
) -> Result<Json<ProductResponse>, ApiError> {
    let store = state.repositories.stores.find_by_id(store_id).await?;
    let product = store.get_product(product_id).map_err(domain::DomainError::from)?;
    Ok(Json(ProductResponse::from_product(&store, product)))
}
