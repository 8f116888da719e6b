//! Customer account endpoints.

use std::sync::Arc;

use application::{DeactivateCustomer, RedeemPoints, RegisterCustomer, UpdateCustomerContact};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use domain::{Aggregate, Customer, CustomerId, CustomerTier};
use repository::CustomerRepository;
use serde::{Deserialize, Serialize};

use super::{AddressBody, parse_id};
use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct RegisterCustomerRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize)]
pub struct UpdateContactRequest {
    pub phone_number: String,
    pub address: AddressBody,
}

#[derive(Deserialize)]
pub struct RedeemPointsRequest {
    pub points: u32,
}

#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub address: Option<AddressBody>,
    pub tier: CustomerTier,
    pub loyalty_points: u32,
    pub discount_percent: u8,
    pub active: bool,
    pub registered_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id(),
            email: customer.email().to_string(),
            first_name: customer.first_name().to_string(),
            last_name: customer.last_name().to_string(),
            phone_number: customer.phone_number().map(ToString::to_string),
            address: customer.address().map(AddressBody::from),
            tier: customer.tier(),
            loyalty_points: customer.loyalty_points(),
            discount_percent: customer.discount_percent(),
            active: customer.is_active(),
            registered_at: customer.registered_at(),
        }
    }
}

/// POST /customers
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let customer = state
        .customers
        .register(RegisterCustomer {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CustomerResponse::from(&customer))))
}

/// GET /customers/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer_id: CustomerId = parse_id(&id, "customer id")?;
    let customer = state.repositories.customers.find_by_id(customer_id).await?;
    Ok(Json(CustomerResponse::from(&customer)))
}

/// PUT /customers/{id}/contact
#[tracing::instrument(skip(state, req))]
pub async fn update_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateContactRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer_id: CustomerId = parse_id(&id, "customer id")?;
    let customer = state
        .customers
        .update_contact(UpdateCustomerContact {
            customer_id,
            phone_number: req.phone_number,
            address: req.address.into_address()?,
        })
        .await?;

    Ok(Json(CustomerResponse::from(&customer)))
}

/// POST /customers/{id}/redeem
#[tracing::instrument(skip(state, req))]
pub async fn redeem(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<RedeemPointsRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer_id: CustomerId = parse_id(&id, "customer id")?;
    let customer = state
        .customers
        .redeem_points(RedeemPoints {
            customer_id,
            points: req.points,
        })
        .await?;

    Ok(Json(CustomerResponse::from(&customer)))
}

/// POST /customers/{id}/deactivate
#[tracing::instrument(skip(state))]
pub async fn deactivate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer_id: CustomerId = parse_id(&id, "customer id")?;
    let customer = state
        .customers
        .deactivate(DeactivateCustomer { customer_id })
        .await?;

    Ok(Json(CustomerResponse::from(&customer)))
}
