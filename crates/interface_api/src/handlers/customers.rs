//! Customer handlers

use axum::extract::State;
use axum::Json as ResponseJson;

use core_kernel::{CustomerId, MeasurementId};
use domain_party::{Customer, Measurement};

use crate::dto::customer::*;
use crate::dto::MessageResponse;
use crate::error::ApiError;
use crate::extract::{Json, Path, Query};
use crate::AppState;

/// Lists customers with search and cursor pagination
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListCustomersQuery>,
) -> Result<ResponseJson<CustomerListResponse>, ApiError> {
    let page = state.customers.list(query.into()).await?;
    Ok(ResponseJson(CustomerListResponse {
        customers: page.customers,
        last_evaluated_key: page.last_evaluated_key,
    }))
}

/// Creates a customer
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<SaveCustomerRequest>,
) -> Result<ResponseJson<Customer>, ApiError> {
    let customer = state.customers.create(request.into()).await?;
    Ok(ResponseJson(customer))
}

/// Reports customers sharing the given phone number
pub async fn check_customer_exists(
    State(state): State<AppState>,
    Query(query): Query<PhoneCheckQuery>,
) -> Result<ResponseJson<PhoneCheckResponse>, ApiError> {
    let phone = query
        .phone
        .ok_or_else(|| ApiError::Validation("phone number is required".to_string()))?;
    let check = state.customers.check_phone(&phone).await?;
    Ok(ResponseJson(PhoneCheckResponse {
        exists: check.exists,
        matches: check.matches,
    }))
}

/// Fetches one customer
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<ResponseJson<Customer>, ApiError> {
    Ok(ResponseJson(state.customers.get(id).await?))
}

/// Replaces a customer's details
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Json(request): Json<SaveCustomerRequest>,
) -> Result<ResponseJson<Customer>, ApiError> {
    Ok(ResponseJson(state.customers.update(id, request.into()).await?))
}

/// Deletes a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    state.customers.delete(id).await?;
    Ok(ResponseJson(MessageResponse::new("customer deleted")))
}

/// Lists a customer's measurements
pub async fn list_measurements(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<ResponseJson<Vec<Measurement>>, ApiError> {
    Ok(ResponseJson(state.customers.list_measurements(id).await?))
}

/// Saves (upserts) one measurement
pub async fn save_measurement(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Json(request): Json<MeasurementPayload>,
) -> Result<ResponseJson<Measurement>, ApiError> {
    let measurement = state.customers.save_measurement(id, request.into()).await?;
    Ok(ResponseJson(measurement))
}

/// Deletes one measurement
pub async fn delete_measurement(
    State(state): State<AppState>,
    Path((id, measurement_id)): Path<(CustomerId, MeasurementId)>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    state.customers.delete_measurement(id, measurement_id).await?;
    Ok(ResponseJson(MessageResponse::new("measurement deleted")))
}
