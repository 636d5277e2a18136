//! Catalog handlers

use axum::extract::State;
use axum::Json as ResponseJson;

use core_kernel::ServiceId;
use domain_catalog::ServiceOffering;

use crate::dto::catalog::*;
use crate::dto::MessageResponse;
use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::AppState;

/// Lists every measurement template
pub async fn list_measurement_configs(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<MeasurementConfigResponse>>, ApiError> {
    let configs = state.catalog.list_configs().await?;
    Ok(ResponseJson(configs.into_iter().map(Into::into).collect()))
}

/// Creates (or overwrites) a measurement template
pub async fn create_measurement_config(
    State(state): State<AppState>,
    Json(request): Json<CreateMeasurementConfigRequest>,
) -> Result<ResponseJson<MeasurementConfigResponse>, ApiError> {
    let config = state
        .catalog
        .save_config(&request.garment_type, request.measurements)
        .await?;
    Ok(ResponseJson(config.into()))
}

/// Replaces the field list of an existing template
pub async fn update_measurement_config(
    State(state): State<AppState>,
    Path(garment_type): Path<String>,
    Json(request): Json<UpdateMeasurementConfigRequest>,
) -> Result<ResponseJson<MeasurementConfigResponse>, ApiError> {
    let config = state
        .catalog
        .update_config(&garment_type, request.measurements)
        .await?;
    Ok(ResponseJson(config.into()))
}

/// Deletes a measurement template
pub async fn delete_measurement_config(
    State(state): State<AppState>,
    Path(garment_type): Path<String>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    state.catalog.delete_config(&garment_type).await?;
    Ok(ResponseJson(MessageResponse::new("measurement config deleted")))
}

/// Lists the services price list
pub async fn list_services(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<ServiceOffering>>, ApiError> {
    Ok(ResponseJson(state.catalog.list_offerings().await?))
}

/// Adds a service offering
pub async fn create_service(
    State(state): State<AppState>,
    Json(request): Json<SaveServiceRequest>,
) -> Result<ResponseJson<ServiceOffering>, ApiError> {
    Ok(ResponseJson(state.catalog.create_offering(request.into()).await?))
}

/// Replaces a service offering
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
    Json(request): Json<SaveServiceRequest>,
) -> Result<ResponseJson<ServiceOffering>, ApiError> {
    Ok(ResponseJson(
        state.catalog.update_offering(id, request.into()).await?,
    ))
}

/// Removes a service offering
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    state.catalog.delete_offering(id).await?;
    Ok(ResponseJson(MessageResponse::new("service deleted")))
}
