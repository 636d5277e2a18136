//! Catalog DTOs

use serde::{Deserialize, Serialize};

use core_kernel::Money;
use domain_catalog::{MeasurementConfig, NewServiceOffering};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeasurementConfigRequest {
    pub garment_type: String,
    /// Older clients send the field list as `fields`
    #[serde(default, alias = "fields")]
    pub measurements: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeasurementConfigRequest {
    #[serde(default, alias = "fields")]
    pub measurements: Vec<String>,
}

/// Measurement config plus the `id` echo older clients expect.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementConfigResponse {
    pub id: String,
    pub garment_type: String,
    pub measurements: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<MeasurementConfig> for MeasurementConfigResponse {
    fn from(config: MeasurementConfig) -> Self {
        MeasurementConfigResponse {
            id: config.garment_type.clone(),
            garment_type: config.garment_type,
            measurements: config.measurements,
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveServiceRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub default_price: Money,
}

impl From<SaveServiceRequest> for NewServiceOffering {
    fn from(request: SaveServiceRequest) -> Self {
        NewServiceOffering {
            name: request.name,
            description: request.description,
            default_price: request.default_price,
        }
    }
}
