//! Catalog CRUD

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use core_kernel::{Document, DocumentStore, ServiceId};

use crate::config::MeasurementConfig;
use crate::error::CatalogError;
use crate::offering::{NewServiceOffering, ServiceOffering};
use crate::{MEASUREMENT_CONFIGS_TABLE, SERVICES_TABLE};

/// CRUD over measurement configs and service offerings.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Lists every measurement template.
    pub async fn list_configs(&self) -> Result<Vec<MeasurementConfig>, CatalogError> {
        let documents = self.store.scan(MEASUREMENT_CONFIGS_TABLE).await?;
        documents.into_iter().map(decode).collect()
    }

    /// Creates (or overwrites) the template for a garment type.
    pub async fn save_config(
        &self,
        garment_type: &str,
        measurements: Vec<String>,
    ) -> Result<MeasurementConfig, CatalogError> {
        if garment_type.trim().is_empty() {
            return Err(CatalogError::validation("garment type is required"));
        }

        let now = Utc::now().timestamp();
        let config = MeasurementConfig {
            garment_type: garment_type.to_string(),
            measurements,
            created_at: now,
            updated_at: now,
        };
        self.store
            .put(MEASUREMENT_CONFIGS_TABLE, garment_type, encode(&config)?)
            .await?;
        Ok(config)
    }

    /// Replaces the field list of an existing template.
    pub async fn update_config(
        &self,
        garment_type: &str,
        measurements: Vec<String>,
    ) -> Result<MeasurementConfig, CatalogError> {
        let document = self
            .store
            .get(MEASUREMENT_CONFIGS_TABLE, garment_type)
            .await?
            .ok_or_else(|| CatalogError::not_found("Measurement config", garment_type))?;
        let mut config: MeasurementConfig = decode(document)?;

        config.measurements = measurements;
        config.updated_at = Utc::now().timestamp();
        self.store
            .put(MEASUREMENT_CONFIGS_TABLE, garment_type, encode(&config)?)
            .await?;
        Ok(config)
    }

    /// Deletes a template.
    pub async fn delete_config(&self, garment_type: &str) -> Result<(), CatalogError> {
        self.store
            .delete(MEASUREMENT_CONFIGS_TABLE, garment_type)
            .await?;
        Ok(())
    }

    /// Lists the price list.
    pub async fn list_offerings(&self) -> Result<Vec<ServiceOffering>, CatalogError> {
        let documents = self.store.scan(SERVICES_TABLE).await?;
        documents.into_iter().map(decode).collect()
    }

    /// Adds an offering to the price list.
    pub async fn create_offering(
        &self,
        new: NewServiceOffering,
    ) -> Result<ServiceOffering, CatalogError> {
        validate_offering(&new)?;

        let now = Utc::now().timestamp();
        let offering = ServiceOffering {
            id: ServiceId::new(),
            name: new.name,
            description: new.description,
            default_price: new.default_price,
            created_at: now,
            updated_at: now,
        };
        self.store
            .put(SERVICES_TABLE, &offering.id.to_string(), encode(&offering)?)
            .await?;
        Ok(offering)
    }

    /// Replaces an existing offering's fields.
    pub async fn update_offering(
        &self,
        id: ServiceId,
        new: NewServiceOffering,
    ) -> Result<ServiceOffering, CatalogError> {
        validate_offering(&new)?;

        let document = self
            .store
            .get(SERVICES_TABLE, &id.to_string())
            .await?
            .ok_or_else(|| CatalogError::not_found("Service", id))?;
        let existing: ServiceOffering = decode(document)?;

        let offering = ServiceOffering {
            id,
            name: new.name,
            description: new.description,
            default_price: new.default_price,
            created_at: existing.created_at,
            updated_at: Utc::now().timestamp(),
        };
        self.store
            .put(SERVICES_TABLE, &id.to_string(), encode(&offering)?)
            .await?;
        Ok(offering)
    }

    /// Removes an offering from the price list.
    pub async fn delete_offering(&self, id: ServiceId) -> Result<(), CatalogError> {
        self.store.delete(SERVICES_TABLE, &id.to_string()).await?;
        Ok(())
    }
}

fn validate_offering(new: &NewServiceOffering) -> Result<(), CatalogError> {
    if new.name.trim().is_empty() {
        return Err(CatalogError::validation("service name is required"));
    }
    if new.default_price.is_negative() {
        return Err(CatalogError::validation("default price must not be negative"));
    }
    Ok(())
}

fn encode<T: Serialize>(value: &T) -> Result<Document, CatalogError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CatalogError::Storage(
            "entity did not serialize to a document".to_string(),
        )),
        Err(error) => Err(CatalogError::Storage(error.to_string())),
    }
}

fn decode<T: DeserializeOwned>(document: Document) -> Result<T, CatalogError> {
    serde_json::from_value(Value::Object(document)).map_err(|e| CatalogError::Storage(e.to_string()))
}
