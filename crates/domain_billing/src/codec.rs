//! Serde glue between domain entities and store documents

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use core_kernel::Document;

use crate::error::BillingError;

/// Serializes an entity into a store document.
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Document, BillingError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(BillingError::Storage(
            "entity did not serialize to a document".to_string(),
        )),
        Err(error) => Err(BillingError::Storage(error.to_string())),
    }
}

/// Deserializes a store document into an entity.
pub(crate) fn decode<T: DeserializeOwned>(document: Document) -> Result<T, BillingError> {
    serde_json::from_value(Value::Object(document)).map_err(|e| BillingError::Storage(e.to_string()))
}

/// Unwraps a `json!({...})` literal into a field map for partial updates.
pub(crate) fn fields(value: Value) -> Result<Document, BillingError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(BillingError::Storage(
            "update fields must be an object".to_string(),
        )),
    }
}
