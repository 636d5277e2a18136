//! Catalog domain errors

use core_kernel::PortError;
use std::fmt;
use thiserror::Error;

/// Errors that can occur in the catalog domain
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required field is missing or invalid
    #[error("{0}")]
    Validation(String),

    /// Config or service not found
    #[error("{0}")]
    NotFound(String),

    /// The underlying store failed
    #[error("storage error: {0}")]
    Storage(String),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }

    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        CatalogError::NotFound(format!("{entity} not found: {id}"))
    }
}

impl From<PortError> for CatalogError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { entity, id } => {
                CatalogError::NotFound(format!("{entity} not found: {id}"))
            }
            PortError::Validation { message } => CatalogError::Validation(message),
            PortError::Conflict { message } | PortError::Storage { message } => {
                CatalogError::Storage(message)
            }
        }
    }
}
