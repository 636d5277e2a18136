//! Billing domain errors

use core_kernel::PortError;
use std::fmt;
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// A required field is missing or a business rule was violated
    #[error("{0}")]
    Validation(String),

    /// Bill, item, payment, or image not found
    #[error("{0}")]
    NotFound(String),

    /// A conditional write lost a race with a concurrent mutation
    #[error("{0}")]
    Conflict(String),

    /// The underlying store failed
    #[error("storage error: {0}")]
    Storage(String),
}

impl BillingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }

    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        BillingError::NotFound(format!("{entity} not found: {id}"))
    }
}

impl From<PortError> for BillingError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { entity, id } => {
                BillingError::NotFound(format!("{entity} not found: {id}"))
            }
            PortError::Validation { message } => BillingError::Validation(message),
            PortError::Conflict { message } => BillingError::Conflict(message),
            PortError::Storage { message } => BillingError::Storage(message),
        }
    }
}
