//! Party domain errors

use core_kernel::PortError;
use std::fmt;
use thiserror::Error;

/// Errors that can occur in the party domain
#[derive(Debug, Error)]
pub enum PartyError {
    /// A required field is missing or invalid
    #[error("{0}")]
    Validation(String),

    /// Customer or measurement not found
    #[error("{0}")]
    NotFound(String),

    /// The underlying store failed
    #[error("storage error: {0}")]
    Storage(String),
}

impl PartyError {
    pub fn validation(message: impl Into<String>) -> Self {
        PartyError::Validation(message.into())
    }

    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        PartyError::NotFound(format!("{entity} not found: {id}"))
    }
}

impl From<PortError> for PartyError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { entity, id } => {
                PartyError::NotFound(format!("{entity} not found: {id}"))
            }
            PortError::Validation { message } => PartyError::Validation(message),
            PortError::Conflict { message } | PortError::Storage { message } => {
                PartyError::Storage(message)
            }
        }
    }
}
