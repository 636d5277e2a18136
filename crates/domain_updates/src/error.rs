//! Updates domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur in the updates domain
#[derive(Debug, Error)]
pub enum UpdatesError {
    /// A required field is missing or invalid
    #[error("{0}")]
    Validation(String),

    /// The underlying store failed
    #[error("storage error: {0}")]
    Storage(String),
}

impl UpdatesError {
    pub fn validation(message: impl Into<String>) -> Self {
        UpdatesError::Validation(message.into())
    }
}

impl From<PortError> for UpdatesError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::Validation { message } => UpdatesError::Validation(message),
            other => UpdatesError::Storage(other.to_string()),
        }
    }
}
