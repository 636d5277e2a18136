//! Request/response data transfer objects

pub mod billing;
pub mod catalog;
pub mod customer;
pub mod updates;

use serde::Serialize;

/// Plain acknowledgement body for deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
