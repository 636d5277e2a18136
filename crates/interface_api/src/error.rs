//! API error handling
//!
//! Every failure leaving a handler is translated to the shared taxonomy:
//! validation -> 400, not found -> 404, conflict -> 409, everything else
//! -> 500. Error bodies are always `{"error": "<message>"}` and, like
//! success responses, pass through the permissive CORS layer.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_billing::BillingError;
use domain_catalog::CatalogError;
use domain_party::PartyError;
use domain_updates::UpdatesError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::Internal(message) => {
                tracing::error!(%message, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an unexpected error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<BillingError> for ApiError {
    fn from(error: BillingError) -> Self {
        match error {
            BillingError::Validation(message) => ApiError::Validation(message),
            BillingError::NotFound(message) => ApiError::NotFound(message),
            BillingError::Conflict(message) => ApiError::Conflict(message),
            BillingError::Storage(message) => ApiError::Internal(message),
        }
    }
}

impl From<PartyError> for ApiError {
    fn from(error: PartyError) -> Self {
        match error {
            PartyError::Validation(message) => ApiError::Validation(message),
            PartyError::NotFound(message) => ApiError::NotFound(message),
            PartyError::Storage(message) => ApiError::Internal(message),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::Validation(message) => ApiError::Validation(message),
            CatalogError::NotFound(message) => ApiError::NotFound(message),
            CatalogError::Storage(message) => ApiError::Internal(message),
        }
    }
}

impl From<UpdatesError> for ApiError {
    fn from(error: UpdatesError) -> Self {
        match error {
            UpdatesError::Validation(message) => ApiError::Validation(message),
            UpdatesError::Storage(message) => ApiError::Internal(message),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                match &error.message {
                    Some(message) => parts.push(message.to_string()),
                    None => parts.push(format!("invalid value for '{field}'")),
                }
            }
        }
        parts.sort();
        parts.dedup();
        ApiError::Validation(parts.join("; "))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
