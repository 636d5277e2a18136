//! Port traits for the external stores
//!
//! The back office persists into a managed document store (tables of JSON
//! documents addressed by a string key, with a secondary-index lookup and an
//! atomic list-append primitive) and a blob store for binary media. Both are
//! external collaborators; these traits define exactly the contract the
//! domain layer needs, so adapters can be swapped for in-memory fakes in
//! tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A stored document: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, Value>;

/// Error type shared by all store operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The request is malformed or violates a business rule
    #[error("{message}")]
    Validation { message: String },

    /// A conditional write found the record changed underneath it
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// The underlying store failed
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        PortError::Storage {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// A compare-and-swap condition attached to an update.
///
/// The write only succeeds when the stored document currently holds
/// `equals` at `field`; otherwise the store reports `PortError::Conflict`.
#[derive(Debug, Clone)]
pub struct Condition {
    pub field: String,
    pub equals: Value,
}

impl Condition {
    /// Requires `field` to currently equal `value`
    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            equals: value.into(),
        }
    }
}

/// Contract for the managed document store.
///
/// Tables are addressed by name; every document lives under a string key.
/// `update` merges the given fields into an existing document and fails with
/// `NotFound` when the key is absent. `append_to_list` is atomic with
/// respect to concurrent appends on the same document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a document by key, `None` when absent
    async fn get(&self, table: &str, key: &str) -> Result<Option<Document>, PortError>;

    /// Writes a full document, replacing any existing one
    async fn put(&self, table: &str, key: &str, document: Document) -> Result<(), PortError>;

    /// Merges `fields` into an existing document and returns the result.
    ///
    /// Fails with `NotFound` when the key is absent and with `Conflict`
    /// when `condition` does not hold.
    async fn update(
        &self,
        table: &str,
        key: &str,
        fields: Document,
        condition: Option<Condition>,
    ) -> Result<Document, PortError>;

    /// Deletes a document; deleting an absent key is not an error
    async fn delete(&self, table: &str, key: &str) -> Result<(), PortError>;

    /// Returns every document in the table, in key order
    async fn scan(&self, table: &str) -> Result<Vec<Document>, PortError>;

    /// Returns the documents whose `index_field` equals `value`
    async fn query_by_index(
        &self,
        table: &str,
        index_field: &str,
        value: &str,
    ) -> Result<Vec<Document>, PortError>;

    /// Atomically appends `value` to the list at `field`, creating the list
    /// when absent. Fails with `NotFound` when the document is absent.
    async fn append_to_list(
        &self,
        table: &str,
        key: &str,
        field: &str,
        value: Value,
    ) -> Result<(), PortError>;
}

/// Contract for the blob store holding images and update packages.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores a blob under the given key
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: HashMap<String, String>,
    ) -> Result<(), PortError>;

    /// Deletes a blob; deleting an absent key is not an error
    async fn delete(&self, key: &str) -> Result<(), PortError>;

    /// Returns the publicly resolvable URL for a key
    fn url_for(&self, key: &str) -> String;

    /// Returns the key a previously issued URL points at, if it is ours
    fn key_for_url(&self, url: &str) -> Option<String>;

    /// Returns a time-limited download URL for a key
    fn download_url(&self, key: &str, ttl_secs: u64) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = PortError::not_found("Bill", "bill-123");
        assert!(error.is_not_found());
        assert!(error.to_string().contains("Bill"));
        assert!(error.to_string().contains("bill-123"));
    }

    #[test]
    fn test_condition_builder() {
        let condition = Condition::field_equals("updatedAt", 42);
        assert_eq!(condition.field, "updatedAt");
        assert_eq!(condition.equals, serde_json::json!(42));
    }
}
