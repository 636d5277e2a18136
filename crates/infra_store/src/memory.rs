//! In-memory document store
//!
//! Tables are `BTreeMap`s of JSON documents, so `scan` returns documents in
//! key order - the customer listing relies on that for its cursor. The whole
//! store sits behind one `RwLock`; operations never hold the lock across an
//! await point.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use core_kernel::{Condition, Document, DocumentStore, PortError};

type Table = BTreeMap<String, Document>;

/// In-memory `DocumentStore` implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> PortError {
        PortError::storage("store lock poisoned")
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, table: &str, key: &str) -> Result<Option<Document>, PortError> {
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        Ok(tables.get(table).and_then(|t| t.get(key)).cloned())
    }

    async fn put(&self, table: &str, key: &str, document: Document) -> Result<(), PortError> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), document);
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        key: &str,
        fields: Document,
        condition: Option<Condition>,
    ) -> Result<Document, PortError> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        let document = tables
            .get_mut(table)
            .and_then(|t| t.get_mut(key))
            .ok_or_else(|| PortError::not_found(table, key))?;

        if let Some(condition) = condition {
            let current = document.get(&condition.field).unwrap_or(&Value::Null);
            if current != &condition.equals {
                return Err(PortError::conflict(format!(
                    "condition failed on field '{}'",
                    condition.field
                )));
            }
        }

        for (field, value) in fields {
            document.insert(field, value);
        }
        Ok(document.clone())
    }

    async fn delete(&self, table: &str, key: &str) -> Result<(), PortError> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        if let Some(t) = tables.get_mut(table) {
            t.remove(key);
        }
        Ok(())
    }

    async fn scan(&self, table: &str) -> Result<Vec<Document>, PortError> {
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        Ok(tables
            .get(table)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn query_by_index(
        &self,
        table: &str,
        index_field: &str,
        value: &str,
    ) -> Result<Vec<Document>, PortError> {
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        Ok(tables
            .get(table)
            .map(|t| {
                t.values()
                    .filter(|doc| doc.get(index_field).and_then(Value::as_str) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn append_to_list(
        &self,
        table: &str,
        key: &str,
        field: &str,
        value: Value,
    ) -> Result<(), PortError> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        let document = tables
            .get_mut(table)
            .and_then(|t| t.get_mut(key))
            .ok_or_else(|| PortError::not_found(table, key))?;

        match document
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(list) => {
                list.push(value);
                Ok(())
            }
            _ => Err(PortError::storage(format!(
                "field '{field}' is not a list"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(pairs: &[(&str, Value)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let store = MemoryStore::new();
        store
            .put("Bills", "bill-1", doc(&[("totalAmount", json!(100.0))]))
            .await
            .unwrap();

        let fetched = store.get("Bills", "bill-1").await.unwrap().unwrap();
        assert_eq!(fetched.get("totalAmount"), Some(&json!(100.0)));
        assert!(store.get("Bills", "bill-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        store
            .put(
                "Bills",
                "bill-1",
                doc(&[("status", json!("unpaid")), ("notes", json!("rush"))]),
            )
            .await
            .unwrap();

        let updated = store
            .update("Bills", "bill-1", doc(&[("status", json!("fully_paid"))]), None)
            .await
            .unwrap();

        assert_eq!(updated.get("status"), Some(&json!("fully_paid")));
        assert_eq!(updated.get("notes"), Some(&json!("rush")));
    }

    #[tokio::test]
    async fn test_update_missing_key_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update("Bills", "bill-x", Document::new(), None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_conditional_update_conflicts_on_stale_value() {
        let store = MemoryStore::new();
        store
            .put("Bills", "bill-1", doc(&[("updatedAt", json!(100))]))
            .await
            .unwrap();

        let err = store
            .update(
                "Bills",
                "bill-1",
                doc(&[("status", json!("fully_paid"))]),
                Some(Condition::field_equals("updatedAt", 99)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));

        // The matching condition goes through.
        store
            .update(
                "Bills",
                "bill-1",
                doc(&[("status", json!("fully_paid"))]),
                Some(Condition::field_equals("updatedAt", 100)),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_append_creates_and_extends_list() {
        let store = MemoryStore::new();
        store.put("BillItems", "item-1", Document::new()).await.unwrap();

        store
            .append_to_list("BillItems", "item-1", "referenceImages", json!("u1"))
            .await
            .unwrap();
        store
            .append_to_list("BillItems", "item-1", "referenceImages", json!("u2"))
            .await
            .unwrap();

        let fetched = store.get("BillItems", "item-1").await.unwrap().unwrap();
        assert_eq!(fetched.get("referenceImages"), Some(&json!(["u1", "u2"])));
    }

    #[tokio::test]
    async fn test_query_by_index() {
        let store = MemoryStore::new();
        for (key, bill) in [("item-1", "bill-a"), ("item-2", "bill-a"), ("item-3", "bill-b")] {
            store
                .put("BillItems", key, doc(&[("billId", json!(bill))]))
                .await
                .unwrap();
        }

        let matches = store
            .query_by_index("BillItems", "billId", "bill-a")
            .await
            .unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[tokio::test]
    async fn test_scan_is_key_ordered() {
        let store = MemoryStore::new();
        for key in ["c", "a", "b"] {
            store
                .put("Customers", key, doc(&[("id", json!(key))]))
                .await
                .unwrap();
        }

        let all = store.scan("Customers").await.unwrap();
        let keys: Vec<_> = all
            .iter()
            .map(|d| d.get("id").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
