//! The bill item ledger
//!
//! Owns the physical storage of line items, independent of the bill
//! header. Replacement is diff-based rather than delete-all-then-insert:
//! items whose id survives an edit keep their reference images and creation
//! time, items the user removed are deleted, and genuinely new items start
//! clean. A naive recreate would silently destroy every attached image on
//! each bill edit.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use core_kernel::{BillId, BillItemId, DocumentStore};

use crate::codec;
use crate::error::BillingError;
use crate::item::{BillItem, NewBillItem};
use crate::BILL_ITEMS_TABLE;

/// Storage access for a bill's line items.
#[derive(Clone)]
pub struct BillItemLedger {
    store: Arc<dyn DocumentStore>,
}

impl BillItemLedger {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Fetches one item by id.
    pub async fn get(&self, id: BillItemId) -> Result<Option<BillItem>, BillingError> {
        match self.store.get(BILL_ITEMS_TABLE, &id.to_string()).await? {
            Some(document) => Ok(Some(codec::decode(document)?)),
            None => Ok(None),
        }
    }

    /// Deletes one item by id.
    pub async fn delete(&self, id: BillItemId) -> Result<(), BillingError> {
        self.store.delete(BILL_ITEMS_TABLE, &id.to_string()).await?;
        Ok(())
    }

    /// Returns every item owned by `bill_id`, oldest first.
    pub async fn get_by_bill(&self, bill_id: BillId) -> Result<Vec<BillItem>, BillingError> {
        let documents = self
            .store
            .query_by_index(BILL_ITEMS_TABLE, "billId", &bill_id.to_string())
            .await?;

        let mut items = documents
            .into_iter()
            .map(codec::decode::<BillItem>)
            .collect::<Result<Vec<_>, _>>()?;
        items.sort_by_key(|item| (item.created_at, item.id));
        Ok(items)
    }

    /// Replaces the ledger entries for `bill_id` with `new_items`.
    ///
    /// Existing items absent from `new_items` are deleted; items carrying a
    /// known id are upserted preserving images and `created_at`; the rest
    /// are created fresh. Returns the materialized items.
    pub async fn replace_all(
        &self,
        bill_id: BillId,
        new_items: Vec<NewBillItem>,
        now: i64,
    ) -> Result<Vec<BillItem>, BillingError> {
        let existing = self.get_by_bill(bill_id).await?;
        let kept_ids: HashSet<BillItemId> = new_items.iter().filter_map(|item| item.id).collect();

        for item in &existing {
            if !kept_ids.contains(&item.id) {
                self.store
                    .delete(BILL_ITEMS_TABLE, &item.id.to_string())
                    .await?;
            }
        }

        let existing_by_id: HashMap<BillItemId, BillItem> =
            existing.into_iter().map(|item| (item.id, item)).collect();

        let mut items = Vec::with_capacity(new_items.len());
        for new in new_items {
            let item = match new.id.and_then(|id| existing_by_id.get(&id)) {
                Some(previous) => new.into_item_preserving(previous, now),
                None => new.into_item(bill_id, now),
            };
            self.store
                .put(BILL_ITEMS_TABLE, &item.id.to_string(), codec::encode(&item)?)
                .await?;
            items.push(item);
        }
        Ok(items)
    }

    /// Unconditionally removes every item owned by `bill_id`.
    /// Used only while cascading a whole-bill delete.
    pub async fn delete_all_for_bill(&self, bill_id: BillId) -> Result<(), BillingError> {
        for item in self.get_by_bill(bill_id).await? {
            self.store
                .delete(BILL_ITEMS_TABLE, &item.id.to_string())
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Money;
    use infra_store::MemoryStore;
    use rust_decimal_macros::dec;

    use crate::item::MaterialSource;

    fn new_item(name: &str, id: Option<BillItemId>) -> NewBillItem {
        NewBillItem {
            id,
            kind: "custom".to_string(),
            name: name.to_string(),
            description: None,
            quantity: 1,
            unit_price: Money::new(dec!(100)),
            config_item_id: None,
            material_source: MaterialSource::Customer,
            delivery_status: None,
            internal_notes: None,
        }
    }

    #[tokio::test]
    async fn test_replace_preserves_surviving_items() {
        let store = Arc::new(MemoryStore::new());
        let ledger = BillItemLedger::new(store.clone());
        let bill_id = BillId::new();

        let initial = ledger
            .replace_all(bill_id, vec![new_item("A", None), new_item("B", None)], 100)
            .await
            .unwrap();
        let item_a = initial[0].clone();
        let item_b = initial[1].clone();

        // Attach images to A out of band.
        store
            .append_to_list(
                BILL_ITEMS_TABLE,
                &item_a.id.to_string(),
                "referenceImages",
                serde_json::json!("https://blob/img-1.jpg"),
            )
            .await
            .unwrap();
        store
            .append_to_list(
                BILL_ITEMS_TABLE,
                &item_a.id.to_string(),
                "referenceImages",
                serde_json::json!("https://blob/img-2.jpg"),
            )
            .await
            .unwrap();

        // Edit A, drop B, add C.
        let mut edited_a = new_item("A edited", Some(item_a.id));
        edited_a.quantity = 2;
        let replaced = ledger
            .replace_all(bill_id, vec![edited_a, new_item("C", None)], 200)
            .await
            .unwrap();

        assert_eq!(replaced.len(), 2);
        let a = replaced.iter().find(|i| i.id == item_a.id).unwrap();
        assert_eq!(a.name, "A edited");
        assert_eq!(a.reference_images.len(), 2);
        assert_eq!(a.created_at, 100);
        assert_eq!(a.updated_at, 200);

        let c = replaced.iter().find(|i| i.id != item_a.id).unwrap();
        assert!(c.reference_images.is_empty());
        assert_eq!(c.created_at, 200);

        assert!(ledger.get(item_b.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_all_for_bill_leaves_other_bills_alone() {
        let store = Arc::new(MemoryStore::new());
        let ledger = BillItemLedger::new(store);
        let bill_a = BillId::new();
        let bill_b = BillId::new();

        ledger
            .replace_all(bill_a, vec![new_item("A1", None), new_item("A2", None)], 1)
            .await
            .unwrap();
        ledger
            .replace_all(bill_b, vec![new_item("B1", None)], 1)
            .await
            .unwrap();

        ledger.delete_all_for_bill(bill_a).await.unwrap();

        assert!(ledger.get_by_bill(bill_a).await.unwrap().is_empty());
        assert_eq!(ledger.get_by_bill(bill_b).await.unwrap().len(), 1);
    }
}
