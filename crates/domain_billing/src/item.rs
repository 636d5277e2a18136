//! Bill line items
//!
//! Items are persisted independently of the bill header (table
//! `BillItems`, secondary index on `billId`) so they can be queried and
//! mutated per bill. `total_price` is derived on every write and never
//! taken verbatim from client input.

use serde::{Deserialize, Serialize};

use core_kernel::{BillId, BillItemId, Money, ServiceId};

/// Who supplied the garment material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialSource {
    #[default]
    Customer,
    Shop,
}

/// A priced line entry on a bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItem {
    pub id: BillItemId,
    pub bill_id: BillId,
    /// Free-form category, e.g. "custom" or "alteration"
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
    /// Optional reference into the services price list; not validated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_item_id: Option<ServiceId>,
    #[serde(default)]
    pub material_source: MaterialSource,
    /// Per-item delivery tracking, independent of the bill-level status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<String>,
    /// Staff-only notes, never shown to the customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_notes: Option<String>,
    /// Blob-store URLs, mutated only through image attach/detach
    #[serde(default)]
    pub reference_images: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating or replacing a line item.
///
/// Carries the item id when the client is editing an existing item, so the
/// ledger can preserve its attachments and creation time.
#[derive(Debug, Clone)]
pub struct NewBillItem {
    pub id: Option<BillItemId>,
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub unit_price: Money,
    pub config_item_id: Option<ServiceId>,
    pub material_source: MaterialSource,
    pub delivery_status: Option<String>,
    pub internal_notes: Option<String>,
}

impl NewBillItem {
    /// quantity x unit price, with negative prices floored at zero.
    pub fn total_price(&self) -> Money {
        self.unit_price.clamp_non_negative() * self.quantity
    }

    /// Materializes a brand-new item owned by `bill_id`.
    pub fn into_item(self, bill_id: BillId, now: i64) -> BillItem {
        let total_price = self.total_price();
        BillItem {
            id: self.id.unwrap_or_default(),
            bill_id,
            kind: self.kind,
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price.clamp_non_negative(),
            total_price,
            config_item_id: self.config_item_id,
            material_source: self.material_source,
            delivery_status: self.delivery_status,
            internal_notes: self.internal_notes,
            reference_images: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Materializes a replacement for `previous`, keeping its id, creation
    /// time, and attached reference images.
    pub fn into_item_preserving(self, previous: &BillItem, now: i64) -> BillItem {
        let mut item = self.into_item(previous.bill_id, now);
        item.id = previous.id;
        item.reference_images = previous.reference_images.clone();
        item.created_at = previous.created_at;
        item
    }
}
