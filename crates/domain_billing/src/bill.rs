//! The bill aggregate root
//!
//! A bill owns its embedded payments and received materials outright; line
//! items live in the separate [`crate::BillItemLedger`] keyed by this bill's
//! id. `paid_amount`, `outstanding_amount`, and `status` are derived and
//! never trusted from storage - [`Bill::recompute`] re-derives them from
//! `total_amount` and the payment list.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{BillId, CustomerId, Money, ReceivedItemId};

use crate::item::BillItem;
use crate::payment::Payment;

/// Payment status, derived from the amounts and never settable directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Unpaid,
    PartiallyPaid,
    FullyPaid,
}

impl BillStatus {
    /// Derives the status from the bill's amounts.
    pub fn derive(total_amount: Money, paid_amount: Money) -> Self {
        let outstanding = total_amount - paid_amount;
        if !outstanding.is_positive() {
            BillStatus::FullyPaid
        } else if paid_amount.is_positive() {
            BillStatus::PartiallyPaid
        } else {
            BillStatus::Unpaid
        }
    }
}

/// Material received from the customer (fabric, lining, buttons).
/// Independent of the bill's totals and payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedItem {
    pub id: ReceivedItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Input for a received material entry.
#[derive(Debug, Clone)]
pub struct NewReceivedItem {
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub received_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl ReceivedItem {
    pub fn from_new(new: NewReceivedItem) -> Self {
        Self {
            id: ReceivedItemId::new(),
            name: new.name,
            description: new.description,
            quantity: new.quantity,
            received_date: new.received_date,
            status: new.status,
        }
    }
}

/// A bill header as persisted in the `Bills` table.
///
/// `legacy_items` carries line items embedded by bills that predate the
/// item ledger; it is only read as a fallback and never written for new
/// bills.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: BillId,
    pub customer_id: CustomerId,
    pub bill_number: String,
    pub billing_date: NaiveDate,
    pub delivery_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<String>,
    #[serde(default)]
    pub received_items: Vec<ReceivedItem>,
    pub total_amount: Money,
    pub paid_amount: Money,
    pub outstanding_amount: Money,
    pub status: BillStatus,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "items", default, skip_serializing_if = "Vec::is_empty")]
    pub legacy_items: Vec<BillItem>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Bill {
    /// Re-derives `paid_amount`, `outstanding_amount`, and `status` from
    /// `total_amount` and the payment list.
    pub fn recompute(&mut self) {
        self.paid_amount = self.payments.iter().map(|p| p.amount).sum();
        self.outstanding_amount = self.total_amount - self.paid_amount;
        self.status = BillStatus::derive(self.total_amount, self.paid_amount);
    }
}

/// Builds the display bill number from the creation instant.
///
/// Not unique under same-second concurrent creation; accepted at the
/// request rates of a single shop.
pub fn generate_bill_number(at: DateTime<Utc>) -> String {
    format!("BILL-{}", at.format("%Y%m%d-%H%M%S"))
}
