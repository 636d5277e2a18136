//! The bill aggregate engine
//!
//! All bill mutations funnel through [`BillService`], which keeps the
//! derived amounts and status consistent with the item ledger and the
//! embedded payment list. Payment mutations and the single-item-delete
//! header adjustment persist through a conditional write on `updatedAt`;
//! a lost race surfaces as [`BillingError::Conflict`] for the caller to
//! retry. The header/ledger write pairs in create and update are not
//! transactional - a failure in between leaves a header without items,
//! which reads degrade to gracefully.

use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::sync::Arc;

use core_kernel::{BillId, BillItemId, Condition, CustomerId, DocumentStore, Money, PaymentId};

use crate::bill::{generate_bill_number, Bill, BillStatus, NewReceivedItem, ReceivedItem};
use crate::codec;
use crate::error::BillingError;
use crate::item::{BillItem, NewBillItem};
use crate::ledger::BillItemLedger;
use crate::payment::{NewPayment, Payment};
use crate::BILLS_TABLE;

/// Default page size for bill listings.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Input for creating a bill.
#[derive(Debug, Clone)]
pub struct CreateBill {
    pub customer_id: CustomerId,
    pub billing_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub delivery_status: Option<String>,
    pub items: Vec<NewBillItem>,
    pub received_items: Vec<NewReceivedItem>,
    pub payments: Vec<NewPayment>,
    pub discount: Option<Money>,
    pub notes: Option<String>,
}

/// Input for a whole-bill update. Items and received items are replaced
/// wholesale; payments are deliberately absent and survive the edit.
#[derive(Debug, Clone)]
pub struct UpdateBill {
    pub customer_id: CustomerId,
    pub billing_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub delivery_status: Option<String>,
    pub items: Vec<NewBillItem>,
    pub received_items: Vec<NewReceivedItem>,
    pub discount: Option<Money>,
    pub notes: Option<String>,
}

/// Server-side listing filters.
#[derive(Debug, Clone)]
pub struct BillFilter {
    pub customer_id: Option<CustomerId>,
    pub status: Option<BillStatus>,
    pub delivery_status: Option<String>,
    pub billing_from: Option<NaiveDate>,
    pub billing_to: Option<NaiveDate>,
    pub delivery_from: Option<NaiveDate>,
    pub delivery_to: Option<NaiveDate>,
    pub search_text: Option<String>,
    pub limit: usize,
}

impl Default for BillFilter {
    fn default() -> Self {
        Self {
            customer_id: None,
            status: None,
            delivery_status: None,
            billing_from: None,
            billing_to: None,
            delivery_from: None,
            delivery_to: None,
            search_text: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl BillFilter {
    fn matches(&self, bill: &Bill) -> bool {
        if let Some(customer_id) = self.customer_id {
            if bill.customer_id != customer_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if bill.status != status {
                return false;
            }
        }
        if let Some(wanted) = self.delivery_status.as_deref() {
            // Bills written before delivery tracking existed have no stored
            // value and count as pending. Every other filter value needs an
            // exact stored match.
            let matches = match bill.delivery_status.as_deref() {
                Some(stored) => stored == wanted,
                None => wanted == "pending",
            };
            if !matches {
                return false;
            }
        }
        if let Some(from) = self.billing_from {
            if bill.billing_date < from {
                return false;
            }
        }
        if let Some(to) = self.billing_to {
            if bill.billing_date > to {
                return false;
            }
        }
        if let Some(from) = self.delivery_from {
            if bill.delivery_date < from {
                return false;
            }
        }
        if let Some(to) = self.delivery_to {
            if bill.delivery_date > to {
                return false;
            }
        }
        if let Some(text) = self.search_text.as_deref() {
            let in_number = bill.bill_number.contains(text);
            let in_notes = bill.notes.as_deref().is_some_and(|n| n.contains(text));
            if !in_number && !in_notes {
                return false;
            }
        }
        true
    }
}

/// A bill header together with its ledger items.
#[derive(Debug, Clone)]
pub struct BillDetail {
    pub bill: Bill,
    pub items: Vec<BillItem>,
}

/// One page of bill headers.
#[derive(Debug, Clone)]
pub struct BillPage {
    pub bills: Vec<Bill>,
    pub has_more: bool,
}

/// Create/read/update/delete for bills plus the payment ledger operations.
#[derive(Clone)]
pub struct BillService {
    store: Arc<dyn DocumentStore>,
    ledger: BillItemLedger,
}

impl BillService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let ledger = BillItemLedger::new(store.clone());
        Self { store, ledger }
    }

    /// Returns the underlying item ledger.
    pub fn ledger(&self) -> &BillItemLedger {
        &self.ledger
    }

    /// Creates a bill with its initial items and optional opening payments.
    ///
    /// Opening payments must each be positive and must not sum past the
    /// bill total; any violation fails the whole creation.
    pub async fn create(&self, input: CreateBill) -> Result<BillDetail, BillingError> {
        if input.items.is_empty() {
            return Err(BillingError::validation("at least one bill item is required"));
        }

        let now = Utc::now();
        let created_at = now.timestamp();
        let total_amount: Money = input.items.iter().map(NewBillItem::total_price).sum();

        let mut payments = Vec::with_capacity(input.payments.len());
        let mut running = Money::ZERO;
        for new in input.payments {
            if !new.amount.is_positive() {
                return Err(BillingError::validation("payment amount must be positive"));
            }
            running = running + new.amount;
            if running > total_amount {
                return Err(BillingError::validation("payments exceed the bill total"));
            }
            payments.push(Payment::from_new(new, created_at));
        }

        let paid_amount: Money = payments.iter().map(|p| p.amount).sum();
        let bill = Bill {
            id: BillId::new(),
            customer_id: input.customer_id,
            bill_number: generate_bill_number(now),
            billing_date: input.billing_date,
            delivery_date: input.delivery_date,
            delivery_status: input.delivery_status,
            received_items: input
                .received_items
                .into_iter()
                .map(ReceivedItem::from_new)
                .collect(),
            total_amount,
            paid_amount,
            outstanding_amount: total_amount - paid_amount,
            status: BillStatus::derive(total_amount, paid_amount),
            payments,
            discount: input.discount,
            notes: input.notes,
            legacy_items: Vec::new(),
            created_at,
            updated_at: created_at,
        };

        // Header first, then the ledger. Not transactional: a failure below
        // leaves a header whose reads see an empty item list.
        self.store
            .put(BILLS_TABLE, &bill.id.to_string(), codec::encode(&bill)?)
            .await?;
        let items = self.ledger.replace_all(bill.id, input.items, created_at).await?;

        Ok(BillDetail { bill, items })
    }

    /// Fetches a bill with its items, re-deriving the payment amounts.
    pub async fn read(&self, id: BillId) -> Result<BillDetail, BillingError> {
        let bill = self.load(id).await?;
        self.with_items(bill).await
    }

    /// Lists bills matching `filter`, newest first.
    ///
    /// `has_more` is approximate: it simply reports that the page is full.
    pub async fn list(&self, filter: BillFilter) -> Result<BillPage, BillingError> {
        let documents = self.store.scan(BILLS_TABLE).await?;
        let mut bills = documents
            .into_iter()
            .map(codec::decode::<Bill>)
            .collect::<Result<Vec<_>, _>>()?;

        bills.retain(|bill| filter.matches(bill));
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bills.truncate(filter.limit);
        let has_more = bills.len() == filter.limit;

        for bill in &mut bills {
            bill.legacy_items.clear();
            bill.recompute();
        }

        Ok(BillPage { bills, has_more })
    }

    /// Replaces a bill's editable fields and its item set.
    ///
    /// Payments and `paid_amount` survive untouched; outstanding and status
    /// are re-derived against the new total, so editing items after a
    /// partial payment can flip the status without touching payments.
    pub async fn update(&self, id: BillId, input: UpdateBill) -> Result<BillDetail, BillingError> {
        let existing = self.load(id).await?;

        let now = Utc::now().timestamp();
        let total_amount: Money = input.items.iter().map(NewBillItem::total_price).sum();

        let bill = Bill {
            id,
            customer_id: input.customer_id,
            bill_number: existing.bill_number,
            billing_date: input.billing_date,
            delivery_date: input.delivery_date,
            delivery_status: input.delivery_status,
            received_items: input
                .received_items
                .into_iter()
                .map(ReceivedItem::from_new)
                .collect(),
            total_amount,
            paid_amount: existing.paid_amount,
            outstanding_amount: total_amount - existing.paid_amount,
            status: BillStatus::derive(total_amount, existing.paid_amount),
            payments: existing.payments,
            discount: input.discount,
            notes: input.notes,
            legacy_items: Vec::new(),
            created_at: existing.created_at,
            updated_at: now,
        };

        self.store
            .put(BILLS_TABLE, &bill.id.to_string(), codec::encode(&bill)?)
            .await?;
        let items = self.ledger.replace_all(id, input.items, now).await?;

        Ok(BillDetail { bill, items })
    }

    /// Deletes a bill and every item it owns.
    ///
    /// Items go first: if their deletion fails the header stays, which
    /// downstream reads tolerate far better than unreachable orphan items.
    pub async fn delete(&self, id: BillId) -> Result<(), BillingError> {
        self.load(id).await?;
        self.ledger.delete_all_for_bill(id).await?;
        self.store.delete(BILLS_TABLE, &id.to_string()).await?;
        Ok(())
    }

    /// Deletes a single line item and adjusts the parent header.
    ///
    /// The header total shrinks by the deleted item's `total_price`
    /// (floored at zero) rather than being resummed from the ledger, so the
    /// adjustment stays correct even when ledger and header have diverged.
    pub async fn delete_item(&self, item_id: BillItemId) -> Result<(), BillingError> {
        let item = self
            .ledger
            .get(item_id)
            .await?
            .ok_or_else(|| BillingError::not_found("Bill item", item_id))?;
        self.ledger.delete(item_id).await?;

        let bill = self.load(item.bill_id).await?;
        let total_amount = (bill.total_amount - item.total_price).clamp_non_negative();
        let outstanding_amount = total_amount - bill.paid_amount;
        let status = BillStatus::derive(total_amount, bill.paid_amount);

        let fields = codec::fields(json!({
            "totalAmount": total_amount,
            "outstandingAmount": outstanding_amount,
            "status": status,
            "updatedAt": Utc::now().timestamp(),
        }))?;
        self.store
            .update(
                BILLS_TABLE,
                &bill.id.to_string(),
                fields,
                Some(Condition::field_equals("updatedAt", bill.updated_at)),
            )
            .await?;
        Ok(())
    }

    /// Appends a payment to a bill.
    ///
    /// The amount must be positive and must not exceed the outstanding
    /// balance computed from the *stored* `paid_amount`.
    pub async fn add_payment(
        &self,
        bill_id: BillId,
        new: NewPayment,
    ) -> Result<BillDetail, BillingError> {
        let mut bill = self.load(bill_id).await?;

        if !new.amount.is_positive() {
            return Err(BillingError::validation("payment amount must be positive"));
        }
        let outstanding = bill.total_amount - bill.paid_amount;
        if new.amount > outstanding {
            return Err(BillingError::validation(
                "payment exceeds the outstanding balance",
            ));
        }

        let now = Utc::now().timestamp();
        let payment = Payment::from_new(new, now);
        let paid_amount = bill.paid_amount + payment.amount;
        bill.payments.push(payment);

        self.persist_payment_state(bill, paid_amount, now).await
    }

    /// Corrects an existing payment in place.
    ///
    /// The ceiling against the bill total is deliberately not re-checked
    /// here: corrections may exceed it, and status derivation absorbs the
    /// overpayment.
    pub async fn update_payment(
        &self,
        bill_id: BillId,
        payment_id: PaymentId,
        new: NewPayment,
    ) -> Result<BillDetail, BillingError> {
        let mut bill = self.load(bill_id).await?;

        if !new.amount.is_positive() {
            return Err(BillingError::validation("payment amount must be positive"));
        }
        let payment = bill
            .payments
            .iter_mut()
            .find(|payment| payment.id == payment_id)
            .ok_or_else(|| BillingError::not_found("Payment", payment_id))?;
        payment.apply(new);

        let paid_amount: Money = bill.payments.iter().map(|p| p.amount).sum();
        let now = Utc::now().timestamp();
        self.persist_payment_state(bill, paid_amount, now).await
    }

    /// Removes a payment from a bill.
    pub async fn delete_payment(
        &self,
        bill_id: BillId,
        payment_id: PaymentId,
    ) -> Result<BillDetail, BillingError> {
        let mut bill = self.load(bill_id).await?;

        let before = bill.payments.len();
        bill.payments.retain(|payment| payment.id != payment_id);
        if bill.payments.len() == before {
            return Err(BillingError::not_found("Payment", payment_id));
        }

        let paid_amount: Money = bill.payments.iter().map(|p| p.amount).sum();
        let now = Utc::now().timestamp();
        self.persist_payment_state(bill, paid_amount, now).await
    }

    async fn load(&self, id: BillId) -> Result<Bill, BillingError> {
        let document = self
            .store
            .get(BILLS_TABLE, &id.to_string())
            .await?
            .ok_or_else(|| BillingError::not_found("Bill", id))?;
        codec::decode(document)
    }

    async fn with_items(&self, mut bill: Bill) -> Result<BillDetail, BillingError> {
        let mut items = self.ledger.get_by_bill(bill.id).await?;
        if items.is_empty() && !bill.legacy_items.is_empty() {
            // Bills that predate the item ledger carry their items embedded
            // in the header.
            items = std::mem::take(&mut bill.legacy_items);
        }
        bill.legacy_items.clear();
        bill.recompute();
        Ok(BillDetail { bill, items })
    }

    /// Writes the payment list and its derived fields in one conditional
    /// update keyed on the `updatedAt` read earlier; a mismatch means a
    /// concurrent writer got there first.
    async fn persist_payment_state(
        &self,
        bill: Bill,
        paid_amount: Money,
        now: i64,
    ) -> Result<BillDetail, BillingError> {
        let outstanding_amount = bill.total_amount - paid_amount;
        let status = BillStatus::derive(bill.total_amount, paid_amount);

        let fields = codec::fields(json!({
            "payments": &bill.payments,
            "paidAmount": paid_amount,
            "outstandingAmount": outstanding_amount,
            "status": status,
            "updatedAt": now,
        }))?;
        let updated = self
            .store
            .update(
                BILLS_TABLE,
                &bill.id.to_string(),
                fields,
                Some(Condition::field_equals("updatedAt", bill.updated_at)),
            )
            .await?;

        let bill: Bill = codec::decode(updated)?;
        self.with_items(bill).await
    }
}
