//! Billing Domain - Invoices for tailoring orders
//!
//! This crate owns the only part of the back office with real invariants:
//! keeping a bill's totals, payments, and payment status consistent.
//!
//! # Components
//!
//! - [`BillService`] - the aggregate engine: create/read/list/update/delete
//!   bills, single-item deletion, and the payment ledger operations
//! - [`BillItemLedger`] - line items stored independently of the bill
//!   header, queried by owning bill id
//! - [`ImageAttachments`] - reference images on a line item, backed by the
//!   blob store
//!
//! # Invariants
//!
//! After every mutating operation:
//! - `paid_amount == sum(payments[].amount)` rounded to two places
//! - `outstanding_amount == total_amount - paid_amount`
//! - `status` is a pure function of the two amounts
//! - `total_price == quantity * unit_price` for every line item
//!
//! Derived fields are additionally recomputed on every read, so a stale
//! write heals on the next fetch.

pub mod bill;
pub mod engine;
pub mod error;
pub mod images;
pub mod item;
pub mod ledger;
pub mod payment;

mod codec;

/// Document-store table holding bill headers, keyed by bill id.
pub const BILLS_TABLE: &str = "Bills";

/// Document-store table holding line items, keyed by item id with a
/// secondary index on `billId`.
pub const BILL_ITEMS_TABLE: &str = "BillItems";

pub use bill::{Bill, BillStatus, NewReceivedItem, ReceivedItem};
pub use engine::{BillDetail, BillFilter, BillPage, BillService, CreateBill, UpdateBill};
pub use error::BillingError;
pub use images::{AttachedImage, ImageAttachments};
pub use item::{BillItem, MaterialSource, NewBillItem};
pub use ledger::BillItemLedger;
pub use payment::{NewPayment, Payment};
