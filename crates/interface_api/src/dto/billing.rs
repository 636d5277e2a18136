//! Billing DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{BillId, BillItemId, CustomerId, ImageId, Money, ServiceId};
use domain_billing::{
    engine::DEFAULT_LIST_LIMIT, Bill, BillDetail, BillFilter, BillItem, BillStatus, CreateBill,
    MaterialSource, NewBillItem, NewPayment, NewReceivedItem, Payment, ReceivedItem, UpdateBill,
};

fn default_item_kind() -> String {
    "custom".to_string()
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItemPayload {
    #[serde(default)]
    pub id: Option<BillItemId>,
    #[serde(rename = "type", default = "default_item_kind")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub unit_price: Money,
    #[serde(default)]
    pub config_item_id: Option<ServiceId>,
    #[serde(default)]
    pub material_source: MaterialSource,
    #[serde(default)]
    pub delivery_status: Option<String>,
    #[serde(default)]
    pub internal_notes: Option<String>,
}

impl From<BillItemPayload> for NewBillItem {
    fn from(payload: BillItemPayload) -> Self {
        NewBillItem {
            id: payload.id,
            kind: payload.kind,
            name: payload.name,
            description: payload.description,
            quantity: payload.quantity,
            unit_price: payload.unit_price,
            config_item_id: payload.config_item_id,
            material_source: payload.material_source,
            delivery_status: payload.delivery_status,
            internal_notes: payload.internal_notes,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedItemPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub received_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
}

impl From<ReceivedItemPayload> for NewReceivedItem {
    fn from(payload: ReceivedItemPayload) -> Self {
        NewReceivedItem {
            name: payload.name,
            description: payload.description,
            quantity: payload.quantity,
            received_date: payload.received_date,
            status: payload.status,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub amount: Money,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<PaymentPayload> for NewPayment {
    fn from(payload: PaymentPayload) -> Self {
        NewPayment {
            amount: payload.amount,
            payment_date: payload.payment_date,
            payment_method: payload.payment_method,
            notes: payload.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    pub customer_id: CustomerId,
    pub billing_date: NaiveDate,
    pub delivery_date: NaiveDate,
    #[serde(default)]
    pub delivery_status: Option<String>,
    #[validate(length(min = 1, message = "at least one bill item is required"))]
    pub items: Vec<BillItemPayload>,
    #[serde(default)]
    pub received_items: Vec<ReceivedItemPayload>,
    #[serde(default)]
    pub payments: Vec<PaymentPayload>,
    #[serde(default)]
    pub discount: Option<Money>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CreateBillRequest> for CreateBill {
    fn from(request: CreateBillRequest) -> Self {
        CreateBill {
            customer_id: request.customer_id,
            billing_date: request.billing_date,
            delivery_date: request.delivery_date,
            delivery_status: request.delivery_status,
            items: request.items.into_iter().map(Into::into).collect(),
            received_items: request.received_items.into_iter().map(Into::into).collect(),
            payments: request.payments.into_iter().map(Into::into).collect(),
            discount: request.discount,
            notes: request.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillRequest {
    pub customer_id: CustomerId,
    pub billing_date: NaiveDate,
    pub delivery_date: NaiveDate,
    #[serde(default)]
    pub delivery_status: Option<String>,
    #[serde(default)]
    pub items: Vec<BillItemPayload>,
    #[serde(default)]
    pub received_items: Vec<ReceivedItemPayload>,
    #[serde(default)]
    pub discount: Option<Money>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<UpdateBillRequest> for UpdateBill {
    fn from(request: UpdateBillRequest) -> Self {
        UpdateBill {
            customer_id: request.customer_id,
            billing_date: request.billing_date,
            delivery_date: request.delivery_date,
            delivery_status: request.delivery_status,
            items: request.items.into_iter().map(Into::into).collect(),
            received_items: request.received_items.into_iter().map(Into::into).collect(),
            discount: request.discount,
            notes: request.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBillsQuery {
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub status: Option<BillStatus>,
    #[serde(default)]
    pub delivery_status: Option<String>,
    #[serde(default)]
    pub billing_date_from: Option<NaiveDate>,
    #[serde(default)]
    pub billing_date_to: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_date_from: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_date_to: Option<NaiveDate>,
    #[serde(default)]
    pub search_text: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl From<ListBillsQuery> for BillFilter {
    fn from(query: ListBillsQuery) -> Self {
        BillFilter {
            customer_id: query.customer_id,
            status: query.status,
            delivery_status: query.delivery_status,
            billing_from: query.billing_date_from,
            billing_to: query.billing_date_to,
            delivery_from: query.delivery_date_from,
            delivery_to: query.delivery_date_to,
            search_text: query.search_text,
            limit: query.limit.unwrap_or(DEFAULT_LIST_LIMIT).max(1),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttachImageRequest {
    /// Base64-encoded image bytes
    #[validate(length(min = 1, message = "image data is required"))]
    pub image_data: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_file_name() -> String {
    "image.jpg".to_string()
}

fn default_content_type() -> String {
    "image/jpeg".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachImageResponse {
    pub image_id: ImageId,
    pub image_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageListResponse {
    pub images: Vec<String>,
}

/// A bill with its line items, as returned by the detail endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillResponse {
    pub id: BillId,
    pub customer_id: CustomerId,
    pub bill_number: String,
    pub billing_date: NaiveDate,
    pub delivery_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<String>,
    pub items: Vec<BillItem>,
    pub received_items: Vec<ReceivedItem>,
    pub total_amount: Money,
    pub paid_amount: Money,
    pub outstanding_amount: Money,
    pub status: BillStatus,
    pub payments: Vec<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<BillDetail> for BillResponse {
    fn from(detail: BillDetail) -> Self {
        let bill = detail.bill;
        BillResponse {
            id: bill.id,
            customer_id: bill.customer_id,
            bill_number: bill.bill_number,
            billing_date: bill.billing_date,
            delivery_date: bill.delivery_date,
            delivery_status: bill.delivery_status,
            items: detail.items,
            received_items: bill.received_items,
            total_amount: bill.total_amount,
            paid_amount: bill.paid_amount,
            outstanding_amount: bill.outstanding_amount,
            status: bill.status,
            payments: bill.payments,
            discount: bill.discount,
            notes: bill.notes,
            created_at: bill.created_at,
            updated_at: bill.updated_at,
        }
    }
}

/// Itemless projection used by the listing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSummaryResponse {
    pub id: BillId,
    pub customer_id: CustomerId,
    pub bill_number: String,
    pub billing_date: NaiveDate,
    pub delivery_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<String>,
    pub total_amount: Money,
    pub paid_amount: Money,
    pub outstanding_amount: Money,
    pub status: BillStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Bill> for BillSummaryResponse {
    fn from(bill: Bill) -> Self {
        BillSummaryResponse {
            id: bill.id,
            customer_id: bill.customer_id,
            bill_number: bill.bill_number,
            billing_date: bill.billing_date,
            delivery_date: bill.delivery_date,
            delivery_status: bill.delivery_status,
            total_amount: bill.total_amount,
            paid_amount: bill.paid_amount,
            outstanding_amount: bill.outstanding_amount,
            status: bill.status,
            notes: bill.notes,
            created_at: bill.created_at,
            updated_at: bill.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillListResponse {
    pub bills: Vec<BillSummaryResponse>,
    pub has_more: bool,
}
