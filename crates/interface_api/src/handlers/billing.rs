//! Billing handlers

use axum::extract::State;
use axum::Json as ResponseJson;
use validator::Validate;

use core_kernel::{BillId, BillItemId, ImageId, PaymentId};

use crate::dto::billing::*;
use crate::dto::MessageResponse;
use crate::error::ApiError;
use crate::extract::{Json, Path, Query};
use crate::AppState;

/// Lists bills with the optional server-side filters
pub async fn list_bills(
    State(state): State<AppState>,
    Query(query): Query<ListBillsQuery>,
) -> Result<ResponseJson<BillListResponse>, ApiError> {
    let page = state.bills.list(query.into()).await?;
    Ok(ResponseJson(BillListResponse {
        bills: page.bills.into_iter().map(Into::into).collect(),
        has_more: page.has_more,
    }))
}

/// Creates a bill
pub async fn create_bill(
    State(state): State<AppState>,
    Json(request): Json<CreateBillRequest>,
) -> Result<ResponseJson<BillResponse>, ApiError> {
    request.validate()?;
    let detail = state.bills.create(request.into()).await?;
    Ok(ResponseJson(detail.into()))
}

/// Fetches one bill with its items
pub async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<BillId>,
) -> Result<ResponseJson<BillResponse>, ApiError> {
    let detail = state.bills.read(id).await?;
    Ok(ResponseJson(detail.into()))
}

/// Replaces a bill's fields and item set
pub async fn update_bill(
    State(state): State<AppState>,
    Path(id): Path<BillId>,
    Json(request): Json<UpdateBillRequest>,
) -> Result<ResponseJson<BillResponse>, ApiError> {
    let detail = state.bills.update(id, request.into()).await?;
    Ok(ResponseJson(detail.into()))
}

/// Deletes a bill and its items
pub async fn delete_bill(
    State(state): State<AppState>,
    Path(id): Path<BillId>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    state.bills.delete(id).await?;
    Ok(ResponseJson(MessageResponse::new("bill deleted")))
}

/// Deletes a single line item and adjusts the parent bill
pub async fn delete_bill_item(
    State(state): State<AppState>,
    Path(item_id): Path<BillItemId>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    state.bills.delete_item(item_id).await?;
    Ok(ResponseJson(MessageResponse::new("bill item deleted")))
}

/// Records a payment against a bill
pub async fn add_payment(
    State(state): State<AppState>,
    Path(id): Path<BillId>,
    Json(request): Json<PaymentPayload>,
) -> Result<ResponseJson<BillResponse>, ApiError> {
    let detail = state.bills.add_payment(id, request.into()).await?;
    Ok(ResponseJson(detail.into()))
}

/// Corrects an existing payment
pub async fn update_payment(
    State(state): State<AppState>,
    Path((id, payment_id)): Path<(BillId, PaymentId)>,
    Json(request): Json<PaymentPayload>,
) -> Result<ResponseJson<BillResponse>, ApiError> {
    let detail = state.bills.update_payment(id, payment_id, request.into()).await?;
    Ok(ResponseJson(detail.into()))
}

/// Removes a payment
pub async fn delete_payment(
    State(state): State<AppState>,
    Path((id, payment_id)): Path<(BillId, PaymentId)>,
) -> Result<ResponseJson<BillResponse>, ApiError> {
    let detail = state.bills.delete_payment(id, payment_id).await?;
    Ok(ResponseJson(detail.into()))
}

/// Lists an item's reference images
pub async fn list_images(
    State(state): State<AppState>,
    Path((bill_id, item_id)): Path<(BillId, BillItemId)>,
) -> Result<ResponseJson<ImageListResponse>, ApiError> {
    let images = state.images.list(bill_id, item_id).await?;
    Ok(ResponseJson(ImageListResponse { images }))
}

/// Attaches a reference image to an item
pub async fn attach_image(
    State(state): State<AppState>,
    Path((bill_id, item_id)): Path<(BillId, BillItemId)>,
    Json(request): Json<AttachImageRequest>,
) -> Result<ResponseJson<AttachImageResponse>, ApiError> {
    request.validate()?;
    let attached = state
        .images
        .attach(
            bill_id,
            item_id,
            &request.image_data,
            &request.file_name,
            &request.content_type,
        )
        .await?;
    Ok(ResponseJson(AttachImageResponse {
        image_id: attached.image_id,
        image_url: attached.image_url,
    }))
}

/// Detaches a reference image from an item
pub async fn detach_image(
    State(state): State<AppState>,
    Path((bill_id, item_id, image_id)): Path<(BillId, BillItemId, ImageId)>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    state.images.detach(bill_id, item_id, image_id).await?;
    Ok(ResponseJson(MessageResponse::new("image detached")))
}
