//! Reference image attachments
//!
//! Images live in the blob store under a key namespaced by bill, item, and
//! image id; the item document records the resulting URLs. The attach path
//! prefers the store's atomic list append, which is safe under concurrent
//! attaches; only when that fails does it fall back to a bounded
//! read-modify-write with an idempotency guard against duplicate URLs.

use base64::prelude::{Engine, BASE64_STANDARD};
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use core_kernel::{BillId, BillItemId, BlobStore, DocumentStore, ImageId};

use crate::codec;
use crate::error::BillingError;
use crate::item::BillItem;
use crate::{BILLS_TABLE, BILL_ITEMS_TABLE};

const FALLBACK_ATTEMPTS: u32 = 3;
const FALLBACK_BASE_DELAY: Duration = Duration::from_millis(200);

/// Result of a successful attach.
#[derive(Debug, Clone)]
pub struct AttachedImage {
    pub image_id: ImageId,
    pub image_url: String,
}

/// Attach/list/detach for an item's reference images.
#[derive(Clone)]
pub struct ImageAttachments {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl ImageAttachments {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Decodes and stores an image, then records its URL on the item.
    pub async fn attach(
        &self,
        bill_id: BillId,
        item_id: BillItemId,
        payload_base64: &str,
        file_name: &str,
        content_type: &str,
    ) -> Result<AttachedImage, BillingError> {
        self.load_item(bill_id, item_id).await?;

        let bytes = BASE64_STANDARD
            .decode(payload_base64.trim().as_bytes())
            .map_err(|_| BillingError::validation("image payload is not valid base64"))?;

        let image_id = ImageId::new();
        let key = format!("bills/{bill_id}/items/{item_id}/{image_id}/{file_name}");
        let metadata = HashMap::from([
            ("billId".to_string(), bill_id.to_string()),
            ("itemId".to_string(), item_id.to_string()),
        ]);
        self.blobs.put(&key, bytes, content_type, metadata).await?;
        let image_url = self.blobs.url_for(&key);

        let appended = self
            .store
            .append_to_list(
                BILL_ITEMS_TABLE,
                &item_id.to_string(),
                "referenceImages",
                json!(image_url),
            )
            .await;
        if let Err(error) = appended {
            tracing::warn!(
                %error,
                item = %item_id,
                "atomic image append failed, falling back to read-modify-write"
            );
            self.append_with_retry(item_id, &image_url).await?;
        }

        Ok(AttachedImage { image_id, image_url })
    }

    /// Returns the item's recorded image URLs.
    pub async fn list(
        &self,
        bill_id: BillId,
        item_id: BillItemId,
    ) -> Result<Vec<String>, BillingError> {
        Ok(self.load_item(bill_id, item_id).await?.reference_images)
    }

    /// Removes the image whose URL embeds `image_id`.
    ///
    /// The blob delete is best effort - on failure the URL is still
    /// dropped from the item, so the detach succeeds for the caller.
    pub async fn detach(
        &self,
        bill_id: BillId,
        item_id: BillItemId,
        image_id: ImageId,
    ) -> Result<(), BillingError> {
        let item = self.load_item(bill_id, item_id).await?;

        let needle = image_id.to_string();
        let url = item
            .reference_images
            .iter()
            .find(|url| url.contains(&needle))
            .cloned()
            .ok_or_else(|| BillingError::not_found("Image", image_id))?;

        if let Some(key) = self.blobs.key_for_url(&url) {
            if let Err(error) = self.blobs.delete(&key).await {
                tracing::warn!(%error, %key, "failed to delete image blob");
            }
        }

        let remaining: Vec<String> = item
            .reference_images
            .into_iter()
            .filter(|existing| existing != &url)
            .collect();
        let fields = codec::fields(json!({
            "referenceImages": remaining,
            "updatedAt": Utc::now().timestamp(),
        }))?;
        self.store
            .update(BILL_ITEMS_TABLE, &item_id.to_string(), fields, None)
            .await?;
        Ok(())
    }

    async fn load_item(
        &self,
        bill_id: BillId,
        item_id: BillItemId,
    ) -> Result<BillItem, BillingError> {
        if self
            .store
            .get(BILLS_TABLE, &bill_id.to_string())
            .await?
            .is_none()
        {
            return Err(BillingError::not_found("Bill", bill_id));
        }

        let document = self
            .store
            .get(BILL_ITEMS_TABLE, &item_id.to_string())
            .await?
            .ok_or_else(|| BillingError::not_found("Bill item", item_id))?;
        let item: BillItem = codec::decode(document)?;
        if item.bill_id != bill_id {
            return Err(BillingError::not_found("Bill item", item_id));
        }
        Ok(item)
    }

    /// Read-modify-write fallback with linearly increasing backoff. A
    /// duplicate URL from a retried request is detected and treated as
    /// success.
    async fn append_with_retry(
        &self,
        item_id: BillItemId,
        image_url: &str,
    ) -> Result<(), BillingError> {
        let mut last_error = None;
        for attempt in 1..=FALLBACK_ATTEMPTS {
            match self.try_append(item_id, image_url).await {
                Ok(()) => return Ok(()),
                Err(error @ BillingError::NotFound(_)) => return Err(error),
                Err(error) => {
                    tracing::warn!(%error, attempt, "image append fallback attempt failed");
                    last_error = Some(error);
                    if attempt < FALLBACK_ATTEMPTS {
                        tokio::time::sleep(FALLBACK_BASE_DELAY * attempt).await;
                    }
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| BillingError::Storage("image append failed".to_string())))
    }

    async fn try_append(&self, item_id: BillItemId, image_url: &str) -> Result<(), BillingError> {
        let document = self
            .store
            .get(BILL_ITEMS_TABLE, &item_id.to_string())
            .await?
            .ok_or_else(|| BillingError::not_found("Bill item", item_id))?;
        let mut item: BillItem = codec::decode(document)?;

        if item.reference_images.iter().any(|url| url == image_url) {
            return Ok(());
        }
        item.reference_images.push(image_url.to_string());

        let fields = codec::fields(json!({
            "referenceImages": item.reference_images,
            "updatedAt": Utc::now().timestamp(),
        }))?;
        self.store
            .update(BILL_ITEMS_TABLE, &item_id.to_string(), fields, None)
            .await?;
        Ok(())
    }
}
