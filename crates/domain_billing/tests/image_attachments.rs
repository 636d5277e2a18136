//! Image attach/list/detach flows, including the degraded paths

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use base64::prelude::{Engine, BASE64_STANDARD};
use rust_decimal_macros::dec;
use serde_json::Value;

use core_kernel::{
    BillItemId, BlobStore, Condition, Document, DocumentStore, ImageId, PortError,
};
use domain_billing::{BillService, BillingError, ImageAttachments};
use infra_store::{MemoryBlobStore, MemoryStore};
use test_utils::{BillItemInput, CreateBillBuilder};

const JPEG_STUB: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

async fn setup() -> (
    Arc<MemoryStore>,
    Arc<MemoryBlobStore>,
    BillService,
    ImageAttachments,
    domain_billing::BillDetail,
) {
    let store = Arc::new(MemoryStore::new());
    let blobs = Arc::new(MemoryBlobStore::new("shop-media"));
    let bills = BillService::new(store.clone());
    let images = ImageAttachments::new(store.clone(), blobs.clone());

    let detail = bills
        .create(
            CreateBillBuilder::new()
                .with_item(BillItemInput::new("Lehenga", 1, dec!(2500.00)))
                .build(),
        )
        .await
        .unwrap();

    (store, blobs, bills, images, detail)
}

#[tokio::test]
async fn attach_stores_the_blob_and_records_the_url() {
    let (_, blobs, bills, images, detail) = setup().await;
    let item_id = detail.items[0].id;

    let attached = images
        .attach(
            detail.bill.id,
            item_id,
            &BASE64_STANDARD.encode(JPEG_STUB),
            "front.jpg",
            "image/jpeg",
        )
        .await
        .unwrap();

    assert!(attached.image_url.contains(&attached.image_id.to_string()));

    let key = blobs.key_for_url(&attached.image_url).unwrap();
    assert!(blobs.contains(&key));
    assert_eq!(blobs.size_of(&key), Some(JPEG_STUB.len()));
    assert_eq!(blobs.content_type_of(&key).as_deref(), Some("image/jpeg"));
    assert_eq!(
        blobs
            .metadata_of(&key)
            .and_then(|m| m.get("billId").cloned())
            .as_deref(),
        Some(detail.bill.id.to_string().as_str())
    );

    let urls = images.list(detail.bill.id, item_id).await.unwrap();
    assert_eq!(urls, vec![attached.image_url.clone()]);

    // Attachments survive a whole-bill read as well.
    let read = bills.read(detail.bill.id).await.unwrap();
    assert_eq!(read.items[0].reference_images, urls);
}

#[tokio::test]
async fn attach_rejects_malformed_base64() {
    let (_, _, _, images, detail) = setup().await;

    let result = images
        .attach(
            detail.bill.id,
            detail.items[0].id,
            "not@valid@base64",
            "front.jpg",
            "image/jpeg",
        )
        .await;
    assert!(matches!(result, Err(BillingError::Validation(_))));
}

#[tokio::test]
async fn attach_requires_the_item_to_belong_to_the_bill() {
    let (_, _, bills, images, detail) = setup().await;

    let other = bills.create(CreateBillBuilder::new().build()).await.unwrap();
    let payload = BASE64_STANDARD.encode(JPEG_STUB);

    // Unknown item on a real bill.
    let result = images
        .attach(detail.bill.id, BillItemId::new(), &payload, "x.jpg", "image/jpeg")
        .await;
    assert!(matches!(result, Err(BillingError::NotFound(_))));

    // Real item, wrong bill.
    let result = images
        .attach(other.bill.id, detail.items[0].id, &payload, "x.jpg", "image/jpeg")
        .await;
    assert!(matches!(result, Err(BillingError::NotFound(_))));
}

#[tokio::test]
async fn detach_drops_the_url_and_ignores_unknown_images() {
    let (_, blobs, _, images, detail) = setup().await;
    let item_id = detail.items[0].id;

    let attached = images
        .attach(
            detail.bill.id,
            item_id,
            &BASE64_STANDARD.encode(JPEG_STUB),
            "front.jpg",
            "image/jpeg",
        )
        .await
        .unwrap();
    let key = blobs.key_for_url(&attached.image_url).unwrap();

    images
        .detach(detail.bill.id, item_id, attached.image_id)
        .await
        .unwrap();

    assert!(!blobs.contains(&key));
    assert!(images.list(detail.bill.id, item_id).await.unwrap().is_empty());

    let result = images.detach(detail.bill.id, item_id, ImageId::new()).await;
    assert!(matches!(result, Err(BillingError::NotFound(_))));
}

/// Delegates everything to the wrapped store but refuses atomic appends,
/// forcing the read-modify-write fallback.
struct NoAppendStore(MemoryStore);

#[async_trait]
impl DocumentStore for NoAppendStore {
    async fn get(&self, table: &str, key: &str) -> Result<Option<Document>, PortError> {
        self.0.get(table, key).await
    }

    async fn put(&self, table: &str, key: &str, document: Document) -> Result<(), PortError> {
        self.0.put(table, key, document).await
    }

    async fn update(
        &self,
        table: &str,
        key: &str,
        fields: Document,
        condition: Option<Condition>,
    ) -> Result<Document, PortError> {
        self.0.update(table, key, fields, condition).await
    }

    async fn delete(&self, table: &str, key: &str) -> Result<(), PortError> {
        self.0.delete(table, key).await
    }

    async fn scan(&self, table: &str) -> Result<Vec<Document>, PortError> {
        self.0.scan(table).await
    }

    async fn query_by_index(
        &self,
        table: &str,
        index_field: &str,
        value: &str,
    ) -> Result<Vec<Document>, PortError> {
        self.0.query_by_index(table, index_field, value).await
    }

    async fn append_to_list(
        &self,
        _table: &str,
        _key: &str,
        _field: &str,
        _value: Value,
    ) -> Result<(), PortError> {
        Err(PortError::storage("list append unavailable"))
    }
}

#[tokio::test]
async fn attach_falls_back_when_the_atomic_append_fails() {
    let store = Arc::new(NoAppendStore(MemoryStore::new()));
    let blobs = Arc::new(MemoryBlobStore::new("shop-media"));
    let bills = BillService::new(store.clone());
    let images = ImageAttachments::new(store.clone(), blobs);

    let detail = bills.create(CreateBillBuilder::new().build()).await.unwrap();
    let item_id = detail.items[0].id;

    let attached = images
        .attach(
            detail.bill.id,
            item_id,
            &BASE64_STANDARD.encode(JPEG_STUB),
            "front.jpg",
            "image/jpeg",
        )
        .await
        .unwrap();

    let urls = images.list(detail.bill.id, item_id).await.unwrap();
    assert_eq!(urls, vec![attached.image_url]);
}

/// Blob store whose deletes always fail; detach must still succeed.
struct StickyBlobStore(MemoryBlobStore);

#[async_trait]
impl BlobStore for StickyBlobStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: HashMap<String, String>,
    ) -> Result<(), PortError> {
        self.0.put(key, bytes, content_type, metadata).await
    }

    async fn delete(&self, _key: &str) -> Result<(), PortError> {
        Err(PortError::storage("blob delete unavailable"))
    }

    fn url_for(&self, key: &str) -> String {
        self.0.url_for(key)
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        self.0.key_for_url(url)
    }

    fn download_url(&self, key: &str, ttl_secs: u64) -> String {
        self.0.download_url(key, ttl_secs)
    }
}

#[tokio::test]
async fn detach_survives_a_failing_blob_delete() {
    let store = Arc::new(MemoryStore::new());
    let blobs = Arc::new(StickyBlobStore(MemoryBlobStore::new("shop-media")));
    let bills = BillService::new(store.clone());
    let images = ImageAttachments::new(store, blobs);

    let detail = bills.create(CreateBillBuilder::new().build()).await.unwrap();
    let item_id = detail.items[0].id;

    let attached = images
        .attach(
            detail.bill.id,
            item_id,
            &BASE64_STANDARD.encode(JPEG_STUB),
            "front.jpg",
            "image/jpeg",
        )
        .await
        .unwrap();

    images
        .detach(detail.bill.id, item_id, attached.image_id)
        .await
        .unwrap();
    assert!(images.list(detail.bill.id, item_id).await.unwrap().is_empty());
}
