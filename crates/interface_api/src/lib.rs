//! HTTP API Layer
//!
//! REST surface for the tailoring back office using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: one module per domain (billing, customers, catalog, updates)
//! - **DTOs**: request/response shapes, camelCase on the wire
//! - **Error handling**: one taxonomy, `{"error": ...}` bodies everywhere
//! - **CORS**: permissive on every response, errors included
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(store, blobs));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::{BlobStore, DocumentStore};
use domain_billing::{BillService, ImageAttachments};
use domain_catalog::CatalogService;
use domain_party::CustomerService;
use domain_updates::UpdateService;

use crate::error::ApiError;
use crate::handlers::{billing, catalog, customers, health, updates};

/// Unknown paths answer in the same error shape as everything else.
async fn unknown_route() -> ApiError {
    ApiError::NotFound("not found".to_string())
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub bills: BillService,
    pub images: ImageAttachments,
    pub customers: CustomerService,
    pub catalog: CatalogService,
    pub updates: UpdateService,
}

impl AppState {
    /// Wires every domain service onto the given store adapters.
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            bills: BillService::new(store.clone()),
            images: ImageAttachments::new(store.clone(), blobs.clone()),
            customers: CustomerService::new(store.clone()),
            catalog: CatalogService::new(store.clone()),
            updates: UpdateService::new(store, blobs),
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let bill_routes = Router::new()
        .route("/", get(billing::list_bills).post(billing::create_bill))
        .route(
            "/:id",
            get(billing::get_bill)
                .put(billing::update_bill)
                .delete(billing::delete_bill),
        )
        .route("/:id/payments", post(billing::add_payment))
        .route(
            "/:id/payments/:payment_id",
            put(billing::update_payment).delete(billing::delete_payment),
        )
        .route(
            "/:id/items/:item_id/images",
            get(billing::list_images).post(billing::attach_image),
        )
        .route(
            "/:id/items/:item_id/images/:image_id",
            delete(billing::detach_image),
        );

    let customer_routes = Router::new()
        .route(
            "/",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route("/exists", get(customers::check_customer_exists))
        .route(
            "/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route(
            "/:id/measurements",
            get(customers::list_measurements).post(customers::save_measurement),
        )
        .route(
            "/:id/measurements/:measurement_id",
            delete(customers::delete_measurement),
        );

    let config_routes = Router::new()
        .route(
            "/",
            get(catalog::list_measurement_configs).post(catalog::create_measurement_config),
        )
        .route(
            "/:id",
            put(catalog::update_measurement_config).delete(catalog::delete_measurement_config),
        );

    let service_routes = Router::new()
        .route("/", get(catalog::list_services).post(catalog::create_service))
        .route(
            "/:id",
            put(catalog::update_service).delete(catalog::delete_service),
        );

    let update_routes = Router::new()
        .route("/check-updates", get(updates::check_updates))
        .route("/download-update", get(updates::download_update))
        .route("/register-version", post(updates::register_version));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/bills", bill_routes)
        .route("/bill-items/:item_id", delete(billing::delete_bill_item))
        .nest("/customers", customer_routes)
        .nest("/measurement-configs", config_routes)
        .nest("/services", service_routes)
        .nest("/app-updates", update_routes)
        .fallback(unknown_route)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
