//! Core Kernel - Foundational types for the tailoring back office
//!
//! This crate provides the building blocks shared by every domain module:
//! - Money with precise decimal arithmetic
//! - Strongly-typed entity identifiers
//! - Port traits for the external document and blob stores

pub mod identifiers;
pub mod money;
pub mod ports;

pub use identifiers::{
    BillId, BillItemId, CustomerId, ImageId, MeasurementId, PaymentId, ReceivedItemId, ServiceId,
};
pub use money::Money;
pub use ports::{BlobStore, Condition, Document, DocumentStore, PortError};
