//! Updates Domain - App release metadata
//!
//! The mobile front end polls this to learn about newer builds per
//! platform and component, then fetches the package through a time-limited
//! download URL. Version ordering is plain dotted-numeric comparison.

pub mod error;
pub mod release;
pub mod service;

/// Document-store table of releases, keyed by `platform#component#version`.
pub const APP_UPDATES_TABLE: &str = "AppUpdates";

pub use error::UpdatesError;
pub use release::{AppRelease, RegisterRelease, Version};
pub use service::{DownloadLink, UpdateCheck, UpdateService};
