//! App update DTOs
//!
//! Unlike the rest of the API these stay snake_case: that is the wire
//! format the mobile updater already speaks.

use serde::{Deserialize, Serialize};

use domain_updates::{AppRelease, RegisterRelease, UpdateCheck};

fn default_version() -> String {
    "0.0.1".to_string()
}

fn default_platform() -> String {
    "android".to_string()
}

fn default_component() -> String {
    "all".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CheckUpdatesQuery {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_component")]
    pub component: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadUpdateQuery {
    pub version: Option<String>,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_component")]
    pub component: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterVersionRequest {
    pub version: String,
    pub platform: String,
    pub component: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "size")]
    pub size_bytes: u64,
    #[serde(default)]
    pub critical: bool,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub checksum: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl From<RegisterVersionRequest> for RegisterRelease {
    fn from(request: RegisterVersionRequest) -> Self {
        RegisterRelease {
            version: request.version,
            platform: request.platform,
            component: request.component,
            description: request.description,
            size_bytes: request.size_bytes,
            critical: request.critical,
            download_url: request.download_url,
            checksum: request.checksum,
            dependencies: request.dependencies,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckUpdatesResponse {
    pub has_updates: bool,
    pub current_version: String,
    pub updates: Vec<AppRelease>,
}

impl From<UpdateCheck> for CheckUpdatesResponse {
    fn from(check: UpdateCheck) -> Self {
        CheckUpdatesResponse {
            has_updates: check.has_updates,
            current_version: check.current_version,
            updates: check.updates,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DownloadUpdateResponse {
    pub download_url: String,
    pub expires_in: u64,
}
