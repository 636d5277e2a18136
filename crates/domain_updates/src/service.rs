//! Update checks, registration, and download links

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use core_kernel::{BlobStore, Document, DocumentStore};

use crate::error::UpdatesError;
use crate::release::{release_key, AppRelease, RegisterRelease, Version};
use crate::APP_UPDATES_TABLE;

/// Download URLs stay valid for one hour.
const DOWNLOAD_TTL_SECS: u64 = 3600;

/// Result of an update check.
#[derive(Debug, Clone)]
pub struct UpdateCheck {
    pub has_updates: bool,
    pub current_version: String,
    pub updates: Vec<AppRelease>,
}

/// A time-limited package download link.
#[derive(Debug, Clone)]
pub struct DownloadLink {
    pub download_url: String,
    pub expires_in: u64,
}

/// Registration and lookup of app releases.
#[derive(Clone)]
pub struct UpdateService {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl UpdateService {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Registers a release under `platform#component#version`.
    pub async fn register(&self, input: RegisterRelease) -> Result<AppRelease, UpdatesError> {
        for (field, value) in [
            ("version", &input.version),
            ("platform", &input.platform),
            ("component", &input.component),
        ] {
            if value.trim().is_empty() {
                return Err(UpdatesError::validation(format!(
                    "missing required field: {field}"
                )));
            }
        }

        let now = Utc::now();
        let release = AppRelease {
            version: input.version,
            platform: input.platform,
            component: input.component,
            description: input.description,
            size_bytes: input.size_bytes,
            critical: input.critical,
            download_url: input.download_url,
            checksum: input.checksum,
            dependencies: input.dependencies,
            release_date: now,
            created_at: now,
        };
        self.store
            .put(APP_UPDATES_TABLE, &release.key(), encode(&release)?)
            .await?;
        Ok(release)
    }

    /// Returns the releases strictly newer than `current_version` for the
    /// platform/component pair, newest first.
    ///
    /// Releases with malformed versions never count as newer; a malformed
    /// `current_version` yields no updates at all.
    pub async fn check(
        &self,
        current_version: &str,
        platform: &str,
        component: &str,
    ) -> Result<UpdateCheck, UpdatesError> {
        let current = Version::parse(current_version);

        let documents = self.store.scan(APP_UPDATES_TABLE).await?;
        let mut updates: Vec<(Version, AppRelease)> = Vec::new();
        if let Some(current) = current {
            for document in documents {
                let release: AppRelease = decode(document)?;
                if release.platform != platform || release.component != component {
                    continue;
                }
                match release.parsed_version() {
                    Some(version) if version > current => updates.push((version, release)),
                    _ => {}
                }
            }
        }

        updates.sort_by(|a, b| b.0.cmp(&a.0));
        let updates: Vec<AppRelease> = updates.into_iter().map(|(_, release)| release).collect();

        Ok(UpdateCheck {
            has_updates: !updates.is_empty(),
            current_version: current_version.to_string(),
            updates,
        })
    }

    /// Issues a time-limited download URL for a release package.
    pub async fn download(
        &self,
        version: &str,
        platform: &str,
        component: &str,
    ) -> Result<DownloadLink, UpdatesError> {
        if version.trim().is_empty() {
            return Err(UpdatesError::validation("version parameter required"));
        }

        let key = format!("mobile/updates/{platform}/{component}/{version}/update.zip");
        Ok(DownloadLink {
            download_url: self.blobs.download_url(&key, DOWNLOAD_TTL_SECS),
            expires_in: DOWNLOAD_TTL_SECS,
        })
    }

    /// Fetches one release, if registered.
    pub async fn get(
        &self,
        platform: &str,
        component: &str,
        version: &str,
    ) -> Result<Option<AppRelease>, UpdatesError> {
        match self
            .store
            .get(APP_UPDATES_TABLE, &release_key(platform, component, version))
            .await?
        {
            Some(document) => Ok(Some(decode(document)?)),
            None => Ok(None),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Document, UpdatesError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(UpdatesError::Storage(
            "entity did not serialize to a document".to_string(),
        )),
        Err(error) => Err(UpdatesError::Storage(error.to_string())),
    }
}

fn decode<T: DeserializeOwned>(document: Document) -> Result<T, UpdatesError> {
    serde_json::from_value(Value::Object(document)).map_err(|e| UpdatesError::Storage(e.to_string()))
}
