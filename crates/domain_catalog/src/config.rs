//! Measurement templates per garment type

use serde::{Deserialize, Serialize};

/// The ordered list of measurement field names to record for one garment
/// type. The garment type doubles as the storage key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementConfig {
    pub garment_type: String,
    #[serde(default)]
    pub measurements: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
