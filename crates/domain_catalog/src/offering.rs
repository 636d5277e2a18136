//! Service offerings (the price list)

use serde::{Deserialize, Serialize};

use core_kernel::{Money, ServiceId};

/// One entry on the price list, e.g. "Blouse stitching - 450.00".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    pub id: ServiceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub default_price: Money,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating or replacing an offering.
#[derive(Debug, Clone)]
pub struct NewServiceOffering {
    pub name: String,
    pub description: Option<String>,
    pub default_price: Money,
}
