//! Customer records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, MeasurementId};

/// Contact details; only name and phone are mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// One named value inside a measurement, e.g. "chest" = "40.5".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementField {
    pub name: String,
    pub value: String,
}

/// A recorded set of measurements for one garment type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: MeasurementId,
    pub garment_type: String,
    #[serde(default)]
    pub fields: Vec<MeasurementField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_measured_date: Option<NaiveDate>,
}

/// Input for saving a measurement. An id means "replace the matching
/// entry"; without one a fresh measurement is appended.
#[derive(Debug, Clone)]
pub struct SaveMeasurement {
    pub id: Option<MeasurementId>,
    pub garment_type: String,
    pub fields: Vec<MeasurementField>,
    pub notes: Option<String>,
    pub last_measured_date: Option<NaiveDate>,
}

impl SaveMeasurement {
    pub fn into_measurement(self) -> Measurement {
        Measurement {
            id: self.id.unwrap_or_default(),
            garment_type: self.garment_type,
            fields: self.fields,
            notes: self.notes,
            last_measured_date: self.last_measured_date,
        }
    }
}

/// A customer as persisted in the `Customers` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    /// Short display number derived from the id
    pub customer_number: String,
    pub personal_details: PersonalDetails,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating or replacing a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub personal_details: PersonalDetails,
    pub measurements: Vec<SaveMeasurement>,
    pub comments: Option<String>,
}

impl Customer {
    /// Builds a fresh customer, deriving the display number from the id.
    pub fn from_new(new: NewCustomer, now: i64) -> Self {
        let id = CustomerId::new();
        let simple = id.as_uuid().simple().to_string();
        Self {
            id,
            customer_number: simple[simple.len() - 8..].to_string(),
            personal_details: new.personal_details,
            measurements: new
                .measurements
                .into_iter()
                .map(SaveMeasurement::into_measurement)
                .collect(),
            comments: new.comments,
            created_at: now,
            updated_at: now,
        }
    }
}
