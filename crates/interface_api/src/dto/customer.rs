//! Customer DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, MeasurementId};
use domain_party::{
    service::DEFAULT_LIST_LIMIT, Customer, CustomerQuery, MeasurementField, NewCustomer,
    PersonalDetails, SaveMeasurement,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetailsPayload {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl From<PersonalDetailsPayload> for PersonalDetails {
    fn from(payload: PersonalDetailsPayload) -> Self {
        PersonalDetails {
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            address: payload.address,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementPayload {
    #[serde(default)]
    pub id: Option<MeasurementId>,
    pub garment_type: String,
    #[serde(default)]
    pub fields: Vec<MeasurementField>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub last_measured_date: Option<NaiveDate>,
}

impl From<MeasurementPayload> for SaveMeasurement {
    fn from(payload: MeasurementPayload) -> Self {
        SaveMeasurement {
            id: payload.id,
            garment_type: payload.garment_type,
            fields: payload.fields,
            notes: payload.notes,
            last_measured_date: payload.last_measured_date,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCustomerRequest {
    pub personal_details: PersonalDetailsPayload,
    #[serde(default)]
    pub measurements: Vec<MeasurementPayload>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl From<SaveCustomerRequest> for NewCustomer {
    fn from(request: SaveCustomerRequest) -> Self {
        NewCustomer {
            personal_details: request.personal_details.into(),
            measurements: request.measurements.into_iter().map(Into::into).collect(),
            comments: request.comments,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCustomersQuery {
    #[serde(default)]
    pub search_text: Option<String>,
    #[serde(default)]
    pub search_field: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub start_after: Option<CustomerId>,
}

impl From<ListCustomersQuery> for CustomerQuery {
    fn from(query: ListCustomersQuery) -> Self {
        CustomerQuery {
            search_text: query.search_text,
            search_field: query.search_field,
            limit: query.limit.unwrap_or(DEFAULT_LIST_LIMIT).max(1),
            start_after: query.start_after,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PhoneCheckQuery {
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListResponse {
    pub customers: Vec<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<CustomerId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneCheckResponse {
    pub exists: bool,
    pub matches: Vec<Customer>,
}
