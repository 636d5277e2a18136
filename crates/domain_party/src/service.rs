//! Customer CRUD, search, and the measurement operations

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use core_kernel::{CustomerId, Document, DocumentStore, MeasurementId};

use crate::customer::{Customer, Measurement, NewCustomer, SaveMeasurement};
use crate::error::PartyError;
use crate::CUSTOMERS_TABLE;

/// Default page size for customer listings.
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Search and pagination parameters.
///
/// `search_field` is `universal` for a case-insensitive match across every
/// personal detail plus the customer number, or the name of one field
/// (optionally prefixed `personalDetails.`) for a targeted match.
#[derive(Debug, Clone)]
pub struct CustomerQuery {
    pub search_text: Option<String>,
    pub search_field: Option<String>,
    pub limit: usize,
    pub start_after: Option<CustomerId>,
}

impl Default for CustomerQuery {
    fn default() -> Self {
        Self {
            search_text: None,
            search_field: None,
            limit: DEFAULT_LIST_LIMIT,
            start_after: None,
        }
    }
}

/// One page of customers plus the cursor for the next page.
#[derive(Debug, Clone)]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub last_evaluated_key: Option<CustomerId>,
}

/// Result of the duplicate-phone check.
#[derive(Debug, Clone)]
pub struct PhoneCheck {
    pub exists: bool,
    pub matches: Vec<Customer>,
}

/// CRUD and search over the customer table.
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn DocumentStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates a customer; name and phone are mandatory.
    pub async fn create(&self, new: NewCustomer) -> Result<Customer, PartyError> {
        validate_details(&new.personal_details.name, &new.personal_details.phone)?;

        let customer = Customer::from_new(new, Utc::now().timestamp());
        self.store
            .put(CUSTOMERS_TABLE, &customer.id.to_string(), encode(&customer)?)
            .await?;
        Ok(customer)
    }

    /// Fetches one customer.
    pub async fn get(&self, id: CustomerId) -> Result<Customer, PartyError> {
        self.load(id).await
    }

    /// Lists customers in key order, filtered and paginated.
    ///
    /// The cursor is the last returned id; matching is evaluated here
    /// rather than against stored lowercase shadow copies.
    pub async fn list(&self, query: CustomerQuery) -> Result<CustomerPage, PartyError> {
        let documents = self.store.scan(CUSTOMERS_TABLE).await?;
        let mut customers = documents
            .into_iter()
            .map(decode::<Customer>)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(start_after) = query.start_after {
            customers.retain(|customer| customer.id > start_after);
        }
        if let Some(text) = query.search_text.as_deref() {
            let field = query.search_field.as_deref().unwrap_or("universal");
            if field == "universal" {
                let needle = text.to_lowercase();
                customers.retain(|customer| matches_universal(customer, &needle));
            } else {
                let field = field.strip_prefix("personalDetails.").unwrap_or(field);
                customers.retain(|customer| matches_field(customer, field, text));
            }
        }

        customers.truncate(query.limit);
        let last_evaluated_key = if customers.len() == query.limit {
            customers.last().map(|customer| customer.id)
        } else {
            None
        };

        Ok(CustomerPage {
            customers,
            last_evaluated_key,
        })
    }

    /// Replaces a customer's details, measurements, and comments.
    pub async fn update(&self, id: CustomerId, new: NewCustomer) -> Result<Customer, PartyError> {
        validate_details(&new.personal_details.name, &new.personal_details.phone)?;

        let existing = self.load(id).await?;
        let customer = Customer {
            id,
            customer_number: existing.customer_number,
            personal_details: new.personal_details,
            measurements: new
                .measurements
                .into_iter()
                .map(SaveMeasurement::into_measurement)
                .collect(),
            comments: new.comments,
            created_at: existing.created_at,
            updated_at: Utc::now().timestamp(),
        };
        self.store
            .put(CUSTOMERS_TABLE, &customer.id.to_string(), encode(&customer)?)
            .await?;
        Ok(customer)
    }

    /// Deletes a customer.
    pub async fn delete(&self, id: CustomerId) -> Result<(), PartyError> {
        self.load(id).await?;
        self.store.delete(CUSTOMERS_TABLE, &id.to_string()).await?;
        Ok(())
    }

    /// Reports every customer sharing the exact phone number.
    pub async fn check_phone(&self, phone: &str) -> Result<PhoneCheck, PartyError> {
        if phone.trim().is_empty() {
            return Err(PartyError::validation("phone number is required"));
        }

        let documents = self.store.scan(CUSTOMERS_TABLE).await?;
        let matches = documents
            .into_iter()
            .map(decode::<Customer>)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|customer| customer.personal_details.phone == phone)
            .collect::<Vec<_>>();

        Ok(PhoneCheck {
            exists: !matches.is_empty(),
            matches,
        })
    }

    /// Returns a customer's measurement list.
    pub async fn list_measurements(&self, id: CustomerId) -> Result<Vec<Measurement>, PartyError> {
        Ok(self.load(id).await?.measurements)
    }

    /// Upserts a measurement: a known id replaces the matching entry,
    /// otherwise the measurement is appended.
    pub async fn save_measurement(
        &self,
        id: CustomerId,
        input: SaveMeasurement,
    ) -> Result<Measurement, PartyError> {
        if input.garment_type.trim().is_empty() {
            return Err(PartyError::validation("garment type is required"));
        }

        let mut customer = self.load(id).await?;
        let measurement = input.into_measurement();

        match customer
            .measurements
            .iter_mut()
            .find(|existing| existing.id == measurement.id)
        {
            Some(existing) => *existing = measurement.clone(),
            None => customer.measurements.push(measurement.clone()),
        }

        self.persist_measurements(&customer).await?;
        Ok(measurement)
    }

    /// Removes a measurement by id.
    pub async fn delete_measurement(
        &self,
        id: CustomerId,
        measurement_id: MeasurementId,
    ) -> Result<(), PartyError> {
        let mut customer = self.load(id).await?;

        let before = customer.measurements.len();
        customer
            .measurements
            .retain(|measurement| measurement.id != measurement_id);
        if customer.measurements.len() == before {
            return Err(PartyError::not_found("Measurement", measurement_id));
        }

        self.persist_measurements(&customer).await
    }

    async fn load(&self, id: CustomerId) -> Result<Customer, PartyError> {
        let document = self
            .store
            .get(CUSTOMERS_TABLE, &id.to_string())
            .await?
            .ok_or_else(|| PartyError::not_found("Customer", id))?;
        decode(document)
    }

    async fn persist_measurements(&self, customer: &Customer) -> Result<(), PartyError> {
        let fields = match json!({
            "measurements": &customer.measurements,
            "updatedAt": Utc::now().timestamp(),
        }) {
            Value::Object(map) => map,
            _ => unreachable!("json literal is an object"),
        };
        self.store
            .update(CUSTOMERS_TABLE, &customer.id.to_string(), fields, None)
            .await?;
        Ok(())
    }
}

fn validate_details(name: &str, phone: &str) -> Result<(), PartyError> {
    if name.trim().is_empty() || phone.trim().is_empty() {
        return Err(PartyError::validation("customer name and phone are required"));
    }
    Ok(())
}

fn matches_universal(customer: &Customer, needle: &str) -> bool {
    let details = &customer.personal_details;
    let haystacks = [
        Some(details.name.as_str()),
        Some(details.phone.as_str()),
        details.email.as_deref(),
        details.address.as_deref(),
        Some(customer.customer_number.as_str()),
    ];
    haystacks
        .into_iter()
        .flatten()
        .any(|value| value.to_lowercase().contains(needle))
}

fn matches_field(customer: &Customer, field: &str, text: &str) -> bool {
    let details = &customer.personal_details;
    let value = match field {
        "name" => Some(details.name.as_str()),
        "phone" => Some(details.phone.as_str()),
        "email" => details.email.as_deref(),
        "address" => details.address.as_deref(),
        "customerNumber" => Some(customer.customer_number.as_str()),
        "comments" => customer.comments.as_deref(),
        _ => None,
    };
    value.is_some_and(|value| value.contains(text))
}

fn encode<T: Serialize>(value: &T) -> Result<Document, PartyError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(PartyError::Storage(
            "entity did not serialize to a document".to_string(),
        )),
        Err(error) => Err(PartyError::Storage(error.to_string())),
    }
}

fn decode<T: DeserializeOwned>(document: Document) -> Result<T, PartyError> {
    serde_json::from_value(Value::Object(document)).map_err(|e| PartyError::Storage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::{MeasurementField, PersonalDetails};
    use infra_store::MemoryStore;

    fn service() -> CustomerService {
        CustomerService::new(Arc::new(MemoryStore::new()))
    }

    fn new_customer(name: &str, phone: &str) -> NewCustomer {
        NewCustomer {
            personal_details: PersonalDetails {
                name: name.to_string(),
                phone: phone.to_string(),
                email: None,
                address: Some("12 Gandhi Road".to_string()),
            },
            measurements: Vec::new(),
            comments: None,
        }
    }

    #[tokio::test]
    async fn test_create_requires_name_and_phone() {
        let customers = service();
        let result = customers.create(new_customer("", "9876543210")).await;
        assert!(matches!(result, Err(PartyError::Validation(_))));

        let created = customers
            .create(new_customer("Asha Rao", "9876543210"))
            .await
            .unwrap();
        assert_eq!(customers.get(created.id).await.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_universal_search_is_case_insensitive() {
        let customers = service();
        customers
            .create(new_customer("Asha Rao", "9876543210"))
            .await
            .unwrap();
        customers
            .create(new_customer("Vikram Menon", "9000000001"))
            .await
            .unwrap();

        let page = customers
            .list(CustomerQuery {
                search_text: Some("ASHA".to_string()),
                search_field: Some("universal".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.customers.len(), 1);
        assert_eq!(page.customers[0].personal_details.name, "Asha Rao");

        // Address text is searched too.
        let page = customers
            .list(CustomerQuery {
                search_text: Some("gandhi".to_string()),
                search_field: None,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.customers.len(), 2);
    }

    #[tokio::test]
    async fn test_targeted_search_matches_one_field() {
        let customers = service();
        customers
            .create(new_customer("Asha Rao", "9876543210"))
            .await
            .unwrap();

        let page = customers
            .list(CustomerQuery {
                search_text: Some("98765".to_string()),
                search_field: Some("personalDetails.phone".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.customers.len(), 1);

        let page = customers
            .list(CustomerQuery {
                search_text: Some("98765".to_string()),
                search_field: Some("personalDetails.name".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(page.customers.is_empty());
    }

    #[tokio::test]
    async fn test_pagination_cursor_walks_the_key_order() {
        let customers = service();
        for i in 0..5 {
            customers
                .create(new_customer(&format!("Customer {i}"), &format!("900000000{i}")))
                .await
                .unwrap();
        }

        let first = customers
            .list(CustomerQuery {
                limit: 3,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(first.customers.len(), 3);
        let cursor = first.last_evaluated_key.unwrap();

        let second = customers
            .list(CustomerQuery {
                limit: 3,
                start_after: Some(cursor),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(second.customers.len(), 2);
        assert!(second.last_evaluated_key.is_none());
        assert!(second.customers.iter().all(|c| c.id > cursor));
    }

    #[tokio::test]
    async fn test_phone_check_reports_exact_matches() {
        let customers = service();
        customers
            .create(new_customer("Asha Rao", "9876543210"))
            .await
            .unwrap();

        let check = customers.check_phone("9876543210").await.unwrap();
        assert!(check.exists);
        assert_eq!(check.matches.len(), 1);

        let check = customers.check_phone("1234567890").await.unwrap();
        assert!(!check.exists);

        assert!(matches!(
            customers.check_phone(" ").await,
            Err(PartyError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_measurement_upsert_and_delete() {
        let customers = service();
        let created = customers
            .create(new_customer("Asha Rao", "9876543210"))
            .await
            .unwrap();

        let saved = customers
            .save_measurement(
                created.id,
                SaveMeasurement {
                    id: None,
                    garment_type: "blouse".to_string(),
                    fields: vec![MeasurementField {
                        name: "chest".to_string(),
                        value: "36".to_string(),
                    }],
                    notes: None,
                    last_measured_date: None,
                },
            )
            .await
            .unwrap();

        // Saving again with the same id replaces rather than appends.
        customers
            .save_measurement(
                created.id,
                SaveMeasurement {
                    id: Some(saved.id),
                    garment_type: "blouse".to_string(),
                    fields: vec![MeasurementField {
                        name: "chest".to_string(),
                        value: "37".to_string(),
                    }],
                    notes: Some("re-measured".to_string()),
                    last_measured_date: None,
                },
            )
            .await
            .unwrap();

        let measurements = customers.list_measurements(created.id).await.unwrap();
        assert_eq!(measurements.len(), 1);
        assert_eq!(measurements[0].fields[0].value, "37");

        customers
            .delete_measurement(created.id, saved.id)
            .await
            .unwrap();
        assert!(customers.list_measurements(created.id).await.unwrap().is_empty());

        assert!(matches!(
            customers.delete_measurement(created.id, saved.id).await,
            Err(PartyError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_round_trip() {
        let customers = service();
        let created = customers
            .create(new_customer("Asha Rao", "9876543210"))
            .await
            .unwrap();

        let updated = customers
            .update(created.id, new_customer("Asha R.", "9876543211"))
            .await
            .unwrap();
        assert_eq!(updated.personal_details.name, "Asha R.");
        assert_eq!(updated.customer_number, created.customer_number);

        customers.delete(created.id).await.unwrap();
        assert!(matches!(
            customers.get(created.id).await,
            Err(PartyError::NotFound(_))
        ));
    }
}
