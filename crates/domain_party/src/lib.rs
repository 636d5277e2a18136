//! Party Domain - Customers of the shop
//!
//! Plain CRUD with a universal search, a duplicate-phone check, and the
//! per-customer measurement list. Measurements are embedded in the customer
//! record; they have no identity outside it.

pub mod customer;
pub mod error;
pub mod service;

/// Document-store table holding customers, keyed by customer id.
pub const CUSTOMERS_TABLE: &str = "Customers";

pub use customer::{
    Customer, Measurement, MeasurementField, NewCustomer, PersonalDetails, SaveMeasurement,
};
pub use error::PartyError;
pub use service::{CustomerPage, CustomerQuery, CustomerService, PhoneCheck};
