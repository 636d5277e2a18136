//! Test Utilities
//!
//! Builders and fixtures for constructing billing test data with sensible
//! defaults, so tests spell out only the fields they actually care about.

pub mod builders;
pub mod fixtures;

pub use builders::{BillItemInput, CreateBillBuilder, PaymentInput};
pub use fixtures::{DateFixtures, MoneyFixtures};
