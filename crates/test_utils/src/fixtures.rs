//! Common fixture values

use chrono::NaiveDate;
use core_kernel::Money;
use rust_decimal_macros::dec;

/// Monetary fixtures
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A typical stitching charge
    pub fn stitching_charge() -> Money {
        Money::new(dec!(450.00))
    }

    /// A small advance payment
    pub fn advance() -> Money {
        Money::new(dec!(200.00))
    }

    pub fn of(major: i64) -> Money {
        Money::new(rust_decimal::Decimal::from(major))
    }
}

/// Date fixtures
pub struct DateFixtures;

impl DateFixtures {
    /// The billing date used across tests
    pub fn billing_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    /// A delivery date two weeks after [`Self::billing_date`]
    pub fn delivery_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }
}
