//! Test data builders

use chrono::NaiveDate;
use core_kernel::{BillItemId, CustomerId, Money};
use rust_decimal::Decimal;

use domain_billing::{
    CreateBill, MaterialSource, NewBillItem, NewPayment, NewReceivedItem,
};

use crate::fixtures::{DateFixtures, MoneyFixtures};

/// Shorthand for a line-item input.
pub struct BillItemInput;

impl BillItemInput {
    /// A new item with the given name, quantity, and unit price.
    pub fn new(name: &str, quantity: u32, unit_price: Decimal) -> NewBillItem {
        NewBillItem {
            id: None,
            kind: "custom".to_string(),
            name: name.to_string(),
            description: None,
            quantity,
            unit_price: Money::new(unit_price),
            config_item_id: None,
            material_source: MaterialSource::Customer,
            delivery_status: None,
            internal_notes: None,
        }
    }

    /// Same, but reusing an existing item id (an edit).
    pub fn existing(id: BillItemId, name: &str, quantity: u32, unit_price: Decimal) -> NewBillItem {
        NewBillItem {
            id: Some(id),
            ..Self::new(name, quantity, unit_price)
        }
    }
}

/// Shorthand for a payment input.
pub struct PaymentInput;

impl PaymentInput {
    pub fn cash(amount: Decimal) -> NewPayment {
        NewPayment {
            amount: Money::new(amount),
            payment_date: NaiveDate::from_ymd_opt(2024, 3, 2),
            payment_method: Some("cash".to_string()),
            notes: None,
        }
    }
}

/// Builder for [`CreateBill`] inputs with sensible defaults: one customer,
/// standard dates, a single 450.00 item, no payments.
pub struct CreateBillBuilder {
    customer_id: CustomerId,
    billing_date: NaiveDate,
    delivery_date: NaiveDate,
    delivery_status: Option<String>,
    items: Vec<NewBillItem>,
    received_items: Vec<NewReceivedItem>,
    payments: Vec<NewPayment>,
    discount: Option<Money>,
    notes: Option<String>,
    default_items: bool,
}

impl Default for CreateBillBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateBillBuilder {
    pub fn new() -> Self {
        Self {
            customer_id: CustomerId::new(),
            billing_date: DateFixtures::billing_date(),
            delivery_date: DateFixtures::delivery_date(),
            delivery_status: None,
            items: Vec::new(),
            received_items: Vec::new(),
            payments: Vec::new(),
            discount: None,
            notes: None,
            default_items: true,
        }
    }

    pub fn with_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = customer_id;
        self
    }

    pub fn with_delivery_status(mut self, status: &str) -> Self {
        self.delivery_status = Some(status.to_string());
        self
    }

    pub fn with_item(mut self, item: NewBillItem) -> Self {
        self.default_items = false;
        self.items.push(item);
        self
    }

    /// Replaces the default item set with nothing at all.
    pub fn without_items(mut self) -> Self {
        self.default_items = false;
        self.items.clear();
        self
    }

    pub fn with_payment(mut self, payment: NewPayment) -> Self {
        self.payments.push(payment);
        self
    }

    pub fn with_received_item(mut self, name: &str, quantity: u32) -> Self {
        self.received_items.push(NewReceivedItem {
            name: name.to_string(),
            description: None,
            quantity,
            received_date: Some(DateFixtures::billing_date()),
            status: Some("received".to_string()),
        });
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = Some(Money::new(discount));
        self
    }

    pub fn build(self) -> CreateBill {
        let items = if self.default_items && self.items.is_empty() {
            vec![BillItemInput::new(
                "Kurta stitching",
                1,
                MoneyFixtures::stitching_charge().amount(),
            )]
        } else {
            self.items
        };
        CreateBill {
            customer_id: self.customer_id,
            billing_date: self.billing_date,
            delivery_date: self.delivery_date,
            delivery_status: self.delivery_status,
            items,
            received_items: self.received_items,
            payments: self.payments,
            discount: self.discount,
            notes: self.notes,
        }
    }
}
