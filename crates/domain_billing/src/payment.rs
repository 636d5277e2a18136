//! Payment records embedded in a bill
//!
//! Payments have no identity outside their bill; they live as an ordered
//! list on the header and every mutation flows through the engine so the
//! derived amounts stay consistent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, PaymentId};

/// A single payment against a bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    /// Free-form method, e.g. "cash" or "upi"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Input for adding or correcting a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub amount: Money,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl Payment {
    pub fn from_new(new: NewPayment, created_at: i64) -> Self {
        Self {
            id: PaymentId::new(),
            amount: new.amount,
            payment_date: new.payment_date,
            payment_method: new.payment_method,
            notes: new.notes,
            created_at,
        }
    }

    /// Replaces every field except the id and original creation time.
    pub fn apply(&mut self, new: NewPayment) {
        self.amount = new.amount;
        self.payment_date = new.payment_date;
        self.payment_method = new.payment_method;
        self.notes = new.notes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_apply_keeps_identity() {
        let mut payment = Payment::from_new(
            NewPayment {
                amount: Money::new(dec!(100)),
                payment_date: None,
                payment_method: Some("cash".to_string()),
                notes: None,
            },
            1_000,
        );
        let id = payment.id;

        payment.apply(NewPayment {
            amount: Money::new(dec!(150)),
            payment_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            payment_method: Some("upi".to_string()),
            notes: Some("corrected".to_string()),
        });

        assert_eq!(payment.id, id);
        assert_eq!(payment.created_at, 1_000);
        assert_eq!(payment.amount, Money::new(dec!(150)));
        assert_eq!(payment.payment_method.as_deref(), Some("upi"));
    }
}
