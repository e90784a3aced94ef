//! Bank or entry-form transactions that feed classification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

/// An immutable record of money moving in (positive) or out (negative).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            description: description.into(),
            amount,
            category: String::new(),
            reference: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Money received. Zero amounts are treated as outflows.
    pub fn is_income(&self) -> bool {
        self.amount.is_positive()
    }

    pub fn magnitude(&self) -> Money {
        self.amount.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount_is_not_income() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let txn = Transaction::new(date, "Adjustment", Money::ZERO);
        assert!(!txn.is_income());
        assert!(Transaction::new(date, "Sale", Money::from_units(1)).is_income());
    }

    #[test]
    fn builders_set_optional_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let txn = Transaction::new(date, "Rent", Money::from_units(-900))
            .with_category("Occupancy")
            .with_reference("CHK-1042");
        assert_eq!(txn.category, "Occupancy");
        assert_eq!(txn.reference.as_deref(), Some("CHK-1042"));
        assert_eq!(txn.magnitude(), Money::from_units(900));
    }
}
