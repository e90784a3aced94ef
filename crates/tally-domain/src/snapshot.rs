//! Onboarding balance-sheet snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const RETAINED_EARNINGS: &str = "retained_earnings";
pub const COMMON_STOCK: &str = "common_stock";
pub const ADDITIONAL_PAID_IN_CAPITAL: &str = "additional_paid_in_capital";

/// Equity keys that take part in the balance check. Any other equity entry
/// (preferred stock, treasury stock, ...) is carried but not summed.
pub const REQUIRED_EQUITY_KEYS: [&str; 3] =
    [COMMON_STOCK, RETAINED_EARNINGS, ADDITIONAL_PAID_IN_CAPITAL];

/// Label → raw amount string (may include `$` and `,`).
pub type LineItems = BTreeMap<String, String>;

/// Answers to the three onboarding business questions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessQuestions {
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub money_in: String,
    #[serde(default)]
    pub money_out: String,
    #[serde(default)]
    pub locked: bool,
}

impl BusinessQuestions {
    fn answers(&self) -> [&str; 3] {
        [&self.business_type, &self.money_in, &self.money_out]
    }

    pub fn answered_count(&self) -> usize {
        self.answers()
            .iter()
            .filter(|value| !value.trim().is_empty())
            .count()
    }

    /// All three answered and saved.
    pub fn is_complete(&self) -> bool {
        self.answered_count() == 3 && self.locked
    }
}

/// Point-in-time asset, liability, and equity line items.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinancialSnapshot {
    #[serde(default)]
    pub general_info: BTreeMap<String, String>,
    #[serde(default)]
    pub business_questions: BusinessQuestions,
    #[serde(default)]
    pub assets: LineItems,
    #[serde(default)]
    pub liabilities: LineItems,
    #[serde(default)]
    pub equity: LineItems,
    #[serde(default)]
    pub completed: bool,
}

impl FinancialSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, label: impl Into<String>, amount: impl Into<String>) -> Self {
        self.assets.insert(label.into(), amount.into());
        self
    }

    pub fn with_liability(mut self, label: impl Into<String>, amount: impl Into<String>) -> Self {
        self.liabilities.insert(label.into(), amount.into());
        self
    }

    pub fn with_equity(mut self, label: impl Into<String>, amount: impl Into<String>) -> Self {
        self.equity.insert(label.into(), amount.into());
        self
    }

    pub fn retained_earnings(&self) -> Option<&str> {
        self.equity.get(RETAINED_EARNINGS).map(String::as_str)
    }

    pub fn set_retained_earnings(&mut self, amount: impl Into<String>) {
        self.equity.insert(RETAINED_EARNINGS.to_string(), amount.into());
    }

    /// Number of filled-in onboarding fields. Only the required equity keys count.
    pub fn completed_fields(&self) -> usize {
        let filled = |items: &BTreeMap<String, String>| {
            items.values().filter(|value| !value.trim().is_empty()).count()
        };
        let equity = REQUIRED_EQUITY_KEYS
            .iter()
            .filter(|key| {
                self.equity
                    .get(**key)
                    .is_some_and(|value| !value.trim().is_empty())
            })
            .count();
        filled(&self.general_info)
            + self.business_questions.answered_count()
            + filled(&self.assets)
            + filled(&self.liabilities)
            + equity
    }

    pub fn business_questions_complete(&self) -> bool {
        self.business_questions.is_complete()
    }
}
