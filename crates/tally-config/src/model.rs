use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

/// Stores user-configurable preferences. Missing fields fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Code printed after every amount in CLI output.
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root for snapshot and chart files. Defaults to `~/Documents/Tally`.
    #[serde(default)]
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            classifier: ClassifierConfig::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Tally")
    }

    /// Rejects a blank currency, blank fallback labels and labels that
    /// collide with each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("currency is blank".into()));
        }
        let labels = [
            ("cash_label", &self.classifier.cash_label),
            ("revenue_label", &self.classifier.revenue_label),
            ("expense_label", &self.classifier.expense_label),
        ];
        for (field, label) in labels {
            if label.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("classifier.{field} is blank")));
            }
        }
        let cash = self.classifier.cash_label.trim().to_lowercase();
        if cash == self.classifier.revenue_label.trim().to_lowercase()
            || cash == self.classifier.expense_label.trim().to_lowercase()
        {
            return Err(ConfigError::Invalid(
                "classifier.cash_label must differ from the revenue and expense labels".into(),
            ));
        }
        Ok(())
    }
}

/// Fallback account labels and oracle request sizing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifierConfig {
    #[serde(default = "ClassifierConfig::default_cash_label")]
    pub cash_label: String,
    #[serde(default = "ClassifierConfig::default_revenue_label")]
    pub revenue_label: String,
    #[serde(default = "ClassifierConfig::default_expense_label")]
    pub expense_label: String,
    #[serde(default = "ClassifierConfig::default_chart_excerpt_limit")]
    pub chart_excerpt_limit: usize,
    #[serde(default = "ClassifierConfig::default_entity_excerpt_limit")]
    pub entity_excerpt_limit: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            cash_label: Self::default_cash_label(),
            revenue_label: Self::default_revenue_label(),
            expense_label: Self::default_expense_label(),
            chart_excerpt_limit: Self::default_chart_excerpt_limit(),
            entity_excerpt_limit: Self::default_entity_excerpt_limit(),
        }
    }
}

impl ClassifierConfig {
    pub fn default_cash_label() -> String {
        "Cash".into()
    }

    pub fn default_revenue_label() -> String {
        "Service Revenue".into()
    }

    pub fn default_expense_label() -> String {
        "General Expenses".into()
    }

    pub fn default_chart_excerpt_limit() -> usize {
        50
    }

    pub fn default_entity_excerpt_limit() -> usize {
        20
    }
}
