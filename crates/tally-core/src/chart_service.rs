//! Validation of generated charts of accounts and the starter chart.

use tracing::warn;

use tally_domain::{Account, AccountType, ChartOfAccounts};

use crate::{
    generated::{balance, generated_entries, text},
    CoreError,
};

const REQUIRED_ACCOUNT_KEYS: [&str; 5] = [
    "name",
    "account_type",
    "account_sub_type",
    "description",
    "current_balance",
];

/// The five-account chart used when generation is unavailable.
pub fn sample_chart() -> ChartOfAccounts {
    ChartOfAccounts::new(vec![
        Account::new("Checking Account", AccountType::Asset)
            .with_sub_type("Current Asset")
            .with_description("Primary business checking account"),
        Account::new("Accounts Receivable", AccountType::Asset)
            .with_sub_type("Current Asset")
            .with_description("Money owed by customers for goods or services"),
        Account::new("Sales Revenue", AccountType::Income)
            .with_sub_type("Operating Income")
            .with_description("Revenue from primary business operations"),
        Account::new("Office Expenses", AccountType::Expense)
            .with_sub_type("Operating Expense")
            .with_description("General office supplies and expenses"),
        Account::new("Accounts Payable", AccountType::Liability)
            .with_sub_type("Current Liability")
            .with_description("Money owed to vendors and suppliers"),
    ])
}

/// Parses a generated chart: a JSON array whose entries all carry the five
/// account keys. Balances may be numbers or currency strings.
pub fn parse_generated_chart(raw: &str) -> Result<ChartOfAccounts, CoreError> {
    let entries = generated_entries(raw, &REQUIRED_ACCOUNT_KEYS, "accounts", CoreError::InvalidChart)?;

    let mut chart = ChartOfAccounts::default();
    for (index, object) in entries.iter().enumerate() {
        let account_type = text(&object["account_type"])
            .parse::<AccountType>()
            .map_err(|err| CoreError::InvalidChart(format!("entry {index}: {err}")))?;
        chart.push(
            Account::new(text(&object["name"]).trim(), account_type)
                .with_sub_type(text(&object["account_sub_type"]))
                .with_description(text(&object["description"]))
                .with_balance(balance(&object["current_balance"])),
        );
    }

    let duplicates = chart.duplicate_names();
    if !duplicates.is_empty() {
        warn!(?duplicates, "generated chart has duplicate account names; first match wins");
    }
    Ok(chart)
}

/// Parses a generated chart, falling back to [`sample_chart`] on any error.
pub fn chart_or_sample(raw: &str) -> ChartOfAccounts {
    match parse_generated_chart(raw) {
        Ok(chart) => chart,
        Err(err) => {
            warn!(error = %err, "generated chart rejected; using sample chart");
            sample_chart()
        }
    }
}
