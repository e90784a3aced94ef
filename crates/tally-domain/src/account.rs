//! Domain types representing chart-of-accounts entries and their polarity.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{common::*, money::Money};

/// A named account in the business's chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub sub_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub balance: Money,
}

impl Account {
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            name: name.into(),
            account_type,
            sub_type: String::new(),
            description: String::new(),
            balance: Money::ZERO,
        }
    }

    pub fn with_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = sub_type.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }

    /// Resets the balance without removing the account.
    pub fn clear(&mut self) {
        self.balance = Money::ZERO;
    }

    /// Returns `true` when the name matches `other`, ignoring case and surrounding whitespace.
    pub fn is_named(&self, other: &str) -> bool {
        normalize_name(&self.name) == normalize_name(other)
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

/// The five top-level account types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    #[serde(alias = "Revenue")]
    Income,
    Expense,
}

/// Direction a debit or credit moves an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEffect {
    Increase,
    Decrease,
}

/// Which side of an entry increases an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalBalance {
    Debit,
    Credit,
}

impl AccountType {
    pub fn normal_balance(self) -> NormalBalance {
        match self {
            AccountType::Asset | AccountType::Expense => NormalBalance::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Income => {
                NormalBalance::Credit
            }
        }
    }

    pub fn debit_effect(self) -> BalanceEffect {
        match self.normal_balance() {
            NormalBalance::Debit => BalanceEffect::Increase,
            NormalBalance::Credit => BalanceEffect::Decrease,
        }
    }

    pub fn credit_effect(self) -> BalanceEffect {
        match self.debit_effect() {
            BalanceEffect::Increase => BalanceEffect::Decrease,
            BalanceEffect::Decrease => BalanceEffect::Increase,
        }
    }

    /// Lower-case noun used in posting explanations.
    pub fn noun(self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Equity => "equity",
            AccountType::Income => "revenue",
            AccountType::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountType::Asset => "Asset",
            AccountType::Liability => "Liability",
            AccountType::Equity => "Equity",
            AccountType::Income => "Income",
            AccountType::Expense => "Expense",
        };
        f.write_str(label)
    }
}

impl fmt::Display for BalanceEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BalanceEffect::Increase => "increases",
            BalanceEffect::Decrease => "decreases",
        })
    }
}

/// Raised when free text does not name one of the five account types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAccountType(pub String);

impl fmt::Display for UnknownAccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown account type `{}`", self.0)
    }
}

impl std::error::Error for UnknownAccountType {}

impl FromStr for AccountType {
    type Err = UnknownAccountType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asset" | "assets" => Ok(AccountType::Asset),
            "liability" | "liabilities" => Ok(AccountType::Liability),
            "equity" => Ok(AccountType::Equity),
            "income" | "revenue" => Ok(AccountType::Income),
            "expense" | "expenses" => Ok(AccountType::Expense),
            _ => Err(UnknownAccountType(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_table_matches_double_entry_rules() {
        use BalanceEffect::*;
        let expected = [
            (AccountType::Asset, Increase, Decrease),
            (AccountType::Liability, Decrease, Increase),
            (AccountType::Equity, Decrease, Increase),
            (AccountType::Income, Decrease, Increase),
            (AccountType::Expense, Increase, Decrease),
        ];
        for (kind, debit, credit) in expected {
            assert_eq!(kind.debit_effect(), debit, "{kind} debit");
            assert_eq!(kind.credit_effect(), credit, "{kind} credit");
        }
    }

    #[test]
    fn parses_revenue_as_income() {
        assert_eq!("Revenue".parse::<AccountType>().unwrap(), AccountType::Income);
        assert_eq!(" expense ".parse::<AccountType>().unwrap(), AccountType::Expense);
        assert!("Widget".parse::<AccountType>().is_err());
    }

    #[test]
    fn clear_resets_balance() {
        let mut account = Account::new("Cash", AccountType::Asset).with_balance(Money::from_units(10));
        account.clear();
        assert!(account.balance.is_zero());
    }
}
