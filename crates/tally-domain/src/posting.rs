//! Balanced two-account postings produced by classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    account::{Account, AccountType},
    common::normalize_name,
    money::Money,
};

/// Names an account on one side of a posting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountRef {
    pub name: String,
    pub account_type: AccountType,
}

impl AccountRef {
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            name: name.into(),
            account_type,
        }
    }

    pub fn same_account(&self, other: &AccountRef) -> bool {
        normalize_name(&self.name) == normalize_name(&other.name)
    }
}

impl From<&Account> for AccountRef {
    fn from(account: &Account) -> Self {
        Self::new(account.name.clone(), account.account_type)
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Why a posting could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostingError {
    SameAccount(String),
    Unbalanced { debit: Money, credit: Money },
    EmptyAccountName,
}

impl fmt::Display for PostingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostingError::SameAccount(name) => {
                write!(f, "debit and credit both target `{name}`")
            }
            PostingError::Unbalanced { debit, credit } => {
                write!(f, "debit {debit} does not equal credit {credit}")
            }
            PostingError::EmptyAccountName => f.write_str("posting account name is empty"),
        }
    }
}

impl std::error::Error for PostingError {}

/// A double-entry mapping. Invariants: `debit_amount == credit_amount` and the
/// two accounts differ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Posting {
    pub debit_account: AccountRef,
    pub debit_amount: Money,
    pub credit_account: AccountRef,
    pub credit_amount: Money,
    pub explanation: String,
}

impl Posting {
    /// Builds a posting for `amount` on both sides.
    pub fn new(
        debit_account: AccountRef,
        credit_account: AccountRef,
        amount: Money,
        explanation: impl Into<String>,
    ) -> Result<Self, PostingError> {
        Self::with_amounts(debit_account, amount, credit_account, amount, explanation)
    }

    pub fn with_amounts(
        debit_account: AccountRef,
        debit_amount: Money,
        credit_account: AccountRef,
        credit_amount: Money,
        explanation: impl Into<String>,
    ) -> Result<Self, PostingError> {
        if debit_account.name.trim().is_empty() || credit_account.name.trim().is_empty() {
            return Err(PostingError::EmptyAccountName);
        }
        if debit_account.same_account(&credit_account) {
            return Err(PostingError::SameAccount(debit_account.name));
        }
        if debit_amount != credit_amount {
            return Err(PostingError::Unbalanced {
                debit: debit_amount,
                credit: credit_amount,
            });
        }
        Ok(Self {
            debit_account,
            debit_amount,
            credit_account,
            credit_amount,
            explanation: explanation.into(),
        })
    }

    pub fn is_balanced(&self) -> bool {
        self.debit_amount == self.credit_amount && !self.debit_account.same_account(&self.credit_account)
    }

    pub fn amount(&self) -> Money {
        self.debit_amount
    }
}
