//! Ordered chart of accounts used as the lookup universe for classification.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{account::Account, common::normalize_name};

/// Ordered collection of accounts. Names are expected to be unique; when they
/// are not, lookups return the first occurrence in list order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ChartOfAccounts {
    accounts: Vec<Account>,
}

impl ChartOfAccounts {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn push(&mut self, account: Account) {
        self.accounts.push(account);
    }

    /// Finds an account by name, ignoring case and surrounding whitespace.
    pub fn find(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.is_named(name))
    }

    /// Returns the first account in list order satisfying `predicate`.
    pub fn find_first<P>(&self, predicate: P) -> Option<&Account>
    where
        P: FnMut(&&Account) -> bool,
    {
        self.accounts.iter().find(predicate)
    }

    /// Names that occur more than once (reported once each, first-seen order).
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for account in &self.accounts {
            let key = normalize_name(&account.name);
            if !seen.insert(key.clone()) && reported.insert(key) {
                duplicates.push(account.name.clone());
            }
        }
        duplicates
    }

    /// Clears every balance; accounts are never removed.
    pub fn clear_balances(&mut self) {
        for account in &mut self.accounts {
            account.clear();
        }
    }
}
