//! Customers and vendors used as entity-matching context.

use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company_name: String::new(),
            email: None,
        }
    }

    pub fn with_company(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = company_name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vendor {
    pub name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Vendor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company_name: String::new(),
            email: None,
        }
    }

    pub fn with_company(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = company_name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Anything with a name and optional company name that a transaction
/// description may mention.
pub trait Counterparty: NamedEntity {
    fn company_name(&self) -> &str;

    /// Returns `true` when the description mentions the name or company name.
    fn mentioned_in(&self, description: &str) -> bool {
        contains_ignore_case(description, self.name().trim())
            || contains_ignore_case(description, self.company_name().trim())
    }
}

impl NamedEntity for Customer {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Counterparty for Customer {
    fn company_name(&self) -> &str {
        &self.company_name
    }
}

impl NamedEntity for Vendor {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Counterparty for Vendor {
    fn company_name(&self) -> &str {
        &self.company_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mentioned_in_checks_company_name() {
        let vendor = Vendor::new("Jane Roe").with_company("Staples");
        assert!(vendor.mentioned_in("STAPLES #1123 office supplies"));
        assert!(!Vendor::new("  ").mentioned_in("anything"));
    }
}
