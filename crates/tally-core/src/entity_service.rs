//! Validation of generated customer and vendor lists and their starters.

use serde_json::{Map, Value};
use tracing::warn;

use tally_domain::{Customer, Vendor};

use crate::{
    generated::{generated_entries, optional_text, text},
    CoreError,
};

const REQUIRED_CUSTOMER_KEYS: [&str; 10] = [
    "customer_id",
    "name",
    "company_name",
    "email",
    "phone",
    "billing_address",
    "city",
    "country",
    "balance",
    "notes",
];

const REQUIRED_VENDOR_KEYS: [&str; 11] = [
    "vendor_id",
    "name",
    "company_name",
    "email",
    "phone",
    "address",
    "city",
    "country",
    "balance",
    "currency",
    "notes",
];

pub fn sample_customers() -> Vec<Customer> {
    vec![
        Customer::new("Sarah Johnson")
            .with_company("ABC Company")
            .with_email("sarah.johnson@abccompany.com"),
        Customer::new("Mike Chen").with_email("mike.chen.business@gmail.com"),
    ]
}

pub fn sample_vendors() -> Vec<Vendor> {
    vec![
        Vendor::new("TechSource Solutions")
            .with_company("TechSource Solutions Inc")
            .with_email("billing@techsource.com"),
        Vendor::new("Premier Office Supplies")
            .with_company("Premier Office Supplies LLC")
            .with_email("orders@premieroffice.com"),
    ]
}

/// Parses a generated customer list. Every entry must carry the full
/// customer record; only the name, company and email are kept.
pub fn parse_generated_customers(raw: &str) -> Result<Vec<Customer>, CoreError> {
    let entries = generated_entries(raw, &REQUIRED_CUSTOMER_KEYS, "customers", |message| {
        CoreError::InvalidEntities {
            kind: "customer",
            message,
        }
    })?;
    Ok(entries
        .iter()
        .map(|object| {
            let (name, company_name, email) = identity(object);
            Customer {
                name,
                company_name,
                email,
            }
        })
        .collect())
}

/// Parses a generated vendor list, same rules as customers.
pub fn parse_generated_vendors(raw: &str) -> Result<Vec<Vendor>, CoreError> {
    let entries = generated_entries(raw, &REQUIRED_VENDOR_KEYS, "vendors", |message| {
        CoreError::InvalidEntities {
            kind: "vendor",
            message,
        }
    })?;
    Ok(entries
        .iter()
        .map(|object| {
            let (name, company_name, email) = identity(object);
            Vendor {
                name,
                company_name,
                email,
            }
        })
        .collect())
}

pub fn customers_or_sample(raw: &str) -> Vec<Customer> {
    parse_generated_customers(raw).unwrap_or_else(|err| {
        warn!(error = %err, "generated customers rejected; using sample customers");
        sample_customers()
    })
}

pub fn vendors_or_sample(raw: &str) -> Vec<Vendor> {
    parse_generated_vendors(raw).unwrap_or_else(|err| {
        warn!(error = %err, "generated vendors rejected; using sample vendors");
        sample_vendors()
    })
}

fn identity(object: &Map<String, Value>) -> (String, String, Option<String>) {
    (
        text(&object["name"]).trim().to_string(),
        text(&object["company_name"]).trim().to_string(),
        optional_text(object.get("email")),
    )
}
