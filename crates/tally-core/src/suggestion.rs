//! Schema validation for oracle responses.
//!
//! Raw oracle text is parsed into wire structs here and converted into an
//! [`OracleSuggestion`] only when every field checks out. Nothing past this
//! module sees unvalidated JSON.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use tally_domain::{AccountRef, AccountType, ChartOfAccounts, Money, Posting, Transaction};

use crate::oracle::strip_code_fence;

/// Amounts closer than this are considered equal.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

const REQUIRED_KEYS: [&str; 5] = [
    "account_suggestions",
    "double_entry_mapping",
    "entity_suggestion",
    "document_suggestion",
    "additional_notes",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl FromStr for Confidence {
    type Err = RejectionReason;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Confidence::High),
            "medium" => Ok(Confidence::Medium),
            "low" => Ok(Confidence::Low),
            _ => Err(RejectionReason::UnknownConfidence(value.to_string())),
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntityKind {
    Customer,
    Vendor,
    New,
}

impl FromStr for EntityKind {
    type Err = RejectionReason;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(EntityKind::Customer),
            "vendor" => Ok(EntityKind::Vendor),
            "new" => Ok(EntityKind::New),
            _ => Err(RejectionReason::UnknownEntityType(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentKind {
    Invoice,
    Bill,
    None,
}

impl FromStr for DocumentKind {
    type Err = RejectionReason;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "invoice" => Ok(DocumentKind::Invoice),
            "bill" => Ok(DocumentKind::Bill),
            "none" => Ok(DocumentKind::None),
            _ => Err(RejectionReason::UnknownDocumentType(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccountSuggestion {
    pub account_name: String,
    pub account_type: AccountType,
    pub confidence: Confidence,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntitySuggestion {
    pub kind: EntityKind,
    pub name: String,
    pub confidence: Confidence,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocumentSuggestion {
    pub kind: DocumentKind,
    pub service_or_expense: String,
    pub amount: Money,
    pub confidence: Confidence,
    pub reason: String,
}

/// An oracle response that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleSuggestion {
    pub account_suggestions: Vec<AccountSuggestion>,
    pub posting: Posting,
    pub entity_suggestion: EntitySuggestion,
    pub document_suggestion: DocumentSuggestion,
    pub additional_notes: String,
}

impl OracleSuggestion {
    /// The weakest confidence among the account suggestions.
    pub fn confidence(&self) -> Confidence {
        self.account_suggestions
            .iter()
            .map(|suggestion| suggestion.confidence)
            .min()
            .unwrap_or(Confidence::Low)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RejectionReason {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),
    #[error("response is not a JSON object")]
    NotObject,
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
    #[error("response has the wrong shape: {0}")]
    Shape(String),
    #[error("no account suggestions")]
    NoAccountSuggestions,
    #[error("unknown account type `{0}`")]
    UnknownAccountType(String),
    #[error("unknown confidence `{0}`")]
    UnknownConfidence(String),
    #[error("unknown entity type `{0}`")]
    UnknownEntityType(String),
    #[error("unknown document type `{0}`")]
    UnknownDocumentType(String),
    #[error("posting account name is empty")]
    EmptyAccountName,
    #[error("debit and credit both target `{0}`")]
    SameAccount(String),
    #[error("account `{0}` is not in the chart of accounts")]
    AccountNotInChart(String),
    #[error("amount {0} is not a valid posting amount")]
    InvalidAmount(f64),
    #[error("debit {debit} does not equal credit {credit}")]
    Unbalanced { debit: f64, credit: f64 },
    #[error("posting amount {actual} does not match transaction amount {expected}")]
    AmountMismatch { expected: Money, actual: f64 },
}

/// Outcome of validating an oracle response.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionCheck {
    Valid(OracleSuggestion),
    Rejected(RejectionReason),
}

impl SuggestionCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, SuggestionCheck::Valid(_))
    }
}

#[derive(Debug, Deserialize)]
struct WireAccountSuggestion {
    account_name: String,
    account_type: String,
    confidence: String,
    reason: String,
}

#[derive(Debug, Deserialize)]
struct WireMapping {
    debit_account: String,
    debit_amount: f64,
    credit_account: String,
    credit_amount: f64,
    explanation: String,
}

#[derive(Debug, Deserialize)]
struct WireEntity {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    confidence: String,
    reason: String,
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    service_or_expense: String,
    amount: f64,
    confidence: String,
    reason: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    account_suggestions: Vec<WireAccountSuggestion>,
    double_entry_mapping: WireMapping,
    entity_suggestion: WireEntity,
    document_suggestion: WireDocument,
    additional_notes: String,
}

/// Validates raw oracle text against the response schema, the chart of
/// accounts, and the transaction being classified.
pub fn validate_response(
    raw: &str,
    transaction: &Transaction,
    chart: &ChartOfAccounts,
) -> SuggestionCheck {
    match check(raw, transaction, chart) {
        Ok(suggestion) => SuggestionCheck::Valid(suggestion),
        Err(reason) => SuggestionCheck::Rejected(reason),
    }
}

fn check(
    raw: &str,
    transaction: &Transaction,
    chart: &ChartOfAccounts,
) -> Result<OracleSuggestion, RejectionReason> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|err| RejectionReason::NotJson(err.to_string()))?;
    let object = value.as_object().ok_or(RejectionReason::NotObject)?;
    for key in REQUIRED_KEYS {
        if object.get(key).map_or(true, Value::is_null) {
            return Err(RejectionReason::MissingField(key));
        }
    }
    let wire: WireResponse =
        serde_json::from_value(value).map_err(|err| RejectionReason::Shape(err.to_string()))?;

    if wire.account_suggestions.is_empty() {
        return Err(RejectionReason::NoAccountSuggestions);
    }
    let account_suggestions = wire
        .account_suggestions
        .into_iter()
        .map(|entry| {
            Ok(AccountSuggestion {
                account_type: parse_account_type(&entry.account_type)?,
                confidence: entry.confidence.parse()?,
                account_name: entry.account_name,
                reason: entry.reason,
            })
        })
        .collect::<Result<Vec<_>, RejectionReason>>()?;

    let mapping = wire.double_entry_mapping;
    let debit = check_amount(mapping.debit_amount)?;
    let credit = check_amount(mapping.credit_amount)?;
    if (debit - credit).abs() >= AMOUNT_TOLERANCE {
        return Err(RejectionReason::Unbalanced { debit, credit });
    }
    let expected = transaction.magnitude();
    if (debit - expected.to_f64()).abs() >= AMOUNT_TOLERANCE {
        return Err(RejectionReason::AmountMismatch {
            expected,
            actual: debit,
        });
    }

    let (debit_side, credit_side) = side_types(transaction);
    let debit_account =
        resolve_account(&mapping.debit_account, debit_side, chart, &account_suggestions)?;
    let credit_account =
        resolve_account(&mapping.credit_account, credit_side, chart, &account_suggestions)?;
    if debit_account.same_account(&credit_account) {
        return Err(RejectionReason::SameAccount(debit_account.name));
    }
    let posting = Posting::new(debit_account, credit_account, expected, mapping.explanation)
        .map_err(|err| RejectionReason::Shape(err.to_string()))?;

    let entity = wire.entity_suggestion;
    let entity_suggestion = EntitySuggestion {
        kind: entity.kind.parse()?,
        confidence: entity.confidence.parse()?,
        name: entity.name,
        reason: entity.reason,
    };

    let document = wire.document_suggestion;
    let document_suggestion = DocumentSuggestion {
        kind: document.kind.parse()?,
        amount: Money::from_f64(check_amount(document.amount)?),
        confidence: document.confidence.parse()?,
        service_or_expense: document.service_or_expense,
        reason: document.reason,
    };

    Ok(OracleSuggestion {
        account_suggestions,
        posting,
        entity_suggestion,
        document_suggestion,
        additional_notes: wire.additional_notes,
    })
}

fn parse_account_type(raw: &str) -> Result<AccountType, RejectionReason> {
    raw.parse::<AccountType>()
        .map_err(|_| RejectionReason::UnknownAccountType(raw.to_string()))
}

fn check_amount(amount: f64) -> Result<f64, RejectionReason> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(RejectionReason::InvalidAmount(amount))
    }
}

/// Account types implied by the transaction sign: income debits an asset and
/// credits revenue, an outflow debits an expense and credits an asset.
fn side_types(transaction: &Transaction) -> (AccountType, AccountType) {
    if transaction.is_income() {
        (AccountType::Asset, AccountType::Income)
    } else {
        (AccountType::Expense, AccountType::Asset)
    }
}

/// Resolves a posting account name. With a populated chart the name must be
/// in it and the chart's own spelling and type win. With an empty chart any
/// non-empty name is accepted, typed from the matching account suggestion or
/// else from the side it is posted to.
fn resolve_account(
    name: &str,
    side: AccountType,
    chart: &ChartOfAccounts,
    suggestions: &[AccountSuggestion],
) -> Result<AccountRef, RejectionReason> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RejectionReason::EmptyAccountName);
    }
    if !chart.is_empty() {
        return chart
            .find(trimmed)
            .map(AccountRef::from)
            .ok_or_else(|| RejectionReason::AccountNotInChart(trimmed.to_string()));
    }
    let account_type = suggestions
        .iter()
        .find(|suggestion| suggestion.account_name.trim().eq_ignore_ascii_case(trimmed))
        .map_or(side, |suggestion| suggestion.account_type);
    Ok(AccountRef::new(trimmed, account_type))
}
