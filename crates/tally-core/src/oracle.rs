//! Contract for the external suggestion generator.

use serde::Serialize;
use thiserror::Error;

use tally_domain::{Account, Customer, Transaction, Vendor};

/// Failure talking to an oracle. Never surfaced by classification; it only
/// selects the deterministic fallback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    #[error("oracle timed out")]
    TimedOut,
}

/// Context handed to an oracle for a single transaction.
#[derive(Debug, Clone, Serialize)]
pub struct OracleRequest<'a> {
    pub transaction: &'a Transaction,
    pub chart_of_accounts_excerpt: &'a [Account],
    pub customers_excerpt: &'a [Customer],
    pub vendors_excerpt: &'a [Vendor],
}

/// A blocking request/response suggestion generator. Implementations return
/// the raw response text; validation happens in [`crate::suggestion`].
pub trait SuggestionOracle {
    fn suggest(&self, request: &OracleRequest<'_>) -> Result<String, OracleError>;
}

/// An oracle that always returns the same response. Useful for replaying a
/// recorded suggestion.
#[derive(Debug, Clone)]
pub struct StaticOracle {
    response: Result<String, OracleError>,
}

impl StaticOracle {
    pub fn responding(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    pub fn failing(error: OracleError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

impl SuggestionOracle for StaticOracle {
    fn suggest(&self, _request: &OracleRequest<'_>) -> Result<String, OracleError> {
        self.response.clone()
    }
}

/// Removes a surrounding Markdown code fence (```` ```json ```` or ```` ``` ````).
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}
