#![doc(test(attr(deny(warnings))))]

//! Tally maps bank transactions onto balanced double-entry postings and keeps
//! the onboarding balance sheet in line with the accounting equation.

pub mod cli;
pub mod errors;
pub mod utils;

pub use errors::TallyError;
pub use tally_config;
pub use tally_core;
pub use tally_domain;
pub use tally_storage_json;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("tally tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_repeatable() {
        super::init();
        super::init();
    }
}
