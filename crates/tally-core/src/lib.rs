//! tally-core
//!
//! Classification and reconciliation logic for Tally.
//! Depends on tally-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod chart_service;
pub mod classifier_service;
pub mod depreciation_service;
pub mod entity_service;
pub mod error;
mod generated;
pub mod oracle;
pub mod reconciliation_service;
pub mod suggestion;

pub use chart_service::*;
pub use classifier_service::*;
pub use depreciation_service::*;
pub use entity_service::*;
pub use error::CoreError;
pub use oracle::*;
pub use reconciliation_service::*;
pub use suggestion::*;
