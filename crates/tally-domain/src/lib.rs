//! tally-domain
//!
//! Pure bookkeeping models (Money, Account, ChartOfAccounts, Transaction, Posting,
//! FinancialSnapshot, customers and vendors). No I/O, no CLI, no storage.

pub mod account;
pub mod chart;
pub mod common;
pub mod entity;
pub mod money;
pub mod posting;
pub mod snapshot;
pub mod transaction;

pub use account::*;
pub use chart::*;
pub use common::*;
pub use entity::*;
pub use money::*;
pub use posting::*;
pub use snapshot::*;
pub use transaction::*;
