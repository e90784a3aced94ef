//! tally-config
//!
//! Persistent user preferences: classifier fallback labels, data locations.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{ClassifierConfig, Config};
