//! Configuration system for the tabshell browser state core.
//!
//! This crate provides configuration loading, saving, and default values
//! for the workspace/tab model. It includes:
//!
//! - The `Config` struct with the close-tab policy switches
//! - Session persistence tuning (debounce interval, snapshot location)
//! - Recently-closed history limits
//! - Log level selection for the debug log bridge

pub mod config;
pub mod defaults;
pub mod error;
mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::LogLevel;

/// Hard upper bound on the number of recently closed tabs kept in memory.
pub const RECENTLY_CLOSED_LIMIT: usize = 50;
