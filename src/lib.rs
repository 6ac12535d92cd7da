// Library exports for the browser shell state core
//
// The model is single-threaded: every command runs to completion before the
// next one is accepted, so nothing here takes a lock except the debug log
// file (`parking_lot::Mutex`) and the process-wide id counters (atomics).

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod browser;
pub mod cli;
pub mod events;
pub mod ids;
pub mod pane;
pub mod recently_closed;
pub mod session;
pub mod state;
pub mod tab;
pub mod tab_group;
pub mod traits;
mod traits_impl;
pub mod workspace;

pub use browser::{Browser, CloseOutcome, NavigateCommand, SearchResult, SearchSource};
pub use state::ShellState;
pub use tabshell_config::Config;
