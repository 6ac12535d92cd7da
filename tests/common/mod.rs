//! Shared integration test helpers for tabshell.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::TestContext;
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers are used per file.

#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tabshell::{Browser, Config};
use tempfile::TempDir;

/// Provides test isolation with automatic resource cleanup.
///
/// Wraps a `TempDir` and a `Config` whose session file lives inside it, so
/// no test ever touches the real `~/.config/tabshell`.
pub struct TestContext {
    /// Temporary directory, kept alive for the lifetime of the context.
    pub dir: TempDir,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = Config {
            session_file: Some(dir.path().join("session.json")),
            ..Config::default()
        };
        Self { dir, config }
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    /// Write raw snapshot text where the browser will look for it.
    pub fn write_session(&self, contents: &str) {
        fs::write(self.session_path(), contents).expect("Failed to write session file");
    }

    pub fn read_session(&self) -> serde_json::Value {
        let text = fs::read_to_string(self.session_path()).expect("Failed to read session file");
        serde_json::from_str(&text).expect("Session file is not JSON")
    }

    /// A browser that has completed startup against this context's session file.
    pub fn browser(&self) -> Browser {
        let mut browser = Browser::new(self.config.clone());
        browser
            .startup(Instant::now())
            .expect("Startup restore failed");
        browser
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Ids of the active workspace's tabs, in order
pub fn active_tab_ids(browser: &Browser) -> Vec<u64> {
    browser
        .active_workspace()
        .map(|ws| ws.tabs.ids())
        .unwrap_or_default()
}

/// Every pane names a live tab of the active workspace and no id repeats.
pub fn assert_panes_valid(browser: &Browser) {
    let split = browser.split_view();
    if !split.is_enabled() {
        return;
    }
    let tabs = &browser
        .active_workspace()
        .expect("split view without an active workspace")
        .tabs;
    let mut seen = HashSet::new();
    for &id in split.pane_tab_ids() {
        assert!(tabs.contains(id), "pane references missing tab {id}");
        assert!(seen.insert(id), "tab {id} is bound to two panes");
    }
}
