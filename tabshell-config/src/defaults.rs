//! Default value functions for configuration.
//!
//! Each function backs a `#[serde(default = "crate::defaults::...")]`
//! attribute on a `Config` field.

pub fn essential_close_resets() -> bool {
    true
}

pub fn close_tab_on_back_no_history() -> bool {
    true
}

/// Quiet period before a burst of mutations is flushed to the session file.
pub fn session_save_debounce_ms() -> u64 {
    250
}

pub fn recently_closed_max_entries() -> usize {
    crate::RECENTLY_CLOSED_LIMIT
}

pub fn restore_session_on_startup() -> bool {
    true
}

pub fn new_tab_url() -> String {
    "about:blank".to_string()
}
