//! Shared trait definitions for searchable entries.
//!
//! Open tabs and recently closed tabs live in different stores with
//! different shapes. Anything that wants to match a query against both
//! (the address bar suggestion list, the `search` command) goes through
//! [`HistoryEntry`] instead of reaching into each concrete type.

use chrono::{DateTime, Utc};

/// Read-only view of a titled, addressable entry.
pub trait HistoryEntry {
    /// Title as shown to the user
    fn title(&self) -> &str;

    fn url(&self) -> &str;

    /// When the entry was recorded; `None` for live entries such as open tabs.
    fn timestamp(&self) -> Option<DateTime<Utc>>;

    /// Case-insensitive substring match on title or URL.
    ///
    /// `needle` must already be lowercase. An empty needle matches everything.
    fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title().to_lowercase().contains(needle)
            || self.url().to_lowercase().contains(needle)
    }
}
