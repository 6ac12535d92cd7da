//! [`HistoryEntry`] implementations for the concrete entry types.

use crate::recently_closed::RecentlyClosedEntry;
use crate::tab::Tab;
use crate::traits::HistoryEntry;
use chrono::{DateTime, Utc};

impl HistoryEntry for Tab {
    fn title(&self) -> &str {
        self.display_title()
    }

    fn url(&self) -> &str {
        Tab::url(self)
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        None
    }
}

impl HistoryEntry for RecentlyClosedEntry {
    fn title(&self) -> &str {
        self.display_title()
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.closed_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_matches_title_or_url() {
        let mut tab = Tab::new(1, "https://Docs.rs/serde");
        tab.page_title = "Serde Docs".to_string();
        assert!(tab.matches("serde docs"));
        assert!(tab.matches("docs.rs"));
        assert!(!tab.matches("tokio"));
        assert!(tab.matches(""));
        assert!(HistoryEntry::timestamp(&tab).is_none());
    }

    #[test]
    fn test_closed_entry_carries_timestamp() {
        let closed_at = Utc::now();
        let entry = RecentlyClosedEntry::capture(1, &Tab::new(2, "https://a"), closed_at);
        assert_eq!(entry.timestamp(), Some(closed_at));
        assert_eq!(HistoryEntry::title(&entry), crate::tab::PLACEHOLDER_TITLE);
    }
}
