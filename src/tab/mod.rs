//! Tab model for workspaces
//!
//! This module provides the core tab infrastructure including:
//! - `Tab`: A single page slot with its URL, titles and renderer-reported state
//! - `TabCollection`: The ordered tab list owned by one workspace
//! - `TabId`: Unique identifier for each tab

mod collection;

pub use collection::TabCollection;

use crate::tab_group::{GroupId, NO_GROUP};

/// Unique tab identifier, never reused within a process. 0 means "no tab".
pub type TabId = u64;

/// Pane slots and snapshots use 0 for "no tab".
pub const NO_TAB: TabId = 0;

/// Title shown when neither the user nor the page supplied one.
pub const PLACEHOLDER_TITLE: &str = "New Tab";

/// A single browser tab.
///
/// Fields are read through accessors; mutation goes through the owning
/// [`TabCollection`] so every change fires a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub(crate) id: TabId,
    pub(crate) url: String,
    /// Captured once at creation; essential tabs reset to it
    pub(crate) initial_url: String,
    pub(crate) page_title: String,
    pub(crate) custom_title: String,
    pub(crate) essential: bool,
    pub(crate) group_id: GroupId,
    pub(crate) is_loading: bool,
    pub(crate) is_audio_playing: bool,
    pub(crate) is_muted: bool,
    pub(crate) favicon_url: String,
    pub(crate) thumbnail_path: String,
}

impl Tab {
    pub(crate) fn new(id: TabId, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id,
            initial_url: url.clone(),
            url,
            page_title: String::new(),
            custom_title: String::new(),
            essential: false,
            group_id: NO_GROUP,
            is_loading: false,
            is_audio_playing: false,
            is_muted: false,
            favicon_url: String::new(),
            thumbnail_path: String::new(),
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn initial_url(&self) -> &str {
        &self.initial_url
    }

    pub fn page_title(&self) -> &str {
        &self.page_title
    }

    pub fn custom_title(&self) -> &str {
        &self.custom_title
    }

    /// Custom title if set, else the page title, else a placeholder.
    pub fn display_title(&self) -> &str {
        if !self.custom_title.is_empty() {
            &self.custom_title
        } else if !self.page_title.is_empty() {
            &self.page_title
        } else {
            PLACEHOLDER_TITLE
        }
    }

    pub fn is_essential(&self) -> bool {
        self.essential
    }

    /// Owning group, `NO_GROUP` when ungrouped
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn is_grouped(&self) -> bool {
        self.group_id != NO_GROUP
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_audio_playing(&self) -> bool {
        self.is_audio_playing
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn favicon_url(&self) -> &str {
        &self.favicon_url
    }

    pub fn thumbnail_path(&self) -> &str {
        &self.thumbnail_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tab_captures_initial_url() {
        let tab = Tab::new(7, "https://example.org");
        assert_eq!(tab.id(), 7);
        assert_eq!(tab.url(), "https://example.org");
        assert_eq!(tab.initial_url(), "https://example.org");
        assert!(!tab.is_grouped());
    }

    #[test]
    fn test_display_title_precedence() {
        let mut tab = Tab::new(1, "about:blank");
        assert_eq!(tab.display_title(), PLACEHOLDER_TITLE);

        tab.page_title = "Example Domain".to_string();
        assert_eq!(tab.display_title(), "Example Domain");

        tab.custom_title = "Docs".to_string();
        assert_eq!(tab.display_title(), "Docs");

        tab.page_title.clear();
        assert_eq!(tab.display_title(), "Docs");
    }
}
