//! Bounded history of closed tabs for undo-style reopen.
//!
//! Entries are frozen copies of a tab's persisted fields; they never point
//! at live objects. The most recently closed entry sits at index 0.

use crate::events::{ChangeEvent, EventQueue};
use crate::tab::{Tab, TabId};
use crate::tab_group::{GroupId, NO_GROUP};
use crate::workspace::WorkspaceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tabshell_config::RECENTLY_CLOSED_LIMIT;

/// Snapshot of a tab taken when it was closed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyClosedEntry {
    /// Workspace the tab was closed from
    pub workspace_id: WorkspaceId,
    pub url: String,
    #[serde(default)]
    pub initial_url: String,
    #[serde(default)]
    pub page_title: String,
    #[serde(default)]
    pub custom_title: String,
    #[serde(default)]
    pub essential: bool,
    #[serde(default)]
    pub group_id: GroupId,
    #[serde(default)]
    pub favicon_url: String,
    pub closed_at: DateTime<Utc>,
}

impl RecentlyClosedEntry {
    pub fn capture(workspace_id: WorkspaceId, tab: &Tab, closed_at: DateTime<Utc>) -> Self {
        Self {
            workspace_id,
            url: tab.url.clone(),
            initial_url: tab.initial_url.clone(),
            page_title: tab.page_title.clone(),
            custom_title: tab.custom_title.clone(),
            essential: tab.essential,
            group_id: tab.group_id,
            favicon_url: tab.favicon_url.clone(),
            closed_at,
        }
    }

    /// Build a brand-new tab from this entry.
    ///
    /// `keep_group` is false when the original group no longer exists, in
    /// which case the tab comes back ungrouped.
    pub(crate) fn materialize(&self, id: TabId, keep_group: bool) -> Tab {
        let mut tab = Tab::new(id, self.url.as_str());
        if !self.initial_url.is_empty() {
            tab.initial_url = self.initial_url.clone();
        }
        tab.page_title = self.page_title.clone();
        tab.custom_title = self.custom_title.clone();
        tab.essential = self.essential;
        tab.group_id = if keep_group { self.group_id } else { NO_GROUP };
        tab.favicon_url = self.favicon_url.clone();
        tab
    }

    pub fn display_title(&self) -> &str {
        if !self.custom_title.is_empty() {
            &self.custom_title
        } else if !self.page_title.is_empty() {
            &self.page_title
        } else {
            crate::tab::PLACEHOLDER_TITLE
        }
    }
}

/// LIFO stack of closed tabs spanning all workspaces
#[derive(Debug)]
pub struct RecentlyClosedStack {
    entries: VecDeque<RecentlyClosedEntry>,
    capacity: usize,
    events: EventQueue,
}

impl RecentlyClosedStack {
    /// `capacity` is clamped to 1..=50.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, RECENTLY_CLOSED_LIMIT);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            events: EventQueue::new(),
        }
    }

    /// Record a closed tab, evicting the oldest entries beyond capacity.
    pub fn push(&mut self, entry: RecentlyClosedEntry) {
        self.entries.push_front(entry);
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                log::debug!("Evicted oldest closed tab {}", evicted.url);
            }
        }
        self.events.push(ChangeEvent::RecentlyClosedChanged);
    }

    /// Remove and return entry `index` (0 = most recent).
    pub fn take(&mut self, index: usize) -> Option<RecentlyClosedEntry> {
        let entry = self.entries.remove(index)?;
        self.events.push(ChangeEvent::RecentlyClosedChanged);
        Some(entry)
    }

    /// Replace the contents wholesale (session restore); oldest overflow is dropped.
    pub(crate) fn load(&mut self, entries: Vec<RecentlyClosedEntry>) {
        self.entries = entries.into_iter().take(self.capacity).collect();
        self.events.push(ChangeEvent::RecentlyClosedChanged);
    }

    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.clear();
        self.events.push(ChangeEvent::RecentlyClosedChanged);
    }

    pub fn get(&self, index: usize) -> Option<&RecentlyClosedEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RecentlyClosedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn drain_events_into(&mut self, out: &mut Vec<ChangeEvent>) {
        self.events.drain_into(out);
    }
}

impl Default for RecentlyClosedStack {
    fn default() -> Self {
        Self::new(RECENTLY_CLOSED_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str) -> RecentlyClosedEntry {
        RecentlyClosedEntry::capture(1, &Tab::new(1, url), Utc::now())
    }

    #[test]
    fn test_push_is_lifo() {
        let mut stack = RecentlyClosedStack::default();
        stack.push(entry("https://a"));
        stack.push(entry("https://b"));
        assert_eq!(stack.get(0).unwrap().url, "https://b");
        assert_eq!(stack.take(0).unwrap().url, "https://b");
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut stack = RecentlyClosedStack::new(500);
        assert_eq!(stack.capacity(), RECENTLY_CLOSED_LIMIT);
        for i in 0..60 {
            stack.push(entry(&format!("https://site/{i}")));
        }
        assert_eq!(stack.len(), 50);
        assert_eq!(stack.get(0).unwrap().url, "https://site/59");
        assert_eq!(stack.get(49).unwrap().url, "https://site/10");
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let mut stack = RecentlyClosedStack::new(0);
        stack.push(entry("https://a"));
        stack.push(entry("https://b"));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_take_out_of_range() {
        let mut stack = RecentlyClosedStack::default();
        assert!(stack.take(0).is_none());
        let mut events = Vec::new();
        stack.drain_events_into(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_materialize_drops_missing_group() {
        let mut tab = Tab::new(3, "https://x");
        tab.group_id = 4;
        tab.custom_title = "Mine".to_string();
        let entry = RecentlyClosedEntry::capture(1, &tab, Utc::now());

        let kept = entry.materialize(77, true);
        assert_eq!((kept.id(), kept.group_id()), (77, 4));
        assert_eq!(kept.custom_title(), "Mine");

        let dropped = entry.materialize(78, false);
        assert_eq!(dropped.group_id(), NO_GROUP);
    }
}
