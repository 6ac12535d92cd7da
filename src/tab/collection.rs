//! Ordered tab list for a single workspace.
//!
//! Active selection is tracked by position, but every operation that changes
//! positions re-derives it from the active tab's id so identity survives
//! inserts, moves and removals.

use super::{Tab, TabId};
use crate::events::{ChangeEvent, EventQueue, TabField};
use crate::ids::TAB_IDS;
use crate::tab_group::GroupId;
use crate::workspace::WorkspaceId;

/// Manages the tabs of one workspace
#[derive(Debug)]
pub struct TabCollection {
    workspace: WorkspaceId,
    /// All tabs in this workspace, in display order
    tabs: Vec<Tab>,
    /// Index of the active tab; `None` iff `tabs` is empty
    active_index: Option<usize>,
    events: EventQueue,
}

impl TabCollection {
    /// Create a new empty collection owned by `workspace`
    pub fn new(workspace: WorkspaceId) -> Self {
        Self {
            workspace,
            tabs: Vec::new(),
            active_index: None,
            events: EventQueue::new(),
        }
    }

    /// Append a tab with a fresh id and make it active. Returns its index.
    pub fn add_tab(&mut self, url: &str) -> usize {
        let tab = Tab::new(TAB_IDS.allocate(), url);
        log::debug!(
            "Created tab {} in workspace {} (total: {})",
            tab.id,
            self.workspace,
            self.tabs.len() + 1
        );
        self.push(tab, true)
    }

    /// Append a tab with a fresh id without stealing focus.
    ///
    /// The tab only becomes active if the collection was empty.
    pub fn add_background_tab(&mut self, url: &str) -> usize {
        let tab = Tab::new(TAB_IDS.allocate(), url);
        self.push(tab, false)
    }

    /// Append a tab with a caller-chosen id (session restore).
    ///
    /// Returns `None` for id 0 or an id already present.
    pub fn add_tab_with_id(
        &mut self,
        id: TabId,
        url: &str,
        title: &str,
        make_active: bool,
    ) -> Option<usize> {
        if id == super::NO_TAB || self.contains(id) {
            log::debug!(
                "Ignoring add_tab_with_id({}) in workspace {}: id unusable",
                id,
                self.workspace
            );
            return None;
        }
        TAB_IDS.observe(id);
        let mut tab = Tab::new(id, url);
        tab.page_title = title.to_string();
        Some(self.push(tab, make_active))
    }

    /// Append a prepared tab (restore of a closed tab). Returns its index.
    pub(crate) fn push_tab(&mut self, tab: Tab, make_active: bool) -> Option<usize> {
        if tab.id == super::NO_TAB || self.contains(tab.id) {
            return None;
        }
        TAB_IDS.observe(tab.id);
        Some(self.push(tab, make_active))
    }

    fn push(&mut self, tab: Tab, make_active: bool) -> usize {
        self.tabs.push(tab);
        let index = self.tabs.len() - 1;
        self.events.push(ChangeEvent::TabsChanged {
            workspace: self.workspace,
        });
        if make_active || self.active_index.is_none() {
            self.set_active(Some(index));
        }
        index
    }

    /// Remove the tab at `index`, returning it. Out-of-range is a no-op.
    pub fn close_tab(&mut self, index: usize) -> Option<Tab> {
        if index >= self.tabs.len() {
            log::debug!(
                "Ignoring close_tab({}) in workspace {}: only {} tabs",
                index,
                self.workspace,
                self.tabs.len()
            );
            return None;
        }

        let previous_active = self.active_tab_id();
        let tab = self.tabs.remove(index);

        self.active_index = match self.active_index {
            _ if self.tabs.is_empty() => None,
            // Prefer the tab now at the same index (or the new last one)
            Some(active) if active == index => Some(index.min(self.tabs.len() - 1)),
            Some(active) if index < active => Some(active - 1),
            other => other,
        };

        log::debug!(
            "Closed tab {} (index {}) in workspace {}",
            tab.id,
            index,
            self.workspace
        );
        self.events.push(ChangeEvent::RowsRemoved {
            workspace: self.workspace,
            range: index..index + 1,
        });
        let active = self.active_tab_id();
        if active != previous_active {
            self.events.push(ChangeEvent::ActiveTabChanged {
                workspace: self.workspace,
                tab: active,
            });
        }
        Some(tab)
    }

    /// Move a tab to a new position.
    ///
    /// Returns true if the order actually changed; an out-of-range index is a no-op.
    pub fn move_tab(&mut self, from: usize, to: usize) -> bool {
        if from >= self.tabs.len() || to >= self.tabs.len() || from == to {
            return false;
        }

        let active_id = self.active_tab_id();
        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);
        self.active_index = active_id.and_then(|id| self.index_of(id));

        log::debug!(
            "Moved tab from index {} to {} in workspace {}",
            from,
            to,
            self.workspace
        );
        self.events.push(ChangeEvent::TabsChanged {
            workspace: self.workspace,
        });
        true
    }

    /// Activate the tab at `index`. Returns false if invalid or already active.
    pub fn set_active_index(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() || self.active_index == Some(index) {
            return false;
        }
        self.set_active(Some(index));
        true
    }

    /// Activate the tab with `id`. Returns false if unknown or already active.
    pub fn set_active_tab_id(&mut self, id: TabId) -> bool {
        match self.index_of(id) {
            Some(index) => self.set_active_index(index),
            None => false,
        }
    }

    fn set_active(&mut self, index: Option<usize>) {
        self.active_index = index;
        self.events.push(ChangeEvent::ActiveTabChanged {
            workspace: self.workspace,
            tab: self.active_tab_id(),
        });
    }

    /// Replace the whole list (session restore).
    ///
    /// `active` falls back to the first tab if it does not name one of `tabs`.
    pub fn reset(&mut self, tabs: Vec<Tab>, active: Option<TabId>) {
        for tab in &tabs {
            TAB_IDS.observe(tab.id);
        }
        self.tabs = tabs;
        self.active_index = active
            .and_then(|id| self.index_of(id))
            .or(if self.tabs.is_empty() { None } else { Some(0) });
        self.events.push(ChangeEvent::TabsReset {
            workspace: self.workspace,
        });
        self.events.push(ChangeEvent::ActiveTabChanged {
            workspace: self.workspace,
            tab: self.active_tab_id(),
        });
    }

    // ========================================================================
    // Field setters (no-op when the value is unchanged)
    // ========================================================================

    fn update<T: PartialEq>(
        &mut self,
        index: usize,
        field: TabField,
        value: T,
        slot: impl FnOnce(&mut Tab) -> &mut T,
    ) -> bool {
        let Some(tab) = self.tabs.get_mut(index) else {
            return false;
        };
        let tab_id = tab.id;
        let target = slot(tab);
        if *target == value {
            return false;
        }
        *target = value;
        self.events.push(ChangeEvent::TabUpdated {
            workspace: self.workspace,
            tab: tab_id,
            field,
        });
        true
    }

    pub fn set_url(&mut self, index: usize, url: &str) -> bool {
        self.update(index, TabField::Url, url.to_string(), |t| &mut t.url)
    }

    pub fn set_initial_url(&mut self, index: usize, url: &str) -> bool {
        self.update(index, TabField::InitialUrl, url.to_string(), |t| {
            &mut t.initial_url
        })
    }

    pub fn set_title(&mut self, index: usize, title: &str) -> bool {
        self.update(index, TabField::PageTitle, title.to_string(), |t| {
            &mut t.page_title
        })
    }

    pub fn set_custom_title(&mut self, index: usize, title: &str) -> bool {
        self.update(index, TabField::CustomTitle, title.trim().to_string(), |t| {
            &mut t.custom_title
        })
    }

    pub fn set_essential(&mut self, index: usize, essential: bool) -> bool {
        self.update(index, TabField::Essential, essential, |t| &mut t.essential)
    }

    /// Set the owning group. The caller guarantees `group_id` exists.
    pub fn set_group_id(&mut self, index: usize, group_id: GroupId) -> bool {
        self.update(index, TabField::Group, group_id, |t| &mut t.group_id)
    }

    pub fn set_loading(&mut self, index: usize, loading: bool) -> bool {
        self.update(index, TabField::Loading, loading, |t| &mut t.is_loading)
    }

    pub fn set_audio_playing(&mut self, index: usize, playing: bool) -> bool {
        self.update(index, TabField::AudioPlaying, playing, |t| {
            &mut t.is_audio_playing
        })
    }

    pub fn set_muted(&mut self, index: usize, muted: bool) -> bool {
        self.update(index, TabField::Muted, muted, |t| &mut t.is_muted)
    }

    pub fn set_favicon(&mut self, index: usize, favicon_url: &str) -> bool {
        self.update(index, TabField::Favicon, favicon_url.to_string(), |t| {
            &mut t.favicon_url
        })
    }

    pub fn set_thumbnail(&mut self, index: usize, path: &str) -> bool {
        self.update(index, TabField::Thumbnail, path.to_string(), |t| {
            &mut t.thumbnail_path
        })
    }

    /// Point the tab back at its initial URL and clear the page title.
    pub fn reset_to_initial_url(&mut self, index: usize) -> bool {
        let Some(initial) = self.tabs.get(index).map(|t| t.initial_url.clone()) else {
            return false;
        };
        let url_changed = self.set_url(index, &initial);
        let title_changed = self.set_title(index, "");
        url_changed || title_changed
    }

    /// Clear `group_id` on every tab that references it. Returns the count.
    pub fn ungroup_all(&mut self, group_id: GroupId) -> usize {
        let indices: Vec<usize> = self
            .tabs
            .iter()
            .enumerate()
            .filter(|(_, t)| t.group_id == group_id)
            .map(|(i, _)| i)
            .collect();
        for &index in &indices {
            self.set_group_id(index, crate::tab_group::NO_GROUP);
        }
        indices.len()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn workspace_id(&self) -> WorkspaceId {
        self.workspace
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn get(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index)
    }

    pub fn get_by_id(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: TabId) -> bool {
        id != super::NO_TAB && self.tabs.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_index.and_then(|i| self.tabs.get(i))
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab().map(|t| t.id)
    }

    pub fn ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id).collect()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn take_events(&mut self) -> Vec<ChangeEvent> {
        self.events.take()
    }

    pub(crate) fn drain_events_into(&mut self, out: &mut Vec<ChangeEvent>) {
        self.events.drain_into(out);
    }
}
