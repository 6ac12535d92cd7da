//! Command surface over the state graph.
//!
//! Every command mutates the collections, then drains their change events
//! and dispatches each one to the split view (pane repair), the session
//! persistence layer (debounced save) and external subscribers, repeating
//! until no new events appear. Invalid indices and unknown ids are no-ops.

use crate::events::{ChangeEvent, EventBus, SubscriptionId};
use crate::ids::TAB_IDS;
use crate::pane::SplitPaneController;
use crate::recently_closed::{RecentlyClosedEntry, RecentlyClosedStack};
use crate::session::{RestoreOutcome, SessionError, SessionPersistence};
use crate::state::ShellState;
use crate::tab::{TabCollection, TabId};
use crate::tab_group::{GroupId, NO_GROUP};
use crate::traits::HistoryEntry;
use crate::workspace::{Workspace, WorkspaceContainer, WorkspaceId};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Instant;
use tabshell_config::Config;

/// Outbound request for the page renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateCommand {
    pub workspace: WorkspaceId,
    pub tab: TabId,
    pub url: String,
}

/// What a close request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Tab removed and recorded in the recently-closed stack
    Removed,
    /// Essential tab kept and pointed back at its initial URL
    Reset,
    /// Nothing matched
    Ignored,
}

/// Where a search hit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    OpenTab { workspace: WorkspaceId, tab: TabId },
    /// Index into the recently-closed stack
    RecentlyClosed { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub source: SearchSource,
}

impl SearchResult {
    fn from_entry(entry: &dyn HistoryEntry, source: SearchSource) -> Self {
        Self {
            title: entry.title().to_string(),
            url: entry.url().to_string(),
            timestamp: entry.timestamp(),
            source,
        }
    }
}

pub struct Browser {
    state: ShellState,
    config: Config,
    persistence: SessionPersistence,
    bus: EventBus,
    navigation: Vec<NavigateCommand>,
    /// Message from the last failed startup restore
    restore_error: Option<String>,
}

impl Browser {
    /// Browser persisting to the session path from `config`
    pub fn new(config: Config) -> Self {
        let path = config.session_path();
        Self::with_session_path(config, path)
    }

    pub fn with_session_path(config: Config, session_path: impl AsRef<Path>) -> Self {
        let persistence =
            SessionPersistence::new(session_path, config.session_save_debounce());
        Self {
            state: ShellState::new(&config),
            config,
            persistence,
            bus: EventBus::new(),
            navigation: Vec::new(),
            restore_error: None,
        }
    }

    /// Restore the previous session, then make sure there is something to show.
    ///
    /// A restore error is returned (and kept in `restore_error`) but startup
    /// still completes with a default workspace. Nothing is saved until the
    /// next user mutation, so an unreadable file is never overwritten here.
    pub fn startup(&mut self, now: Instant) -> Result<RestoreOutcome, SessionError> {
        let result = if self.config.restore_session_on_startup {
            self.persistence.restore(&mut self.state)
        } else {
            Ok(RestoreOutcome::NoSnapshot)
        };
        if let Err(e) = &result {
            log::error!("Session restore failed: {}", e);
            self.restore_error = Some(e.to_string());
        }

        self.state.workspaces.ensure_initialized();
        if let Some(workspace) = self.state.workspaces.active_mut()
            && workspace.tabs.is_empty()
        {
            workspace.tabs.add_tab(&self.config.new_tab_url);
        }

        self.dispatch_at(now);
        self.persistence.finish_restore(now);
        crate::debug_info!(
            "STARTUP",
            "{} workspaces, {} tabs, split view {}",
            self.state.workspaces.len(),
            self.state.workspaces.total_tab_count(),
            if self.state.split_view.is_enabled() { "on" } else { "off" }
        );
        if matches!(result, Ok(RestoreOutcome::Restored { .. })) {
            self.bus.publish(&ChangeEvent::SessionRestored);
        }
        result
    }

    // ========================================================================
    // Event plumbing
    // ========================================================================

    pub fn subscribe(&mut self, callback: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    fn dispatch(&mut self) {
        self.dispatch_at(Instant::now());
    }

    fn dispatch_at(&mut self, now: Instant) {
        loop {
            let events = self.state.drain_events();
            if events.is_empty() {
                break;
            }
            for event in &events {
                crate::debug_trace!("EVENT", "{:?}", event);
                self.state
                    .split_view
                    .handle_change(event, &mut self.state.workspaces);
                self.persistence.handle_change(event, now);
                self.bus.publish(event);
            }
        }
    }

    /// Run `apply` against the active workspace and dispatch the fallout.
    fn with_active<R>(&mut self, apply: impl FnOnce(&mut Workspace) -> R) -> Option<R> {
        let result = self.state.workspaces.active_mut().map(apply);
        self.dispatch();
        result
    }

    /// Run `apply` against the collection owning `tab` and its index there.
    fn with_tab(
        &mut self,
        tab: TabId,
        apply: impl FnOnce(&mut TabCollection, usize) -> bool,
    ) -> bool {
        let Some(workspace_id) = self.state.workspaces.workspace_of_tab(tab) else {
            log::debug!("Ignoring update for unknown tab {}", tab);
            return false;
        };
        let changed = match self.state.workspaces.get_by_id_mut(workspace_id) {
            Some(workspace) => match workspace.tabs.index_of(tab) {
                Some(index) => apply(&mut workspace.tabs, index),
                None => false,
            },
            None => false,
        };
        self.dispatch();
        changed
    }

    // ========================================================================
    // Tabs
    // ========================================================================

    /// Open `url` in a new active tab of the active workspace.
    pub fn add_tab(&mut self, url: &str) -> Option<TabId> {
        let opened = self.with_active(|workspace| {
            let index = workspace.tabs.add_tab(url);
            (workspace.id(), workspace.tabs.tabs()[index].id())
        });
        let (workspace, tab) = opened?;
        self.navigation.push(NavigateCommand {
            workspace,
            tab,
            url: url.to_string(),
        });
        Some(tab)
    }

    /// Close the tab at `index` in the active workspace.
    pub fn close_tab(&mut self, index: usize) -> CloseOutcome {
        match self.state.workspaces.active_index() {
            Some(workspace) => self.close_tab_at(workspace, index),
            None => CloseOutcome::Ignored,
        }
    }

    /// Close a tab in whichever workspace owns it.
    pub fn close_tab_by_id(&mut self, tab: TabId) -> CloseOutcome {
        let located = self
            .state
            .workspaces
            .workspace_of_tab(tab)
            .and_then(|id| self.state.workspaces.index_of(id))
            .and_then(|ws| {
                let index = self.state.workspaces.get(ws)?.tabs.index_of(tab)?;
                Some((ws, index))
            });
        match located {
            Some((workspace, index)) => self.close_tab_at(workspace, index),
            None => {
                log::debug!("Ignoring close of unknown tab {}", tab);
                CloseOutcome::Ignored
            }
        }
    }

    fn close_tab_at(&mut self, workspace_index: usize, index: usize) -> CloseOutcome {
        let essential_resets = self.config.essential_close_resets;
        let Some(workspace) = self.state.workspaces.get_mut(workspace_index) else {
            return CloseOutcome::Ignored;
        };
        let workspace_id = workspace.id();
        let Some(tab) = workspace.tabs.get(index) else {
            log::debug!(
                "Ignoring close_tab({}) in workspace {}: no such tab",
                index,
                workspace_id
            );
            return CloseOutcome::Ignored;
        };

        let outcome = if tab.is_essential() && essential_resets {
            let tab_id = tab.id();
            let url = tab.initial_url().to_string();
            workspace.tabs.reset_to_initial_url(index);
            workspace.tabs.set_active_index(index);
            log::info!("Essential tab {} reset to {}", tab_id, url);
            self.navigation.push(NavigateCommand {
                workspace: workspace_id,
                tab: tab_id,
                url,
            });
            CloseOutcome::Reset
        } else {
            match workspace.tabs.close_tab(index) {
                Some(tab) => {
                    self.state.recently_closed.push(RecentlyClosedEntry::capture(
                        workspace_id,
                        &tab,
                        Utc::now(),
                    ));
                    CloseOutcome::Removed
                }
                None => CloseOutcome::Ignored,
            }
        };
        self.dispatch();
        outcome
    }

    pub fn move_tab(&mut self, from: usize, to: usize) -> bool {
        self.with_active(|workspace| workspace.tabs.move_tab(from, to))
            .unwrap_or(false)
    }

    /// Activate the tab at `index` in the active workspace.
    pub fn set_active_tab(&mut self, index: usize) -> bool {
        self.with_active(|workspace| workspace.tabs.set_active_index(index))
            .unwrap_or(false)
    }

    /// Activate a tab anywhere, switching workspace if needed.
    pub fn activate_tab(&mut self, tab: TabId) -> bool {
        let Some(workspace_id) = self.state.workspaces.workspace_of_tab(tab) else {
            return false;
        };
        let switched = self.state.workspaces.set_active_id(workspace_id);
        let activated = self
            .state
            .workspaces
            .get_by_id_mut(workspace_id)
            .is_some_and(|workspace| workspace.tabs.set_active_tab_id(tab));
        self.dispatch();
        switched || activated
    }

    // ========================================================================
    // Renderer and user tab updates, keyed by id
    // ========================================================================

    pub fn set_tab_url(&mut self, tab: TabId, url: &str) -> bool {
        self.with_tab(tab, |tabs, index| tabs.set_url(index, url))
    }

    pub fn set_tab_title(&mut self, tab: TabId, title: &str) -> bool {
        self.with_tab(tab, |tabs, index| tabs.set_title(index, title))
    }

    pub fn set_tab_loading(&mut self, tab: TabId, loading: bool) -> bool {
        self.with_tab(tab, |tabs, index| tabs.set_loading(index, loading))
    }

    pub fn set_tab_audio_playing(&mut self, tab: TabId, playing: bool) -> bool {
        self.with_tab(tab, |tabs, index| tabs.set_audio_playing(index, playing))
    }

    pub fn set_tab_muted(&mut self, tab: TabId, muted: bool) -> bool {
        self.with_tab(tab, |tabs, index| tabs.set_muted(index, muted))
    }

    pub fn set_tab_favicon(&mut self, tab: TabId, favicon_url: &str) -> bool {
        self.with_tab(tab, |tabs, index| tabs.set_favicon(index, favicon_url))
    }

    pub fn set_tab_thumbnail(&mut self, tab: TabId, path: &str) -> bool {
        self.with_tab(tab, |tabs, index| tabs.set_thumbnail(index, path))
    }

    pub fn set_tab_custom_title(&mut self, tab: TabId, title: &str) -> bool {
        self.with_tab(tab, |tabs, index| tabs.set_custom_title(index, title))
    }

    pub fn set_tab_essential(&mut self, tab: TabId, essential: bool) -> bool {
        self.with_tab(tab, |tabs, index| tabs.set_essential(index, essential))
    }

    /// Ask the renderer to load `url` in `tab`.
    pub fn navigate(&mut self, tab: TabId, url: &str) -> bool {
        let Some(workspace) = self.state.workspaces.workspace_of_tab(tab) else {
            log::debug!("Ignoring navigate for unknown tab {}", tab);
            return false;
        };
        self.navigation.push(NavigateCommand {
            workspace,
            tab,
            url: url.to_string(),
        });
        true
    }

    /// Drain queued renderer commands, oldest first.
    pub fn take_navigation_requests(&mut self) -> Vec<NavigateCommand> {
        std::mem::take(&mut self.navigation)
    }

    /// Whether "back" on a tab with no history should close it.
    pub fn handle_back_requested(&self, tab: TabId, can_go_back: bool) -> bool {
        if can_go_back || !self.config.close_tab_on_back_no_history {
            return false;
        }
        let Some(workspace) = self
            .state
            .workspaces
            .workspace_of_tab(tab)
            .and_then(|id| self.state.workspaces.get_by_id(id))
        else {
            return false;
        };
        workspace.tabs.len() > 1
            && workspace
                .tabs
                .get_by_id(tab)
                .is_some_and(|t| !t.is_essential())
    }

    // ========================================================================
    // Recently closed
    // ========================================================================

    /// Reopen closed entry `index` (0 = most recent).
    ///
    /// The tab goes back to its original workspace, or the active one if that
    /// workspace is gone. Its group survives only when the tab goes back to its
    /// own workspace and that group still exists.
    /// The target workspace and the new tab both become active.
    pub fn restore_closed_tab(&mut self, index: usize) -> Option<TabId> {
        let original = self.state.recently_closed.get(index)?.workspace_id;
        let home = self.state.workspaces.index_of(original);
        let target = home.or(self.state.workspaces.active_index())?;
        let entry = self.state.recently_closed.take(index)?;

        let workspace = self.state.workspaces.get_mut(target)?;
        // Group ids are per workspace; a fallback workspace's group is unrelated
        let keep_group = home == Some(target) && workspace.groups.contains(entry.group_id);
        let tab = entry.materialize(TAB_IDS.allocate(), keep_group);
        let tab_id = tab.id();
        let workspace_id = workspace.id();
        workspace.tabs.push_tab(tab, true);
        self.state.workspaces.set_active_index(target);

        log::info!(
            "Restored closed tab {} ({}) into workspace {}",
            tab_id,
            entry.url,
            workspace_id
        );
        self.navigation.push(NavigateCommand {
            workspace: workspace_id,
            tab: tab_id,
            url: entry.url,
        });
        self.dispatch();
        Some(tab_id)
    }

    pub fn restore_last_closed_tab(&mut self) -> Option<TabId> {
        self.restore_closed_tab(0)
    }

    pub fn clear_recently_closed(&mut self) {
        self.state.recently_closed.clear();
        self.dispatch();
    }

    // ========================================================================
    // Workspaces
    // ========================================================================

    pub fn add_workspace(&mut self, name: &str) -> WorkspaceId {
        let index = self.state.workspaces.add_workspace(name);
        let id = self
            .state
            .workspaces
            .get(index)
            .map_or(0, |workspace| workspace.id());
        self.dispatch();
        id
    }

    /// Close a workspace and its tabs. Refused for the last one.
    pub fn close_workspace(&mut self, index: usize) -> bool {
        let closed = self.state.workspaces.close_workspace(index).is_some();
        self.dispatch();
        closed
    }

    pub fn move_workspace(&mut self, from: usize, to: usize) -> bool {
        let moved = self.state.workspaces.move_workspace(from, to);
        self.dispatch();
        moved
    }

    pub fn set_active_workspace(&mut self, index: usize) -> bool {
        let changed = self.state.workspaces.set_active_index(index);
        self.dispatch();
        changed
    }

    pub fn rename_workspace(&mut self, index: usize, name: &str) -> bool {
        let changed = self.state.workspaces.set_name(index, name);
        self.dispatch();
        changed
    }

    pub fn set_workspace_accent_color(&mut self, index: usize, color: &str) -> bool {
        let changed = self.state.workspaces.set_accent_color(index, color);
        self.dispatch();
        changed
    }

    pub fn set_sidebar_width(&mut self, index: usize, width: f64) -> bool {
        let changed = self.state.workspaces.set_sidebar_width(index, width);
        self.dispatch();
        changed
    }

    pub fn set_sidebar_expanded(&mut self, index: usize, expanded: bool) -> bool {
        let changed = self.state.workspaces.set_sidebar_expanded(index, expanded);
        self.dispatch();
        changed
    }

    // ========================================================================
    // Groups (active workspace)
    // ========================================================================

    pub fn add_group(&mut self, name: &str) -> Option<GroupId> {
        self.with_active(|workspace| workspace.groups.add_group(name))
    }

    /// Delete a group and ungroup every tab that referenced it.
    pub fn remove_group(&mut self, index: usize) -> bool {
        self.with_active(|workspace| match workspace.groups.remove_group(index) {
            Some(group) => {
                let ungrouped = workspace.tabs.ungroup_all(group.id());
                log::debug!("Removed group {}, ungrouped {} tabs", group.id(), ungrouped);
                true
            }
            None => false,
        })
        .unwrap_or(false)
    }

    pub fn rename_group(&mut self, index: usize, name: &str) -> bool {
        self.with_active(|workspace| workspace.groups.set_name(index, name))
            .unwrap_or(false)
    }

    pub fn set_group_collapsed(&mut self, index: usize, collapsed: bool) -> bool {
        self.with_active(|workspace| workspace.groups.set_collapsed(index, collapsed))
            .unwrap_or(false)
    }

    pub fn set_group_color(&mut self, index: usize, color: &str) -> bool {
        self.with_active(|workspace| workspace.groups.set_color(index, color))
            .unwrap_or(false)
    }

    /// Put the tab at `index` into `group` (`NO_GROUP` to ungroup).
    ///
    /// Ignored unless the group exists in the active workspace.
    pub fn set_tab_group(&mut self, index: usize, group: GroupId) -> bool {
        self.with_active(|workspace| {
            if group != NO_GROUP && !workspace.groups.contains(group) {
                log::debug!(
                    "Ignoring unknown group {} in workspace {}",
                    group,
                    workspace.id()
                );
                return false;
            }
            workspace.tabs.set_group_id(index, group)
        })
        .unwrap_or(false)
    }

    // ========================================================================
    // Split view
    // ========================================================================

    pub fn set_split_view_enabled(&mut self, enabled: bool) -> bool {
        let state = &mut self.state;
        let changed = state.split_view.set_enabled(enabled, &mut state.workspaces);
        self.dispatch();
        changed
    }

    pub fn set_pane_count(&mut self, count: usize) -> bool {
        let state = &mut self.state;
        let changed = state.split_view.set_pane_count(count, &mut state.workspaces);
        self.dispatch();
        changed
    }

    pub fn set_tab_for_pane(&mut self, pane: usize, tab: TabId) -> bool {
        let state = &mut self.state;
        let changed = state
            .split_view
            .set_tab_id_for_pane(pane, tab, &mut state.workspaces);
        self.dispatch();
        changed
    }

    pub fn close_focused_pane(&mut self) -> bool {
        let state = &mut self.state;
        let changed = state.split_view.close_focused_pane(&mut state.workspaces);
        self.dispatch();
        changed
    }

    pub fn swap_panes(&mut self) -> bool {
        let changed = self.state.split_view.swap_panes();
        self.dispatch();
        changed
    }

    pub fn focus_next_pane(&mut self) -> bool {
        let changed = self.state.split_view.focus_next_pane();
        self.dispatch();
        changed
    }

    pub fn set_focused_pane(&mut self, pane: usize) -> bool {
        let changed = self.state.split_view.set_focused_pane(pane);
        self.dispatch();
        changed
    }

    pub fn set_split_ratio(&mut self, ratio: f64) -> bool {
        let changed = self.state.split_view.set_split_ratio(ratio);
        self.dispatch();
        changed
    }

    pub fn set_grid_split_ratios(&mut self, x: f64, y: f64) -> bool {
        let changed = self.state.split_view.set_grid_split_ratios(x, y);
        self.dispatch();
        changed
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Run a due debounced save. Returns whether a save was attempted.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.persistence.tick(&self.state, now)
    }

    pub fn save_now(&mut self) -> Result<(), SessionError> {
        self.persistence.save(&self.state)
    }

    pub fn save_deadline(&self) -> Option<Instant> {
        self.persistence.save_deadline()
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.persistence.last_save_error()
    }

    pub fn restore_error(&self) -> Option<&str> {
        self.restore_error.as_deref()
    }

    pub fn persistence(&self) -> &SessionPersistence {
        &self.persistence
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Case-insensitive search over open tabs, then recently closed tabs.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let needle = query.trim().to_lowercase();
        let open = self.state.workspaces.workspaces().iter().flat_map(|workspace| {
            workspace.tabs.tabs().iter().map(move |tab| {
                (
                    tab as &dyn HistoryEntry,
                    SearchSource::OpenTab {
                        workspace: workspace.id(),
                        tab: tab.id(),
                    },
                )
            })
        });
        let closed = self
            .state
            .recently_closed
            .entries()
            .enumerate()
            .map(|(index, entry)| {
                (
                    entry as &dyn HistoryEntry,
                    SearchSource::RecentlyClosed { index },
                )
            });

        open.chain(closed)
            .filter(|(entry, _)| entry.matches(&needle))
            .take(limit)
            .map(|(entry, source)| SearchResult::from_entry(entry, source))
            .collect()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn workspaces(&self) -> &WorkspaceContainer {
        &self.state.workspaces
    }

    pub fn active_workspace(&self) -> Option<&Workspace> {
        self.state.workspaces.active()
    }

    pub fn split_view(&self) -> &SplitPaneController {
        &self.state.split_view
    }

    pub fn recently_closed(&self) -> &RecentlyClosedStack {
        &self.state.recently_closed
    }
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("workspaces", &self.state.workspaces.len())
            .field("tabs", &self.state.workspaces.total_tab_count())
            .field("split_view", &self.state.split_view.is_enabled())
            .field("recently_closed", &self.state.recently_closed.len())
            .field("bus", &self.bus)
            .finish()
    }
}
