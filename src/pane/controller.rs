//! Pane slot assignment for the split view.
//!
//! The controller holds 2–4 slots, each bound to a tab id of the active
//! workspace (or `NO_TAB`). While enabled, no slot may name a missing tab and
//! no tab may appear in two slots; both are repaired by `ensure_tabs`, which
//! runs whenever the active workspace changes or loses tabs.

use super::{DEFAULT_SPLIT_RATIO, MAX_PANES, MIN_PANES, PaneLayout, clamp_ratio};
use crate::events::{ChangeEvent, EventQueue};
use crate::tab::{NO_TAB, TabCollection, TabId};
use crate::workspace::WorkspaceContainer;
use std::collections::HashSet;

#[derive(Debug)]
pub struct SplitPaneController {
    enabled: bool,
    /// One entry per pane; length is the configured pane count
    panes: Vec<TabId>,
    focused_pane: usize,
    /// Divider position for the two-column layout
    split_ratio: f64,
    /// Vertical divider position for the grid layout
    grid_split_ratio_x: f64,
    /// Horizontal divider position for the grid layout
    grid_split_ratio_y: f64,
    /// URL for tabs fabricated to fill empty slots
    new_tab_url: String,
    events: EventQueue,
}

impl SplitPaneController {
    pub fn new(new_tab_url: &str) -> Self {
        Self {
            enabled: false,
            panes: vec![NO_TAB; MIN_PANES],
            focused_pane: 0,
            split_ratio: DEFAULT_SPLIT_RATIO,
            grid_split_ratio_x: DEFAULT_SPLIT_RATIO,
            grid_split_ratio_y: DEFAULT_SPLIT_RATIO,
            new_tab_url: new_tab_url.to_string(),
            events: EventQueue::new(),
        }
    }

    /// Turn the split view on or off. Enabling reconciles the slots first.
    pub fn set_enabled(&mut self, enabled: bool, workspaces: &mut WorkspaceContainer) -> bool {
        if self.enabled == enabled {
            return false;
        }
        if enabled {
            let Some(workspace) = workspaces.active_mut() else {
                log::debug!("Cannot enable split view without an active workspace");
                return false;
            };
            self.ensure_tabs(&mut workspace.tabs);
        }
        self.enabled = enabled;
        log::info!(
            "Split view {} ({} panes)",
            if enabled { "enabled" } else { "disabled" },
            self.panes.len()
        );
        self.changed();
        true
    }

    /// Grow or shrink the pane array; `count` is clamped to 2..=4.
    pub fn set_pane_count(&mut self, count: usize, workspaces: &mut WorkspaceContainer) -> bool {
        let count = count.clamp(MIN_PANES, MAX_PANES);
        if count == self.panes.len() {
            return false;
        }
        if count > self.panes.len() {
            self.panes.resize(count, NO_TAB);
            if self.enabled {
                self.reconcile(workspaces);
            }
        } else {
            self.panes.truncate(count);
            self.focused_pane = self.focused_pane.min(count - 1);
        }
        self.changed();
        true
    }

    /// Bind `pane` to `tab`, growing the pane array if needed.
    ///
    /// Panes beyond `MAX_PANES` are ignored. While enabled the slots are
    /// reconciled afterwards, so an unknown id is replaced immediately.
    pub fn set_tab_id_for_pane(
        &mut self,
        pane: usize,
        tab: TabId,
        workspaces: &mut WorkspaceContainer,
    ) -> bool {
        if pane >= MAX_PANES {
            return false;
        }
        if pane >= self.panes.len() {
            self.panes.resize(pane + 1, NO_TAB);
        }
        self.panes[pane] = tab;
        if self.enabled {
            self.reconcile(workspaces);
        }
        self.changed();
        true
    }

    /// Repair the slots against the active workspace's tabs.
    pub fn reconcile(&mut self, workspaces: &mut WorkspaceContainer) -> bool {
        match workspaces.active_mut() {
            Some(workspace) => self.ensure_tabs(&mut workspace.tabs),
            None => false,
        }
    }

    /// Make every slot name an existing, distinct tab of `tabs`.
    ///
    /// First pass: a missing slot 0 takes the active tab (created if the
    /// workspace has none), any other missing slot gets a new blank tab.
    /// Second pass: later duplicates of an id get a new blank tab.
    pub fn ensure_tabs(&mut self, tabs: &mut TabCollection) -> bool {
        let before = self.panes.clone();

        for slot in 0..self.panes.len() {
            if tabs.contains(self.panes[slot]) {
                continue;
            }
            let replacement = if slot == 0 {
                match tabs.active_tab_id() {
                    Some(id) => id,
                    None => {
                        let index = tabs.add_tab(&self.new_tab_url);
                        tabs.tabs()[index].id()
                    }
                }
            } else {
                self.create_blank_tab(tabs)
            };
            self.panes[slot] = replacement;
        }

        let mut seen = HashSet::with_capacity(self.panes.len());
        for slot in 0..self.panes.len() {
            if !seen.insert(self.panes[slot]) {
                let replacement = self.create_blank_tab(tabs);
                self.panes[slot] = replacement;
                seen.insert(replacement);
            }
        }

        let changed = before != self.panes;
        if changed {
            log::debug!("Split view panes repaired: {:?} -> {:?}", before, self.panes);
            self.changed();
        }
        changed
    }

    fn create_blank_tab(&self, tabs: &mut TabCollection) -> TabId {
        let index = tabs.add_background_tab(&self.new_tab_url);
        tabs.tabs()[index].id()
    }

    /// Close the focused pane.
    ///
    /// With two panes the split view turns off and the surviving pane's tab
    /// becomes the active tab; otherwise later panes shift down.
    pub fn close_focused_pane(&mut self, workspaces: &mut WorkspaceContainer) -> bool {
        if !self.enabled {
            return false;
        }
        if self.panes.len() <= MIN_PANES {
            let survivor = self.panes[if self.focused_pane == 0 { 1 } else { 0 }];
            self.enabled = false;
            if let Some(workspace) = workspaces.active_mut() {
                workspace.tabs.set_active_tab_id(survivor);
            }
            log::info!("Split view closed, tab {} kept", survivor);
        } else {
            self.panes.remove(self.focused_pane);
            self.focused_pane = self.focused_pane.min(self.panes.len() - 1);
        }
        self.changed();
        true
    }

    /// Exchange the first two panes
    pub fn swap_panes(&mut self) -> bool {
        if self.panes.len() < 2 || self.panes[0] == self.panes[1] {
            return false;
        }
        self.panes.swap(0, 1);
        self.changed();
        true
    }

    /// Move focus to the next pane, wrapping around. Only while enabled.
    pub fn focus_next_pane(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.focused_pane = (self.focused_pane + 1) % self.panes.len();
        self.changed();
        true
    }

    pub fn set_focused_pane(&mut self, pane: usize) -> bool {
        if pane >= self.panes.len() || pane == self.focused_pane {
            return false;
        }
        self.focused_pane = pane;
        self.changed();
        true
    }

    pub fn set_split_ratio(&mut self, ratio: f64) -> bool {
        let ratio = clamp_ratio(ratio);
        if ratio == self.split_ratio {
            return false;
        }
        self.split_ratio = ratio;
        self.changed();
        true
    }

    pub fn set_grid_split_ratios(&mut self, x: f64, y: f64) -> bool {
        let (x, y) = (clamp_ratio(x), clamp_ratio(y));
        if x == self.grid_split_ratio_x && y == self.grid_split_ratio_y {
            return false;
        }
        self.grid_split_ratio_x = x;
        self.grid_split_ratio_y = y;
        self.changed();
        true
    }

    /// React to a change elsewhere in the graph.
    ///
    /// Re-runs reconciliation when the active workspace switches or loses
    /// tabs, so callers never have to repair the panes themselves.
    pub fn handle_change(&mut self, event: &ChangeEvent, workspaces: &mut WorkspaceContainer) {
        if !self.enabled {
            return;
        }
        let needs_repair = match event {
            ChangeEvent::ActiveWorkspaceChanged { .. } => true,
            ChangeEvent::RowsRemoved { workspace, .. } | ChangeEvent::TabsReset { workspace } => {
                workspaces.active_id() == Some(*workspace)
            }
            _ => false,
        };
        if needs_repair {
            self.reconcile(workspaces);
        }
    }

    /// Load persisted state without reconciling (session restore).
    pub(crate) fn load_state(
        &mut self,
        enabled: bool,
        panes: &[TabId],
        focused_pane: usize,
        split_ratio: f64,
        grid_split_ratio_x: f64,
        grid_split_ratio_y: f64,
    ) {
        let mut panes: Vec<TabId> = panes.iter().copied().take(MAX_PANES).collect();
        if panes.len() < MIN_PANES {
            panes.resize(MIN_PANES, NO_TAB);
        }
        self.focused_pane = focused_pane.min(panes.len() - 1);
        self.panes = panes;
        self.enabled = enabled;
        self.split_ratio = clamp_ratio(split_ratio);
        self.grid_split_ratio_x = clamp_ratio(grid_split_ratio_x);
        self.grid_split_ratio_y = clamp_ratio(grid_split_ratio_y);
        self.changed();
    }

    fn changed(&mut self) {
        self.events.push(ChangeEvent::SplitViewChanged);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Configured number of panes (kept while disabled)
    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    /// Number of panes on screen: 0 while disabled
    pub fn active_pane_count(&self) -> usize {
        if self.enabled { self.panes.len() } else { 0 }
    }

    pub fn pane_tab_ids(&self) -> &[TabId] {
        &self.panes
    }

    pub fn tab_id_for_pane(&self, pane: usize) -> TabId {
        self.panes.get(pane).copied().unwrap_or(NO_TAB)
    }

    pub fn focused_pane(&self) -> usize {
        self.focused_pane
    }

    pub fn focused_tab_id(&self) -> Option<TabId> {
        if !self.enabled {
            return None;
        }
        self.panes
            .get(self.focused_pane)
            .copied()
            .filter(|&id| id != NO_TAB)
    }

    pub fn split_ratio(&self) -> f64 {
        self.split_ratio
    }

    pub fn grid_split_ratio_x(&self) -> f64 {
        self.grid_split_ratio_x
    }

    pub fn grid_split_ratio_y(&self) -> f64 {
        self.grid_split_ratio_y
    }

    pub fn layout(&self) -> PaneLayout {
        match self.active_pane_count() {
            0 | 1 => PaneLayout::Single,
            2 => PaneLayout::Columns,
            _ => PaneLayout::Grid,
        }
    }

    pub(crate) fn drain_events_into(&mut self, out: &mut Vec<ChangeEvent>) {
        self.events.drain_into(out);
    }
}
