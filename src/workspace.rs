//! Workspaces and the container that owns them.
//!
//! Each workspace owns one `TabCollection` and one `TabGroupCollection`;
//! nothing outside the container holds references into them, so the arena
//! is simply a `Vec<Workspace>`.

use crate::events::{ChangeEvent, EventQueue};
use crate::ids::WORKSPACE_IDS;
use crate::tab::TabCollection;
use crate::tab_group::TabGroupCollection;

/// Unique workspace identifier, never reused within a process
pub type WorkspaceId = u64;

/// Accent colors handed out to workspaces created without one, keyed by id.
pub const ACCENT_PALETTE: [&str; 6] = [
    "#7c6af7", "#2f9e8f", "#d4694a", "#4a8fd4", "#c2497d", "#8a9a3b",
];

pub const DEFAULT_SIDEBAR_WIDTH: f64 = 260.0;
pub const MIN_SIDEBAR_WIDTH: f64 = 160.0;
pub const MAX_SIDEBAR_WIDTH: f64 = 600.0;

/// Palette accent for a workspace id
pub fn palette_accent(id: WorkspaceId) -> &'static str {
    ACCENT_PALETTE[(id.saturating_sub(1) as usize) % ACCENT_PALETTE.len()]
}

#[derive(Debug)]
pub struct Workspace {
    pub(crate) id: WorkspaceId,
    pub(crate) name: String,
    /// User-chosen accent; empty means "use the palette"
    pub(crate) accent_color: String,
    pub(crate) sidebar_width: f64,
    pub(crate) sidebar_expanded: bool,
    pub tabs: TabCollection,
    pub groups: TabGroupCollection,
}

impl Workspace {
    pub(crate) fn new(id: WorkspaceId, name: &str, accent_color: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            accent_color: accent_color.to_string(),
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
            sidebar_expanded: true,
            tabs: TabCollection::new(id),
            groups: TabGroupCollection::new(id),
        }
    }

    pub fn id(&self) -> WorkspaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective accent: the stored color, or the palette color for this id
    pub fn accent_color(&self) -> &str {
        if self.accent_color.is_empty() {
            palette_accent(self.id)
        } else {
            &self.accent_color
        }
    }

    /// The accent exactly as stored (empty when unset)
    pub fn stored_accent_color(&self) -> &str {
        &self.accent_color
    }

    pub fn sidebar_width(&self) -> f64 {
        self.sidebar_width
    }

    pub fn is_sidebar_expanded(&self) -> bool {
        self.sidebar_expanded
    }

    fn drain_events_into(&mut self, out: &mut Vec<ChangeEvent>) {
        self.tabs.drain_events_into(out);
        self.groups.drain_events_into(out);
    }
}

/// Ordered list of workspaces plus the active selection
#[derive(Debug, Default)]
pub struct WorkspaceContainer {
    workspaces: Vec<Workspace>,
    active_index: Option<usize>,
    events: EventQueue,
}

impl WorkspaceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a "Default" workspace if there are none. Returns true if one was made.
    pub fn ensure_initialized(&mut self) -> bool {
        if !self.workspaces.is_empty() {
            return false;
        }
        self.add_workspace("Default");
        true
    }

    /// Append a workspace with a fresh id. Returns its index.
    ///
    /// The first workspace becomes active; later ones do not.
    pub fn add_workspace(&mut self, name: &str) -> usize {
        let id = WORKSPACE_IDS.allocate();
        log::info!("Created workspace {} '{}'", id, name);
        self.push(Workspace::new(id, name, ""))
    }

    /// Append a workspace with a caller-chosen id (session restore).
    pub fn add_workspace_with_id(
        &mut self,
        id: WorkspaceId,
        name: &str,
        accent_color: &str,
    ) -> Option<usize> {
        if id == 0 || self.contains(id) {
            log::debug!("Ignoring add_workspace_with_id({}): id unusable", id);
            return None;
        }
        WORKSPACE_IDS.observe(id);
        Some(self.push(Workspace::new(id, name, accent_color)))
    }

    fn push(&mut self, workspace: Workspace) -> usize {
        self.workspaces.push(workspace);
        let index = self.workspaces.len() - 1;
        self.events.push(ChangeEvent::WorkspacesChanged);
        if self.active_index.is_none() {
            self.set_active(Some(index));
        }
        index
    }

    /// Close the workspace at `index`, dropping its tabs and groups.
    ///
    /// Refused when it is the last remaining workspace.
    pub fn close_workspace(&mut self, index: usize) -> Option<Workspace> {
        if index >= self.workspaces.len() {
            return None;
        }
        if self.workspaces.len() <= 1 {
            log::debug!("Refusing to close the last remaining workspace");
            return None;
        }

        let previous_active = self.active_id();
        let workspace = self.workspaces.remove(index);
        self.active_index = match self.active_index {
            Some(active) if active == index => Some(index.min(self.workspaces.len() - 1)),
            Some(active) if index < active => Some(active - 1),
            other => other,
        };

        log::info!(
            "Closed workspace {} '{}' ({} tabs)",
            workspace.id,
            workspace.name,
            workspace.tabs.len()
        );
        self.events.push(ChangeEvent::WorkspacesChanged);
        let active = self.active_id();
        if active != previous_active {
            self.events
                .push(ChangeEvent::ActiveWorkspaceChanged { workspace: active });
        }
        Some(workspace)
    }

    /// Reorder workspaces, keeping the active one by identity.
    ///
    /// Either index out of range is a no-op.
    pub fn move_workspace(&mut self, from: usize, to: usize) -> bool {
        let len = self.workspaces.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let active_id = self.active_id();
        let workspace = self.workspaces.remove(from);
        self.workspaces.insert(to, workspace);
        self.active_index = active_id.and_then(|id| self.index_of(id));
        self.events.push(ChangeEvent::WorkspacesChanged);
        true
    }

    pub fn set_active_index(&mut self, index: usize) -> bool {
        if index >= self.workspaces.len() || self.active_index == Some(index) {
            return false;
        }
        self.set_active(Some(index));
        true
    }

    pub fn set_active_id(&mut self, id: WorkspaceId) -> bool {
        match self.index_of(id) {
            Some(index) => self.set_active_index(index),
            None => false,
        }
    }

    fn set_active(&mut self, index: Option<usize>) {
        self.active_index = index;
        log::debug!("Active workspace is now {:?}", self.active_id());
        self.events.push(ChangeEvent::ActiveWorkspaceChanged {
            workspace: self.active_id(),
        });
    }

    pub fn set_name(&mut self, index: usize, name: &str) -> bool {
        match self.workspaces.get_mut(index) {
            Some(ws) if ws.name != name => {
                ws.name = name.to_string();
                self.events.push(ChangeEvent::WorkspacesChanged);
                true
            }
            _ => false,
        }
    }

    /// Empty reverts to the palette accent.
    pub fn set_accent_color(&mut self, index: usize, color: &str) -> bool {
        match self.workspaces.get_mut(index) {
            Some(ws) if ws.accent_color != color => {
                ws.accent_color = color.to_string();
                self.events.push(ChangeEvent::WorkspacesChanged);
                true
            }
            _ => false,
        }
    }

    /// Width is clamped to `MIN_SIDEBAR_WIDTH..=MAX_SIDEBAR_WIDTH`.
    pub fn set_sidebar_width(&mut self, index: usize, width: f64) -> bool {
        if !width.is_finite() {
            return false;
        }
        let width = width.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH);
        match self.workspaces.get_mut(index) {
            Some(ws) if ws.sidebar_width != width => {
                ws.sidebar_width = width;
                self.events.push(ChangeEvent::WorkspacesChanged);
                true
            }
            _ => false,
        }
    }

    pub fn set_sidebar_expanded(&mut self, index: usize, expanded: bool) -> bool {
        match self.workspaces.get_mut(index) {
            Some(ws) if ws.sidebar_expanded != expanded => {
                ws.sidebar_expanded = expanded;
                self.events.push(ChangeEvent::WorkspacesChanged);
                true
            }
            _ => false,
        }
    }

    /// Swap in a fully built set of workspaces (session restore).
    pub(crate) fn replace_all(&mut self, workspaces: Vec<Workspace>, active: Option<WorkspaceId>) {
        self.workspaces = workspaces;
        self.active_index = active
            .and_then(|id| self.index_of(id))
            .or(if self.workspaces.is_empty() { None } else { Some(0) });
        self.events.push(ChangeEvent::WorkspacesChanged);
        self.events.push(ChangeEvent::ActiveWorkspaceChanged {
            workspace: self.active_id(),
        });
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn get(&self, index: usize) -> Option<&Workspace> {
        self.workspaces.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Workspace> {
        self.workspaces.get_mut(index)
    }

    pub fn get_by_id(&self, id: WorkspaceId) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.id == id)
    }

    pub fn get_by_id_mut(&mut self, id: WorkspaceId) -> Option<&mut Workspace> {
        self.workspaces.iter_mut().find(|w| w.id == id)
    }

    pub fn index_of(&self, id: WorkspaceId) -> Option<usize> {
        self.workspaces.iter().position(|w| w.id == id)
    }

    pub fn contains(&self, id: WorkspaceId) -> bool {
        self.workspaces.iter().any(|w| w.id == id)
    }

    /// Find the workspace that owns a tab
    pub fn workspace_of_tab(&self, tab: crate::tab::TabId) -> Option<WorkspaceId> {
        self.workspaces
            .iter()
            .find(|w| w.tabs.contains(tab))
            .map(|w| w.id)
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active_id(&self) -> Option<WorkspaceId> {
        self.active().map(|w| w.id)
    }

    pub fn active(&self) -> Option<&Workspace> {
        self.active_index.and_then(|i| self.workspaces.get(i))
    }

    pub fn active_mut(&mut self) -> Option<&mut Workspace> {
        let index = self.active_index?;
        self.workspaces.get_mut(index)
    }

    /// Total number of tabs across all workspaces
    pub fn total_tab_count(&self) -> usize {
        self.workspaces.iter().map(|w| w.tabs.len()).sum()
    }

    /// Drain container events followed by every child collection's events.
    pub fn drain_events_into(&mut self, out: &mut Vec<ChangeEvent>) {
        self.events.drain_into(out);
        for workspace in &mut self.workspaces {
            workspace.drain_events_into(out);
        }
    }

    pub fn take_events(&mut self) -> Vec<ChangeEvent> {
        let mut out = Vec::new();
        self.drain_events_into(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container_with(names: &[&str]) -> WorkspaceContainer {
        let mut container = WorkspaceContainer::new();
        for name in names {
            container.add_workspace(name);
        }
        container.take_events();
        container
    }

    #[test]
    fn test_first_workspace_becomes_active() {
        let container = container_with(&["One", "Two"]);
        assert_eq!(container.active_index(), Some(0));
        assert_eq!(container.active().unwrap().name(), "One");
    }

    #[test]
    fn test_ensure_initialized_only_when_empty() {
        let mut container = WorkspaceContainer::new();
        assert!(container.ensure_initialized());
        assert!(!container.ensure_initialized());
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_close_last_workspace_is_refused() {
        let mut container = container_with(&["Only"]);
        assert!(container.close_workspace(0).is_none());
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_close_active_workspace_clamps() {
        let mut container = container_with(&["A", "B", "C"]);
        container.set_active_index(2);
        let closed = container.close_workspace(2).unwrap();
        assert_eq!(closed.name(), "C");
        assert_eq!(container.active().unwrap().name(), "B");
    }

    #[test]
    fn test_close_before_active_keeps_identity() {
        let mut container = container_with(&["A", "B", "C"]);
        container.set_active_index(2);
        container.close_workspace(0);
        assert_eq!(container.active().unwrap().name(), "C");
        assert_eq!(container.active_index(), Some(1));
    }

    #[test]
    fn test_move_preserves_active_identity() {
        let mut container = container_with(&["A", "B", "C"]);
        container.set_active_index(1);
        let active = container.active_id();
        assert!(container.move_workspace(1, 0));
        assert_eq!(container.active_id(), active);
        assert_eq!(container.active_index(), Some(0));
    }

    #[test]
    fn test_move_out_of_range_is_noop() {
        let mut container = container_with(&["A", "B", "C"]);
        container.take_events();
        assert!(!container.move_workspace(0, 3));
        assert!(!container.move_workspace(5, 0));
        let names: Vec<&str> = container.workspaces().iter().map(|w| w.name()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert!(container.take_events().is_empty());
    }

    #[test]
    fn test_restored_id_is_preserved_and_observed() {
        let mut container = WorkspaceContainer::new();
        let index = container.add_workspace_with_id(5_000, "Restored", "#112233").unwrap();
        assert_eq!(container.get(index).unwrap().id(), 5_000);
        assert!(container.add_workspace_with_id(5_000, "Dup", "").is_none());
        let fresh = container.add_workspace("Fresh");
        assert!(container.get(fresh).unwrap().id() > 5_000);
    }

    #[test]
    fn test_accent_falls_back_to_palette() {
        let mut container = WorkspaceContainer::new();
        container.add_workspace_with_id(9_001, "P", "");
        let ws = container.get_by_id(9_001).unwrap();
        assert_eq!(ws.accent_color(), palette_accent(9_001));
        assert_eq!(ws.stored_accent_color(), "");
        assert!(container.set_accent_color(0, "#abcdef"));
        assert_eq!(container.get(0).unwrap().accent_color(), "#abcdef");
    }

    #[test]
    fn test_sidebar_width_clamped() {
        let mut container = container_with(&["A"]);
        assert!(container.set_sidebar_width(0, 10_000.0));
        assert_eq!(container.get(0).unwrap().sidebar_width(), MAX_SIDEBAR_WIDTH);
        assert!(!container.set_sidebar_width(0, f64::NAN));
    }

    #[test]
    fn test_events_include_child_collections() {
        let mut container = container_with(&["A"]);
        container.active_mut().unwrap().tabs.add_tab("https://a");
        let events = container.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, ChangeEvent::TabsChanged { .. })));
    }
}
