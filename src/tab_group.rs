//! Named, colored, collapsible tab groups scoped to one workspace.
//!
//! Removing a group here does not touch tabs; the orchestration layer pairs
//! every removal with `TabCollection::ungroup_all` so no tab keeps a
//! dangling group id.

use crate::events::{ChangeEvent, EventQueue};
use crate::workspace::WorkspaceId;

/// Group identifier, unique within its workspace. 0 means "ungrouped".
pub type GroupId = u64;

pub const NO_GROUP: GroupId = 0;

/// Colors handed out to groups created without one, keyed by id.
pub const GROUP_PALETTE: [&str; 8] = [
    "#5b8def", "#e5534b", "#57ab5a", "#c69026", "#986ee2", "#39c5cf", "#e0823d", "#cc6b9f",
];

/// Palette color for a group id
pub fn palette_color(id: GroupId) -> &'static str {
    GROUP_PALETTE[(id.saturating_sub(1) as usize) % GROUP_PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabGroup {
    pub(crate) id: GroupId,
    pub(crate) name: String,
    pub(crate) collapsed: bool,
    pub(crate) color: String,
}

impl TabGroup {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn color(&self) -> &str {
        &self.color
    }
}

#[derive(Debug)]
pub struct TabGroupCollection {
    workspace: WorkspaceId,
    groups: Vec<TabGroup>,
    next_id: GroupId,
    events: EventQueue,
}

impl TabGroupCollection {
    pub fn new(workspace: WorkspaceId) -> Self {
        Self {
            workspace,
            groups: Vec::new(),
            next_id: 1,
            events: EventQueue::new(),
        }
    }

    /// Create a group with a palette color. Returns its id.
    pub fn add_group(&mut self, name: &str) -> GroupId {
        let id = self.next_id;
        self.next_id += 1;
        self.groups.push(TabGroup {
            id,
            name: name.to_string(),
            collapsed: false,
            color: palette_color(id).to_string(),
        });
        self.changed(Some(id));
        id
    }

    /// Recreate a group with a known id (session restore).
    ///
    /// An empty `color` gets the palette color. Returns false for id 0 or a
    /// duplicate id.
    pub fn add_group_with_id(
        &mut self,
        id: GroupId,
        name: &str,
        collapsed: bool,
        color: &str,
    ) -> bool {
        if id == NO_GROUP || self.contains(id) {
            return false;
        }
        self.next_id = self.next_id.max(id + 1);
        let color = if color.is_empty() {
            palette_color(id).to_string()
        } else {
            color.to_string()
        };
        self.groups.push(TabGroup {
            id,
            name: name.to_string(),
            collapsed,
            color,
        });
        self.changed(Some(id));
        true
    }

    /// Remove the group at `index`. Callers must ungroup its tabs.
    pub fn remove_group(&mut self, index: usize) -> Option<TabGroup> {
        if index >= self.groups.len() {
            return None;
        }
        let group = self.groups.remove(index);
        log::debug!(
            "Removed group {} '{}' from workspace {}",
            group.id,
            group.name,
            self.workspace
        );
        self.changed(Some(group.id));
        Some(group)
    }

    pub fn set_name(&mut self, index: usize, name: &str) -> bool {
        match self.groups.get_mut(index) {
            Some(group) if group.name != name => {
                group.name = name.to_string();
                let id = group.id;
                self.changed(Some(id));
                true
            }
            _ => false,
        }
    }

    pub fn set_collapsed(&mut self, index: usize, collapsed: bool) -> bool {
        match self.groups.get_mut(index) {
            Some(group) if group.collapsed != collapsed => {
                group.collapsed = collapsed;
                let id = group.id;
                self.changed(Some(id));
                true
            }
            _ => false,
        }
    }

    /// An empty color reverts to the palette color.
    pub fn set_color(&mut self, index: usize, color: &str) -> bool {
        match self.groups.get_mut(index) {
            Some(group) => {
                let color = if color.is_empty() {
                    palette_color(group.id)
                } else {
                    color
                };
                if group.color == color {
                    return false;
                }
                group.color = color.to_string();
                let id = group.id;
                self.changed(Some(id));
                true
            }
            None => false,
        }
    }

    fn changed(&mut self, group: Option<GroupId>) {
        self.events.push(ChangeEvent::GroupsChanged {
            workspace: self.workspace,
            group,
        });
    }

    pub fn groups(&self) -> &[TabGroup] {
        &self.groups
    }

    pub fn get(&self, index: usize) -> Option<&TabGroup> {
        self.groups.get(index)
    }

    pub fn get_by_id(&self, id: GroupId) -> Option<&TabGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn index_of(&self, id: GroupId) -> Option<usize> {
        self.groups.iter().position(|g| g.id == id)
    }

    pub fn contains(&self, id: GroupId) -> bool {
        id != NO_GROUP && self.groups.iter().any(|g| g.id == id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub(crate) fn drain_events_into(&mut self, out: &mut Vec<ChangeEvent>) {
        self.events.drain_into(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_group_assigns_sequential_ids_and_palette() {
        let mut groups = TabGroupCollection::new(1);
        let a = groups.add_group("Work");
        let b = groups.add_group("Play");
        assert_eq!((a, b), (1, 2));
        assert_eq!(groups.get_by_id(1).unwrap().color(), GROUP_PALETTE[0]);
        assert_eq!(groups.get_by_id(2).unwrap().color(), GROUP_PALETTE[1]);
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(9), GROUP_PALETTE[0]);
    }

    #[test]
    fn test_restored_ids_advance_counter() {
        let mut groups = TabGroupCollection::new(1);
        assert!(groups.add_group_with_id(7, "Old", true, ""));
        assert!(!groups.add_group_with_id(7, "Dup", false, ""));
        assert!(!groups.add_group_with_id(NO_GROUP, "Zero", false, ""));
        assert_eq!(groups.add_group("New"), 8);
        let old = groups.get_by_id(7).unwrap();
        assert!(old.is_collapsed());
        assert_eq!(old.color(), palette_color(7));
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut groups = TabGroupCollection::new(1);
        groups.add_group("A");
        groups.remove_group(0);
        assert_eq!(groups.add_group("B"), 2);
    }

    #[test]
    fn test_setters_noop_on_same_value() {
        let mut groups = TabGroupCollection::new(1);
        groups.add_group("A");
        assert!(!groups.set_name(0, "A"));
        assert!(groups.set_name(0, "B"));
        assert!(groups.set_collapsed(0, true));
        assert!(!groups.set_collapsed(0, true));
        assert!(groups.set_color(0, "#000000"));
        assert!(groups.set_color(0, ""));
        assert_eq!(groups.get(0).unwrap().color(), palette_color(1));
        assert!(!groups.set_name(3, "missing"));
        assert!(groups.remove_group(3).is_none());
    }
}
