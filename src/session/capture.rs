//! Build a snapshot from the live state graph

use super::{
    CURRENT_VERSION, GroupRecord, SessionSnapshot, SplitViewRecord, TabRecord, WorkspaceRecord,
};
use crate::state::ShellState;
use crate::tab::Tab;
use crate::tab_group::TabGroup;
use crate::workspace::Workspace;
use chrono::Utc;

/// Capture the full graph at the current schema version
pub fn capture_session(state: &ShellState) -> SessionSnapshot {
    let split = &state.split_view;
    SessionSnapshot {
        version: CURRENT_VERSION,
        saved_at: Some(Utc::now()),
        active_workspace_id: state.workspaces.active_id().unwrap_or(0),
        workspaces: state
            .workspaces
            .workspaces()
            .iter()
            .map(capture_workspace)
            .collect(),
        split_view: SplitViewRecord {
            enabled: split.is_enabled(),
            pane_count: split.pane_count(),
            pane_tab_ids: split.pane_tab_ids().to_vec(),
            focused_pane: split.focused_pane(),
            split_ratio: split.split_ratio(),
            grid_split_ratio_x: split.grid_split_ratio_x(),
            grid_split_ratio_y: split.grid_split_ratio_y(),
            primary_tab_id: None,
            secondary_tab_id: None,
        },
        recently_closed: state.recently_closed.entries().cloned().collect(),
    }
}

fn capture_workspace(workspace: &Workspace) -> WorkspaceRecord {
    WorkspaceRecord {
        id: workspace.id(),
        name: workspace.name().to_string(),
        accent_color: workspace.stored_accent_color().to_string(),
        sidebar_width: workspace.sidebar_width(),
        sidebar_expanded: workspace.is_sidebar_expanded(),
        tab_groups: workspace.groups.groups().iter().map(capture_group).collect(),
        tabs: workspace.tabs.tabs().iter().map(capture_tab).collect(),
        active_tab_id: workspace.tabs.active_tab_id().unwrap_or(0),
    }
}

fn capture_group(group: &TabGroup) -> GroupRecord {
    GroupRecord {
        id: group.id(),
        name: group.name().to_string(),
        collapsed: group.is_collapsed(),
        color: group.color().to_string(),
    }
}

fn capture_tab(tab: &Tab) -> TabRecord {
    TabRecord {
        id: tab.id(),
        url: tab.url().to_string(),
        initial_url: tab.initial_url().to_string(),
        page_title: tab.page_title().to_string(),
        custom_title: tab.custom_title().to_string(),
        essential: tab.is_essential(),
        group_id: tab.group_id(),
    }
}
