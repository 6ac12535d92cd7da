//! Decode a snapshot and rebuild the state graph from it
//!
//! Decoding is tolerant at the record level: a malformed or duplicate tab,
//! group, workspace or closed-tab entry is skipped with a warning. Only a
//! wrong top-level shape aborts the restore. The live graph is replaced in
//! one step after decoding succeeds, so a failed restore leaves it untouched.

use super::{
    CURRENT_VERSION, GroupRecord, SessionError, SessionSnapshot, SplitViewRecord, TabRecord,
    WorkspaceRecord,
};
use crate::ids::WORKSPACE_IDS;
use crate::pane::{MAX_PANES, MIN_PANES};
use crate::state::ShellState;
use crate::tab::{NO_TAB, Tab, TabId};
use crate::tab_group::NO_GROUP;
use crate::workspace::{
    DEFAULT_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH, MIN_SIDEBAR_WIDTH, Workspace, WorkspaceId,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;

/// Counts of what a restore materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreSummary {
    pub workspaces: usize,
    pub tabs: usize,
}

/// Workspace fields other than the nested lists
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceHeader {
    id: WorkspaceId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    accent_color: String,
    #[serde(default)]
    sidebar_width: Option<f64>,
    #[serde(default)]
    sidebar_expanded: Option<bool>,
    #[serde(default)]
    active_tab_id: TabId,
}

/// Parse snapshot text of any supported version into a clean snapshot.
pub fn decode_session(text: &str) -> Result<SessionSnapshot, SessionError> {
    let value: Value = serde_json::from_str(text).map_err(SessionError::Parse)?;
    let Value::Object(root) = value else {
        return Err(SessionError::NotAnObject);
    };

    let version = root
        .get("version")
        .and_then(Value::as_u64)
        .filter(|&v| v > 0)
        .ok_or(SessionError::MalformedField("version"))?;
    if version > u64::from(CURRENT_VERSION) {
        return Err(SessionError::UnsupportedVersion {
            found: version,
            supported: CURRENT_VERSION,
        });
    }

    let records = root
        .get("workspaces")
        .and_then(Value::as_array)
        .ok_or(SessionError::MalformedField("workspaces"))?;

    let mut workspace_ids = HashSet::new();
    let mut tab_ids = HashSet::new();
    let workspaces: Vec<WorkspaceRecord> = records
        .iter()
        .filter_map(|record| decode_workspace(record, &mut workspace_ids, &mut tab_ids))
        .collect();
    if workspaces.is_empty() {
        return Err(SessionError::NoWorkspaces);
    }

    let split_view = match root.get("splitView") {
        None | Some(Value::Null) => SplitViewRecord::default(),
        Some(value) => SplitViewRecord::deserialize(value).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed split view state: {}", e);
            SplitViewRecord::default()
        }),
    };

    Ok(SessionSnapshot {
        version: version as u32,
        saved_at: root
            .get("savedAt")
            .and_then(|v| Option::<DateTime<Utc>>::deserialize(v).ok())
            .flatten(),
        active_workspace_id: root
            .get("activeWorkspaceId")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        workspaces,
        split_view,
        recently_closed: decode_list(root.get("recentlyClosed"), "recently closed entry"),
    })
}

fn decode_workspace(
    value: &Value,
    workspace_ids: &mut HashSet<WorkspaceId>,
    tab_ids: &mut HashSet<TabId>,
) -> Option<WorkspaceRecord> {
    let header = match WorkspaceHeader::deserialize(value) {
        Ok(header) => header,
        Err(e) => {
            log::warn!("Skipping malformed workspace record: {}", e);
            return None;
        }
    };
    if header.id == 0 || !workspace_ids.insert(header.id) {
        log::warn!("Skipping workspace with unusable id {}", header.id);
        return None;
    }

    let mut group_ids = HashSet::new();
    let tab_groups: Vec<GroupRecord> = decode_list(value.get("tabGroups"), "tab group")
        .into_iter()
        .filter(|group: &GroupRecord| {
            let usable = group.id != NO_GROUP && group_ids.insert(group.id);
            if !usable {
                log::warn!(
                    "Skipping group with unusable id {} in workspace {}",
                    group.id,
                    header.id
                );
            }
            usable
        })
        .collect();

    let tabs: Vec<TabRecord> = decode_list(value.get("tabs"), "tab")
        .into_iter()
        .filter_map(|mut tab: TabRecord| {
            if tab.id == NO_TAB || !tab_ids.insert(tab.id) {
                log::warn!("Skipping tab with unusable id {}", tab.id);
                return None;
            }
            if tab.group_id != NO_GROUP && !group_ids.contains(&tab.group_id) {
                log::warn!(
                    "Tab {} references unknown group {}, restoring ungrouped",
                    tab.id,
                    tab.group_id
                );
                tab.group_id = NO_GROUP;
            }
            Some(tab)
        })
        .collect();

    let sidebar_width = header
        .sidebar_width
        .filter(|w| w.is_finite())
        .map_or(DEFAULT_SIDEBAR_WIDTH, |w| {
            w.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH)
        });

    Some(WorkspaceRecord {
        id: header.id,
        name: header.name,
        accent_color: header.accent_color,
        sidebar_width,
        sidebar_expanded: header.sidebar_expanded.unwrap_or(true),
        tab_groups,
        tabs,
        active_tab_id: header.active_tab_id,
    })
}

/// Decode each element of an optional JSON array, skipping the bad ones.
fn decode_list<T: DeserializeOwned>(value: Option<&Value>, what: &str) -> Vec<T> {
    let Some(value) = value else {
        return Vec::new();
    };
    let Some(items) = value.as_array() else {
        log::warn!("Expected a list of {} records, ignoring", what);
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping malformed {} record: {}", what, e);
                None
            }
        })
        .collect()
}

/// Replace the live graph with a decoded snapshot.
pub fn apply_session(snapshot: SessionSnapshot, state: &mut ShellState) -> RestoreSummary {
    let mut tab_count = 0;
    let workspaces: Vec<Workspace> = snapshot
        .workspaces
        .into_iter()
        .map(|record| {
            tab_count += record.tabs.len();
            build_workspace(record)
        })
        .collect();
    let summary = RestoreSummary {
        workspaces: workspaces.len(),
        tabs: tab_count,
    };

    let active = Some(snapshot.active_workspace_id).filter(|&id| id != 0);
    state.workspaces.replace_all(workspaces, active);

    let split = &snapshot.split_view;
    let pane_count = split.pane_count.clamp(MIN_PANES, MAX_PANES);
    let mut panes = split.pane_ids();
    panes.resize(pane_count, NO_TAB);
    state.split_view.load_state(
        split.enabled,
        &panes,
        split.focused_pane,
        split.split_ratio,
        split.grid_split_ratio_x,
        split.grid_split_ratio_y,
    );
    if split.enabled {
        state.split_view.reconcile(&mut state.workspaces);
    }

    state.recently_closed.load(snapshot.recently_closed);
    summary
}

fn build_workspace(record: WorkspaceRecord) -> Workspace {
    WORKSPACE_IDS.observe(record.id);
    let mut workspace = Workspace::new(record.id, &record.name, &record.accent_color);
    workspace.sidebar_width = record.sidebar_width;
    workspace.sidebar_expanded = record.sidebar_expanded;

    for group in &record.tab_groups {
        workspace
            .groups
            .add_group_with_id(group.id, &group.name, group.collapsed, &group.color);
    }

    let tabs = record.tabs.into_iter().map(build_tab).collect();
    let active = Some(record.active_tab_id).filter(|&id| id != NO_TAB);
    workspace.tabs.reset(tabs, active);
    workspace
}

fn build_tab(record: TabRecord) -> Tab {
    let mut tab = Tab::new(record.id, record.url);
    if !record.initial_url.is_empty() {
        tab.initial_url = record.initial_url;
    }
    tab.page_title = record.page_title;
    tab.custom_title = record.custom_title;
    tab.essential = record.essential;
    tab.group_id = record.group_id;
    tab
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            decode_session("[1, 2]"),
            Err(SessionError::NotAnObject)
        ));
        assert!(matches!(
            decode_session("{ nope"),
            Err(SessionError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_newer_version() {
        let err = decode_session(r#"{"version": 3, "workspaces": []}"#).unwrap_err();
        assert!(matches!(
            err,
            SessionError::UnsupportedVersion {
                found: 3,
                supported: 2
            }
        ));
    }

    #[test]
    fn test_missing_version_is_malformed() {
        assert!(matches!(
            decode_session(r#"{"workspaces": []}"#),
            Err(SessionError::MalformedField("version"))
        ));
    }

    #[test]
    fn test_no_usable_workspaces() {
        let text = r#"{"version": 2, "workspaces": [{"name": "no id"}, {"id": 0}]}"#;
        assert!(matches!(
            decode_session(text),
            Err(SessionError::NoWorkspaces)
        ));
    }

    #[test]
    fn test_skips_bad_records_and_dangling_groups() {
        let text = r#"{
            "version": 2,
            "activeWorkspaceId": 11,
            "workspaces": [
                {
                    "id": 11,
                    "name": "Main",
                    "tabGroups": [{"id": 1, "name": "G"}, {"id": 1, "name": "dup"}, "junk"],
                    "tabs": [
                        {"id": 501, "url": "https://a", "groupId": 1},
                        {"id": 502, "url": "https://b", "groupId": 7},
                        {"id": 501, "url": "https://dup"},
                        {"url": "https://no-id"}
                    ],
                    "activeTabId": 502
                },
                {"id": 11, "name": "Duplicate"}
            ]
        }"#;
        let snapshot = decode_session(text).unwrap();
        assert_eq!(snapshot.workspaces.len(), 1);
        let ws = &snapshot.workspaces[0];
        assert_eq!(ws.tab_groups.len(), 1);
        assert_eq!(ws.tabs.len(), 2);
        assert_eq!(ws.tabs[0].group_id, 1);
        assert_eq!(ws.tabs[1].group_id, NO_GROUP);
    }

    #[test]
    fn test_apply_falls_back_to_first_tab_and_workspace() {
        let text = r#"{
            "version": 2,
            "activeWorkspaceId": 99,
            "workspaces": [
                {"id": 21, "name": "A", "tabs": [{"id": 601, "url": "https://x"}], "activeTabId": 4},
                {"id": 22, "name": "B", "tabs": []}
            ]
        }"#;
        let mut state = ShellState::default();
        let summary = apply_session(decode_session(text).unwrap(), &mut state);
        assert_eq!(summary, RestoreSummary { workspaces: 2, tabs: 1 });
        let active = state.workspaces.active().unwrap();
        assert_eq!(active.id(), 21);
        assert_eq!(active.tabs.active_tab_id(), Some(601));
        assert_eq!(active.tabs.get(0).unwrap().initial_url(), "https://x");
    }
}
