//! Session snapshot types for save/restore across restarts
//!
//! This module provides the versioned JSON snapshot of the whole shell state:
//! - `capture`: Build a `SessionSnapshot` from the live graph
//! - `restore`: Decode a snapshot (any supported version) and rebuild the graph
//! - `storage`: Atomic file I/O for the snapshot
//! - `scheduler`: Debounce timer that coalesces saves
//! - `persistence`: Ties the above together with the restore guard
//!
//! Version 1 snapshots lack tab groups, sidebar state and the pane id array;
//! they are read by the same decoder and rewritten as version 2 on the next save.

pub mod capture;
mod persistence;
pub mod restore;
pub mod scheduler;
pub mod storage;

pub use persistence::{RestoreOutcome, SessionPersistence};
pub use scheduler::SaveScheduler;
pub use storage::SessionStore;

use crate::pane::DEFAULT_SPLIT_RATIO;
use crate::recently_closed::RecentlyClosedEntry;
use crate::tab::TabId;
use crate::tab_group::GroupId;
use crate::workspace::{DEFAULT_SIDEBAR_WIDTH, WorkspaceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Snapshot schema version written by this build
pub const CURRENT_VERSION: u32 = 2;

/// Top-level snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub version: u32,
    /// When the snapshot was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active_workspace_id: WorkspaceId,
    pub workspaces: Vec<WorkspaceRecord>,
    #[serde(default)]
    pub split_view: SplitViewRecord,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recently_closed: Vec<RecentlyClosedEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRecord {
    pub id: WorkspaceId,
    #[serde(default)]
    pub name: String,
    /// Hex color, empty when the palette color applies
    #[serde(default)]
    pub accent_color: String,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: f64,
    #[serde(default = "default_true")]
    pub sidebar_expanded: bool,
    #[serde(default)]
    pub tab_groups: Vec<GroupRecord>,
    #[serde(default)]
    pub tabs: Vec<TabRecord>,
    #[serde(default)]
    pub active_tab_id: TabId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub id: GroupId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub id: TabId,
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
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitViewRecord {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_pane_count")]
    pub pane_count: usize,
    #[serde(default)]
    pub pane_tab_ids: Vec<TabId>,
    #[serde(default)]
    pub focused_pane: usize,
    #[serde(default = "default_split_ratio")]
    pub split_ratio: f64,
    #[serde(default = "default_split_ratio")]
    pub grid_split_ratio_x: f64,
    #[serde(default = "default_split_ratio")]
    pub grid_split_ratio_y: f64,
    /// Version 1 left pane
    #[serde(default, skip_serializing)]
    pub primary_tab_id: Option<TabId>,
    /// Version 1 right pane
    #[serde(default, skip_serializing)]
    pub secondary_tab_id: Option<TabId>,
}

impl SplitViewRecord {
    /// Pane ids in slot order, reading the version 1 pair when the array is absent.
    pub fn pane_ids(&self) -> Vec<TabId> {
        if !self.pane_tab_ids.is_empty() {
            return self.pane_tab_ids.clone();
        }
        match (self.primary_tab_id, self.secondary_tab_id) {
            (None, None) => Vec::new(),
            (primary, secondary) => vec![primary.unwrap_or(0), secondary.unwrap_or(0)],
        }
    }
}

impl Default for SplitViewRecord {
    fn default() -> Self {
        Self {
            enabled: false,
            pane_count: default_pane_count(),
            pane_tab_ids: Vec::new(),
            focused_pane: 0,
            split_ratio: DEFAULT_SPLIT_RATIO,
            grid_split_ratio_x: DEFAULT_SPLIT_RATIO,
            grid_split_ratio_y: DEFAULT_SPLIT_RATIO,
            primary_tab_id: None,
            secondary_tab_id: None,
        }
    }
}

fn default_sidebar_width() -> f64 {
    DEFAULT_SIDEBAR_WIDTH
}

fn default_true() -> bool {
    true
}

fn default_pane_count() -> usize {
    crate::pane::MIN_PANES
}

fn default_split_ratio() -> f64 {
    DEFAULT_SPLIT_RATIO
}

/// Failures while reading or writing a session snapshot
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to access session file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("session file does not contain a JSON object")]
    NotAnObject,

    #[error("session version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u64, supported: u32 },

    #[error("session field `{0}` is missing or malformed")]
    MalformedField(&'static str),

    #[error("session contains no usable workspaces")]
    NoWorkspaces,

    #[error("failed to serialize session: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_split_pair_becomes_pane_ids() {
        let record: SplitViewRecord =
            serde_json::from_str(r#"{"enabled":true,"primaryTabId":4,"secondaryTabId":9}"#)
                .unwrap();
        assert_eq!(record.pane_ids(), vec![4, 9]);
        assert_eq!(record.split_ratio, DEFAULT_SPLIT_RATIO);
    }

    #[test]
    fn test_pane_array_wins_over_v1_pair() {
        let record: SplitViewRecord =
            serde_json::from_str(r#"{"paneTabIds":[1,2,3],"primaryTabId":4}"#).unwrap();
        assert_eq!(record.pane_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_v1_fields_are_not_written() {
        let record = SplitViewRecord {
            primary_tab_id: Some(4),
            ..SplitViewRecord::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("primaryTabId"));
        assert!(json.contains("gridSplitRatioX"));
    }

    #[test]
    fn test_workspace_record_defaults_for_v1() {
        let record: WorkspaceRecord =
            serde_json::from_str(r#"{"id":3,"name":"Home","tabs":[]}"#).unwrap();
        assert!(record.tab_groups.is_empty());
        assert!(record.sidebar_expanded);
        assert_eq!(record.sidebar_width, DEFAULT_SIDEBAR_WIDTH);
    }
}
