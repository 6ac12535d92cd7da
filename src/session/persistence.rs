//! Save and restore lifecycle for the session snapshot
//!
//! Change events arm the debounced save; a restore holds saves off until
//! the rebuilt graph has been wired up.

use super::capture::capture_session;
use super::restore::{RestoreSummary, apply_session, decode_session};
use super::{CURRENT_VERSION, SaveScheduler, SessionError, SessionStore};
use crate::events::ChangeEvent;
use crate::state::ShellState;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::{Duration, Instant};

/// Result of a successful restore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No snapshot on disk; state left as it was
    NoSnapshot,
    Restored {
        /// Schema version found in the file
        version: u32,
        /// True when the file was older and will be rewritten
        migrated: bool,
        summary: RestoreSummary,
    },
}

/// Saves and restores the state graph.
///
/// Change events arm a debounced save unless a restore is in progress; a
/// save triggered by `tick` captures the graph as it is at that moment.
#[derive(Debug)]
pub struct SessionPersistence {
    store: SessionStore,
    scheduler: SaveScheduler,
    /// Set while a restored graph is being wired up; suppresses scheduling
    restoring: bool,
    /// An older snapshot was loaded and has not been rewritten yet
    migration_pending: bool,
    last_save_error: Option<String>,
    last_saved_at: Option<DateTime<Utc>>,
}

impl SessionPersistence {
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> Self {
        Self {
            store: SessionStore::new(path.as_ref()),
            scheduler: SaveScheduler::new(debounce),
            restoring: false,
            migration_pending: false,
            last_save_error: None,
            last_saved_at: None,
        }
    }

    /// Load the snapshot into `state`.
    ///
    /// Enters restoring mode, which lasts until `finish_restore`, so the
    /// events fired by the rebuilt graph (and any defaults created after a
    /// failed load) can be dispatched without arming a save. Errors leave
    /// the state untouched.
    pub fn restore(&mut self, state: &mut ShellState) -> Result<RestoreOutcome, SessionError> {
        self.restoring = true;
        self.load_into(state)
    }

    fn load_into(&mut self, state: &mut ShellState) -> Result<RestoreOutcome, SessionError> {
        let Some(text) = self.store.read()? else {
            log::info!("No session snapshot at {:?}", self.store.path());
            return Ok(RestoreOutcome::NoSnapshot);
        };

        let snapshot = decode_session(&text)?;
        let version = snapshot.version;
        let migrated = version < CURRENT_VERSION;
        let summary = apply_session(snapshot, state);

        if migrated {
            self.migration_pending = true;
            log::info!(
                "Loaded version {} session, will rewrite as version {}",
                version,
                CURRENT_VERSION
            );
        }
        log::info!(
            "Restored session ({} workspaces, {} tabs) from {:?}",
            summary.workspaces,
            summary.tabs,
            self.store.path()
        );
        Ok(RestoreOutcome::Restored {
            version,
            migrated,
            summary,
        })
    }

    /// Leave restoring mode; a pending migration arms a save.
    pub fn finish_restore(&mut self, now: Instant) {
        self.restoring = false;
        if self.migration_pending {
            self.scheduler.schedule(now);
        }
    }

    /// React to a change event by arming the debounced save.
    pub fn handle_change(&mut self, event: &ChangeEvent, now: Instant) {
        if self.restoring || !event.affects_snapshot() {
            return;
        }
        self.scheduler.schedule(now);
    }

    /// Save if the debounce deadline has passed. Returns whether a save ran.
    pub fn tick(&mut self, state: &ShellState, now: Instant) -> bool {
        if !self.scheduler.poll(now) {
            return false;
        }
        // Failure is recorded in last_save_error
        let _ = self.save(state);
        true
    }

    /// Serialize and write the graph right away.
    pub fn save(&mut self, state: &ShellState) -> Result<(), SessionError> {
        self.scheduler.cancel();
        let snapshot = capture_session(state);
        let result = serde_json::to_string_pretty(&snapshot)
            .map_err(SessionError::Serialize)
            .and_then(|text| self.store.write(&text));

        match &result {
            Ok(()) => {
                self.migration_pending = false;
                self.last_save_error = None;
                self.last_saved_at = snapshot.saved_at;
                log::info!(
                    "Saved session ({} workspaces) to {:?}",
                    snapshot.workspaces.len(),
                    self.store.path()
                );
            }
            Err(e) => {
                log::error!("Failed to save session: {}", e);
                crate::debug_error!("SESSION", "save to {:?} failed: {}", self.store.path(), e);
                self.last_save_error = Some(e.to_string());
            }
        }
        result
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub fn is_save_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn save_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    pub fn migration_pending(&self) -> bool {
        self.migration_pending
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
