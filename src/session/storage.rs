//! File I/O for session snapshots
//!
//! Snapshots are stored as pretty-printed JSON in `~/.config/tabshell/session.json`
//! unless the config overrides the location.

use super::SessionError;
use std::fs;
use std::path::{Path, PathBuf};

/// A snapshot file on disk
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the snapshot text.
    ///
    /// Returns `None` if the file doesn't exist or is blank.
    pub fn read(&self) -> Result<Option<String>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        if contents.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(contents))
    }

    /// Write snapshot text atomically (temp file then rename).
    pub fn write(&self, contents: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| SessionError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, contents).map_err(|source| SessionError::Io {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|source| self.io_error(source))?;
        Ok(())
    }

    /// Remove the snapshot file if present
    pub fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|source| self.io_error(source))?;
        }
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_none() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_blank_file_reads_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "  \n").unwrap();
        assert!(SessionStore::new(path).read().unwrap().is_none());
    }

    #[test]
    fn test_write_creates_parent_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = SessionStore::new(&path);
        store.write("{\"version\": 2}").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("{\"version\": 2}"));
        assert!(!path.with_extension("json.tmp").exists());

        store.clear().unwrap();
        assert!(!store.exists());
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = SessionStore::new(blocker.join("session.json"));
        assert!(matches!(store.write("{}"), Err(SessionError::Io { .. })));
    }
}
