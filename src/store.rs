//! Persisted import session store.
//!
//! The store is the explicit key-value seam between the import screen
//! and the viewer: written once on a successful import, read once at
//! startup, and explicitly cleared by "back to import". It is a single
//! JSON document under the platform config directory.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::models::PlanogramRow;

/// File name of the session document inside the config directory.
const SESSION_FILE_NAME: &str = "session.json";

/// A persisted import session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Original name of the imported CSV file.
    pub file_name: String,
    /// When the import happened.
    pub imported_at: DateTime<Utc>,
    /// The full parsed row set, preserved verbatim.
    pub rows: Vec<PlanogramRow>,
}

/// Handle to the on-disk session store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Opens the store at its default platform location.
    pub fn open() -> Result<Self> {
        Ok(Self {
            path: Config::config_dir()?.join(SESSION_FILE_NAME),
        })
    }

    /// Creates a store handle at an explicit path.
    #[must_use]
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Checks whether a session document exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Persists a session using atomic write (temp file + rename).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the
    /// document cannot be written (e.g. the disk is full). Callers
    /// abort the screen switch and surface the message inline.
    pub fn save(&self, rows: &[PlanogramRow], file_name: &str) -> Result<()> {
        let session = StoredSession {
            file_name: file_name.to_string(),
            imported_at: Utc::now(),
            rows: rows.to_vec(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create session directory: {}",
                parent.display()
            ))?;
        }

        let content =
            serde_json::to_string_pretty(&session).context("Failed to serialize session")?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).context(format!(
            "Failed to write session file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &self.path).context(format!(
            "Failed to rename session file to: {}",
            self.path.display()
        ))?;

        Ok(())
    }

    /// Reads the stored session, if any.
    ///
    /// Returns `Ok(None)` when no session document exists.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).context(format!(
            "Failed to read session file: {}",
            self.path.display()
        ))?;

        let session: StoredSession = serde_json::from_str(&content).context(format!(
            "Failed to parse session file: {}",
            self.path.display()
        ))?;

        Ok(Some(session))
    }

    /// Removes the session document.
    ///
    /// Clearing an absent session is not an error.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context(format!(
                "Failed to remove session file: {}",
                self.path.display()
            ))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlanogramRow;
    use tempfile::TempDir;

    fn temp_store() -> (SessionStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::at_path(dir.path().join(SESSION_FILE_NAME));
        (store, dir)
    }

    fn sample_rows() -> Vec<PlanogramRow> {
        vec![
            PlanogramRow::with_frentes("1", "Refresco Cola 600ml", "2"),
            PlanogramRow::new("2", "Agua Natural 1L"),
        ]
    }

    #[test]
    fn test_load_absent_session() {
        let (store, _dir) = temp_store();
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (store, _dir) = temp_store();
        let rows = sample_rows();

        store.save(&rows, "planograma.csv").unwrap();
        assert!(store.exists());

        let session = store.load().unwrap().unwrap();
        assert_eq!(session.file_name, "planograma.csv");
        assert_eq!(session.rows, rows);
    }

    #[test]
    fn test_clear_removes_session() {
        let (store, _dir) = temp_store();
        store.save(&sample_rows(), "planograma.csv").unwrap();

        store.clear().unwrap();
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_save_overwrites_previous_session() {
        let (store, _dir) = temp_store();
        store.save(&sample_rows(), "first.csv").unwrap();
        store
            .save(&[PlanogramRow::new("9", "Solo")], "second.csv")
            .unwrap();

        let session = store.load().unwrap().unwrap();
        assert_eq!(session.file_name, "second.csv");
        assert_eq!(session.rows.len(), 1);
    }
}
