//! File-backed session store.
//!
//! Reads are served from memory; every mutation rewrites the backing JSON
//! file, so a `get` right after `set` observes the new value and the store
//! survives process restarts.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::TokenStore;

pub(crate) const STORE_FILE: &str = "session_store.json";

/// On-disk shape. `saved_at` records the last rewrite for diagnostics.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    saved_at: DateTime<Utc>,
    entries: HashMap<String, String>,
}

/// Write-through JSON store under the platform data directory.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileTokenStore {
    /// Opens the store in the per-user data directory.
    pub fn new() -> io::Result<Self> {
        let proj_dirs = ProjectDirs::from("", "medica", "medica")
            .ok_or_else(|| {
                io::Error::other("unable to determine data directory")
            })?;
        Ok(Self::with_path(proj_dirs.data_dir().join(STORE_FILE)))
    }

    /// Opens the store at an explicit path. Used by tests and by hosts that
    /// manage their own state directory.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> HashMap<String, String> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str::<StoreFile>(&raw) {
            Ok(file) => file.entries,
            Err(e) => {
                // A corrupted store means a fresh anonymous session, not a
                // startup failure.
                log::warn!(
                    "[FileTokenStore] ignoring corrupted store at {:?}: {}",
                    path,
                    e
                );
                HashMap::new()
            }
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        let file = StoreFile {
            saved_at: Utc::now(),
            entries: entries.clone(),
        };
        if let Err(e) = self.write_file(&file) {
            log::warn!(
                "[FileTokenStore] failed to persist {:?}: {}",
                self.path,
                e
            );
        }
    }

    fn write_file(&self, file: &StoreFile) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, json)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn delete(&self, key: &str) {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{TokenStoreExt, keys};
    use tempfile::TempDir;

    #[test]
    fn set_is_immediately_visible_and_persistent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);

        let store = FileTokenStore::with_path(&path);
        store.set(keys::ACCESS_TOKEN, "T1");
        assert_eq!(store.get(keys::ACCESS_TOKEN).as_deref(), Some("T1"));

        // A second instance over the same file observes the write.
        let reopened = FileTokenStore::with_path(&path);
        assert_eq!(reopened.get(keys::ACCESS_TOKEN).as_deref(), Some("T1"));
    }

    #[test]
    fn repeated_set_get_cycles_are_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::with_path(dir.path().join(STORE_FILE));

        for _ in 0..3 {
            store.set(keys::REFRESH_TOKEN, "R1");
            assert_eq!(
                store.get(keys::REFRESH_TOKEN).as_deref(),
                Some("R1")
            );
        }

        let reopened = FileTokenStore::with_path(store.path());
        assert_eq!(reopened.get(keys::REFRESH_TOKEN).as_deref(), Some("R1"));
        assert!(reopened.get(keys::ACCESS_TOKEN).is_none());
    }

    #[test]
    fn delete_removes_key_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);

        let store = FileTokenStore::with_path(&path);
        store.set(keys::ACCESS_TOKEN, "T1");
        store.set(keys::REFRESH_TOKEN, "R1");
        store.clear_credentials();

        let reopened = FileTokenStore::with_path(&path);
        assert!(reopened.get(keys::ACCESS_TOKEN).is_none());
        assert!(reopened.get(keys::REFRESH_TOKEN).is_none());
    }

    #[test]
    fn deleting_absent_key_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);

        let store = FileTokenStore::with_path(&path);
        store.delete(keys::ACCESS_TOKEN);
        assert!(!path.exists());
    }

    #[test]
    fn corrupted_store_yields_fresh_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "not json at all").unwrap();

        let store = FileTokenStore::with_path(&path);
        assert!(store.get(keys::ACCESS_TOKEN).is_none());

        store.set(keys::ACCESS_TOKEN, "T1");
        let reopened = FileTokenStore::with_path(&path);
        assert_eq!(reopened.get(keys::ACCESS_TOKEN).as_deref(), Some("T1"));
    }

    #[cfg(unix)]
    #[test]
    fn backing_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        let store = FileTokenStore::with_path(&path);
        store.set(keys::ACCESS_TOKEN, "T1");

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
