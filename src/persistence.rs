//! Durable key/value snapshot storage
//!
//! JSON files under the user config directory, one file per key. Every
//! operation is non-throwing: failures are logged and reported as "absent"
//! so that a corrupted blob can never prevent the application from
//! starting — the worst case is starting with empty state.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::constants::storage;

/// Key/value store writing one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    base_dir: PathBuf,
}

impl SnapshotStore {
    /// Store rooted at the user's config directory
    pub fn new() -> Self {
        let mut base_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base_dir.push(storage::APP_DIR);
        Self { base_dir }
    }

    /// Store rooted at an explicit directory (used by tests)
    pub fn with_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    /// Serialize `value` and write it under `key`. Failures are logged and
    /// swallowed; persistence is best-effort.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let path = self.path_for(key);
        let contents = match serde_json::to_string(value) {
            Ok(contents) => contents,
            Err(err) => {
                error!(key = %key, error = %err, "Failed to serialize snapshot");
                return;
            }
        };
        if let Err(err) = fs::create_dir_all(&self.base_dir) {
            error!(dir = %self.base_dir.display(), error = %err, "Failed to create storage directory");
            return;
        }
        match fs::write(&path, contents) {
            Ok(()) => debug!(key = %key, path = %path.display(), "Saved snapshot"),
            Err(err) => error!(path = %path.display(), error = %err, "Failed to write snapshot"),
        }
    }

    /// Read and deserialize the value stored under `key`.
    /// A missing file, unreadable file and corrupt JSON all yield `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(key = %key, "No persisted snapshot");
                return None;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to read snapshot");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Stored snapshot is corrupt, ignoring");
                None
            }
        }
    }

    /// Delete the value stored under `key`; a missing key is not an error
    pub fn remove(&self, key: &str) {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => debug!(key = %key, "Removed snapshot"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => error!(path = %path.display(), error = %err, "Failed to remove snapshot"),
        }
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::with_dir(dir.path());

        let value = Sample {
            name: "round-trip".to_string(),
            count: 42,
        };
        store.save("sample", &value);

        let loaded: Option<Sample> = store.load("sample");
        assert_eq!(loaded, Some(value));
    }

    #[test]
    fn test_load_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::with_dir(dir.path());

        let loaded: Option<Sample> = store.load("nothing-here");
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_load_corrupt_json_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::with_dir(dir.path());
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(dir.path().join("broken.json"), "{not json at all").unwrap();

        let loaded: Option<Sample> = store.load("broken");
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_remove_deletes_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::with_dir(dir.path());

        let value = Sample {
            name: "to-remove".to_string(),
            count: 1,
        };
        store.save("gone", &value);
        assert!(store.load::<Sample>("gone").is_some());

        store.remove("gone");
        assert!(store.load::<Sample>("gone").is_none());

        // Removing twice is fine
        store.remove("gone");
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("nested");
        let store = SnapshotStore::with_dir(&nested);

        let value = Sample {
            name: "nested".to_string(),
            count: 7,
        };
        store.save("sample", &value);
        assert_eq!(store.load::<Sample>("sample"), Some(value));
    }
}
