//! Persistent key/value storage for client state.
//!
//! Values are strings stored under fixed keys in a single JSON object file.
//! The file is replaced through a temporary sibling, so a reader sees either
//! the old or the new contents.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::runtime::Runtime;

/// Key of the JSON-encoded user identity record.
pub const USER_KEY: &str = "myvakeel_user";

/// Key of the language preference.
pub const LANGUAGE_KEY: &str = "myvakeel_language";

/// File name of the store inside the state directory.
pub const STORAGE_FILE: &str = "local_storage.json";

pub struct LocalStorage<'a, R: Runtime> {
    runtime: &'a R,
    dir: PathBuf,
}

impl<'a, R: Runtime> LocalStorage<'a, R> {
    pub fn new(runtime: &'a R, dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            dir: dir.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE)
    }

    fn tmp_path(&self) -> PathBuf {
        self.path().with_extension("json.tmp")
    }

    #[tracing::instrument(skip(self))]
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    #[tracing::instrument(skip(self, value))]
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    /// Removes a key. Returns whether it was present.
    #[tracing::instrument(skip(self))]
    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.load()?;
        let removed = entries.remove(key).is_some();
        if removed {
            self.save(&entries)?;
        }
        Ok(removed)
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let path = self.path();
        if !self.runtime.exists(&path) {
            debug!("No storage file at {}, starting empty", path.display());
            return Ok(BTreeMap::new());
        }

        let content = self.runtime.read_to_string(&path)?;
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    "Ignoring unreadable storage file {}: {}",
                    path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    #[tracing::instrument(skip(self, entries))]
    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let path = self.path();
        let tmp_path = self.tmp_path();
        self.runtime.create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(entries)?;
        self.runtime
            .write(&tmp_path, json.as_bytes())
            .with_context(|| format!("Failed to write storage file {}", tmp_path.display()))?;
        self.runtime.rename(&tmp_path, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::Sequence;
    use mockall::predicate::eq;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn test_get_from_missing_file() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("/state/local_storage.json")))
            .returning(|_| false);

        let storage = LocalStorage::new(&runtime, "/state");
        assert_eq!(storage.get(LANGUAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_writes_json_object() {
        // --- Setup ---
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok(r#"{"myvakeel_user": "{}"}"#.to_string()));
        runtime
            .expect_create_dir_all()
            .with(eq(PathBuf::from("/state")))
            .times(1)
            .returning(|_| Ok(()));
        let mut seq = Sequence::new();
        runtime
            .expect_write()
            .withf(|path, contents| {
                let written: BTreeMap<String, String> = serde_json::from_slice(contents).unwrap();
                path == Path::new("/state/local_storage.json.tmp")
                    && written.get(LANGUAGE_KEY).map(String::as_str) == Some("hi")
                    && written.contains_key(USER_KEY)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        runtime
            .expect_rename()
            .with(
                eq(PathBuf::from("/state/local_storage.json.tmp")),
                eq(PathBuf::from("/state/local_storage.json")),
            )
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        // --- Execute ---
        let storage = LocalStorage::new(&runtime, "/state");
        storage.set(LANGUAGE_KEY, "hi").unwrap();
    }

    #[test]
    fn test_failed_write_leaves_store_untouched() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_create_dir_all().returning(|_| Ok(()));
        runtime
            .expect_write()
            .returning(|_, _| Err(anyhow::anyhow!("disk full")));
        runtime.expect_rename().never();

        let storage = LocalStorage::new(&runtime, "/state");
        let err = storage.set(LANGUAGE_KEY, "hi").unwrap_err();
        assert!(err.to_string().contains("local_storage.json.tmp"));
    }

    #[test]
    fn test_truncated_file_reads_as_empty() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(STORAGE_FILE),
            r#"{"myvakeel_language": "h"#,
        )
        .unwrap();

        let storage = LocalStorage::new(&runtime, dir.path());
        assert_eq!(storage.get(LANGUAGE_KEY).unwrap(), None);

        // The next write replaces the damaged file
        storage.set(LANGUAGE_KEY, "hi").unwrap();
        assert_eq!(storage.get(LANGUAGE_KEY).unwrap().as_deref(), Some("hi"));
        assert!(!dir.path().join("local_storage.json.tmp").exists());
    }

    #[test]
    fn test_round_trip_on_disk() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(&runtime, dir.path().join("myvakeel"));

        storage.set(LANGUAGE_KEY, "ta").unwrap();
        assert_eq!(storage.get(LANGUAGE_KEY).unwrap().as_deref(), Some("ta"));

        assert!(storage.remove(LANGUAGE_KEY).unwrap());
        assert!(!storage.remove(LANGUAGE_KEY).unwrap());
        assert_eq!(storage.get(LANGUAGE_KEY).unwrap(), None);
    }
}
