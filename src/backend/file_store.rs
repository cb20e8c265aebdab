//! File-backed key/value store for attribution values.
//!
//! The durable-client-storage analog: a flat JSON object persisted under
//! the data directory. Reads are served from memory; every write rewrites
//! the file through a temp-file rename so a crash never leaves it half
//! written.

use super::KeyValueStore;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

pub struct FileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or create) the store at `path`. The parent directory is
    /// created as needed; a malformed file fails here rather than at first
    /// use.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating data directory {}", parent.display()))?;
        }

        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("parsing store file {}", path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("reading store file {}", path.display()));
            }
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn persist(&self, values: &HashMap<String, String>) -> std::io::Result<()> {
        let tmp = self.path.with_file_name(format!(".tmp-{}", Uuid::new_v4()));
        let raw = serde_json::to_string_pretty(values).map_err(std::io::Error::other)?;
        fs::write(&tmp, raw)?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value.to_string());
        if let Err(err) = self.persist(&values) {
            warn!("could not persist {}: {}", self.path.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("attribution.json")).unwrap();

        assert_eq!(store.get("utm_source"), None);
        store.set("utm_source", "fb");
        assert_eq!(store.get("utm_source").as_deref(), Some("fb"));

        store.set("utm_source", "ig");
        assert_eq!(store.get("utm_source").as_deref(), Some("ig"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attribution.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("utm_campaign", "x");
            store.set("referrer", "https://google.com/");
        }

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("utm_campaign").as_deref(), Some("x"));
        assert_eq!(store.get("referrer").as_deref(), Some("https://google.com/"));
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("attribution.json");
        let store = FileStore::open(&path).unwrap();
        store.set("utm_term", "conta de luz");
        assert!(path.exists());
    }

    #[test]
    fn test_open_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attribution.json");
        fs::write(&path, "not json").unwrap();
        assert!(FileStore::open(&path).is_err());
    }
}
