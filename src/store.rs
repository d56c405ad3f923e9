use crate::error::DealHuntError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Device-local string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), DealHuntError>;
}

/// One file per key under a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!("Read {} from {}", key, path.display());
                Some(content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DealHuntError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| DealHuntError::Store(format!("Failed to create data dir: {}", e)))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .map_err(|e| DealHuntError::Store(format!("Failed to write {}: {}", tmp.display(), e)))?;
        // Replace in one step so a crash never leaves a truncated list.
        std::fs::rename(&tmp, &path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            DealHuntError::Store(format!("Failed to replace {}: {}", path.display(), e))
        })?;
        tracing::debug!("Stored {} to {}", key, path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DealHuntError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_creates_dir_on_write() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path().join("nested"));
        assert_eq!(store.get("savedDeals"), None);
        store.set("savedDeals", "[\"1\"]").unwrap();
        assert_eq!(store.get("savedDeals").as_deref(), Some("[\"1\"]"));
        assert!(tmp.path().join("nested/savedDeals.json").exists());
    }

    #[test]
    fn test_overwrite_replaces_whole_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path().to_path_buf());
        store.set("savedDeals", "[\"1\",\"2\",\"3\"]").unwrap();
        store.set("savedDeals", "[\"4\"]").unwrap();
        assert_eq!(store.get("savedDeals").as_deref(), Some("[\"4\"]"));

        let leftovers: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("savedDeals.json")]);
    }

    #[test]
    fn test_keys_are_sanitized() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path().to_path_buf());
        store.set("../escape", "x").unwrap();
        assert!(tmp.path().join("___escape.json").exists());
    }
}
