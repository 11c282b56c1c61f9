//! Progress file persistence.
//!
//! The progress file is the single source of truth for what has been
//! attempted. It is rewritten in full on every save.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{Records, StoreError};

/// Loads and saves [`Records`] to a JSON file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted records.
    ///
    /// A missing file is created empty right away.
    pub fn load(&self) -> Result<Records, StoreError> {
        match self.read()? {
            Some(records) => {
                debug!(path = %self.path.display(), records = records.len(), "Loaded progress file");
                Ok(records)
            }
            None => {
                let records = Records::new();
                self.save(&records)?;
                info!(path = %self.path.display(), "Created empty progress file");
                Ok(records)
            }
        }
    }

    /// Read persisted records without creating the file.
    ///
    /// Returns `None` if the file does not exist.
    pub fn read(&self) -> Result<Option<Records>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })
    }

    /// Overwrite the progress file with `records`.
    ///
    /// Writes a sibling temp file and renames it over the target.
    pub fn save(&self, records: &Records) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.tmp_path();
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), records = records.len(), "Saved progress file");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "progress.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DomainStatus, TrackingRecord};

    #[test]
    fn test_load_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let store = RecordStore::new(&path);

        let records = store.load().unwrap();
        assert!(records.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("progress.json"));

        let mut alice = TrackingRecord::new("alice", "0xA");
        alice.succeed(Some("0x01".to_string()));
        let mut bob = TrackingRecord::new("bob", "0xB");
        bob.fail("execution reverted", None);
        let records: Records = vec![alice, bob, TrackingRecord::new("carol", "0xC")]
            .into_iter()
            .collect();

        store.save(&records).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, records);
        assert_eq!(
            loaded.domains().collect::<Vec<_>>(),
            vec!["alice", "bob", "carol"]
        );
        assert_eq!(loaded.get("bob").unwrap().status, DomainStatus::Failed);
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_read_missing_file_does_not_create_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let store = RecordStore::new(&path);

        assert!(store.read().unwrap().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "{not json").unwrap();

        let result = RecordStore::new(&path).load();
        assert!(matches!(result, Err(StoreError::Json { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
    }
}
