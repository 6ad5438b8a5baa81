//! Versioned JSON snapshot persistence for the stores.
//!
//! Each store persists to its own file under the configured data
//! directory. A snapshot file is an envelope `{ "version": N, "state": ... }`;
//! on load, a stale version is handed to [`Snapshot::migrate`] before the
//! store is considered ready.
//!
//! Writes happen on every store mutation, synchronously and best-effort:
//! the stores log a warning on failure and carry on. There is no
//! transactionality across the two files; the cart's owner check is the
//! defensive second line when the session file and cart file disagree.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snapshot file names under the data directory.
pub mod files {
    /// Persisted cart state.
    pub const CART: &str = "cart.json";

    /// Persisted session state.
    pub const SESSION: &str = "session.json";
}

/// Errors from loading or saving a snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON or does not match the schema.
    #[error("storage decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Snapshot version has no migration path.
    #[error("unsupported snapshot version {found} (latest is {latest})")]
    UnsupportedVersion { found: u32, latest: u32 },
}

/// A persistable store state with a schema version and migration path.
pub trait Snapshot: Serialize + DeserializeOwned {
    /// Current schema version written by [`JsonStore::save`].
    const VERSION: u32;

    /// Upgrade a `state` value written by an older schema version.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::UnsupportedVersion` when no migration path
    /// exists, or a decode error if the old payload is malformed.
    fn migrate(state: serde_json::Value, version: u32) -> Result<Self, StorageError>;
}

/// On-disk envelope wrapping a snapshot with its schema version.
#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    state: serde_json::Value,
}

/// A JSON snapshot file for one store.
#[derive(Debug, Clone)]
pub struct JsonStore<S> {
    path: PathBuf,
    _snapshot: PhantomData<S>,
}

impl<S: Snapshot> JsonStore<S> {
    /// Create a store backed by the given file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            _snapshot: PhantomData,
        }
    }

    /// Create a store for `file_name` inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path, file_name: &str) -> Self {
        Self::new(dir.join(file_name))
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, migrating older versions.
    ///
    /// A missing file is `Ok(None)` - first launch, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or has a
    /// version with no migration path.
    pub fn load(&self) -> Result<Option<S>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let envelope: Envelope = serde_json::from_str(&raw)?;

        let snapshot = if envelope.version == S::VERSION {
            serde_json::from_value(envelope.state)?
        } else {
            S::migrate(envelope.state, envelope.version)?
        };

        Ok(Some(snapshot))
    }

    /// Write the snapshot, creating the parent directory if needed.
    ///
    /// The write goes to a sibling temp file first and is renamed into
    /// place, so a crash mid-write cannot truncate the previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the filesystem write fails.
    pub fn save(&self, snapshot: &S) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let envelope = Envelope {
            version: S::VERSION,
            state: serde_json::to_value(snapshot)?,
        };

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&envelope)?)?;
        std::fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        label: String,
        #[serde(default)]
        count: u32,
    }

    impl Snapshot for Counter {
        const VERSION: u32 = 2;

        fn migrate(state: serde_json::Value, version: u32) -> Result<Self, StorageError> {
            match version {
                // v1 lacked `count`; serde backfills it via #[serde(default)]
                1 => Ok(serde_json::from_value(state)?),
                other => Err(StorageError::UnsupportedVersion {
                    found: other,
                    latest: Self::VERSION,
                }),
            }
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> JsonStore<Counter> {
        JsonStore::in_dir(dir.path(), "counter.json")
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let snapshot = Counter {
            label: "hits".to_owned(),
            count: 3,
        };

        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), snapshot);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<Counter> =
            JsonStore::new(dir.path().join("nested/deeper/counter.json"));

        store
            .save(&Counter {
                label: "hits".to_owned(),
                count: 0,
            })
            .unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_load_migrates_old_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"{"version": 1, "state": {"label": "hits"}}"#,
        )
        .unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.label, "hits");
        assert_eq!(loaded.count, 0);
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"version": 9, "state": {}}"#).unwrap();

        assert!(matches!(
            store.load(),
            Err(StorageError::UnsupportedVersion { found: 9, .. })
        ));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.load(), Err(StorageError::Decode(_))));
    }
}
