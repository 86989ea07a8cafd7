//! Whole-store snapshot on disk.
//!
//! The snapshot is one JSON document holding every item, user and transaction plus the
//! user id counter. Transactions store ids only; on load they are re-checked against the
//! loaded collections by [`Store::repair`].
//!
//! Writes go to a sibling temp file that is then renamed over the old snapshot, so a
//! failed save leaves the previous one intact.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::store_actor::{Store, StoreError};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Snapshot I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Snapshot {} is malformed: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Snapshot {} has unsupported version {found}", .path.display())]
    Version { path: PathBuf, found: u32 },
    #[error("Snapshot {} is inconsistent: {source}", .path.display())]
    Inconsistent {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}

impl PersistenceError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    saved_at: DateTime<Utc>,
    store: Store,
}

/// Writes the whole store to `path`, replacing any previous snapshot.
pub fn save(path: &Path, store: &Store) -> Result<(), PersistenceError> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        saved_at: Utc::now(),
        store: store.clone(),
    };
    let bytes = serde_json::to_vec_pretty(&snapshot).map_err(|source| PersistenceError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    let temp = temp_path(path);
    let write = || -> io::Result<()> {
        let mut file = std::fs::File::create(&temp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        std::fs::rename(&temp, path)
    };
    if let Err(source) = write() {
        let _ = std::fs::remove_file(&temp);
        return Err(PersistenceError::io(path, source));
    }

    info!(
        path = %path.display(),
        items = store.items().len(),
        users = store.users().len(),
        transactions = store.transactions().len(),
        "Snapshot saved"
    );
    Ok(())
}

/// Reads a snapshot and repairs it against itself.
pub fn load(path: &Path) -> Result<Store, PersistenceError> {
    let bytes = std::fs::read(path).map_err(|source| PersistenceError::io(path, source))?;
    let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(PersistenceError::Version {
            path: path.to_path_buf(),
            found: snapshot.version,
        });
    }

    let mut store = snapshot.store;
    store.repair().map_err(|source| PersistenceError::Inconsistent {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(store)
}

/// Like [`load`], but any failure is logged and yields an empty store.
pub fn load_or_default(path: &Path) -> Store {
    match load(path) {
        Ok(store) => store,
        Err(e) if e.is_missing() => {
            warn!(path = %path.display(), "Database does not exist, starting new instance");
            Store::new()
        }
        Err(e) => {
            warn!(error = %e, "Database unreadable, starting new instance");
            Store::new()
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, ItemKind, TransactionDraft, User, UserId, UserKind};
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn furnished_store() -> Store {
        let mut store = Store::new();
        store.add_item(
            Item::from_fields(ItemKind::Appliance, &fields(&["F0001", "Fridge", "4", "899.9", "Acme", "Refrigerators"])).unwrap(),
        );
        store.add_item(Item::from_fields(ItemKind::Hardware, &fields(&["B0LT5", "Bolts", "200", "0.25", "Fasteners"])).unwrap());
        store.add_user(User::from_fields(UserId(1), UserKind::Customer, &fields(&["Bo", "Diaz", "555-123-4567", "1 Main St"])).unwrap());
        store.add_user(User::from_fields(UserId(2), UserKind::Employee, &fields(&["Ann", "Lee", "000123456", "41000.50"])).unwrap());
        let draft = TransactionDraft::from_fields(&fields(&["F0001", "1", "1", "2"])).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap() + chrono::Duration::nanoseconds(123_456_789);
        store.commit_transaction(draft, at).unwrap();
        store
    }

    #[test]
    fn test_missing_snapshot_gives_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database.json");

        let err = load(&path).unwrap_err();
        assert!(err.is_missing());
        assert_eq!(load_or_default(&path), Store::new());
    }

    #[test]
    fn test_garbage_snapshot_gives_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(&path, b"\x00\x01 definitely not json").unwrap();

        assert!(matches!(load(&path), Err(PersistenceError::Format { .. })));
        assert_eq!(load_or_default(&path), Store::new());
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database.json");
        save(&path, &Store::new()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, text.replace("\"version\": 1", "\"version\": 99")).unwrap();

        assert!(matches!(load(&path), Err(PersistenceError::Version { found: 99, .. })));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database.json");
        save(&path, &Store::new()).unwrap();
        save(&path, &Store::new()).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("database.json")]);
    }

    #[test]
    fn test_failed_save_keeps_previous_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database.json");
        save(&path, &Store::new()).unwrap();
        let before = std::fs::read(&path).unwrap();

        // A directory squatting on the temp name makes the write fail.
        std::fs::create_dir(temp_path(&path)).unwrap();
        assert!(save(&path, &Store::new()).is_err());

        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_populated_store_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database.json");
        let saved = furnished_store();
        save(&path, &saved).unwrap();

        let mut loaded = load(&path).unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.items()[0].formatted_price(), "$0.25");
        assert_eq!(loaded.repair(), Ok(0));
    }

    #[test]
    fn test_largest_user_id_falls_back_to_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database.json");
        let mut store = Store::new();
        store.add_user(
            User::from_fields(UserId(u32::MAX), UserKind::Customer, &fields(&["Bo", "Diaz", "555-123-4567", "1 Main St"])).unwrap(),
        );
        save(&path, &store).unwrap();

        assert!(matches!(
            load(&path),
            Err(PersistenceError::Inconsistent { source: StoreError::UserIdsExhausted, .. })
        ));
        assert_eq!(load_or_default(&path), Store::new());
    }
}
