//! Snapshot store
//!
//! Persists whole ledgers as pretty-printed JSON documents, one file per
//! ledger keyed by the ledger's name. Loading a snapshot restores the exact
//! saved state, including identity counters, so record creation after a
//! reload never reuses a retired identity.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;

use super::file_io::{read_json, write_json_atomic};

/// JSON snapshot store rooted at a directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open a store rooted at the given directory, creating it if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> LedgerResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            LedgerError::Persistence(format!(
                "failed to create snapshot directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    /// Open a store at the platform-specific default data directory
    pub fn open_default() -> LedgerResult<Self> {
        let dirs = ProjectDirs::from("", "", "tallybook").ok_or_else(|| {
            LedgerError::Persistence("could not determine a data directory".into())
        })?;
        Self::open(dirs.data_dir())
    }

    /// The directory this store reads and writes
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save a ledger snapshot, keyed by the ledger's name
    ///
    /// Overwrites any previous snapshot of the same ledger. The write is
    /// atomic, so a crash mid-save leaves the old snapshot intact.
    pub fn save(&self, ledger: &Ledger) -> LedgerResult<()> {
        let path = self.snapshot_path(ledger.name())?;
        write_json_atomic(path, ledger)
    }

    /// Load a ledger snapshot by name, `None` if no snapshot exists
    pub fn load(&self, name: &str) -> LedgerResult<Option<Ledger>> {
        let path = self.snapshot_path(name)?;
        read_json(path)
    }

    /// Names of all snapshots in the store, sorted
    pub fn list(&self) -> LedgerResult<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            LedgerError::Persistence(format!(
                "failed to read snapshot directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                LedgerError::Persistence(format!("failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Delete a snapshot by name, returning whether one existed
    pub fn delete(&self, name: &str) -> LedgerResult<bool> {
        let path = self.snapshot_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(LedgerError::Persistence(format!(
                "failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn snapshot_path(&self, name: &str) -> LedgerResult<PathBuf> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Persistence(
                "snapshot name cannot be blank".into(),
            ));
        }
        // Keys must stay within the store directory
        if name.contains('/') || name.contains('\\') {
            return Err(LedgerError::Persistence(format!(
                "snapshot name cannot contain path separators: {}",
                name
            )));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }
}
