//! On-disk persistence for the memory store.
//!
//! ```text
//! <directory>/
//! ├── paths.json   # versioned snapshot of all rows
//! └── last_sweep   # unix timestamp of the last sweep
//! ```
//!
//! Both files are replaced atomically (write to `*.tmp`, then rename).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

use super::PathCacheEntry;

pub const SNAPSHOT_FILE: &str = "paths.json";
pub const SWEEP_MARKER_FILE: &str = "last_sweep";
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub next_id: u64,
    pub entries: Vec<PathCacheEntry>,
}

impl Snapshot {
    pub fn new(next_id: u64, entries: Vec<PathCacheEntry>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            next_id,
            entries,
        }
    }
}

/// File locations inside a cache directory.
#[derive(Debug, Clone)]
pub struct SnapshotFiles {
    snapshot: PathBuf,
    marker: PathBuf,
}

impl SnapshotFiles {
    pub fn new(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(|err| StoreError::Io(dir.to_path_buf(), err))?;
        Ok(Self {
            snapshot: dir.join(SNAPSHOT_FILE),
            marker: dir.join(SWEEP_MARKER_FILE),
        })
    }

    /// Load the snapshot, `None` if none was written yet.
    pub fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let Some(json) = read_optional(&self.snapshot)? else {
            return Ok(None);
        };
        let snapshot: Snapshot = serde_json::from_str(&json)
            .map_err(|err| StoreError::Snapshot(self.snapshot.clone(), err))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::Version {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        crate::debug!("cache"; "restored {} rows from {}", snapshot.entries.len(), self.snapshot.display());
        Ok(Some(snapshot))
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|err| StoreError::Snapshot(self.snapshot.clone(), err))?;
        write_atomic(&self.snapshot, json.as_bytes())
    }

    /// Timestamp of the last sweep. A missing or garbled marker counts as never.
    pub fn load_marker(&self) -> Result<Option<u64>, StoreError> {
        Ok(read_optional(&self.marker)?.and_then(|text| text.trim().parse().ok()))
    }

    pub fn save_marker(&self, timestamp: u64) -> Result<(), StoreError> {
        write_atomic(&self.marker, timestamp.to_string().as_bytes())
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StoreError::Io(path.to_path_buf(), err)),
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let temp = path.with_extension("tmp");
    fs::write(&temp, bytes).map_err(|err| StoreError::Io(temp.clone(), err))?;
    fs::rename(&temp, path).map_err(|err| StoreError::Io(path.to_path_buf(), err))
}
