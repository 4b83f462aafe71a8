//! Single-file JSON cache backend.
//!
//! The whole mapping is one JSON object keyed by barcode:
//!
//! ```json
//! {"036000291452": {"isPartOfReturnScheme": true, "timestamp": 1700000000.25}}
//! ```
//!
//! Every write serializes the full mapping to a sibling `.tmp` file, syncs
//! it and renames it over the original, so the file on disk is always
//! either the previous or the next complete mapping.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{BarcodeRecord, CacheStore};
use crate::Error;

/// Persisted value for one barcode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    is_part_of_return_scheme: bool,
    timestamp: f64,
}

impl From<&BarcodeRecord> for StoredEntry {
    fn from(record: &BarcodeRecord) -> Self {
        Self { is_part_of_return_scheme: record.is_part_of_scheme, timestamp: record.timestamp_secs() }
    }
}

/// Cache backed by one JSON file.
///
/// The mapping is held in memory behind a single async mutex; reads and
/// writes both take it, so a write is visible to every read that starts
/// after it returns.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, StoredEntry>>,
}

impl JsonFileStore {
    /// Open the cache file at `path`.
    ///
    /// A missing file is created holding an empty mapping. A file that
    /// cannot be read or parsed is logged and treated as empty; it is
    /// replaced on the next write.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "cache file is not a valid mapping, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty = BTreeMap::new();
                persist(&path, &empty).await?;
                empty
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cache file is unreadable, starting empty");
                BTreeMap::new()
            }
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "loaded JSON cache");

        Ok(Self { path, entries: Mutex::new(entries) })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CacheStore for JsonFileStore {
    async fn get(&self, code: &str) -> Result<Option<BarcodeRecord>, Error> {
        let entries = self.entries.lock().await;
        Ok(entries
            .get(code)
            .and_then(|entry| BarcodeRecord::from_timestamp_secs(code, entry.is_part_of_return_scheme, entry.timestamp)))
    }

    async fn insert(&self, record: BarcodeRecord) -> Result<(), Error> {
        let mut entries = self.entries.lock().await;

        // The in-memory mapping only changes once the rename has committed.
        let mut next = entries.clone();
        next.insert(record.code.clone(), StoredEntry::from(&record));
        persist(&self.path, &next).await?;
        *entries = next;

        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn persist(path: &Path, entries: &BTreeMap<String, StoredEntry>) -> Result<(), Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(format!("creating cache directory {}", parent.display()), e))?;
    }

    let bytes = serde_json::to_vec(entries)?;
    let tmp = temp_path(path);

    let mut file = fs::File::create(&tmp)
        .await
        .map_err(|e| Error::io(format!("creating {}", tmp.display()), e))?;
    file.write_all(&bytes)
        .await
        .map_err(|e| Error::io(format!("writing {}", tmp.display()), e))?;
    file.sync_all()
        .await
        .map_err(|e| Error::io(format!("syncing {}", tmp.display()), e))?;
    drop(file);

    fs::rename(&tmp, path)
        .await
        .map_err(|e| Error::io(format!("replacing {}", path.display()), e))
}
