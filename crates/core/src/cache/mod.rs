//! Persistent barcode membership cache.
//!
//! Maps a barcode key to the last observed scheme membership and the time
//! it was written. Two backends share the [`CacheStore`] contract:
//!
//! - [`JsonFileStore`]: one JSON object on disk, rewritten atomically
//! - [`SqliteStore`]: SQLite via tokio-rusqlite with schema migrations
//!
//! Freshness is decided at read time against [`CACHE_TTL_SECS`]; nothing is
//! ever evicted.

pub mod json;
pub mod migrations;
pub mod sqlite;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use crate::Error;
use crate::config::CacheBackend;

pub use json::JsonFileStore;
pub use sqlite::SqliteStore;

/// How long an observation stays fresh (24 hours).
pub const CACHE_TTL_SECS: i64 = 86_400;

/// Freshness window as a chrono duration.
pub fn cache_ttl() -> Duration {
    Duration::seconds(CACHE_TTL_SECS)
}

/// One cached membership observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeRecord {
    /// Cache key; leading zeros are significant.
    pub code: String,
    pub is_part_of_scheme: bool,
    /// When this process wrote the record.
    pub observed_at: DateTime<Utc>,
}

impl BarcodeRecord {
    /// A record observed right now.
    pub fn observed_now(code: impl Into<String>, is_part_of_scheme: bool) -> Self {
        Self { code: code.into(), is_part_of_scheme, observed_at: Utc::now() }
    }

    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.observed_at) < cache_ttl()
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }

    /// Observation time as fractional Unix seconds, the persisted form.
    pub(crate) fn timestamp_secs(&self) -> f64 {
        self.observed_at.timestamp_micros() as f64 / 1_000_000.0
    }

    /// Rebuild a record from its persisted form.
    ///
    /// Returns `None` for timestamps chrono cannot represent.
    pub(crate) fn from_timestamp_secs(code: impl Into<String>, is_part_of_scheme: bool, secs: f64) -> Option<Self> {
        let observed_at = DateTime::from_timestamp_micros((secs * 1_000_000.0).round() as i64)?;
        Some(Self { code: code.into(), is_part_of_scheme, observed_at })
    }
}

/// Storage contract for barcode observations.
///
/// Implementations serialize their own reads and writes: a `get` that
/// starts after an `insert` returns must observe it, and concurrent writes
/// to one key resolve to exactly one of them.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up the record for `code`, if any.
    async fn get(&self, code: &str) -> Result<Option<BarcodeRecord>, Error>;

    /// Replace the record for `record.code` and persist the mapping.
    async fn insert(&self, record: BarcodeRecord) -> Result<(), Error>;

    /// Record an observation made now.
    async fn put(&self, code: &str, is_part_of_scheme: bool) -> Result<(), Error> {
        self.insert(BarcodeRecord::observed_now(code, is_part_of_scheme)).await
    }
}

/// Open the configured backend at `path`.
pub async fn open_store(backend: CacheBackend, path: impl AsRef<Path>) -> Result<Arc<dyn CacheStore>, Error> {
    let path = path.as_ref();
    tracing::info!(backend = ?backend, path = %path.display(), "opening barcode cache");

    let store: Arc<dyn CacheStore> = match backend {
        CacheBackend::Json => Arc::new(JsonFileStore::open(path).await?),
        CacheBackend::Sqlite => Arc::new(SqliteStore::open(path).await?),
    };
    Ok(store)
}
