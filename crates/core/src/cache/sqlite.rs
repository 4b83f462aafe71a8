//! SQLite cache backend.
//!
//! Opens the database, applies the connection pragmas (WAL mode), runs
//! migrations and stores one row per barcode key.

use std::path::Path;

use async_trait::async_trait;
use tokio_rusqlite::{Connection, params, rusqlite};

use super::{BarcodeRecord, CacheStore, migrations};
use crate::Error;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// Cache database handle.
///
/// Wraps a tokio-rusqlite Connection that runs every statement on one
/// background thread, so reads and writes are serialized.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pub(crate) conn: Connection,
}

impl SqliteStore {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::prepare(conn).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::prepare(conn).await
    }

    async fn prepare(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(PRAGMAS)?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for SqliteStore {
    async fn get(&self, code: &str) -> Result<Option<BarcodeRecord>, Error> {
        let code = code.to_string();
        self.conn
            .call(move |conn| -> Result<Option<BarcodeRecord>, Error> {
                let mut stmt =
                    conn.prepare("SELECT is_part_of_return_scheme, timestamp FROM barcodes WHERE code = ?1")?;

                let result = stmt.query_row(params![code], |row| {
                    Ok((row.get::<_, i32>(0)? == 1, row.get::<_, f64>(1)?))
                });

                match result {
                    Ok((is_part_of_scheme, timestamp)) => {
                        Ok(BarcodeRecord::from_timestamp_secs(code, is_part_of_scheme, timestamp))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Upsert: inserts if the code is new, replaces the row otherwise.
    async fn insert(&self, record: BarcodeRecord) -> Result<(), Error> {
        let timestamp = record.timestamp_secs();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO barcodes (code, is_part_of_return_scheme, timestamp)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(code) DO UPDATE SET
                        is_part_of_return_scheme = excluded.is_part_of_return_scheme,
                        timestamp = excluded.timestamp",
                    params![&record.code, record.is_part_of_scheme as i32, timestamp],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}
