//! Database schema migrations.
//!
//! `_migrations` records every applied version. Each pending migration runs
//! inside its own transaction together with its bookkeeping row, so a crash
//! mid-upgrade leaves the schema at the previous version.

use super::Error;
use tokio_rusqlite::{Connection, params};

/// A numbered SQL batch.
struct Migration {
    version: i64,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "barcode membership table",
    sql: include_str!("../../migrations/001_barcodes.sql"),
}];

/// Apply every migration newer than the recorded schema version.
///
/// # Errors
///
/// Returns an error if a migration SQL fails to execute; that migration's
/// transaction is rolled back.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                applied_at TEXT NOT NULL
            )",
        )?;

        let current: i64 =
            conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

        for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
            let tx = conn.transaction()?;
            tx.execute_batch(migration.sql)
                .map_err(|e| Error::MigrationFailed(format!("v{} ({}): {e}", migration.version, migration.description)))?;
            tx.execute(
                "INSERT INTO _migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
                params![migration.version, migration.description, chrono::Utc::now().to_rfc3339()],
            )?;
            tx.commit()?;

            tracing::debug!(version = migration.version, description = migration.description, "applied cache migration");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
