//! SQLite connection setup and schema sync

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a connection with foreign keys enforced.
pub fn open_connection(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Bring the schema in line with the demo/frame model.
///
/// Timestamps are stored as milliseconds since the Unix epoch.
pub fn migrate(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS demos (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL CHECK (length(name) > 0),
          created_at INTEGER NOT NULL,
          updated_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS frames (
          id TEXT PRIMARY KEY,
          html TEXT NOT NULL,
          "order" INTEGER NOT NULL,
          demo_id TEXT NOT NULL REFERENCES demos(id) ON DELETE CASCADE,
          created_at INTEGER NOT NULL,
          updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS frames_demo_id ON frames(demo_id);
        "#,
    )?;
    tracing::info!("Schema synchronized with the database");
    Ok(())
}
