//! SQLite implementation of [`DemoStore`].
//!
//! Every call checks one connection out of the [`ConnectionPool`], runs its
//! queries on the blocking thread pool, and returns the connection when done.
//! Single-row updates run without an explicit transaction; creating a demo
//! with its frames is one transaction.

use crate::error::StoreError;
use crate::pool::{ConnectionPool, PoolConfig};
use crate::store::{validate_seed, DemoStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use framedeck_model::{now, Demo, DemoId, DemoSeed, Frame, FrameId};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

const FRAME_COLUMNS: &str = r#"id, html, "order", demo_id, created_at, updated_at"#;

/// SQLite-backed implementation of [`DemoStore`].
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: ConnectionPool,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and syncs the schema.
    ///
    /// # Errors
    /// - `StoreError::Sqlite` if the file cannot be opened or migrated
    pub fn open(path: impl AsRef<Path>, config: PoolConfig) -> Result<Self, StoreError> {
        let pool = ConnectionPool::open(path, config)?;
        tracing::info!(path = %pool.path().display(), max_size = config.max_size, "opened demo store");
        Ok(Self { pool })
    }

    /// Underlying connection pool
    #[inline]
    #[must_use]
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Runs `f` with a pooled connection on the blocking thread pool.
    async fn with_connection<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let mut conn = self.pool.acquire().await?;
        tokio::task::spawn_blocking(move || f(&mut *conn))
            .await
            .map_err(|e| StoreError::Unavailable(format!("storage task failed: {e}")))?
    }
}

fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn millis_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(idx)?;
    DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, millis))
}

fn read_frame(row: &Row<'_>) -> rusqlite::Result<Frame> {
    Ok(Frame {
        id: parse_column(row, 0)?,
        html: row.get(1)?,
        order: row.get(2)?,
        demo_id: parse_column(row, 3)?,
        created_at: millis_column(row, 4)?,
        updated_at: millis_column(row, 5)?,
    })
}

fn read_demo(row: &Row<'_>) -> rusqlite::Result<Demo> {
    Ok(Demo {
        id: parse_column(row, 0)?,
        name: row.get(1)?,
        frames: Vec::new(),
        created_at: millis_column(row, 2)?,
        updated_at: millis_column(row, 3)?,
    })
}

fn list_all(conn: &Connection) -> Result<Vec<Demo>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, created_at, updated_at FROM demos ORDER BY created_at ASC, rowid ASC",
    )?;
    let mut demos = stmt
        .query_map([], read_demo)?
        .collect::<Result<Vec<_>, _>>()?;

    // Insertion order, so equal `order` values keep their seeded position.
    let mut stmt = conn.prepare(&format!("SELECT {FRAME_COLUMNS} FROM frames ORDER BY rowid ASC"))?;
    let mut frames_by_demo: HashMap<DemoId, Vec<Frame>> = HashMap::new();
    for frame in stmt.query_map([], read_frame)? {
        let frame = frame?;
        frames_by_demo.entry(frame.demo_id).or_default().push(frame);
    }

    for demo in &mut demos {
        demo.frames = frames_by_demo.remove(&demo.id).unwrap_or_default();
    }
    Ok(demos)
}

fn update_html(conn: &Connection, id: FrameId, html: &str) -> Result<Frame, StoreError> {
    let changed = conn.execute(
        "UPDATE frames SET html = ?1, updated_at = ?2 WHERE id = ?3",
        params![html, now().timestamp_millis(), id.to_string()],
    )?;
    if changed == 0 {
        return Err(StoreError::FrameNotFound(id));
    }

    conn.query_row(
        &format!("SELECT {FRAME_COLUMNS} FROM frames WHERE id = ?1"),
        params![id.to_string()],
        read_frame,
    )
    .optional()?
    .ok_or(StoreError::FrameNotFound(id))
}

fn insert_demo(conn: &mut Connection, demo: &Demo) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO demos (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            demo.id.to_string(),
            demo.name,
            demo.created_at.timestamp_millis(),
            demo.updated_at.timestamp_millis(),
        ],
    )?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO frames ({FRAME_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
        ))?;
        for frame in &demo.frames {
            stmt.execute(params![
                frame.id.to_string(),
                frame.html,
                frame.order,
                frame.demo_id.to_string(),
                frame.created_at.timestamp_millis(),
                frame.updated_at.timestamp_millis(),
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

#[async_trait]
impl DemoStore for SqliteStore {
    async fn list_demos_with_frames(&self) -> Result<Vec<Demo>, StoreError> {
        let demos = self.with_connection(|conn| list_all(conn)).await?;
        tracing::debug!(count = demos.len(), "listed demos");
        Ok(demos)
    }

    async fn update_frame_html(&self, id: FrameId, html: String) -> Result<Frame, StoreError> {
        let frame = self
            .with_connection(move |conn| update_html(conn, id, &html))
            .await?;
        tracing::debug!(frame_id = %id, "updated frame html");
        Ok(frame)
    }

    async fn create_demo(&self, seed: DemoSeed) -> Result<Demo, StoreError> {
        validate_seed(&seed)?;
        let demo = seed.into_demo();
        let stored = demo.clone();
        self.with_connection(move |conn| insert_demo(conn, &stored))
            .await?;
        tracing::info!(demo_id = %demo.id, frames = demo.frames.len(), "created demo");
        Ok(demo)
    }

    async fn delete_demo(&self, id: DemoId) -> Result<(), StoreError> {
        let removed = self
            .with_connection(move |conn| {
                Ok(conn.execute("DELETE FROM demos WHERE id = ?1", params![id.to_string()])?)
            })
            .await?;
        if removed == 0 {
            return Err(StoreError::DemoNotFound(id));
        }
        tracing::info!(demo_id = %id, "deleted demo");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.with_connection(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}
