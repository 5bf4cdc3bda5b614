//! Connection pool for the SQLite backend
//!
//! Bounds concurrent backend load:
//! - At most `max_size` connections are checked out at once
//! - Acquisition waits up to `acquire_timeout_ms`, then fails
//! - Returned connections idle for longer than `idle_timeout_ms` are closed,
//!   keeping at least `min_idle`
//!
//! A [`PooledConnection`] goes back to the pool when dropped, whether the
//! query that used it succeeded or not.

use crate::error::{PoolError, StoreError};
use crate::schema;
use parking_lot::Mutex;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Pool sizing and timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum connections checked out at once
    pub max_size: usize,
    /// Connections kept open while idle
    pub min_idle: usize,
    /// How long `acquire` waits for a free slot
    pub acquire_timeout_ms: u64,
    /// How long a returned connection may sit unused
    pub idle_timeout_ms: u64,
}

impl PoolConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With max pool size
    #[inline]
    #[must_use]
    pub fn with_max_size(mut self, max: usize) -> Self {
        self.max_size = max;
        self
    }

    /// With acquisition timeout
    #[inline]
    #[must_use]
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With idle timeout
    #[inline]
    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 5,
            min_idle: 0,
            acquire_timeout_ms: 30_000,
            idle_timeout_ms: 10_000,
        }
    }
}

/// Pool statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Total connections opened
    pub total_created: usize,
    /// Connections currently checked out
    pub in_use: usize,
    /// Connections waiting for reuse
    pub idle: usize,
}

#[derive(Debug)]
struct IdleConnection {
    conn: Connection,
    since: Instant,
}

#[derive(Debug)]
struct PoolInner {
    path: PathBuf,
    config: PoolConfig,
    /// Oldest first; reuse takes from the back
    idle: Mutex<Vec<IdleConnection>>,
    permits: Arc<Semaphore>,
    stats: Mutex<PoolStats>,
}

impl PoolInner {
    fn take_idle(&self) -> Option<Connection> {
        let idle_timeout = Duration::from_millis(self.config.idle_timeout_ms);
        let mut idle = self.idle.lock();

        while idle.len() > self.config.min_idle
            && idle.first().is_some_and(|c| c.since.elapsed() >= idle_timeout)
        {
            idle.remove(0);
            tracing::debug!(path = %self.path.display(), "closed idle connection");
        }

        let conn = idle.pop().map(|c| c.conn);
        self.stats.lock().idle = idle.len();
        conn
    }

    fn open(&self) -> Result<Connection, PoolError> {
        let conn =
            schema::open_connection(&self.path).map_err(|e| PoolError::Connect(e.to_string()))?;
        self.stats.lock().total_created += 1;
        Ok(conn)
    }

    fn give_back(&self, conn: Connection) {
        let mut idle = self.idle.lock();
        if !self.permits.is_closed() {
            idle.push(IdleConnection {
                conn,
                since: Instant::now(),
            });
        }
        // Else: drop connection

        let mut stats = self.stats.lock();
        stats.idle = idle.len();
        stats.in_use = stats.in_use.saturating_sub(1);
    }
}

/// Bounded pool of SQLite connections to one database file
#[derive(Debug, Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Open pool, sync the schema, and pre-open `min_idle` connections
    ///
    /// # Errors
    /// - `StoreError::Sqlite` if the database cannot be opened or migrated
    pub fn open(path: impl AsRef<Path>, config: PoolConfig) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let first = schema::open_connection(&path)?;
        schema::migrate(&first)?;

        let mut idle = Vec::with_capacity(config.min_idle);
        if config.min_idle > 0 {
            idle.push(IdleConnection {
                conn: first,
                since: Instant::now(),
            });
        }
        while idle.len() < config.min_idle {
            idle.push(IdleConnection {
                conn: schema::open_connection(&path)?,
                since: Instant::now(),
            });
        }

        let stats = PoolStats {
            total_created: idle.len().max(1),
            in_use: 0,
            idle: idle.len(),
        };

        Ok(Self {
            inner: Arc::new(PoolInner {
                path,
                config,
                idle: Mutex::new(idle),
                permits: Arc::new(Semaphore::new(config.max_size.max(1))),
                stats: Mutex::new(stats),
            }),
        })
    }

    /// Acquire a connection (reuse or open)
    ///
    /// # Errors
    /// - `PoolError::AcquireTimeout` if all connections stay busy
    /// - `PoolError::Closed` after [`ConnectionPool::close`]
    /// - `PoolError::Connect` if a fresh connection cannot be opened
    pub async fn acquire(&self) -> Result<PooledConnection, PoolError> {
        let waited_ms = self.inner.config.acquire_timeout_ms;
        let permit = match tokio::time::timeout(
            Duration::from_millis(waited_ms),
            Arc::clone(&self.inner.permits).acquire_owned(),
        )
        .await
        {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(PoolError::Closed),
            Err(_) => {
                tracing::warn!(waited_ms, "connection pool exhausted");
                return Err(PoolError::AcquireTimeout { waited_ms });
            }
        };

        let conn = match self.inner.take_idle() {
            Some(conn) => conn,
            None => self.inner.open()?,
        };
        self.inner.stats.lock().in_use += 1;

        Ok(PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(&self.inner),
            _permit: permit,
        })
    }

    /// Stop handing out connections and close idle ones
    pub fn close(&self) {
        self.inner.permits.close();
        let mut idle = self.inner.idle.lock();
        idle.clear();
        self.inner.stats.lock().idle = 0;
    }

    /// Get pool statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        *self.inner.stats.lock()
    }

    /// Get pool configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Database file backing this pool
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

/// Connection checked out of a [`ConnectionPool`]
#[derive(Debug)]
pub struct PooledConnection {
    conn: Option<Connection>,
    pool: Arc<PoolInner>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        // Only `Drop` takes the connection out.
        self.conn.as_ref().unwrap_or_else(|| unreachable!("connection taken before drop"))
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().unwrap_or_else(|| unreachable!("connection taken before drop"))
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.give_back(conn);
        }
    }
}
