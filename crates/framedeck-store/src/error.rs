//! Error types for framedeck storage
//!
//! Storage failures are never retried here; they propagate to the caller,
//! which decides how to surface them.

use framedeck_model::{DemoId, FrameId};

/// Main storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Referenced frame does not exist
    #[error("frame not found: {0}")]
    FrameNotFound(FrameId),

    /// Referenced demo does not exist
    #[error("demo not found: {0}")]
    DemoNotFound(DemoId),

    /// Input rejected before reaching storage
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Backend could not service the request
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Connection pool failure
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    /// Query failed inside SQLite
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Check if the error names a missing record
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FrameNotFound(_) | Self::DemoNotFound(_))
    }

    /// Check if the backend itself failed, as opposed to the request
    #[inline]
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Pool(_) | Self::Sqlite(_))
    }
}

/// Connection pool errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became free in time
    #[error("timed out after {waited_ms}ms waiting for a connection")]
    AcquireTimeout {
        /// Configured acquire timeout
        waited_ms: u64,
    },

    /// Pool was closed
    #[error("pool closed")]
    Closed,

    /// Opening a fresh connection failed
    #[error("connect failed: {0}")]
    Connect(String),
}
