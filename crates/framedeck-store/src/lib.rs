//! framedeck Store
//!
//! Durable record of demos and frames behind the [`DemoStore`] trait.
//!
//! # Backends
//!
//! - [`SqliteStore`]: SQLite file, pooled connections, foreign keys with
//!   cascading deletes
//! - [`InMemoryStore`]: process memory, for tests and local runs
//!
//! # Example
//!
//! ```rust,ignore
//! use framedeck_store::{DemoStore, PoolConfig, SqliteStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::open("framedeck.db", PoolConfig::default())?;
//! store.ping().await?;
//!
//! for demo in store.list_demos_with_frames().await? {
//!     println!("{} ({} frames)", demo.name, demo.frames.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod memory;
pub mod pool;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use error::{PoolError, StoreError};
pub use memory::InMemoryStore;
pub use pool::{ConnectionPool, PoolConfig, PoolStats, PooledConnection};
pub use sqlite::SqliteStore;
pub use store::{DemoStore, SharedStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
