//! framedeck Server
//!
//! Stateless HTTP mediation between clients and a [`DemoStore`]:
//!
//! | Method | Path           | Body               | Success             |
//! |--------|----------------|--------------------|---------------------|
//! | GET    | `/demos`       |                    | 200, `Demo[]`       |
//! | PUT    | `/frames/{id}` | `{ html: string }` | 200, updated Frame  |
//!
//! Unknown frame ids answer 404, malformed bodies 400, and every other
//! storage failure a generic 500 that is logged but never described to the
//! client.
//!
//! [`DemoStore`]: framedeck_store::DemoStore

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod telemetry;

pub use config::{ConfigError, ServerConfig};
pub use error::{handle_rejection, ApiError};
pub use server::{bootstrap, RunningServer};
pub use telemetry::LogFormat;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
