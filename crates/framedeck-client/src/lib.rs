//! framedeck Client
//!
//! Everything a presentation shell needs to browse and edit demos, without
//! the shell itself:
//!
//! - [`FrameApi`]: the two HTTP operations, with a [`reqwest`] implementation
//! - [`DemoCache`]: last fetched demo list and its load status
//! - [`EditorState`]: Browsing/Viewing state machine driven by value
//! - [`Session`]: ties the three together for one user
//!
//! # Example
//!
//! ```rust,ignore
//! use framedeck_client::{ClientConfig, HttpApi, Session};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpApi::new(ClientConfig::default())?;
//! let mut session = Session::new(api);
//! session.load().await;
//!
//! let first = session.cache().demos()[0].id;
//! session.open_demo(first);
//! session.apply(|editor| editor.edit_content("<h1>Hello</h1>"));
//! session.save().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod api;
pub mod cache;
pub mod config;
pub mod editor;
pub mod error;
pub mod presentation;
pub mod session;

pub use api::{FrameApi, HttpApi};
pub use cache::{DemoCache, LoadStatus};
pub use config::ClientConfig;
pub use editor::{EditorState, FrameOption, Notice, SaveOutcome, Screen, Selection};
pub use error::ClientError;
pub use presentation::{Presentation, Theme, ViewMode, Viewport};
pub use session::Session;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
