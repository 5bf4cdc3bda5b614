//! framedeck Model
//!
//! Records shared by every layer of framedeck:
//! - `Demo`: a named, owned collection of frames
//! - `Frame`: one ordered unit of HTML content
//! - Typed identifiers and the JSON wire shapes exchanged over HTTP
//!
//! Frames are ordered by their `order` field, never by storage position.
//! Consumers call [`Demo::sort_frames`] (a stable sort) before presenting them.
//!
//! # Example
//!
//! ```rust
//! use framedeck_model::Demo;
//!
//! let demo = Demo::new("Intro")
//!     .with_frame(2, "<b>2</b>")
//!     .with_frame(1, "<b>1</b>")
//!     .sorted();
//!
//! assert_eq!(demo.frames[0].html, "<b>1</b>");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod demo;
pub mod ids;
pub mod wire;

pub use demo::{now, Demo, DemoSeed, Frame, FrameSeed};
pub use ids::{DemoId, FrameId};
pub use wire::{ErrorBody, UpdateFrameHtml};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
