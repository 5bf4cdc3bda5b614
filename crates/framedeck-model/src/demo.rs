//! Demo and frame records
//!
//! A `Demo` owns its frames. Each `Frame` carries an `order` sort key that is
//! neither unique nor gapless; ties keep their relative position.

use crate::ids::{DemoId, FrameId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current time truncated to millisecond precision, the resolution the store keeps.
#[must_use]
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// One ordered unit of HTML content belonging to a demo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Frame ID
    pub id: FrameId,
    /// Sort key within the owning demo
    pub order: i32,
    /// Raw markup, never validated
    pub html: String,
    /// Owning demo (lookup only)
    pub demo_id: DemoId,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Frame {
    /// Create new frame for a demo
    #[must_use]
    pub fn new(demo_id: DemoId, order: i32, html: impl Into<String>) -> Self {
        let now = now();
        Self {
            id: FrameId::new(),
            order,
            html: html.into(),
            demo_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Label shown in frame pickers
    #[inline]
    #[must_use]
    pub fn label(&self) -> String {
        format!("Frame {}", self.order)
    }
}

/// A named collection of ordered HTML frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demo {
    /// Demo ID
    pub id: DemoId,
    /// Display name, never empty once stored
    pub name: String,
    /// Owned frames, in whatever order the producer supplied
    pub frames: Vec<Frame>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Demo {
    /// Create new demo without frames
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = now();
        Self {
            id: DemoId::new(),
            name: name.into(),
            frames: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a frame owned by this demo
    #[must_use]
    pub fn with_frame(mut self, order: i32, html: impl Into<String>) -> Self {
        self.frames.push(Frame::new(self.id, order, html));
        self
    }

    /// Stable sort of frames by `order` ascending
    pub fn sort_frames(&mut self) {
        self.frames.sort_by_key(|frame| frame.order);
    }

    /// Consume and return with frames sorted
    #[inline]
    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.sort_frames();
        self
    }

    /// Check whether frames are already in presentation order
    #[must_use]
    pub fn is_sorted_by_order(&self) -> bool {
        self.frames.windows(2).all(|pair| pair[0].order <= pair[1].order)
    }

    /// Look up an owned frame
    #[must_use]
    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames.iter().find(|frame| frame.id == id)
    }

    /// Look up an owned frame mutably
    pub fn frame_mut(&mut self, id: FrameId) -> Option<&mut Frame> {
        self.frames.iter_mut().find(|frame| frame.id == id)
    }
}

/// Seed input for a frame, before it has an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSeed {
    /// Sort key
    pub order: i32,
    /// Initial markup
    pub html: String,
}

/// Seed input for a demo and its frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoSeed {
    /// Display name
    pub name: String,
    /// Frames in file order
    #[serde(default)]
    pub frames: Vec<FrameSeed>,
}

impl DemoSeed {
    /// Create seed with no frames
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: Vec::new(),
        }
    }

    /// Add a frame to the seed
    #[must_use]
    pub fn with_frame(mut self, order: i32, html: impl Into<String>) -> Self {
        self.frames.push(FrameSeed {
            order,
            html: html.into(),
        });
        self
    }

    /// Assign identities and timestamps, keeping file order
    #[must_use]
    pub fn into_demo(self) -> Demo {
        self.frames
            .into_iter()
            .fold(Demo::new(self.name), |demo, seed| demo.with_frame(seed.order, seed.html))
    }
}
