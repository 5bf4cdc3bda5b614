//! The storage contract shared by every backend

use crate::error::StoreError;
use async_trait::async_trait;
use framedeck_model::{Demo, DemoId, DemoSeed, Frame, FrameId};
use std::sync::Arc;

/// Durable record of demos and their frames
///
/// Writes are committed before the returned future resolves.
#[async_trait]
pub trait DemoStore: Send + Sync + std::fmt::Debug {
    /// All demos, each populated with its frames
    ///
    /// Frame order is whatever the backend yields; callers sort by `order`.
    async fn list_demos_with_frames(&self) -> Result<Vec<Demo>, StoreError>;

    /// Replace a frame's markup and refresh its `updated_at`
    ///
    /// # Errors
    /// - `StoreError::FrameNotFound` if `id` does not exist
    async fn update_frame_html(&self, id: FrameId, html: String) -> Result<Frame, StoreError>;

    /// Persist a demo and its frames
    ///
    /// # Errors
    /// - `StoreError::InvalidInput` if the name is blank
    async fn create_demo(&self, seed: DemoSeed) -> Result<Demo, StoreError>;

    /// Delete a demo together with its frames
    ///
    /// # Errors
    /// - `StoreError::DemoNotFound` if `id` does not exist
    async fn delete_demo(&self, id: DemoId) -> Result<(), StoreError>;

    /// Verify the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Shared handle used by request handlers
pub type SharedStore = Arc<dyn DemoStore>;

pub(crate) fn validate_seed(seed: &DemoSeed) -> Result<(), StoreError> {
    if seed.name.trim().is_empty() {
        return Err(StoreError::InvalidInput("demo name must not be empty".to_string()));
    }
    Ok(())
}
