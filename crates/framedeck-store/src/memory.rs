//! In-memory backend for tests and local demos

use crate::error::StoreError;
use crate::store::{validate_seed, DemoStore};
use async_trait::async_trait;
use framedeck_model::{now, Demo, DemoId, DemoSeed, Frame, FrameId};
use parking_lot::RwLock;

/// Demo store kept entirely in process memory
///
/// Demos are listed in insertion order and frames in the order they were
/// supplied, mirroring what the SQLite backend yields.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    demos: RwLock<Vec<Demo>>,
}

impl InMemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store pre-populated with demos, kept as given
    #[must_use]
    pub fn with_demos(demos: Vec<Demo>) -> Self {
        Self {
            demos: RwLock::new(demos),
        }
    }

    /// Number of stored demos
    #[inline]
    #[must_use]
    pub fn demo_count(&self) -> usize {
        self.demos.read().len()
    }

    /// Copy of a single frame, if present
    #[must_use]
    pub fn frame(&self, id: FrameId) -> Option<Frame> {
        self.demos
            .read()
            .iter()
            .find_map(|demo| demo.frame(id).cloned())
    }
}

#[async_trait]
impl DemoStore for InMemoryStore {
    async fn list_demos_with_frames(&self) -> Result<Vec<Demo>, StoreError> {
        Ok(self.demos.read().clone())
    }

    async fn update_frame_html(&self, id: FrameId, html: String) -> Result<Frame, StoreError> {
        let mut demos = self.demos.write();
        let frame = demos
            .iter_mut()
            .find_map(|demo| demo.frame_mut(id))
            .ok_or(StoreError::FrameNotFound(id))?;

        frame.html = html;
        frame.updated_at = now();
        Ok(frame.clone())
    }

    async fn create_demo(&self, seed: DemoSeed) -> Result<Demo, StoreError> {
        validate_seed(&seed)?;
        let demo = seed.into_demo();
        self.demos.write().push(demo.clone());
        Ok(demo)
    }

    async fn delete_demo(&self, id: DemoId) -> Result<(), StoreError> {
        let mut demos = self.demos.write();
        let before = demos.len();
        demos.retain(|demo| demo.id != id);
        if demos.len() == before {
            return Err(StoreError::DemoNotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
