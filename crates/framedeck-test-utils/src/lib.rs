//! Testing utilities for the framedeck workspace
//!
//! Shared fixtures and failure-injecting stores.

#![allow(missing_docs)]

use async_trait::async_trait;
use framedeck_model::{Demo, DemoId, DemoSeed, Frame, FrameId};
use framedeck_store::{DemoStore, InMemoryStore, SharedStore, StoreError};
use std::sync::Arc;

/// "Intro" demo whose frames are stored out of order: order 2 first, then order 1.
pub fn intro_demo() -> Demo {
    Demo::new("Intro")
        .with_frame(2, "<b>2</b>")
        .with_frame(1, "<b>1</b>")
}

/// Demo with one frame per `(order, html)` pair, in the given order
pub fn demo_with_frames(name: &str, frames: &[(i32, &str)]) -> Demo {
    frames
        .iter()
        .fold(Demo::new(name), |demo, (order, html)| demo.with_frame(*order, *html))
}

/// Seed equivalent of [`intro_demo`]
pub fn intro_seed() -> DemoSeed {
    DemoSeed::new("Intro")
        .with_frame(2, "<b>2</b>")
        .with_frame(1, "<b>1</b>")
}

/// In-memory store holding `demos`, shared the way the server holds it
pub fn memory_store_with(demos: Vec<Demo>) -> (Arc<InMemoryStore>, SharedStore) {
    let store = Arc::new(InMemoryStore::with_demos(demos));
    let shared: SharedStore = store.clone();
    (store, shared)
}

/// Store whose every operation fails as if the database were down
#[derive(Debug, Default, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn shared(reason: impl Into<String>) -> SharedStore {
        Arc::new(Self::new(reason))
    }

    fn fail<T>(&self) -> Result<T, StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}

#[async_trait]
impl DemoStore for UnavailableStore {
    async fn list_demos_with_frames(&self) -> Result<Vec<Demo>, StoreError> {
        self.fail()
    }

    async fn update_frame_html(&self, _id: FrameId, _html: String) -> Result<Frame, StoreError> {
        self.fail()
    }

    async fn create_demo(&self, _seed: DemoSeed) -> Result<Demo, StoreError> {
        self.fail()
    }

    async fn delete_demo(&self, _id: DemoId) -> Result<(), StoreError> {
        self.fail()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.fail()
    }
}
