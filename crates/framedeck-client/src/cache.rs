//! Client-side copy of the demo list

use crate::api::FrameApi;
use framedeck_model::{Demo, DemoId, Frame};

/// Outcome of the most recent fetch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing fetched yet
    #[default]
    NotLoaded,
    /// Last fetch succeeded
    Loaded,
    /// Last fetch failed; the message is user-visible
    Failed(String),
}

/// Last fetched demos, as delivered by the server
///
/// A failed refresh keeps the previous list so a retry can be offered
/// without blanking the screen.
#[derive(Debug, Clone, Default)]
pub struct DemoCache {
    demos: Vec<Demo>,
    status: LoadStatus,
}

impl DemoCache {
    /// Create empty cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the demo list, returning the new status
    pub async fn refresh<A: FrameApi + ?Sized>(&mut self, api: &A) -> &LoadStatus {
        match api.list_demos().await {
            Ok(demos) => {
                tracing::debug!(count = demos.len(), "demo list loaded");
                self.demos = demos;
                self.status = LoadStatus::Loaded;
            }
            Err(e) => {
                tracing::warn!(error = %e, "demo list fetch failed");
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
        &self.status
    }

    /// Cached demos in server order
    #[inline]
    #[must_use]
    pub fn demos(&self) -> &[Demo] {
        &self.demos
    }

    /// Status of the last fetch
    #[inline]
    #[must_use]
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Look up a cached demo
    #[must_use]
    pub fn find(&self, id: DemoId) -> Option<&Demo> {
        self.demos.iter().find(|demo| demo.id == id)
    }

    /// Reflect a saved frame so later selections see the new markup.
    /// Returns `false` if the frame is not cached.
    pub fn apply_saved(&mut self, saved: &Frame) -> bool {
        let Some(frame) = self
            .demos
            .iter_mut()
            .find(|demo| demo.id == saved.demo_id)
            .and_then(|demo| demo.frame_mut(saved.id))
        else {
            return false;
        };
        frame.html.clone_from(&saved.html);
        frame.updated_at = saved.updated_at;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockFrameApi;
    use crate::error::ClientError;
    use pretty_assertions::assert_eq;

    fn intro() -> Demo {
        Demo::new("Intro")
            .with_frame(2, "<b>2</b>")
            .with_frame(1, "<b>1</b>")
    }

    #[tokio::test]
    async fn refresh_stores_demos() {
        let demo = intro();
        let returned = vec![demo.clone()];
        let mut api = MockFrameApi::new();
        api.expect_list_demos()
            .times(1)
            .returning(move || Ok(returned.clone()));

        let mut cache = DemoCache::new();
        assert_eq!(cache.status(), &LoadStatus::NotLoaded);

        cache.refresh(&api).await;

        assert_eq!(cache.status(), &LoadStatus::Loaded);
        assert_eq!(cache.demos(), &[demo.clone()]);
        assert!(cache.find(demo.id).is_some());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_list() {
        let demo = intro();
        let returned = vec![demo.clone()];
        let mut api = MockFrameApi::new();
        let mut seq = mockall::Sequence::new();
        api.expect_list_demos()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move || Ok(returned.clone()));
        api.expect_list_demos()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(ClientError::Network("connection refused".to_string())));

        let mut cache = DemoCache::new();
        cache.refresh(&api).await;
        let status = cache.refresh(&api).await.clone();

        assert!(matches!(status, LoadStatus::Failed(ref m) if m.contains("connection refused")));
        assert_eq!(cache.demos().len(), 1);
    }

    #[tokio::test]
    async fn retry_after_failure_recovers() {
        let mut api = MockFrameApi::new();
        let mut seq = mockall::Sequence::new();
        api.expect_list_demos()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| {
                Err(ClientError::Status {
                    status: 500,
                    message: "internal server error".to_string(),
                })
            });
        api.expect_list_demos()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(Vec::new()));

        let mut cache = DemoCache::new();
        assert!(matches!(cache.refresh(&api).await, LoadStatus::Failed(_)));
        assert_eq!(cache.refresh(&api).await, &LoadStatus::Loaded);
    }

    #[test]
    fn apply_saved_updates_cached_frame() {
        let demo = intro();
        let mut saved = demo.frames[0].clone();
        saved.html = "<i>new</i>".to_string();

        let mut cache = DemoCache {
            demos: vec![demo],
            status: LoadStatus::Loaded,
        };

        assert!(cache.apply_saved(&saved));
        assert_eq!(cache.demos()[0].frames[0].html, "<i>new</i>");
        assert_eq!(cache.demos()[0].frames[1].html, "<b>1</b>");
    }

    #[test]
    fn apply_saved_ignores_unknown_frame() {
        let mut cache = DemoCache::new();
        let stray = Demo::new("Other").with_frame(1, "x").frames.remove(0);
        assert!(!cache.apply_saved(&stray));
    }
}
