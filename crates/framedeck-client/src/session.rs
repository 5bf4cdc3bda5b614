//! One user's session: API handle, cached demos, editor state

use crate::api::FrameApi;
use crate::cache::{DemoCache, LoadStatus};
use crate::editor::{EditorState, SaveOutcome};
use framedeck_model::DemoId;

/// Client session driving the editor against a [`FrameApi`]
#[derive(Debug)]
pub struct Session<A> {
    api: A,
    cache: DemoCache,
    editor: EditorState,
}

impl<A: FrameApi> Session<A> {
    /// Create session in Browsing with nothing loaded
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            cache: DemoCache::new(),
            editor: EditorState::new(),
        }
    }

    /// Fetch or re-fetch the demo list
    pub async fn load(&mut self) -> &LoadStatus {
        self.cache.refresh(&self.api).await
    }

    /// Open a cached demo. Returns `false` if it is not cached.
    pub fn open_demo(&mut self, id: DemoId) -> bool {
        let Some(demo) = self.cache.find(id).cloned() else {
            return false;
        };
        self.apply(|editor| editor.select_demo(demo));
        true
    }

    /// Run a synchronous editor transition
    pub fn apply(&mut self, transition: impl FnOnce(EditorState) -> EditorState) {
        let editor = std::mem::take(&mut self.editor);
        self.editor = transition(editor);
    }

    /// Save the selected frame; a stored result also updates the cache.
    ///
    /// The editor is only replaced once the request completes, so dropping
    /// the returned future leaves the selection and buffer as they were.
    pub async fn save(&mut self) -> SaveOutcome {
        let (editor, outcome) = self.editor.clone().save(&self.api).await;
        self.editor = editor;

        if let SaveOutcome::Saved(frame) = &outcome {
            self.cache.apply_saved(frame);
        }
        outcome
    }

    /// Editor state
    #[inline]
    #[must_use]
    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    /// Cached demos
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &DemoCache {
        &self.cache
    }

    /// Underlying API
    #[inline]
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockFrameApi;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use framedeck_model::{Demo, Frame, FrameId};
    use std::time::Duration;

    /// Lists one demo, then takes far longer to save than callers wait
    struct StalledApi {
        demo: Demo,
    }

    #[async_trait]
    impl FrameApi for StalledApi {
        async fn list_demos(&self) -> Result<Vec<Demo>, ClientError> {
            Ok(vec![self.demo.clone()])
        }

        async fn update_frame_html(&self, _id: FrameId, _html: String) -> Result<Frame, ClientError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(ClientError::Network("stalled".to_string()))
        }
    }

    #[tokio::test]
    async fn saved_frame_survives_reopening_demo() {
        let demo = Demo::new("Intro")
            .with_frame(2, "<b>2</b>")
            .with_frame(1, "<b>1</b>");
        let demo_id = demo.id;
        let listed = vec![demo];

        let mut api = MockFrameApi::new();
        api.expect_list_demos()
            .times(1)
            .returning(move || Ok(listed.clone()));
        api.expect_update_frame_html()
            .times(1)
            .returning(move |id, html| {
                let mut frame = Frame::new(demo_id, 1, html);
                frame.id = id;
                Ok(frame)
            });

        let mut session = Session::new(api);
        assert_eq!(session.load().await, &LoadStatus::Loaded);
        assert!(session.open_demo(demo_id));

        session.apply(|editor| editor.edit_content("<i>new</i>"));
        assert!(matches!(session.save().await, SaveOutcome::Saved(_)));

        session.apply(EditorState::go_back);
        assert!(session.open_demo(demo_id));
        assert_eq!(session.editor().editable_content(), Some("<i>new</i>"));
    }

    #[tokio::test]
    async fn open_unknown_demo_is_refused() {
        let mut api = MockFrameApi::new();
        api.expect_list_demos().returning(|| Ok(Vec::new()));

        let mut session = Session::new(api);
        session.load().await;

        assert!(!session.open_demo(DemoId::new()));
        assert!(session.editor().is_browsing());
    }

    #[tokio::test]
    async fn abandoned_save_keeps_selection_and_buffer() {
        let demo = Demo::new("Intro")
            .with_frame(2, "<b>2</b>")
            .with_frame(1, "<b>1</b>");
        let demo_id = demo.id;

        let mut session = Session::new(StalledApi { demo });
        session.load().await;
        assert!(session.open_demo(demo_id));
        session.apply(|editor| editor.edit_content("<i>draft</i>"));

        let result = tokio::time::timeout(Duration::from_millis(50), session.save()).await;
        assert!(result.is_err());

        let editor = session.editor();
        assert!(!editor.is_browsing());
        assert_eq!(editor.selected_frame_index(), Some(0));
        assert_eq!(editor.editable_content(), Some("<i>draft</i>"));
        assert!(editor.is_dirty());
        assert!(editor.notice().is_none());
    }
}
