//! Editor state machine
//!
//! Two screens: **Browsing** (initial) and **Viewing** a demo. Every
//! transition takes the state by value and returns the next one, so the
//! machine can be driven and tested without a rendering surface.
//!
//! While viewing, the selection holds the demo with frames sorted by
//! `order`, the selected index, and the editable buffer. The buffer is only
//! written to storage by [`EditorState::save`].

use crate::api::FrameApi;
use crate::error::ClientError;
use crate::presentation::{Presentation, Viewport};
use framedeck_model::{Demo, Frame, FrameId};

/// The demo being viewed and the frame being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    demo: Demo,
    frame_index: usize,
    buffer: String,
}

impl Selection {
    fn new(demo: Demo) -> Self {
        let demo = demo.sorted();
        let buffer = demo
            .frames
            .first()
            .map(|frame| frame.html.clone())
            .unwrap_or_default();
        Self {
            demo,
            frame_index: 0,
            buffer,
        }
    }

    fn frame(&self) -> Option<&Frame> {
        self.demo.frames.get(self.frame_index)
    }
}

/// Which screen is showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Screen {
    /// Demo list
    #[default]
    Browsing,
    /// One demo, one frame selected
    Viewing(Selection),
}

/// User-visible outcome of a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Frame persisted
    Saved {
        /// Saved frame
        frame_id: FrameId,
    },
    /// Save rejected or unreachable; the buffer is kept
    SaveFailed {
        /// Frame that was being saved
        frame_id: FrameId,
        /// Reason shown to the user
        message: String,
    },
}

/// What [`EditorState::save`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No frame selected, nothing sent
    Skipped,
    /// Stored row returned by the server
    Saved(Frame),
    /// Request failed
    Failed(ClientError),
}

/// Entry for a frame picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOption {
    /// Position in sorted order, the value to pass to `select_frame`
    pub index: usize,
    /// `Frame {order}`
    pub label: String,
}

/// Complete editor state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorState {
    screen: Screen,
    presentation: Presentation,
    notice: Option<Notice>,
}

impl EditorState {
    /// Start in Browsing
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a demo: frames sorted by `order` (ties keep their position),
    /// first frame selected, buffer seeded from it or empty.
    #[must_use]
    pub fn select_demo(self, demo: Demo) -> Self {
        tracing::debug!(demo_id = %demo.id, frames = demo.frames.len(), "demo selected");
        Self {
            screen: Screen::Viewing(Selection::new(demo)),
            notice: None,
            ..self
        }
    }

    /// Return to the demo list, discarding any unsaved buffer
    #[must_use]
    pub fn go_back(self) -> Self {
        Self {
            screen: Screen::Browsing,
            notice: None,
            ..self
        }
    }

    /// Select a frame by sorted position and reseed the buffer from its
    /// stored markup. Out of range, or while browsing, nothing changes.
    #[must_use]
    pub fn select_frame(mut self, index: usize) -> Self {
        if let Screen::Viewing(selection) = &mut self.screen {
            if let Some(frame) = selection.demo.frames.get(index) {
                selection.buffer.clone_from(&frame.html);
                selection.frame_index = index;
            }
        }
        self
    }

    /// Move to the next frame; stays put on the last one
    #[must_use]
    pub fn next_frame(self) -> Self {
        match self.selected_frame_index() {
            Some(index) => self.select_frame(index + 1),
            None => self,
        }
    }

    /// Move to the previous frame; stays put on the first one
    #[must_use]
    pub fn previous_frame(self) -> Self {
        match self.selected_frame_index() {
            Some(index) if index > 0 => self.select_frame(index - 1),
            _ => self,
        }
    }

    /// Replace the buffer. Nothing is stored.
    #[must_use]
    pub fn edit_content(mut self, text: impl Into<String>) -> Self {
        if let Screen::Viewing(selection) = &mut self.screen {
            selection.buffer = text.into();
        }
        self
    }

    /// Flip between stacked and side-by-side. The toggle is only offered on
    /// wide viewports; a narrow one leaves the current layout in place.
    #[must_use]
    pub fn toggle_view_mode(mut self, viewport: Viewport) -> Self {
        if viewport.is_wide() {
            self.presentation.view_mode = self.presentation.view_mode.toggled();
        }
        self
    }

    /// Flip between light and dark
    #[must_use]
    pub fn toggle_theme(mut self) -> Self {
        self.presentation.theme = self.presentation.theme.toggled();
        self
    }

    /// Clear the current notice
    #[must_use]
    pub fn dismiss_notice(self) -> Self {
        Self {
            notice: None,
            ..self
        }
    }

    /// Send the buffer for the selected frame.
    ///
    /// On success the in-memory frame takes the stored markup and a
    /// [`Notice::Saved`] is raised. On failure a [`Notice::SaveFailed`] is
    /// raised and the buffer is left as it was.
    pub async fn save<A: FrameApi + ?Sized>(mut self, api: &A) -> (Self, SaveOutcome) {
        let target = self.selection().and_then(|selection| {
            selection
                .frame()
                .map(|frame| (frame.id, selection.buffer.clone()))
        });
        let Some((frame_id, html)) = target else {
            return (self, SaveOutcome::Skipped);
        };

        match api.update_frame_html(frame_id, html).await {
            Ok(saved) => {
                if let Screen::Viewing(selection) = &mut self.screen {
                    if let Some(frame) = selection.demo.frame_mut(frame_id) {
                        frame.html.clone_from(&saved.html);
                        frame.updated_at = saved.updated_at;
                    }
                }
                tracing::info!(%frame_id, "frame saved");
                self.notice = Some(Notice::Saved { frame_id });
                (self, SaveOutcome::Saved(saved))
            }
            Err(e) => {
                tracing::warn!(%frame_id, error = %e, "frame save failed");
                self.notice = Some(Notice::SaveFailed {
                    frame_id,
                    message: e.to_string(),
                });
                (self, SaveOutcome::Failed(e))
            }
        }
    }

    /// Current screen
    #[inline]
    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Whether the demo list is showing
    #[inline]
    #[must_use]
    pub fn is_browsing(&self) -> bool {
        matches!(self.screen, Screen::Browsing)
    }

    fn selection(&self) -> Option<&Selection> {
        match &self.screen {
            Screen::Viewing(selection) => Some(selection),
            Screen::Browsing => None,
        }
    }

    /// Demo being viewed, frames in sorted order
    #[must_use]
    pub fn selected_demo(&self) -> Option<&Demo> {
        self.selection().map(|selection| &selection.demo)
    }

    /// Index of the selected frame within the sorted frames
    #[must_use]
    pub fn selected_frame_index(&self) -> Option<usize> {
        self.selection().map(|selection| selection.frame_index)
    }

    /// Selected frame, absent for a demo with no frames
    #[must_use]
    pub fn selected_frame(&self) -> Option<&Frame> {
        self.selection().and_then(Selection::frame)
    }

    /// Editable buffer
    #[must_use]
    pub fn editable_content(&self) -> Option<&str> {
        self.selection().map(|selection| selection.buffer.as_str())
    }

    /// Whether the buffer differs from the selected frame's stored markup
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.selection()
            .and_then(|selection| selection.frame().map(|frame| frame.html != selection.buffer))
            .unwrap_or(false)
    }

    /// Last save outcome, until dismissed or the screen changes
    #[inline]
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Layout and theme
    #[inline]
    #[must_use]
    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    /// Picker entries for the viewed demo, in sorted order
    #[must_use]
    pub fn frame_options(&self) -> Vec<FrameOption> {
        self.selected_demo()
            .map(|demo| {
                demo.frames
                    .iter()
                    .enumerate()
                    .map(|(index, frame)| FrameOption {
                        index,
                        label: frame.label(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Title for the preview pane, `Frame {index}`
    #[must_use]
    pub fn preview_title(&self) -> Option<String> {
        self.selected_frame_index()
            .map(|index| format!("Frame {index}"))
    }
}
