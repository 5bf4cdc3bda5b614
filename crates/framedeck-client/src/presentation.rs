//! Presentation flags
//!
//! Layout and theme have no effect on data; the editor carries them so a
//! shell can render from one value.

/// Narrowest viewport, in pixels, that offers the layout toggle
pub const WIDE_LAYOUT_MIN_WIDTH: u32 = 800;

/// Editor/preview layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Editor above preview
    #[default]
    Stacked,
    /// Editor beside preview
    SideBySide,
}

impl ViewMode {
    /// The other layout
    #[inline]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Stacked => Self::SideBySide,
            Self::SideBySide => Self::Stacked,
        }
    }
}

/// Colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl Theme {
    /// The other theme
    #[inline]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Rendering surface size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
}

impl Viewport {
    /// Create viewport of the given width
    #[inline]
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self { width }
    }

    /// Whether the side-by-side layout fits
    #[inline]
    #[must_use]
    pub fn is_wide(self) -> bool {
        self.width >= WIDE_LAYOUT_MIN_WIDTH
    }
}

/// Current layout and theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presentation {
    /// Chosen layout, kept when the viewport narrows
    pub view_mode: ViewMode,
    /// Colour scheme
    pub theme: Theme,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_flip_back_and_forth() {
        assert_eq!(ViewMode::Stacked.toggled(), ViewMode::SideBySide);
        assert_eq!(ViewMode::Stacked.toggled().toggled(), ViewMode::Stacked);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn wide_layout_starts_at_800_pixels() {
        assert!(!Viewport::new(799).is_wide());
        assert!(Viewport::new(800).is_wide());
    }
}
