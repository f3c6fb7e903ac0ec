//! Transient interaction state.
//!
//! State that only lives while a pointer button is held: the pan drag of the
//! stage and the hover/readiness flags the loupe depends on.

use crate::geometry::ScreenPoint;
use crate::zoom_math::ViewTransform;

/// Transient state for panning the stage.
///
/// Anchored at the pointer position and view transform captured on press;
/// each move yields the press-time transform shifted by the displacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanState {
    anchor: Option<(ScreenPoint, ViewTransform)>,
}

impl PanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor a pan at `pos` with the transform in effect at press time.
    pub fn start(&mut self, pos: ScreenPoint, transform: ViewTransform) {
        self.anchor = Some((pos, transform));
    }

    /// Transform for the pointer at `pos`, or `None` when no pan is active.
    pub fn drag_to(&self, pos: ScreenPoint) -> Option<ViewTransform> {
        let (origin, transform) = self.anchor?;
        Some(transform.pan_by(pos.x - origin.x, pos.y - origin.y))
    }

    pub fn end(&mut self) {
        self.anchor = None;
    }

    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }
}

/// Transient state for the loupe.
#[derive(Debug, Clone, Default)]
pub struct LoupeState {
    /// Loupe toggled on by the user
    pub enabled: bool,
    /// The image has finished loading
    pub image_ready: bool,
    /// The pointer is over the image
    pub hovering: bool,
    /// Last sampled stage position and pointer position
    pub last_sample: Option<((f64, f64), ScreenPoint)>,
}

impl LoupeState {
    /// The loupe should be drawn.
    pub fn is_active(&self) -> bool {
        self.enabled && self.image_ready && self.hovering
    }
}
