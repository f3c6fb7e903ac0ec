//! Loupe (magnifier) layout.
//!
//! The loupe is a circle following the pointer. Inside it a copy of the stage,
//! scaled by the current zoom and the loupe magnification, is translated so the
//! sampled stage position sits at the circle's centre.

use crate::geometry::{ScreenPoint, Size, StageBox};

/// Where and how to draw the loupe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoupeLayout {
    /// Top-left corner of the circle's bounding square on screen
    pub origin: ScreenPoint,
    pub radius: f64,
    /// Size of the mini stage before magnification
    pub stage: Size,
    /// Size of the unrotated image inside the mini stage
    pub image: Size,
    /// Translation applied to the mini stage, before scaling around its top-left
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

/// Compute the loupe layout.
///
/// `sample` is the stage-normalized position to magnify and `pointer` the
/// pointer position on screen. Returns `None` for a degenerate stage.
pub fn loupe_layout(
    stage: &StageBox,
    zoom: f64,
    sample: (f64, f64),
    pointer: ScreenPoint,
    radius: f64,
    scale: f64,
) -> Option<LoupeLayout> {
    let scaled = stage.scaled(zoom);
    if !scaled.is_valid() {
        return None;
    }
    let (sx, sy) = sample;
    Some(LoupeLayout {
        origin: ScreenPoint::new(pointer.x - radius, pointer.y - radius),
        radius,
        stage: scaled.stage_size(),
        image: scaled.image_size(),
        translate_x: radius - sx * scaled.stage_w * scale,
        translate_y: radius - sy * scaled.stage_h * scale,
        scale,
    })
}
