//! Crop rectangles and their mapping between stage and image space.
//!
//! A crop is stored in normalized *stage* coordinates: it clips the
//! screen-aligned stage, not the rotated image. Tools that work on the
//! unrotated image use an axis-aligned approximation of the crop in image
//! space, obtained by inverse-rotating its corners. At 0/90/180/270 degrees the
//! approximation is exact; at other angles it over-approximates, and clipping
//! of measurements and the loupe relies on that same box.

use serde::{Deserialize, Serialize};

use super::{NormRect, Rotation, StageBox, rotate};

/// Crop rectangle in normalized stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Portion of the stage hidden on each side by a crop, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipInset {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// The crop clamped so that it lies inside the stage.
    ///
    /// Returns `None` for crops without positive extent, before or after
    /// clamping.
    pub fn clamped(&self) -> Option<CropRect> {
        if !(self.w > 0.0 && self.h > 0.0) {
            return None;
        }
        let x = self.x.clamp(0.0, 1.0);
        let y = self.y.clamp(0.0, 1.0);
        let w = self.w.min(1.0 - x).max(0.0);
        let h = self.h.min(1.0 - y).max(0.0);
        if !(w > 0.0 && h > 0.0) {
            return None;
        }
        Some(CropRect { x, y, w, h })
    }

    pub fn as_rect(&self) -> NormRect {
        NormRect::new(self.x, self.y, self.w, self.h)
    }

    /// Whether the stage-normalized point `(sx, sy)` is inside the crop.
    pub fn contains(&self, sx: f64, sy: f64) -> bool {
        self.as_rect().contains(sx, sy)
    }

    /// Insets for an `inset(top right bottom left)` style clip of the stage.
    pub fn clip_inset(&self) -> ClipInset {
        ClipInset {
            top: self.y * 100.0,
            right: (1.0 - self.x - self.w) * 100.0,
            bottom: (1.0 - self.y - self.h) * 100.0,
            left: self.x * 100.0,
        }
    }

    fn corners(&self) -> [(f64, f64); 4] {
        corners_of(self.x, self.y, self.w, self.h)
    }
}

fn corners_of(x: f64, y: f64, w: f64, h: f64) -> [(f64, f64); 4] {
    [(x, y), (x + w, y), (x, y + h), (x + w, y + h)]
}

/// Re-express a stage crop as an axis-aligned box in unrotated image space.
///
/// Each corner is moved to a pixel offset from the stage centre, rotated by
/// `-rotation` and divided by the displayed image size. The result is the
/// bounding box of the four mapped corners, clamped to `[0,1]`.
pub fn stage_crop_to_image(
    crop: &CropRect,
    stage: &StageBox,
    rotation: Rotation,
) -> Option<NormRect> {
    let crop = crop.clamped()?;
    if !stage.is_valid() {
        return None;
    }
    let (cos, sin) = rotation.cos_sin();

    let mapped = crop.corners().map(|(sx, sy)| {
        let ux = (sx - 0.5) * stage.stage_w;
        let uy = (sy - 0.5) * stage.stage_h;
        let (ix, iy) = rotate(ux, uy, cos, -sin);
        ((ix + stage.img_w / 2.0) / stage.img_w, (iy + stage.img_h / 2.0) / stage.img_h)
    });
    NormRect::clamped_bounds(&mapped)
}

/// Map a rectangle in unrotated image space onto a stage crop.
///
/// Inverse of [`stage_crop_to_image`] at right angles; at other angles the
/// result is the bounding box of the rotated rectangle.
pub fn image_rect_to_stage_crop(
    rect: &NormRect,
    rotation: Rotation,
    stage: &StageBox,
) -> Option<CropRect> {
    if !stage.is_valid() {
        return None;
    }
    let (cos, sin) = rotation.cos_sin();

    let mapped = corners_of(rect.x, rect.y, rect.w, rect.h).map(|(nx, ny)| {
        let ix = (nx - 0.5) * stage.img_w;
        let iy = (ny - 0.5) * stage.img_h;
        let (sx, sy) = rotate(ix, iy, cos, sin);
        (
            (sx + stage.stage_w / 2.0) / stage.stage_w,
            (sy + stage.stage_h / 2.0) / stage.stage_h,
        )
    });
    NormRect::clamped_bounds(&mapped).map(|r| CropRect::new(r.x, r.y, r.w, r.h))
}
