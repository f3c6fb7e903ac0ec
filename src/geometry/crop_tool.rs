//! Interactive crop editing.
//!
//! While the crop tool is open the whole stage is shown and the user edits a
//! draft rectangle in stage-normalized coordinates: dragging it, resizing it
//! from a corner, or snapping it to an aspect preset. The draft only becomes
//! the viewer's crop when applied.

use super::{CropRect, Rotation, StageBox, image_rect_to_stage_crop, stage_crop_to_image};
use crate::constants::{A_SERIES_RATIO, MIN_CROP_SIZE};

/// Aspect ratio the crop draft is held to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AspectPreset {
    #[default]
    Free,
    /// Ratio of the unrotated image
    Original,
    ASeriesLandscape,
    ASeriesPortrait,
    CanvasPortrait4x5,
    CanvasLandscape5x4,
    CanvasClassic3x4,
    CanvasClassic4x3,
    PrintPhoto2x3,
    PrintPhoto3x2,
    Square,
    /// User-entered width and height
    Custom { w: f64, h: f64 },
}

impl AspectPreset {
    /// On-screen width over height, or `None` when unconstrained.
    pub fn screen_ratio(&self, stage: &StageBox) -> Option<f64> {
        let ratio = match *self {
            AspectPreset::Free => return None,
            AspectPreset::Original => {
                if !(stage.img_w > 0.0 && stage.img_h > 0.0) {
                    return None;
                }
                stage.img_w / stage.img_h
            }
            AspectPreset::ASeriesLandscape => A_SERIES_RATIO,
            AspectPreset::ASeriesPortrait => 1.0 / A_SERIES_RATIO,
            AspectPreset::CanvasPortrait4x5 => 4.0 / 5.0,
            AspectPreset::CanvasLandscape5x4 => 5.0 / 4.0,
            AspectPreset::CanvasClassic3x4 => 3.0 / 4.0,
            AspectPreset::CanvasClassic4x3 => 4.0 / 3.0,
            AspectPreset::PrintPhoto2x3 => 2.0 / 3.0,
            AspectPreset::PrintPhoto3x2 => 3.0 / 2.0,
            AspectPreset::Square => 1.0,
            AspectPreset::Custom { w, h } => {
                if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
                    return None;
                }
                w / h
            }
        };
        Some(ratio)
    }

    /// The same ratio in stage-normalized units (`crop.w / crop.h`).
    pub fn stage_ratio(&self, stage: &StageBox) -> Option<f64> {
        if !(stage.stage_w > 0.0 && stage.stage_h > 0.0) {
            return None;
        }
        self.screen_ratio(stage)
            .map(|r| r * (stage.stage_h / stage.stage_w))
            .filter(|r| r.is_finite() && *r > 0.0)
    }
}

/// Part of the crop draft grabbed by the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropHandle {
    Move,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl CropHandle {
    /// Corner that stays fixed while this handle resizes `rect`.
    fn anchor(&self, rect: &CropRect) -> Option<(f64, f64)> {
        let right = rect.x + rect.w;
        let bottom = rect.y + rect.h;
        match self {
            CropHandle::Move => None,
            CropHandle::NorthWest => Some((right, bottom)),
            CropHandle::NorthEast => Some((rect.x, bottom)),
            CropHandle::SouthWest => Some((right, rect.y)),
            CropHandle::SouthEast => Some((rect.x, rect.y)),
        }
    }
}

/// Keep extents in `[MIN_CROP_SIZE, 1]` and the rectangle inside the stage.
fn contain(x: f64, y: f64, w: f64, h: f64) -> CropRect {
    let w = w.clamp(MIN_CROP_SIZE, 1.0);
    let h = h.clamp(MIN_CROP_SIZE, 1.0);
    CropRect::new(x.clamp(0.0, 1.0 - w), y.clamp(0.0, 1.0 - h), w, h)
}

/// Like [`contain`], but first forces `w / h == ratio`.
fn contain_with_ratio(x: f64, y: f64, mut w: f64, mut h: f64, ratio: f64) -> CropRect {
    if w > 0.0 && h > 0.0 {
        if w / h > ratio {
            w = h * ratio;
        } else {
            h = w / ratio;
        }
    }
    let (min_w, min_h) = if ratio >= 1.0 {
        (MIN_CROP_SIZE * ratio, MIN_CROP_SIZE)
    } else {
        (MIN_CROP_SIZE, MIN_CROP_SIZE / ratio)
    };
    if h < min_h {
        h = min_h;
        w = h * ratio;
    }
    if w < min_w {
        w = min_w;
        h = w / ratio;
    }
    if w > 1.0 {
        w = 1.0;
        h = w / ratio;
    }
    if h > 1.0 {
        h = 1.0;
        w = h * ratio;
    }
    CropRect::new(x.clamp(0.0, 1.0 - w), y.clamp(0.0, 1.0 - h), w, h)
}

/// Shrink `crop` around its centre until `w / h == ratio`.
pub fn refit_to_ratio(crop: &CropRect, ratio: f64) -> CropRect {
    let (mut w, mut h) = (crop.w, crop.h);
    if w / h > ratio {
        w = h * ratio;
    } else {
        h = w / ratio;
    }
    let w = w.clamp(MIN_CROP_SIZE, 1.0);
    let h = h.clamp(MIN_CROP_SIZE, 1.0);
    let cx = crop.x + crop.w / 2.0;
    let cy = crop.y + crop.h / 2.0;
    contain(cx - w / 2.0, cy - h / 2.0, w, h)
}

/// Result of dragging `handle` of `start` from `from` to `to`.
///
/// Positions are stage-normalized. Corner handles keep the opposite corner
/// fixed and may cross it. With a `ratio` the result keeps that stage-space
/// ratio.
pub fn drag_crop(
    start: &CropRect,
    handle: CropHandle,
    from: (f64, f64),
    to: (f64, f64),
    ratio: Option<f64>,
) -> CropRect {
    let (x, y, w, h) = match handle.anchor(start) {
        None => (start.x + to.0 - from.0, start.y + to.1 - from.1, start.w, start.h),
        Some((ax, ay)) => (
            ax.min(to.0),
            ay.min(to.1),
            (ax - to.0).abs(),
            (ay - to.1).abs(),
        ),
    };
    match ratio.filter(|r| *r > 0.0) {
        Some(r) => contain_with_ratio(x, y, w, h, r),
        None => contain(x, y, w, h),
    }
}

/// Carry a stage crop over to a different rotation.
///
/// The crop is mapped into image space under `from` and back into stage space
/// under `to`, then held to the minimum crop size.
pub fn remap_crop_for_rotation(
    crop: &CropRect,
    from: Rotation,
    from_stage: &StageBox,
    to: Rotation,
    to_stage: &StageBox,
) -> Option<CropRect> {
    let image = stage_crop_to_image(crop, from_stage, from)?;
    let mapped = image_rect_to_stage_crop(&image, to, to_stage)?;
    Some(contain(mapped.x, mapped.y, mapped.w, mapped.h))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CropDrag {
    handle: CropHandle,
    start: (f64, f64),
    rect: CropRect,
}

/// Draft state of the open crop tool.
#[derive(Debug, Clone, PartialEq)]
pub struct CropEditor {
    draft: CropRect,
    aspect: AspectPreset,
    drag: Option<CropDrag>,
}

impl CropEditor {
    /// Draft used when no crop is active yet.
    pub const DEFAULT_DRAFT: CropRect = CropRect {
        x: 0.1,
        y: 0.1,
        w: 0.8,
        h: 0.8,
    };

    /// Open the editor on the current crop, if any.
    pub fn new(current: Option<CropRect>) -> Self {
        Self {
            draft: current
                .and_then(|c| c.clamped())
                .unwrap_or(Self::DEFAULT_DRAFT),
            aspect: AspectPreset::Free,
            drag: None,
        }
    }

    pub fn draft(&self) -> CropRect {
        self.draft
    }

    pub fn aspect(&self) -> AspectPreset {
        self.aspect
    }

    /// Select a preset and refit the draft to it.
    pub fn set_aspect(&mut self, aspect: AspectPreset, stage: &StageBox) {
        self.aspect = aspect;
        if let Some(ratio) = aspect.stage_ratio(stage) {
            self.draft = refit_to_ratio(&self.draft, ratio);
        }
    }

    pub fn begin_drag(&mut self, handle: CropHandle, pos: (f64, f64)) {
        self.drag = Some(CropDrag {
            handle,
            start: pos,
            rect: self.draft,
        });
    }

    /// Update the draft for the pointer at `pos`. Returns false without a drag.
    pub fn drag_to(&mut self, pos: (f64, f64), stage: &StageBox) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let ratio = self.aspect.stage_ratio(stage);
        self.draft = drag_crop(&drag.rect, drag.handle, drag.start, pos, ratio);
        true
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The draft as a crop, if it is large enough to apply.
    pub fn finish(&self) -> Option<CropRect> {
        let d = self.draft;
        (d.w >= MIN_CROP_SIZE && d.h >= MIN_CROP_SIZE).then_some(d)
    }
}
