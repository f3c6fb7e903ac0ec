//! Stage sizing.
//!
//! The stage is the screen-aligned box that fully contains the rotated image.
//! Its size depends on the natural image size, the space available and the
//! rotation; the image is never scaled above 1:1.

use serde::{Deserialize, Serialize};

use super::{CropRect, Rotation, Size};

/// Stage bounding box and the displayed size of the unrotated image inside it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StageBox {
    pub stage_w: f64,
    pub stage_h: f64,
    pub img_w: f64,
    pub img_h: f64,
}

impl StageBox {
    pub const ZERO: StageBox = StageBox {
        stage_w: 0.0,
        stage_h: 0.0,
        img_w: 0.0,
        img_h: 0.0,
    };

    /// All four dimensions are strictly positive.
    pub fn is_valid(&self) -> bool {
        self.stage_w > 0.0 && self.stage_h > 0.0 && self.img_w > 0.0 && self.img_h > 0.0
    }

    pub fn stage_size(&self) -> Size {
        Size::new(self.stage_w, self.stage_h)
    }

    pub fn image_size(&self) -> Size {
        Size::new(self.img_w, self.img_h)
    }

    /// Uniformly scale every dimension.
    pub fn scaled(&self, factor: f64) -> StageBox {
        StageBox {
            stage_w: self.stage_w * factor,
            stage_h: self.stage_h * factor,
            img_w: self.img_w * factor,
            img_h: self.img_h * factor,
        }
    }
}

/// Axis-aligned bounding box of a `w × h` rectangle rotated by `rotation`.
fn rotated_bounds(w: f64, h: f64, rotation: Rotation) -> (f64, f64) {
    let (c, s) = rotation.abs_cos_sin();
    (w * c + h * s, w * s + h * c)
}

/// Compute the stage for an image shown inside `viewport`.
///
/// `base_scale = min(1, viewport.w / natural.w, viewport.h / natural.h)` is
/// applied to the unrotated image, and the stage is that image's rotated
/// bounding box. Any degenerate dimension yields [`StageBox::ZERO`].
pub fn compute_stage_box(natural: Size, viewport: Size, rotation: Rotation) -> StageBox {
    if !natural.is_positive() || !viewport.is_positive() {
        return StageBox::ZERO;
    }

    let base_scale = 1.0_f64
        .min(viewport.w / natural.w)
        .min(viewport.h / natural.h);
    let img_w = natural.w * base_scale;
    let img_h = natural.h * base_scale;
    if !(img_w > 0.0 && img_h > 0.0) {
        return StageBox::ZERO;
    }

    let (stage_w, stage_h) = rotated_bounds(img_w, img_h, rotation);
    let stage = StageBox {
        stage_w,
        stage_h,
        img_w,
        img_h,
    };
    if stage.is_valid() && stage_w.is_finite() && stage_h.is_finite() {
        stage
    } else {
        StageBox::ZERO
    }
}

/// Stage layout used while cropping: like [`compute_stage_box`], but the
/// rotated stage itself is shrunk again so it fits `container`.
pub fn fit_stage_box(container: Size, natural: Size, rotation: Rotation) -> StageBox {
    let stage = compute_stage_box(natural, container, rotation);
    if !stage.is_valid() {
        return StageBox::ZERO;
    }
    let extra = 1.0_f64
        .min(container.w / stage.stage_w)
        .min(container.h / stage.stage_h);
    stage.scaled(extra)
}

/// Pixel size of the canvas the user measures against.
///
/// This is the rotated bounding box of the natural size, reduced to the crop
/// extent when a crop is active. At 90 and 270 degrees width and height are
/// swapped back, so lengths stay comparable across quarter turns.
pub fn effective_natural(natural: Size, rotation: Rotation, crop: Option<&CropRect>) -> Size {
    if !natural.is_positive() {
        return natural;
    }
    let (stage_w, stage_h) = rotated_bounds(natural.w, natural.h, rotation);
    let base = match crop {
        Some(c) => Size::new(stage_w * c.w, stage_h * c.h),
        None => Size::new(stage_w, stage_h),
    };
    if rotation.is_right_angle() {
        base.swapped()
    } else {
        base
    }
}

/// Height over width of the effective canvas, or 0 when degenerate.
pub fn effective_aspect(effective: Size) -> f64 {
    if effective.is_positive() {
        effective.h / effective.w
    } else {
        0.0
    }
}

/// Human-readable aspect ratio such as `"1.50:1"` or `"1:2.00"`.
pub fn aspect_text(effective: Size) -> String {
    if !effective.is_positive() {
        return String::new();
    }
    let ratio = effective.w / effective.h;
    if !ratio.is_finite() || ratio <= 0.0 {
        return String::new();
    }
    if ratio >= 1.0 {
        format!("{:.2}:1", ratio)
    } else {
        format!("1:{:.2}", 1.0 / ratio)
    }
}
