//! Pointer-to-image mapping.
//!
//! Converts a screen pointer position into normalized coordinates on the
//! unrotated image, undoing the viewer's rotation and outer zoom, and rejects
//! positions hidden by an active crop.

use super::{CropRect, NormPoint, NormRect, Rotation, ScreenPoint, ScreenRect, Size, rotate};

/// Everything the mapping needs to know about the current view.
///
/// `image_rect` and `stage_rect` are bounding rectangles as measured on screen
/// (after rotation and zoom). `image_layout` is the image element's own size
/// before the outer zoom is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerContext {
    pub image_rect: ScreenRect,
    pub image_layout: Size,
    pub stage_rect: ScreenRect,
    pub rotation: Rotation,
    pub zoom: f64,
    /// Active crop in stage coordinates, already clamped.
    pub crop: Option<CropRect>,
    /// The crop's bounding box in image coordinates.
    pub crop_image: Option<NormRect>,
}

/// Pointer position as a fraction of the stage's on-screen rectangle.
pub fn stage_normalized(pointer: ScreenPoint, stage_rect: &ScreenRect) -> Option<(f64, f64)> {
    if !stage_rect.has_area() {
        return None;
    }
    let sx = (pointer.x - stage_rect.left) / stage_rect.width;
    let sy = (pointer.y - stage_rect.top) / stage_rect.height;
    (sx.is_finite() && sy.is_finite()).then_some((sx, sy))
}

/// Stage position the loupe should magnify.
///
/// The position is clamped into the crop so the loupe never shows pixels the
/// crop hides.
pub fn loupe_sample_position(
    pointer: ScreenPoint,
    stage_rect: &ScreenRect,
    crop: Option<&CropRect>,
) -> Option<(f64, f64)> {
    let (sx, sy) = stage_normalized(pointer, stage_rect)?;
    Some(match crop {
        Some(c) => c.as_rect().clamp_point(sx, sy),
        None => (sx, sy),
    })
}

/// Map a pointer to normalized image coordinates without the unit-square check.
///
/// Used while dragging an existing point, where the caller clamps the result.
/// Still returns `None` outside an active crop or for a degenerate view.
pub fn map_pointer_unbounded(pointer: ScreenPoint, ctx: &PointerContext) -> Option<NormPoint> {
    if let Some(crop) = &ctx.crop {
        let (sx, sy) = stage_normalized(pointer, &ctx.stage_rect)?;
        if !crop.contains(sx, sy) {
            return None;
        }
    }

    let center = ctx.image_rect.center();
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;

    let (cos, sin) = ctx.rotation.cos_sin();
    let (ux, uy) = rotate(dx, dy, cos, -sin);

    let w = ctx.image_layout.w * ctx.zoom;
    let h = ctx.image_layout.h * ctx.zoom;
    if !(w > 0.0 && h > 0.0) {
        return None;
    }

    let point = NormPoint::new((ux + w / 2.0) / w, (uy + h / 2.0) / h);
    if !point.is_finite() {
        return None;
    }

    if let Some(bounds) = &ctx.crop_image {
        if !bounds.contains(point.nx, point.ny) {
            return None;
        }
    }
    Some(point)
}

/// Map a pointer to normalized image coordinates.
///
/// Returns `None` when the pointer is outside the active crop, outside the
/// image, or the view is degenerate. Callers ignore the interaction then.
pub fn map_pointer(pointer: ScreenPoint, ctx: &PointerContext) -> Option<NormPoint> {
    map_pointer_unbounded(pointer, ctx).filter(NormPoint::in_unit_square)
}
