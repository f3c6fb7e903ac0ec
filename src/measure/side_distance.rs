//! Distance from the pointer to the left and top edges of the visible canvas.

use super::labels::format_units;
use crate::geometry::{CropRect, NormPoint, NormRect};

/// Side-distance guide for the current pointer position.
#[derive(Debug, Clone, PartialEq)]
pub struct SideDistance {
    /// Visible area in stage-normalized coordinates (the crop or the whole stage)
    pub area: NormRect,
    /// Pointer position as a fraction of `area`
    pub cursor: NormPoint,
    /// Distance to the left edge in user units, NaN when uncalibrated
    pub horizontal: f64,
    /// Distance to the top edge in user units, NaN when uncalibrated
    pub vertical: f64,
    pub horizontal_label: String,
    pub vertical_label: String,
}

/// Compute the guide for a pointer at stage-normalized `(sx, sy)`.
pub fn side_distance(
    stage_pos: (f64, f64),
    crop: Option<&CropRect>,
    width_units: f64,
    height_units: f64,
) -> Option<SideDistance> {
    let (sx, sy) = stage_pos;
    if !sx.is_finite() || !sy.is_finite() {
        return None;
    }
    let sx = sx.clamp(0.0, 1.0);
    let sy = sy.clamp(0.0, 1.0);

    let (area, cursor) = match crop {
        Some(c) => {
            let area = c.as_rect();
            let (sx, sy) = area.clamp_point(sx, sy);
            let nx = if c.w > 0.0 { (sx - c.x) / c.w } else { 0.0 };
            let ny = if c.h > 0.0 { (sy - c.y) / c.h } else { 0.0 };
            (area, NormPoint::new(nx, ny).clamped())
        }
        None => (NormRect::UNIT, NormPoint::new(sx, sy)),
    };

    let horizontal = if width_units > 0.0 {
        cursor.nx * width_units
    } else {
        f64::NAN
    };
    let vertical = if height_units > 0.0 {
        cursor.ny * height_units
    } else {
        f64::NAN
    };

    Some(SideDistance {
        area,
        cursor,
        horizontal,
        vertical,
        horizontal_label: positive_label(horizontal),
        vertical_label: positive_label(vertical),
    })
}

fn positive_label(value: f64) -> String {
    if value.is_finite() && value > 0.0 {
        format_units(value)
    } else {
        String::new()
    }
}
