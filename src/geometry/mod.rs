//! Coordinate spaces of the reference viewer.
//!
//! Four spaces are involved:
//! - natural image pixels ([`Size`] of the loaded bitmap)
//! - unrotated display pixels (the image element before rotation)
//! - stage pixels: the screen-aligned box that contains the rotated image
//! - normalized `[0,1]` coordinates relative to one of the above
//!
//! All functions here are pure. Degenerate inputs produce `None` or a zero-sized
//! result instead of NaN.

pub mod crop;
pub mod crop_tool;
pub mod pointer;
pub mod stage;

pub use crop::{ClipInset, CropRect, image_rect_to_stage_crop, stage_crop_to_image};
pub use crop_tool::{AspectPreset, CropEditor, CropHandle, remap_crop_for_rotation};
pub use pointer::{
    PointerContext, loupe_sample_position, map_pointer, map_pointer_unbounded, stage_normalized,
};
pub use stage::{
    StageBox, aspect_text, compute_stage_box, effective_aspect, effective_natural, fit_stage_box,
};

use serde::{Deserialize, Serialize};

/// Width and height pair, used for natural image sizes and viewports.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub const ZERO: Size = Size { w: 0.0, h: 0.0 };

    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Both dimensions are finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.w.is_finite() && self.h.is_finite() && self.w > 0.0 && self.h > 0.0
    }

    pub fn swapped(&self) -> Self {
        Self::new(self.h, self.w)
    }
}

/// A point in normalized unrotated-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormPoint {
    pub nx: f64,
    pub ny: f64,
}

impl NormPoint {
    pub fn new(nx: f64, ny: f64) -> Self {
        Self { nx, ny }
    }

    pub fn is_finite(&self) -> bool {
        self.nx.is_finite() && self.ny.is_finite()
    }

    /// Inside `[0,1]²`, edges included.
    pub fn in_unit_square(&self) -> bool {
        self.is_finite() && (0.0..=1.0).contains(&self.nx) && (0.0..=1.0).contains(&self.ny)
    }

    /// Clamp both coordinates into `[0,1]`.
    pub fn clamped(&self) -> Self {
        Self::new(self.nx.clamp(0.0, 1.0), self.ny.clamp(0.0, 1.0))
    }

    pub fn midpoint(&self, other: &NormPoint) -> NormPoint {
        NormPoint::new((self.nx + other.nx) / 2.0, (self.ny + other.ny) / 2.0)
    }
}

/// Axis-aligned rectangle in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl NormRect {
    pub const UNIT: NormRect = NormRect {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Whether `(x, y)` lies inside the rectangle, edges included.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Clamp `(x, y)` onto the rectangle.
    pub fn clamp_point(&self, x: f64, y: f64) -> (f64, f64) {
        (x.clamp(self.x, self.right()), y.clamp(self.y, self.bottom()))
    }

    /// Bounding box of a set of points, clamped to `[0,1]`.
    ///
    /// Returns `None` when the clamped box has no area.
    pub(crate) fn clamped_bounds(points: &[(f64, f64)]) -> Option<NormRect> {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for &(x, y) in points {
            if !x.is_finite() || !y.is_finite() {
                return None;
            }
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        let min_x = min_x.clamp(0.0, 1.0);
        let max_x = max_x.clamp(0.0, 1.0);
        let min_y = min_y.clamp(0.0, 1.0);
        let max_y = max_y.clamp(0.0, 1.0);
        if max_x <= min_x || max_y <= min_y {
            return None;
        }
        Some(NormRect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

/// Pointer position in screen (client) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding rectangle of an element in screen pixels, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Rotation in whole degrees, always stored in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Rotation(u16);

impl Rotation {
    pub const ZERO: Rotation = Rotation(0);

    /// Normalize any degree value into `[0, 360)`.
    pub fn from_degrees(degrees: i32) -> Self {
        Self(degrees.rem_euclid(360) as u16)
    }

    pub fn degrees(&self) -> u16 {
        self.0
    }

    /// 90 or 270 degrees, where perceived width and height swap.
    pub fn is_right_angle(&self) -> bool {
        self.0 == 90 || self.0 == 270
    }

    /// `(cos θ, sin θ)`, exact for multiples of 90 degrees.
    pub fn cos_sin(&self) -> (f64, f64) {
        match self.0 {
            0 => (1.0, 0.0),
            90 => (0.0, 1.0),
            180 => (-1.0, 0.0),
            270 => (0.0, -1.0),
            d => {
                let t = f64::from(d).to_radians();
                (t.cos(), t.sin())
            }
        }
    }

    /// Degrees in `(-180, 180]`, as shown on a signed rotation slider.
    pub fn signed_degrees(&self) -> i32 {
        let d = i32::from(self.0);
        if d > 180 { d - 360 } else { d }
    }

    /// Rotation from a typed or slid signed value.
    ///
    /// The value is rounded and clamped to `[-180, 180]`; non-finite input
    /// gives zero.
    pub fn from_signed_input(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Self::from_degrees(value.round().clamp(-180.0, 180.0) as i32)
    }

    /// The next clockwise quarter turn.
    pub fn quarter_turn(&self) -> Self {
        Self::from_degrees(i32::from(self.0) + 90)
    }

    /// `(|cos θ|, |sin θ|)`, the factors of the rotated-rectangle bounding box.
    pub fn abs_cos_sin(&self) -> (f64, f64) {
        let (c, s) = self.cos_sin();
        (c.abs(), s.abs())
    }
}

impl From<i32> for Rotation {
    fn from(degrees: i32) -> Self {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        i32::from(rotation.0)
    }
}

/// Rotate the vector `(x, y)` by the angle whose cosine and sine are given.
#[inline]
pub(crate) fn rotate(x: f64, y: f64, cos: f64, sin: f64) -> (f64, f64) {
    (x * cos - y * sin, x * sin + y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_normalizes() {
        assert_eq!(Rotation::from_degrees(-90).degrees(), 270);
        assert_eq!(Rotation::from_degrees(450).degrees(), 90);
        assert_eq!(Rotation::from_degrees(360).degrees(), 0);
        assert_eq!(Rotation::from_degrees(-720).degrees(), 0);
    }

    #[test]
    fn test_right_angles_are_exact() {
        assert_eq!(Rotation::from_degrees(90).abs_cos_sin(), (0.0, 1.0));
        assert_eq!(Rotation::from_degrees(270).cos_sin(), (0.0, -1.0));
        assert!(Rotation::from_degrees(270).is_right_angle());
        assert!(!Rotation::from_degrees(180).is_right_angle());
    }

    #[test]
    fn test_rotation_serde_as_integer() {
        let json = serde_json::to_string(&Rotation::from_degrees(-90)).unwrap();
        assert_eq!(json, "270");
        let back: Rotation = serde_json::from_str("-45").unwrap();
        assert_eq!(back.degrees(), 315);
    }

    #[test]
    fn test_signed_degrees() {
        assert_eq!(Rotation::from_degrees(270).signed_degrees(), -90);
        assert_eq!(Rotation::from_degrees(180).signed_degrees(), 180);
        assert_eq!(Rotation::from_signed_input(-45.4).degrees(), 315);
        assert_eq!(Rotation::from_signed_input(500.0).degrees(), 180);
        assert_eq!(Rotation::from_signed_input(-500.0).degrees(), 180);
        assert_eq!(Rotation::from_signed_input(f64::NAN), Rotation::ZERO);
        assert_eq!(Rotation::from_degrees(270).quarter_turn(), Rotation::ZERO);
    }

    #[test]
    fn test_clamped_bounds_rejects_empty() {
        assert!(NormRect::clamped_bounds(&[(1.2, 0.1), (1.5, 0.9)]).is_none());
        let r = NormRect::clamped_bounds(&[(-0.5, 0.2), (0.5, 0.8)]).unwrap();
        assert_eq!(r, NormRect::new(0.0, 0.2, 0.5, 0.8 - 0.2));
    }

    #[test]
    fn test_unit_square_bounds() {
        assert!(NormPoint::new(0.0, 1.0).in_unit_square());
        assert!(!NormPoint::new(-0.01, 0.5).in_unit_square());
        assert!(!NormPoint::new(f64::NAN, 0.5).in_unit_square());
    }
}
