//! Zoom and pan mathematics.
//!
//! The viewer applies zoom and pan as an outer transform around the stage:
//! `translate(offset) scale(zoom)`. Zoom is always kept inside
//! [`ZOOM_MIN`]..=[`ZOOM_MAX`].

use serde::{Deserialize, Serialize};

use crate::constants::{ZOOM_MAX, ZOOM_MIN};

/// Clamp a zoom factor into the allowed range. NaN falls back to 1.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(ZOOM_MIN, ZOOM_MAX)
}

/// Represents the outer zoom/pan transform of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewTransform {
    /// Create a new transform; the zoom is clamped.
    pub fn new(zoom: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            offset_x,
            offset_y,
        }
    }

    /// Create an identity transform (zoom=1, no offset).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Apply one wheel notch.
    ///
    /// Scrolling up (negative `delta_y`) zooms in by `step`, scrolling down
    /// zooms out. A zero or non-finite delta leaves the zoom unchanged.
    pub fn wheel(&self, delta_y: f64, step: f64) -> ViewTransform {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return *self;
        }
        let delta = -delta_y.signum() * step;
        self.with_zoom(self.zoom + delta)
    }

    /// Zoom in by a button step, rounded to two decimals.
    pub fn zoom_in(&self, step: f64) -> ViewTransform {
        self.with_zoom(round2(self.zoom + step))
    }

    /// Zoom out by a button step, rounded to two decimals.
    pub fn zoom_out(&self, step: f64) -> ViewTransform {
        self.with_zoom(round2(self.zoom - step))
    }

    /// Apply a pan delta to the transform.
    pub fn pan_by(&self, dx: f64, dy: f64) -> ViewTransform {
        ViewTransform {
            zoom: self.zoom,
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
        }
    }

    /// Zoom as a whole percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    fn with_zoom(&self, zoom: f64) -> ViewTransform {
        ViewTransform {
            zoom: clamp_zoom(zoom),
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
