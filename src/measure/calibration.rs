//! Calibration of absolute measurements.
//!
//! The user declares the real-world width or height of the canvas. Typing one
//! field fills in the other from the canvas aspect ratio, except while the
//! other field is itself being edited.

use crate::geometry::Size;

/// One of the two calibration inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalibrationField {
    Width,
    Height,
}

/// Typed calibration values and edit locks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calibration {
    width_text: String,
    height_text: String,
    editing_width: bool,
    editing_height: bool,
}

/// Parse a typed value, accepting only finite positive numbers.
fn parse_positive(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

impl Calibration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore stored texts without triggering derivation.
    pub fn from_texts(width: impl Into<String>, height: impl Into<String>) -> Self {
        Self {
            width_text: width.into(),
            height_text: height.into(),
            ..Self::default()
        }
    }

    pub fn width_text(&self) -> &str {
        &self.width_text
    }

    pub fn height_text(&self) -> &str {
        &self.height_text
    }

    pub fn begin_edit(&mut self, field: CalibrationField) {
        match field {
            CalibrationField::Width => self.editing_width = true,
            CalibrationField::Height => self.editing_height = true,
        }
    }

    pub fn end_edit(&mut self, field: CalibrationField) {
        match field {
            CalibrationField::Width => self.editing_width = false,
            CalibrationField::Height => self.editing_height = false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_width || self.editing_height
    }

    /// Store a typed width and derive the height as `width * aspect`.
    ///
    /// `aspect` is height over width of the effective canvas. Empty or invalid
    /// text leaves the height untouched.
    pub fn set_width_text(&mut self, text: &str, aspect: f64) {
        self.width_text = text.to_string();
        if self.editing_height || aspect <= 0.0 {
            return;
        }
        if let Some(w) = parse_positive(text) {
            self.height_text = format!("{:.2}", w * aspect);
        }
    }

    /// Store a typed height and derive the width as `height / aspect`.
    pub fn set_height_text(&mut self, text: &str, aspect: f64) {
        self.height_text = text.to_string();
        if self.editing_width || aspect <= 0.0 {
            return;
        }
        if let Some(h) = parse_positive(text) {
            self.width_text = format!("{:.2}", h / aspect);
        }
    }

    /// Reset both fields to the canvas size in pixels.
    ///
    /// Skipped while either field is being edited or when the canvas is
    /// degenerate. Returns whether the fields changed.
    pub fn reset_to_canvas(&mut self, effective: Size) -> bool {
        if self.is_editing() || !effective.is_positive() {
            return false;
        }
        let w = effective.w.round().max(1.0) as u64;
        let h = effective.h.round().max(1.0) as u64;
        self.width_text = w.to_string();
        self.height_text = h.to_string();
        true
    }

    /// Canvas width in user units, or 0 when not calibrated.
    ///
    /// A typed width wins; otherwise it is derived from a typed height.
    pub fn width_units(&self, aspect: f64) -> f64 {
        if let Some(w) = parse_positive(&self.width_text) {
            return w;
        }
        match parse_positive(&self.height_text) {
            Some(h) if aspect > 0.0 => h / aspect,
            _ => 0.0,
        }
    }

    /// Canvas height in user units, or 0 when not calibrated.
    pub fn height_units(&self, aspect: f64) -> f64 {
        if let Some(h) = parse_positive(&self.height_text) {
            return h;
        }
        let w = self.width_units(aspect);
        if w > 0.0 && aspect > 0.0 { w * aspect } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_width_derives_height() {
        let mut cal = Calibration::new();
        cal.begin_edit(CalibrationField::Width);
        cal.set_width_text("30", 0.5);
        assert_eq!(cal.height_text(), "15.00");
        assert!(approx_eq(cal.width_units(0.5), 30.0));
        assert!(approx_eq(cal.height_units(0.5), 15.0));
    }

    #[test]
    fn test_height_derives_width() {
        let mut cal = Calibration::new();
        cal.begin_edit(CalibrationField::Height);
        cal.set_height_text("20", 0.5);
        assert_eq!(cal.width_text(), "40.00");
    }

    #[test]
    fn test_edit_lock_prevents_feedback() {
        let mut cal = Calibration::from_texts("100", "50");
        cal.begin_edit(CalibrationField::Height);
        cal.set_width_text("80", 0.5);
        assert_eq!(cal.height_text(), "50");
        cal.end_edit(CalibrationField::Height);
        cal.set_width_text("80", 0.5);
        assert_eq!(cal.height_text(), "40.00");
    }

    #[test]
    fn test_empty_text_keeps_other_field() {
        let mut cal = Calibration::from_texts("100", "50");
        cal.set_width_text("", 0.5);
        assert_eq!(cal.width_text(), "");
        assert_eq!(cal.height_text(), "50");
        // Width now comes from the height.
        assert!(approx_eq(cal.width_units(0.5), 100.0));
    }

    #[test]
    fn test_uncalibrated_is_zero() {
        let cal = Calibration::from_texts("abc", "-3");
        assert_eq!(cal.width_units(0.5), 0.0);
        assert_eq!(cal.height_units(0.5), 0.0);
        assert_eq!(Calibration::from_texts("", "10").width_units(0.0), 0.0);
    }

    #[test]
    fn test_reset_to_canvas() {
        let mut cal = Calibration::new();
        assert!(cal.reset_to_canvas(Size::new(1919.6, 0.2)));
        assert_eq!(cal.width_text(), "1920");
        assert_eq!(cal.height_text(), "1");

        cal.begin_edit(CalibrationField::Width);
        assert!(!cal.reset_to_canvas(Size::new(10.0, 10.0)));
        assert_eq!(cal.width_text(), "1920");
        assert!(!Calibration::new().reset_to_canvas(Size::ZERO));
    }
}
