//! Segment lengths and their labels.
//!
//! Lengths are measured in true image pixels and then expressed as a fraction
//! of the effective canvas width, so that the same segment has the same length
//! before and after a quarter turn.

use super::{MeasureSession, MeasurementMode};
use crate::geometry::{NormPoint, Size};

/// A completed measurement segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Index of the segment's first point in the point list
    pub index: usize,
    pub a: NormPoint,
    pub b: NormPoint,
    /// Length in units of the effective canvas width
    pub length: f64,
    /// Label anchor
    pub midpoint: NormPoint,
    /// Display label, empty when there is nothing to show
    pub label: String,
}

/// Inputs for labelling segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelContext {
    pub natural: Size,
    pub effective: Size,
    pub mode: MeasurementMode,
    /// Calibrated canvas width in user units; only used in absolute mode
    pub width_units: f64,
    pub snap_tolerance: f64,
}

/// Length of `a → b` in units of the effective canvas width.
pub fn segment_length(a: NormPoint, b: NormPoint, natural: Size, effective: Size) -> f64 {
    let dx = b.nx - a.nx;
    let dy = b.ny - a.ny;
    let pixel_dist = if natural.w > 0.0 && natural.h > 0.0 {
        (dx * natural.w).hypot(dy * natural.h)
    } else {
        dx.hypot(dy)
    };
    if effective.w > 0.0 {
        pixel_dist / effective.w
    } else {
        pixel_dist
    }
}

/// Build labelled segments for every completed pair of points.
pub fn measure_segments(session: &MeasureSession, ctx: &LabelContext) -> Vec<Segment> {
    let mut segments: Vec<Segment> = session
        .pairs()
        .map(|(index, a, b)| Segment {
            index,
            a,
            b,
            length: segment_length(a, b, ctx.natural, ctx.effective),
            midpoint: a.midpoint(&b),
            label: String::new(),
        })
        .collect();

    let lengths: Vec<f64> = segments.iter().map(|s| s.length).collect();
    let labels = match ctx.mode {
        MeasurementMode::Relative => relative_labels(&lengths, ctx.snap_tolerance),
        MeasurementMode::Absolute => absolute_labels(&lengths, ctx.width_units),
    };
    for (segment, label) in segments.iter_mut().zip(labels) {
        segment.label = label;
    }
    segments
}

/// Label lengths as multiples of the shortest positive one.
///
/// The shortest is `"X"`. A ratio within `snap_tolerance` of a whole number
/// is shown as that number (`"2x"`), anything else with one decimal
/// (`"1.6x"`). Zero-length segments stay unlabelled.
pub fn relative_labels(lengths: &[f64], snap_tolerance: f64) -> Vec<String> {
    let min_len = lengths
        .iter()
        .copied()
        .filter(|len| *len > 0.0 && len.is_finite())
        .fold(f64::INFINITY, f64::min);
    if !min_len.is_finite() {
        return vec![String::new(); lengths.len()];
    }

    lengths
        .iter()
        .map(|&len| {
            if !(len > 0.0 && len.is_finite()) {
                return String::new();
            }
            if len == min_len {
                return "X".to_string();
            }
            let ratio = len / min_len;
            let rounded = ratio.round();
            // tolerance is inclusive; the epsilon absorbs error from the division
            if (rounded - ratio).abs() <= snap_tolerance + 1e-9 {
                format!("{}x", rounded as i64)
            } else {
                format!("{:.1}x", ratio)
            }
        })
        .collect()
}

/// Label lengths in calibrated units.
pub fn absolute_labels(lengths: &[f64], width_units: f64) -> Vec<String> {
    lengths
        .iter()
        .map(|&len| {
            if !(width_units > 0.0) {
                return String::new();
            }
            let value = len * width_units;
            if value.is_finite() && value > 0.0 {
                format_units(value)
            } else {
                String::new()
            }
        })
        .collect()
}

/// Format a calibrated value with precision depending on its magnitude.
///
/// `>= 100` is shown as an integer, `>= 10` with one decimal (`"12.5"`, but
/// `"50"` rather than `"50.0"`), smaller values with two decimals. Zero and
/// non-finite values give an empty string.
pub fn format_units(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return String::new();
    }
    let magnitude = value.abs();
    if magnitude >= 100.0 {
        format!("{}", value.round() as i64)
    } else if magnitude >= 10.0 {
        let text = format!("{:.1}", value);
        match text.strip_suffix(".0") {
            Some(whole) => whole.to_string(),
            None => text,
        }
    } else {
        format!("{:.2}", value)
    }
}
