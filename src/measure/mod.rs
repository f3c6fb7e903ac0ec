//! Point-to-point measurements on the unrotated image.

pub mod calibration;
pub mod labels;
pub mod session;
pub mod side_distance;

pub use calibration::{Calibration, CalibrationField};
pub use labels::{
    LabelContext, Segment, absolute_labels, format_units, measure_segments, relative_labels,
    segment_length,
};
pub use session::MeasureSession;
pub use side_distance::{SideDistance, side_distance};

use serde::{Deserialize, Serialize};

/// How segment lengths are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementMode {
    /// Multiples of the shortest segment
    #[default]
    Relative,
    /// Real-world units from a calibrated canvas size
    Absolute,
}

impl MeasurementMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            MeasurementMode::Relative => "Relative proportion (X and multiples)",
            MeasurementMode::Absolute => "Values based on canvas",
        }
    }
}

/// Progress of a measurement session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureState {
    /// No points placed
    Idle,
    /// At least one point placed; segments are labelled as pairs complete
    PlacingPoints,
}
