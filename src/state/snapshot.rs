//! Viewer state snapshot for external persistence.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::geometry::{CropRect, NormPoint, Rotation};
use crate::measure::MeasurementMode;
use crate::zoom_math::ViewTransform;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot of one image's viewer state.
///
/// Contains everything needed to reopen the viewer where the user left it:
/// rotation and crop, the view transform, measurement points and the
/// calibration the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerSnapshot {
    pub version: u32,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub crop: Option<CropRect>,
    #[serde(default)]
    pub transform: ViewTransform,
    #[serde(default)]
    pub points: Vec<NormPoint>,
    #[serde(default)]
    pub mode: MeasurementMode,
    #[serde(default)]
    pub calibration_width: String,
    #[serde(default)]
    pub calibration_height: String,
}

impl ViewerSnapshot {
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(SessionError::VersionTooNew {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}
