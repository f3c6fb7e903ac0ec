//! Global constants for the reference viewer

/// Smallest allowed zoom factor
pub const ZOOM_MIN: f64 = 0.2;

/// Largest allowed zoom factor
pub const ZOOM_MAX: f64 = 8.0;

/// Zoom change per wheel notch
pub const DEFAULT_WHEEL_ZOOM_STEP: f64 = 0.1;

/// Zoom change per zoom button press
pub const DEFAULT_BUTTON_ZOOM_STEP: f64 = 0.2;

/// Minimum number of grid lines per axis
pub const GRID_MIN_LINES: u32 = 1;

/// Maximum number of grid lines per axis
pub const GRID_MAX_LINES: u32 = 12;

/// Loupe circle radius in screen pixels
pub const DEFAULT_LOUPE_RADIUS: f64 = 120.0;

/// Loupe magnification relative to the zoomed stage
pub const DEFAULT_LOUPE_SCALE: f64 = 2.0;

/// A relative ratio this close to a whole number is shown as that number
pub const DEFAULT_RELATIVE_SNAP_TOLERANCE: f64 = 0.1;

/// Smallest crop extent per axis, as a fraction of the stage
pub const MIN_CROP_SIZE: f64 = 0.03;

/// Width over height of an A-series sheet (approximately sqrt 2)
pub const A_SERIES_RATIO: f64 = 1.414;
