//! refview - Reference Image Viewer core
//!
//! Coordinate model behind a reference image viewer: stage sizing for rotated
//! images, crop mapping between stage and image space, pointer mapping,
//! zoom/pan, point-to-point measurements and the grid and loupe overlays.
//! Rendering is left to the host; this crate only computes.

pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod measure;
pub mod overlay;
pub mod state;
pub mod viewer;
pub mod widget_state;
pub mod zoom_math;

pub use config::{ConfigError, ViewerConfig};
pub use error::SessionError;
pub use viewer::ViewerSession;
