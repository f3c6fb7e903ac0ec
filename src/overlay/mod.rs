//! Overlays drawn on top of the stage: composition grid and loupe.

pub mod grid;
pub mod loupe;

pub use grid::{GridColor, GridSettings, clamp_line_count};
pub use loupe::{LoupeLayout, loupe_layout};
