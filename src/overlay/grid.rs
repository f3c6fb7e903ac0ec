//! Composition grid drawn over the stage.
//!
//! The grid is screen-aligned: it stays horizontal and vertical even when the
//! image underneath rotates, and it divides the crop rather than the stage when
//! a crop is active.

use serde::{Deserialize, Serialize};

use crate::constants::{GRID_MAX_LINES, GRID_MIN_LINES};
use crate::geometry::CropRect;

/// Grid line colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridColor {
    #[default]
    White,
    Black,
    Red,
}

impl GridColor {
    /// RGBA at 85% opacity.
    pub fn rgba(&self) -> [u8; 4] {
        match self {
            GridColor::White => [255, 255, 255, 217],
            GridColor::Black => [0, 0, 0, 217],
            GridColor::Red => [255, 0, 0, 217],
        }
    }

    pub fn all() -> &'static [GridColor] {
        &[GridColor::White, GridColor::Black, GridColor::Red]
    }
}

/// Clamp a line count into the supported range.
pub fn clamp_line_count(count: u32) -> u32 {
    count.clamp(GRID_MIN_LINES, GRID_MAX_LINES)
}

/// Grid visibility, colour and line counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSettings {
    pub visible: bool,
    pub color: GridColor,
    horizontal: u32,
    vertical: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self::new(GRID_MIN_LINES, GRID_MIN_LINES)
    }
}

impl GridSettings {
    pub fn new(horizontal: u32, vertical: u32) -> Self {
        Self {
            visible: false,
            color: GridColor::default(),
            horizontal: clamp_line_count(horizontal),
            vertical: clamp_line_count(vertical),
        }
    }

    pub fn horizontal(&self) -> u32 {
        self.horizontal
    }

    pub fn vertical(&self) -> u32 {
        self.vertical
    }

    pub fn set_horizontal(&mut self, count: u32) {
        self.horizontal = clamp_line_count(count);
    }

    pub fn set_vertical(&mut self, count: u32) {
        self.vertical = clamp_line_count(count);
    }

    pub fn more_horizontal(&mut self) {
        self.set_horizontal(self.horizontal.saturating_add(1));
    }

    pub fn fewer_horizontal(&mut self) {
        self.set_horizontal(self.horizontal.saturating_sub(1));
    }

    pub fn more_vertical(&mut self) {
        self.set_vertical(self.vertical.saturating_add(1));
    }

    pub fn fewer_vertical(&mut self) {
        self.set_vertical(self.vertical.saturating_sub(1));
    }

    /// Stage-normalized x positions of the vertical lines.
    pub fn vertical_lines(&self, crop: Option<&CropRect>) -> Vec<f64> {
        let (base, span) = crop.map_or((0.0, 1.0), |c| (c.x, c.w));
        line_positions(self.vertical, base, span)
    }

    /// Stage-normalized y positions of the horizontal lines.
    pub fn horizontal_lines(&self, crop: Option<&CropRect>) -> Vec<f64> {
        let (base, span) = crop.map_or((0.0, 1.0), |c| (c.y, c.h));
        line_positions(self.horizontal, base, span)
    }
}

fn line_positions(count: u32, base: f64, span: f64) -> Vec<f64> {
    let divisions = f64::from(count + 1);
    (1..=count)
        .map(|i| base + span * (f64::from(i) / divisions))
        .collect()
}
