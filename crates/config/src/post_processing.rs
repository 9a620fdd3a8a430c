#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PostProcessing {
    /// Edge of a pixelation cell, in pixels (clamped to 1..=256).
    pub grid_size: u32,
    /// Multiplier applied to `grid_size` (clamped to 0.1..=16).
    pub pixel_size_ratio: f32,
    /// Collapse every cell to its luma.
    pub grayscale_only: bool,
}

impl Default for PostProcessing {
    fn default() -> Self {
        Self {
            grid_size: 4,
            pixel_size_ratio: 1.0,
            grayscale_only: true,
        }
    }
}

impl PostProcessing {
    pub fn clamp(self) -> Self {
        let ratio = if self.pixel_size_ratio.is_finite() {
            self.pixel_size_ratio.clamp(0.1, 16.0)
        } else {
            1.0
        };
        Self {
            grid_size: self.grid_size.clamp(1, 256),
            pixel_size_ratio: ratio,
            grayscale_only: self.grayscale_only,
        }
    }

    /// Effective cell edge in pixels, never zero.
    pub fn cell_size(&self) -> u32 {
        let clamped = self.clamp();
        ((clamped.grid_size as f32 * clamped.pixel_size_ratio).round() as u32).max(1)
    }
}
