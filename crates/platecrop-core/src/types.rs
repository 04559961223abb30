// SPDX-License-Identifier: MIT
//
// Core domain types for platecrop.

use serde::{Deserialize, Serialize};

/// The rectangle of a scan to retain after cropping.
///
/// `height` and `width` are exclusive extents in native image coordinates:
/// rows `[0, height)` and columns `[0, width)` are kept. Both are always
/// less than or equal to the source image's corresponding dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBounds {
    /// Number of rows to keep.
    pub height: u32,
    /// Number of columns to keep.
    pub width: u32,
}

impl CropBounds {
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Clamp both extents to the given native image dimensions.
    pub fn clamped_to(self, native_width: u32, native_height: u32) -> Self {
        Self {
            height: self.height.min(native_height),
            width: self.width.min(native_width),
        }
    }
}

impl std::fmt::Display for CropBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rotation applied to the cropped image when a session is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    /// Keep the crop as scanned.
    None,
    /// Rotate 90 degrees clockwise.
    Clockwise90,
    /// Rotate 90 degrees counter-clockwise.
    CounterClockwise90,
    /// Rotate 180 degrees.
    Half,
}

impl Rotation {
    /// Whether this rotation swaps the width and height of the image.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::CounterClockwise90)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_bounds_clamp_to_native_dimensions() {
        let bounds = CropBounds::new(1200, 2500);
        let clamped = bounds.clamped_to(2000, 1000);
        assert_eq!(clamped, CropBounds::new(1000, 2000));

        // Already within bounds: unchanged.
        let small = CropBounds::new(10, 20);
        assert_eq!(small.clamped_to(2000, 1000), small);
    }

    #[test]
    fn quarter_rotations_swap_dimensions() {
        assert!(Rotation::Clockwise90.swaps_dimensions());
        assert!(Rotation::CounterClockwise90.swaps_dimensions());
        assert!(!Rotation::None.swaps_dimensions());
        assert!(!Rotation::Half.swaps_dimensions());
    }
}
