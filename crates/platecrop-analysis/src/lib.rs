// SPDX-License-Identifier: MIT
//
// platecrop-analysis — The image-analysis core of platecrop.
//
// Provides plate-vs-scan boundary estimation (difference field, smoothing,
// thresholding, per-line edge tracing with outlier rejection), the preview
// scale-to-fit computation, the non-destructive crop overlay, and the cheap
// PNG dimension probe used to skip already-cropped files.

pub mod boundary;
pub mod outliers;
pub mod overlay;
pub mod probe;
pub mod scale;

pub use boundary::estimate_crop_bounds;
pub use outliers::reject_outliers;
pub use overlay::render_crop_overlay;
pub use probe::read_png_dimensions;
pub use scale::scale_to_fit;
