// SPDX-License-Identifier: MIT
//
// Plate-difference boundary estimation.
//
// Compares a scan against the clean plate reference and derives the
// (height, width) extents of the region that actually contains the scanned
// object: absolute difference, small Gaussian smoothing pass, grayscale
// conversion, fixed-threshold binarization, then a per-line "last content
// pixel" trace with outlier rejection on each axis.

use image::{GrayImage, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, instrument};

use platecrop_core::{CropBounds, PlatecropError, Result};

use crate::outliers::{DEFAULT_SENSITIVITY, reject_outliers};

/// Smoothed-difference intensity at or above this value marks a content pixel.
pub const CONTENT_THRESHOLD: u8 = 16;

/// Sigma of the noise-suppression blur, equivalent to a 3x3 kernel.
pub const BLUR_SIGMA: f32 = 0.8;

/// Estimate the crop bounds of `scan` by differencing it against `plate`.
///
/// Returns [`PlatecropError::PlateSizeMismatch`] when the two images do not
/// share the same dimensions. A scan identical to the plate (no differing
/// content on any line) yields `CropBounds { height: 0, width: 0 }`.
#[instrument(skip_all, fields(width = scan.width(), height = scan.height()))]
pub fn estimate_crop_bounds(plate: &RgbImage, scan: &RgbImage) -> Result<CropBounds> {
    if plate.dimensions() != scan.dimensions() {
        return Err(PlatecropError::PlateSizeMismatch {
            plate_width: plate.width(),
            plate_height: plate.height(),
            scan_width: scan.width(),
            scan_height: scan.height(),
        });
    }

    let (width, height) = scan.dimensions();

    // Per-channel absolute difference between scan and plate.
    let mut diff = RgbImage::new(width, height);
    for (out, (scanned, reference)) in diff
        .pixels_mut()
        .zip(scan.pixels().zip(plate.pixels()))
    {
        for channel in 0..3 {
            out.0[channel] = scanned.0[channel].abs_diff(reference.0[channel]);
        }
    }

    // Smooth the difference field to suppress sensor noise, then reduce to
    // a single intensity channel and binarize.
    let blurred = gaussian_blur_f32(&diff, BLUR_SIGMA);
    let gray: GrayImage = image::imageops::grayscale(&blurred);
    let mask = threshold_mask(&gray);
    debug!("difference mask computed");

    let crop_height = edge_coordinate(&column_edges(&mask));
    let crop_width = edge_coordinate(&row_edges(&mask));
    debug!(crop_height, crop_width, "boundary estimated");

    Ok(CropBounds::new(crop_height, crop_width).clamped_to(width, height))
}

/// Binarize an intensity image at [`CONTENT_THRESHOLD`].
fn threshold_mask(gray: &GrayImage) -> GrayImage {
    let mut mask = GrayImage::new(gray.width(), gray.height());
    for (out, pixel) in mask.pixels_mut().zip(gray.pixels()) {
        out.0[0] = if pixel.0[0] >= CONTENT_THRESHOLD { 255 } else { 0 };
    }
    mask
}

/// For every column, the row index of its last content pixel (bottom-most),
/// or `None` when the column has no content.
fn column_edges(mask: &GrayImage) -> Vec<Option<u32>> {
    (0..mask.width())
        .map(|x| {
            (0..mask.height())
                .rev()
                .find(|&y| mask.get_pixel(x, y).0[0] != 0)
        })
        .collect()
}

/// For every row, the column index of its last content pixel (right-most),
/// or `None` when the row has no content.
fn row_edges(mask: &GrayImage) -> Vec<Option<u32>> {
    (0..mask.height())
        .map(|y| {
            (0..mask.width())
                .rev()
                .find(|&x| mask.get_pixel(x, y).0[0] != 0)
        })
        .collect()
}

/// Reduce per-line last-content indices to a single edge coordinate.
///
/// Lines without content are skipped; the remaining indices are sorted and
/// filtered through MAD outlier rejection, and the maximum retained index is
/// the edge. The index is used directly as the exclusive crop bound, with no
/// extra margin. An all-empty axis defaults to 0.
fn edge_coordinate(lines: &[Option<u32>]) -> u32 {
    let mut coords: Vec<f64> = lines.iter().flatten().map(|&c| f64::from(c)).collect();
    if coords.is_empty() {
        return 0;
    }
    coords.sort_by(f64::total_cmp);

    // The median element always survives rejection, so the inlier set is
    // never empty here.
    reject_outliers(&coords, DEFAULT_SENSITIVITY)
        .into_iter()
        .fold(0.0, f64::max) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn uniform(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(color))
    }

    /// Paint a solid rectangle of `color` with top-left (x0, y0).
    fn paint_block(image: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: [u8; 3]) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                image.put_pixel(x, y, Rgb(color));
            }
        }
    }

    #[test]
    fn mismatched_dimensions_are_a_reported_error() {
        let plate = uniform(100, 80, [250, 250, 250]);
        let scan = uniform(99, 80, [250, 250, 250]);
        let err = estimate_crop_bounds(&plate, &scan).unwrap_err();
        assert!(matches!(err, PlatecropError::PlateSizeMismatch { .. }));
    }

    #[test]
    fn identical_scan_and_plate_default_to_zero_bounds() {
        let plate = uniform(120, 90, [240, 240, 240]);
        let scan = plate.clone();
        let bounds = estimate_crop_bounds(&plate, &scan).expect("estimate");
        assert_eq!(bounds, platecrop_core::CropBounds::new(0, 0));
    }

    #[test]
    fn block_far_edges_become_the_estimated_bounds() {
        // Plate 300 cols x 200 rows; block of 60x100 (h x w) at (40, 50).
        let plate = uniform(300, 200, [245, 245, 245]);
        let mut scan = plate.clone();
        paint_block(&mut scan, 50, 40, 100, 60, [40, 40, 40]);

        let bounds = estimate_crop_bounds(&plate, &scan).expect("estimate");
        let expected_height = 40 + 60;
        let expected_width = 50 + 100;
        assert!(
            (bounds.height as i64 - expected_height).abs() <= 3,
            "height {} not within 3 of {expected_height}",
            bounds.height
        );
        assert!(
            (bounds.width as i64 - expected_width).abs() <= 3,
            "width {} not within 3 of {expected_width}",
            bounds.width
        );
    }

    #[test]
    fn end_to_end_plate_scenario() {
        // 1000 rows x 2000 cols plate; 400x600 (h x w) block at row 100, col 100.
        let plate = uniform(2000, 1000, [250, 250, 250]);
        let mut scan = plate.clone();
        paint_block(&mut scan, 100, 100, 600, 400, [30, 60, 90]);

        let bounds = estimate_crop_bounds(&plate, &scan).expect("estimate");
        assert!(
            (bounds.height as i64 - 500).abs() <= 3,
            "height {} not near 500",
            bounds.height
        );
        assert!(
            (bounds.width as i64 - 700).abs() <= 3,
            "width {} not near 700",
            bounds.width
        );
    }

    #[test]
    fn stray_line_indices_far_from_the_object_are_rejected() {
        // A ragged object edge tracing around index 170, plus a couple of
        // lines whose last content pixel is a distant dust speck. The speck
        // indices must not become the edge.
        let mut lines: Vec<Option<u32>> = (0..100)
            .map(|i| Some(168 + (i % 5)))
            .collect();
        lines.push(Some(383));
        lines.push(Some(390));
        let edge = edge_coordinate(&lines);
        assert!(
            (168..=175).contains(&edge),
            "edge {edge} pulled away from the object by speck lines"
        );
    }

    /// The retained maximum last-content index is the crop bound itself:
    /// no one-pixel margin is added beyond it.
    #[test]
    fn edge_value_is_used_directly_as_bound() {
        let lines = vec![Some(42u32); 10];
        assert_eq!(edge_coordinate(&lines), 42);
    }

    #[test]
    fn all_sentinel_axis_defaults_to_zero() {
        let lines = vec![None; 10];
        assert_eq!(edge_coordinate(&lines), 0);
    }

    #[test]
    fn lines_without_content_are_skipped_not_counted() {
        let mut lines = vec![None; 20];
        for line in lines.iter_mut().take(10) {
            *line = Some(30);
        }
        assert_eq!(edge_coordinate(&lines), 30);
    }
}
