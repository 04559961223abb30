// SPDX-License-Identifier: MIT
//
// Non-destructive crop preview overlay.

use image::RgbImage;

use platecrop_core::CropBounds;

/// Produce a copy of `image` with everything outside the keep region tinted.
///
/// The keep region is `[0, bounds.width) x [0, bounds.height)`; pixels
/// outside it get `tint` added to their green channel (saturating) so the
/// operator can see what a crop would discard. The source buffer is never
/// mutated.
pub fn render_crop_overlay(image: &RgbImage, bounds: CropBounds, tint: u8) -> RgbImage {
    let mut preview = image.clone();
    for (x, y, pixel) in preview.enumerate_pixels_mut() {
        if x >= bounds.width || y >= bounds.height {
            pixel.0[1] = pixel.0[1].saturating_add(tint);
        }
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const TINT: u8 = 51;

    #[test]
    fn source_image_is_not_mutated() {
        let image = RgbImage::from_pixel(40, 30, Rgb([100, 100, 100]));
        let before = image.clone();
        let _preview = render_crop_overlay(&image, CropBounds::new(10, 20), TINT);
        assert_eq!(image, before);
    }

    #[test]
    fn keep_region_is_untouched_and_excluded_region_is_tinted() {
        let image = RgbImage::from_pixel(40, 30, Rgb([100, 100, 100]));
        let preview = render_crop_overlay(&image, CropBounds::new(10, 20), TINT);

        // Inside [0,20) x [0,10): identical to the source.
        assert_eq!(preview.get_pixel(0, 0), &Rgb([100, 100, 100]));
        assert_eq!(preview.get_pixel(19, 9), &Rgb([100, 100, 100]));

        // First excluded column and row: green channel raised, others kept.
        assert_eq!(preview.get_pixel(20, 0), &Rgb([100, 151, 100]));
        assert_eq!(preview.get_pixel(0, 10), &Rgb([100, 151, 100]));
        assert_eq!(preview.get_pixel(39, 29), &Rgb([100, 151, 100]));
    }

    #[test]
    fn tint_saturates_instead_of_wrapping() {
        let image = RgbImage::from_pixel(4, 4, Rgb([250, 250, 250]));
        let preview = render_crop_overlay(&image, CropBounds::new(0, 0), TINT);
        assert_eq!(preview.get_pixel(0, 0), &Rgb([250, 255, 250]));
    }

    #[test]
    fn full_bounds_leave_the_image_identical() {
        let image = RgbImage::from_pixel(16, 12, Rgb([5, 6, 7]));
        let preview = render_crop_overlay(&image, CropBounds::new(12, 16), TINT);
        assert_eq!(preview, image);
    }
}
