// SPDX-License-Identifier: MIT
//
// Preview scale-to-fit computation.

/// Compute the uniform factor that shrinks a `width` x `height` image to fit
/// within `max_width` x `max_height`.
///
/// Returns the neutral scale `1.0` when the image already fits on both axes.
/// Otherwise the image is fitted to the viewport height; if the resulting
/// width would still overflow, it is fitted to the viewport width instead.
/// The result always satisfies both bounds with a single uniform factor —
/// previews are never stretched non-uniformly.
///
/// The scale is computed as a direct ratio of the binding viewport axis.
/// Deriving it from a rounded fitted width would amplify the rounding error
/// by the height/width ratio and could push the scaled height past the
/// viewport on extreme aspect ratios.
pub fn scale_to_fit(width: u32, height: u32, max_width: u32, max_height: u32) -> f64 {
    if width <= max_width && height <= max_height {
        return 1.0;
    }

    let height_fit = max_height as f64 / height as f64;
    if (width as f64 * height_fit).round() > max_width as f64 {
        max_width as f64 / width as f64
    } else {
        height_fit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_that_fits_gets_neutral_scale() {
        assert_eq!(scale_to_fit(800, 600, 1920, 1080), 1.0);
        // Exact fit still counts as fitting.
        assert_eq!(scale_to_fit(1920, 1080, 1920, 1080), 1.0);
    }

    #[test]
    fn oversized_image_fits_both_axes_after_scaling() {
        let cases = [
            (4000u32, 3000u32),
            (3000, 4000),
            (5000, 1000),
            (1000, 5000),
            (1921, 1081),
            (100, 5000),
            (5000, 100),
            (7019, 4961),
        ];
        for (w, h) in cases {
            let scale = scale_to_fit(w, h, 1920, 1080);
            let scaled_w = (w as f64 * scale).round();
            let scaled_h = (h as f64 * scale).round();
            assert!(
                scaled_w <= 1920.0 && scaled_h <= 1080.0,
                "{w}x{h} scaled by {scale} to {scaled_w}x{scaled_h}"
            );
        }
    }

    #[test]
    fn scaling_preserves_aspect_ratio() {
        let (w, h) = (4000u32, 3000u32);
        let scale = scale_to_fit(w, h, 1920, 1080);
        let scaled_ratio = (w as f64 * scale) / (h as f64 * scale);
        let native_ratio = w as f64 / h as f64;
        assert!((scaled_ratio - native_ratio).abs() < 1e-9);
    }

    #[test]
    fn tall_image_is_fitted_to_viewport_height() {
        // 1000x5000 fitted to 1080 rows: the scale is the height ratio.
        let scale = scale_to_fit(1000, 5000, 1920, 1080);
        assert!((scale - 1080.0 / 5000.0).abs() < 1e-9);
    }

    #[test]
    fn extreme_aspect_height_stays_within_viewport() {
        // A 100x5000 sliver: a scale derived from the rounded fitted width
        // (22/100 = 0.22) would blow the height bound (0.22 * 5000 = 1100).
        let scale = scale_to_fit(100, 5000, 1920, 1080);
        let scaled_height = (5000.0 * scale).round();
        assert!(
            scaled_height <= 1080.0,
            "scale {scale} gives height {scaled_height} > 1080"
        );
        assert!((scale - 1080.0 / 5000.0).abs() < 1e-9);
    }

    #[test]
    fn wide_image_falls_back_to_viewport_width() {
        // 5000x1000 fitted to height would give width 5400 > 1920, so the
        // width bound wins.
        let scale = scale_to_fit(5000, 1000, 1920, 1080);
        assert!((scale - 1920.0 / 5000.0).abs() < 1e-9);
    }
}
