// SPDX-License-Identifier: MIT
//
// Outlier rejection for coordinate samples, using the median absolute
// deviation (MAD) rule.

/// Default sensitivity multiplier for [`reject_outliers`].
pub const DEFAULT_SENSITIVITY: f64 = 2.0;

/// Return the subset of `data` considered inliers under the MAD rule.
///
/// Computes the median of the sample and the median of the absolute
/// deviations from it (MDEV). Elements whose deviation-to-MDEV ratio is
/// strictly below `m` are retained. When MDEV is zero the sample has no
/// usable spread and every element is an inlier.
///
/// The input is never mutated and the relative order of retained elements
/// is preserved.
pub fn reject_outliers(data: &[f64], m: f64) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }

    let center = median(data);
    let deviations: Vec<f64> = data.iter().map(|value| (value - center).abs()).collect();
    let mdev = median(&deviations);

    if mdev == 0.0 {
        return data.to_vec();
    }

    data.iter()
        .zip(&deviations)
        .filter(|(_, deviation)| **deviation / mdev < m)
        .map(|(value, _)| *value)
        .collect()
}

/// Median of a non-empty sample. For an even-length sample this is the mean
/// of the two central elements.
fn median(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}
