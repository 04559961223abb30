// SPDX-License-Identifier: MIT
//
// Criterion benchmarks for the platecrop analysis core. Benchmarks boundary
// estimation on a synthetic plate/scan pair of a realistic-but-small size.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};

use platecrop_analysis::estimate_crop_bounds;

/// Benchmark boundary estimation on a 500x400 synthetic scan.
///
/// The scan is the plate plus a solid off-colour block, the same pattern the
/// unit tests use. This exercises the full difference/blur/threshold/edge
/// pipeline rather than any early-exit path.
fn bench_estimate_crop_bounds(c: &mut Criterion) {
    let plate = RgbImage::from_pixel(500, 400, Rgb([245, 245, 245]));
    let mut scan = plate.clone();
    for y in 50..300 {
        for x in 50..350 {
            scan.put_pixel(x, y, Rgb([40, 40, 40]));
        }
    }

    c.bench_function("estimate_crop_bounds (500x400)", |b| {
        b.iter(|| {
            let bounds = estimate_crop_bounds(black_box(&plate), black_box(&scan))
                .expect("synthetic images share dimensions");
            black_box(bounds);
        });
    });
}

criterion_group!(benches, bench_estimate_crop_bounds);
criterion_main!(benches);
