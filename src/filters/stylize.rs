//! Stylize filters: Vintage, Oil Paint, Watercolor, Neon, Dramatic, Dreamy.
//!
//! These are the artistic effect filters. All of them take a normalized
//! intensity `t` in 0.0-1.0 (callers clamp), do their math in f64 and clamp
//! and round each channel back to u8 (ties to even).
//!
//! ## Supported Formats
//!
//! Filters accept images with 3 or 4 channels:
//! - **RGB**: (height, width, 3) - processes all 3 channels
//! - **RGBA**: (height, width, 4) - processes RGB, preserves alpha

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use super::core::{map_rgb_u8, to_u8};

// ============================================================================
// Vintage
// ============================================================================

/// Blend each pixel toward its classic sepia tone.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
/// * `intensity` - 0.0 (unchanged) to 1.0 (full sepia)
///
/// # Returns
/// Sepia-toned image with same channel count
pub fn vintage_u8(input: ArrayView3<u8>, intensity: f64) -> Array3<u8> {
    map_rgb_u8(input, |r, g, b| {
        let tr = 0.393 * r + 0.769 * g + 0.189 * b;
        let tg = 0.349 * r + 0.686 * g + 0.168 * b;
        let tb = 0.272 * r + 0.534 * g + 0.131 * b;
        [
            r + (tr - r) * intensity,
            g + (tg - g) * intensity,
            b + (tb - b) * intensity,
        ]
    })
}

// ============================================================================
// Oil Paint
// ============================================================================

/// Average R, G, B over each pixel's 3x3 neighborhood.
///
/// Neighbors outside the image are skipped, so border pixels average fewer
/// samples (no wraparound, no padding). The radius is fixed at 1; intensity
/// is accepted for a uniform filter signature but does not change the result.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
/// * `_intensity` - Ignored
///
/// # Returns
/// Smoothed image with same channel count, alpha preserved
pub fn oil_paint_u8(input: ArrayView3<u8>, _intensity: f64) -> Array3<u8> {
    const RADIUS: isize = 1;

    let (height, width, channels) = input.dim();
    let mut output = input.as_standard_layout().into_owned();
    if channels < 3 {
        return output;
    }

    let stride = width * channels;
    let Some(data) = output.as_slice_mut() else {
        return output;
    };

    data.par_chunks_mut(stride).enumerate().for_each(|(y, row)| {
        for x in 0..width {
            let mut sum = [0u32; 3];
            let mut count = 0u32;

            for dy in -RADIUS..=RADIUS {
                let sy = y as isize + dy;
                if sy < 0 || sy >= height as isize {
                    continue;
                }
                for dx in -RADIUS..=RADIUS {
                    let sx = x as isize + dx;
                    if sx < 0 || sx >= width as isize {
                        continue;
                    }
                    for (c, total) in sum.iter_mut().enumerate() {
                        *total += input[[sy as usize, sx as usize, c]] as u32;
                    }
                    count += 1;
                }
            }

            let idx = x * channels;
            for (c, total) in sum.iter().enumerate() {
                row[idx + c] = to_u8(*total as f64 / count as f64);
            }
        }
    });

    output
}

// ============================================================================
// Watercolor / Dreamy
// ============================================================================

/// Soften colors slightly toward white.
///
/// `out = v + (255 - v) * 0.1 * intensity`
pub fn watercolor_u8(input: ArrayView3<u8>, intensity: f64) -> Array3<u8> {
    lift_toward_white(input, 0.1, intensity)
}

/// Soft glow: twice the watercolor lift.
///
/// `out = v + (255 - v) * 0.2 * intensity`
pub fn dreamy_u8(input: ArrayView3<u8>, intensity: f64) -> Array3<u8> {
    lift_toward_white(input, 0.2, intensity)
}

// Evaluated as ((255 - v) * rate) * intensity.
fn lift_toward_white(input: ArrayView3<u8>, rate: f64, intensity: f64) -> Array3<u8> {
    let lift = |v: f64| v + (255.0 - v) * rate * intensity;
    map_rgb_u8(input, |r, g, b| [lift(r), lift(g), lift(b)])
}

// ============================================================================
// Neon
// ============================================================================

/// Boost bright colors multiplicatively.
///
/// `out = v * (1 + intensity * 0.5)`, clamped
pub fn neon_u8(input: ArrayView3<u8>, intensity: f64) -> Array3<u8> {
    let gain = 1.0 + intensity * 0.5;
    map_rgb_u8(input, |r, g, b| [r * gain, g * gain, b * gain])
}

// ============================================================================
// Dramatic
// ============================================================================

/// Stretch contrast around mid-gray (128).
///
/// `out = (v - 128) * (1 + intensity) + 128`, clamped
pub fn dramatic_u8(input: ArrayView3<u8>, intensity: f64) -> Array3<u8> {
    let factor = 1.0 + intensity;
    let stretch = |v: f64| (v - 128.0) * factor + 128.0;
    map_rgb_u8(input, |r, g, b| [stretch(r), stretch(g), stretch(b)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(pixels: &[[u8; 4]], height: usize, width: usize) -> Array3<u8> {
        let raw: Vec<u8> = pixels.iter().flatten().copied().collect();
        Array3::from_shape_vec((height, width, 4), raw).unwrap()
    }

    fn close(actual: u8, expected: u8) -> bool {
        (actual as i32 - expected as i32).abs() <= 1
    }

    // ========================================================================
    // Vintage Tests
    // ========================================================================

    #[test]
    fn test_vintage_full_intensity_2x2() {
        let img = rgba(
            &[
                [255, 0, 0, 255],
                [0, 255, 0, 255],
                [0, 0, 255, 255],
                [255, 255, 255, 255],
            ],
            2,
            2,
        );

        let result = vintage_u8(img.view(), 1.0);

        let expected = [
            [100, 89, 69, 255],
            [196, 175, 136, 255],
            [48, 43, 33, 255],
            [255, 255, 239, 255],
        ];
        for (i, want) in expected.iter().enumerate() {
            let (y, x) = (i / 2, i % 2);
            for c in 0..4 {
                assert!(
                    close(result[[y, x, c]], want[c]),
                    "pixel {} channel {}: got {}, want {}",
                    i,
                    c,
                    result[[y, x, c]],
                    want[c]
                );
            }
        }
    }

    #[test]
    fn test_vintage_zero_intensity_is_identity() {
        let img = rgba(&[[12, 34, 56, 78], [200, 100, 50, 0]], 1, 2);
        assert_eq!(vintage_u8(img.view(), 0.0), img);
    }

    #[test]
    fn test_vintage_half_intensity_blends() {
        let img = rgba(&[[255, 0, 0, 255]], 1, 1);
        let result = vintage_u8(img.view(), 0.5);
        // 255 + (100.215 - 255) * 0.5 = 177.6
        assert!(close(result[[0, 0, 0]], 178));
        // 0 + 88.995 * 0.5 = 44.5
        assert!(close(result[[0, 0, 1]], 44));
    }

    // ========================================================================
    // Oil Paint Tests
    // ========================================================================

    #[test]
    fn test_oil_paint_2x2_averages_everything() {
        let img = rgba(
            &[[10, 0, 0, 1], [20, 0, 0, 2], [30, 0, 0, 3], [40, 0, 0, 4]],
            2,
            2,
        );

        let result = oil_paint_u8(img.view(), 1.0);

        for (i, alpha) in [1u8, 2, 3, 4].iter().enumerate() {
            let (y, x) = (i / 2, i % 2);
            assert_eq!(result[[y, x, 0]], 25);
            assert_eq!(result[[y, x, 3]], *alpha); // Alpha preserved
        }
    }

    #[test]
    fn test_oil_paint_border_uses_fewer_samples() {
        // 1x3 row: 0, 90, 180
        let img = rgba(&[[0, 0, 0, 255], [90, 0, 0, 255], [180, 0, 0, 255]], 1, 3);

        let result = oil_paint_u8(img.view(), 0.0);

        assert_eq!(result[[0, 0, 0]], 45); // (0 + 90) / 2
        assert_eq!(result[[0, 1, 0]], 90); // (0 + 90 + 180) / 3
        assert_eq!(result[[0, 2, 0]], 135); // (90 + 180) / 2
    }

    #[test]
    fn test_oil_paint_corner_tie_rounds_to_even() {
        // Every pixel of a 2x2 averages 4 samples: R sum 2 -> 0.5 -> 0, sum 6 -> 1.5 -> 2
        let img = rgba(
            &[[2, 6, 0, 255], [0, 0, 0, 255], [0, 0, 0, 255], [0, 0, 0, 255]],
            2,
            2,
        );
        let result = oil_paint_u8(img.view(), 1.0);
        assert_eq!(result[[1, 1, 0]], 0);
        assert_eq!(result[[0, 0, 1]], 2);
    }

    #[test]
    fn test_oil_paint_ignores_intensity() {
        let img = rgba(
            &[[5, 60, 200, 255], [90, 10, 0, 128], [33, 44, 55, 66], [1, 2, 3, 4]],
            2,
            2,
        );
        assert_eq!(oil_paint_u8(img.view(), 0.0), oil_paint_u8(img.view(), 1.0));
    }

    // ========================================================================
    // Lift Tests
    // ========================================================================

    #[test]
    fn test_watercolor() {
        let img = rgba(&[[45, 255, 0, 9]], 1, 1);
        let result = watercolor_u8(img.view(), 1.0);
        assert_eq!(result[[0, 0, 0]], 66); // 45 + 210 * 0.1
        assert_eq!(result[[0, 0, 1]], 255);
        assert!(close(result[[0, 0, 2]], 26)); // 25.5
        assert_eq!(result[[0, 0, 3]], 9);
    }

    #[test]
    fn test_dreamy() {
        let img = rgba(&[[55, 255, 0, 200]], 1, 1);
        let result = dreamy_u8(img.view(), 1.0);
        assert_eq!(result[[0, 0, 0]], 95); // 55 + 200 * 0.2
        assert_eq!(result[[0, 0, 1]], 255);
        assert_eq!(result[[0, 0, 2]], 51);
        assert_eq!(result[[0, 0, 3]], 200);
    }

    // ========================================================================
    // Neon / Dramatic Tests
    // ========================================================================

    #[test]
    fn test_neon_boosts_and_clamps() {
        let img = rgba(&[[100, 200, 0, 255]], 1, 1);
        let result = neon_u8(img.view(), 1.0);
        assert_eq!(result[[0, 0, 0]], 150);
        assert_eq!(result[[0, 0, 1]], 255);
        assert_eq!(result[[0, 0, 2]], 0);
    }

    #[test]
    fn test_neon_half_values_round_to_even() {
        // 3 * 1.5 = 4.5 -> 4, 7 * 1.5 = 10.5 -> 10, 11 * 1.5 = 16.5 -> 16
        let img = rgba(&[[3, 7, 11, 255], [15, 19, 23, 255]], 1, 2);
        let result = neon_u8(img.view(), 1.0);
        assert_eq!(&result.as_slice().unwrap()[..3], &[4, 10, 16]);
        assert_eq!(&result.as_slice().unwrap()[4..7], &[22, 28, 34]);
    }

    #[test]
    fn test_dramatic_stretches_around_mid_gray() {
        let img = rgba(&[[100, 200, 10, 255], [128, 128, 128, 0]], 1, 2);
        let result = dramatic_u8(img.view(), 1.0);
        assert_eq!(result[[0, 0, 0]], 72);
        assert_eq!(result[[0, 0, 1]], 255);
        assert_eq!(result[[0, 0, 2]], 0);
        assert_eq!(result[[0, 1, 0]], 128);
        assert_eq!(result[[0, 1, 3]], 0);
    }
}
