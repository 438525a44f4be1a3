//! Tonal adjustments: Brightness, Contrast, Saturation.
//!
//! The three steps run fused in a single pass per pixel, in this order, with
//! f64 intermediates. Brightness clamps its own result; contrast feeds its
//! unclamped values straight into saturation, and the final value is clamped
//! and rounded once at the end. Running them as three separate u8 passes
//! would round twice and change the output.
//!
//! Alpha is always preserved.

use ndarray::{Array3, ArrayView3};

use super::core::{luma, map_rgb_u8};

// ============================================================================
// Per-channel steps
// ============================================================================

/// Add a brightness offset, clamped to 0-255.
#[inline]
pub fn brightness(v: f64, offset: f64) -> f64 {
    (v + offset).clamp(0.0, 255.0)
}

/// Scale around mid-gray in normalized space. `factor = contrast / 100 + 1`.
#[inline]
pub fn contrast(v: f64, factor: f64) -> f64 {
    ((v / 255.0 - 0.5) * factor + 0.5) * 255.0
}

/// Push each channel away from (or toward) the BT.601 gray of the pixel.
/// `factor = saturation / 100 + 1`.
#[inline]
pub fn saturate(rgb: [f64; 3], factor: f64) -> [f64; 3] {
    let gray = luma(rgb[0], rgb[1], rgb[2]);
    rgb.map(|v| gray + (v - gray) * factor)
}

// ============================================================================
// Fused tonal pass
// ============================================================================

/// Apply brightness, contrast and saturation in one pass.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
/// * `brightness_offset` - Additive level, -100 to 100
/// * `contrast_percent` - -100 (flat gray) to 100 (double contrast), 0 = no change
/// * `saturation_percent` - -100 (grayscale) to 100 (double saturation), 0 = no change
///
/// # Returns
/// Adjusted image with same channel count; identical to the input when all
/// three amounts are zero
pub fn tonal_adjust_u8(
    input: ArrayView3<u8>,
    brightness_offset: i32,
    contrast_percent: i32,
    saturation_percent: i32,
) -> Array3<u8> {
    let offset = brightness_offset as f64;
    let contrast_factor = contrast_percent as f64 / 100.0 + 1.0;
    let saturation_factor = saturation_percent as f64 / 100.0 + 1.0;

    map_rgb_u8(input, |r, g, b| {
        let rgb = [r, g, b].map(|v| contrast(brightness(v, offset), contrast_factor));
        saturate(rgb, saturation_factor)
    })
}
