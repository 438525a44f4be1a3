//! Edge-based filters: the pencil Sketch effect.
//!
//! Sketch works on an 8-bit BT.601 luma plane and marks edges dark on a
//! white page, using the sum of absolute differences to the four direct
//! neighbors as the gradient magnitude.

use ndarray::{Array2, Array3, ArrayView3};
use rayon::prelude::*;

use super::core::{luma, to_u8};

// ============================================================================
// Luma Plane
// ============================================================================

/// Compute a single-channel luma plane, quantized to u8.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
///
/// # Returns
/// 2D array (height, width) of BT.601 luma values
pub fn luma_plane_u8(input: ArrayView3<u8>) -> Array2<u8> {
    let (height, width, _) = input.dim();
    Array2::from_shape_fn((height, width), |(y, x)| {
        to_u8(luma(
            input[[y, x, 0]] as f64,
            input[[y, x, 1]] as f64,
            input[[y, x, 2]] as f64,
        ))
    })
}

// ============================================================================
// Sketch
// ============================================================================

/// Pencil sketch: dark edges on white.
///
/// Only interior pixels are rewritten; the one-pixel border keeps its
/// original color. For each interior pixel:
/// `edge = |Yc-Yl| + |Yc-Yr| + |Yc-Yt| + |Yc-Yb|`, scaled by intensity and
/// capped at 255, then R = G = B = 255 - edge.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
/// * `intensity` - Edge strength, 0.0-1.0
///
/// # Returns
/// Sketched image with same channel count, alpha preserved
pub fn sketch_u8(input: ArrayView3<u8>, intensity: f64) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = input.as_standard_layout().into_owned();
    if channels < 3 || height < 3 || width < 3 {
        return output;
    }

    let gray = luma_plane_u8(input);
    let stride = width * channels;
    let Some(data) = output.as_slice_mut() else {
        return output;
    };

    data.par_chunks_mut(stride)
        .enumerate()
        .skip(1)
        .take(height - 2)
        .for_each(|(y, row)| {
            for x in 1..width - 1 {
                let center = gray[[y, x]] as i32;
                let edge = (center - gray[[y, x - 1]] as i32).abs()
                    + (center - gray[[y, x + 1]] as i32).abs()
                    + (center - gray[[y - 1, x]] as i32).abs()
                    + (center - gray[[y + 1, x]] as i32).abs();

                let edge = (edge as f64 * intensity).min(255.0);
                let v = to_u8(255.0 - edge);

                let idx = x * channels;
                row[idx] = v;
                row[idx + 1] = v;
                row[idx + 2] = v;
            }
        });

    output
}
