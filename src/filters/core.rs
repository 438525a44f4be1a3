//! Core utilities shared by the effect and adjustment filters.
//!
//! - Channel narrowing (clamp + round half to even, like a canvas `Uint8ClampedArray`)
//! - BT.601 luma
//! - Parallel per-pixel RGB mapping

use ndarray::{Array3, ArrayView3, Axis};
use rayon::prelude::*;

/// ITU-R BT.601 luma coefficients, used for sketch edges and saturation.
pub const LUMA_R: f64 = 0.299;
pub const LUMA_G: f64 = 0.587;
pub const LUMA_B: f64 = 0.114;

/// Clamp a channel value to 0-255 and round to the nearest integer, ties to even.
#[inline]
pub fn to_u8(v: f64) -> u8 {
    v.clamp(0.0, 255.0).round_ties_even() as u8
}

#[inline]
pub fn luma(r: f64, g: f64, b: f64) -> f64 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Apply a function to the R, G, B channels of every pixel.
///
/// Channels past the third (alpha) are copied unchanged. Images with fewer
/// than three channels are returned as a plain copy.
///
/// # Arguments
/// * `input` - Image of shape (height, width, channels)
/// * `f` - Maps (r, g, b) as f64 to new unclamped (r, g, b)
///
/// # Returns
/// New image of the same shape, channels clamped and rounded to u8
pub fn map_rgb_u8<F>(input: ArrayView3<u8>, f: F) -> Array3<u8>
where
    F: Fn(f64, f64, f64) -> [f64; 3] + Sync,
{
    let channels = input.dim().2;
    let mut output = input.as_standard_layout().into_owned();
    if channels < 3 {
        return output;
    }

    let apply = |px: &mut [u8]| {
        let [r, g, b] = f(px[0] as f64, px[1] as f64, px[2] as f64);
        px[0] = to_u8(r);
        px[1] = to_u8(g);
        px[2] = to_u8(b);
    };

    match output.as_slice_mut() {
        Some(data) => data.par_chunks_exact_mut(channels).for_each(apply),
        None => {
            for mut lane in output.lanes_mut(Axis(2)) {
                let mut px = [lane[0], lane[1], lane[2]];
                apply(&mut px[..]);
                lane[0] = px[0];
                lane[1] = px[1];
                lane[2] = px[2];
            }
        }
    }

    output
}
