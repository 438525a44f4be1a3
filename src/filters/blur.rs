//! Box blur for RGBA images.
//!
//! The window is a square of side `2r + 1`. All channels, alpha included,
//! are averaged. Pixels closer than `r` to any edge are left exactly as they
//! were: the window is never shrunk or padded, only pixels whose full window
//! lies inside the image are recomputed.

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use super::core::to_u8;

/// Apply an interior-only box blur.
///
/// # Arguments
/// * `input` - Image (height, width, channels) as u8
/// * `radius` - Blur radius in pixels; 0 returns a copy
///
/// # Returns
/// Blurred image with same dimensions
pub fn box_blur_u8(input: ArrayView3<u8>, radius: usize) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = input.as_standard_layout().into_owned();

    if radius == 0 || height <= 2 * radius || width <= 2 * radius {
        return output;
    }

    let r = radius as isize;
    let count = ((2 * radius + 1) * (2 * radius + 1)) as f64;
    let stride = width * channels;
    let Some(data) = output.as_slice_mut() else {
        return output;
    };

    data.par_chunks_mut(stride)
        .enumerate()
        .skip(radius)
        .take(height - 2 * radius)
        .for_each(|(y, row)| {
            let mut sum = vec![0u64; channels];
            for x in radius..width - radius {
                sum.iter_mut().for_each(|s| *s = 0);

                for dy in -r..=r {
                    let sy = (y as isize + dy) as usize;
                    for dx in -r..=r {
                        let sx = (x as isize + dx) as usize;
                        for (c, total) in sum.iter_mut().enumerate() {
                            *total += input[[sy, sx, c]] as u64;
                        }
                    }
                }

                let idx = x * channels;
                for (c, total) in sum.iter().enumerate() {
                    row[idx + c] = to_u8(*total as f64 / count);
                }
            }
        });

    output
}
