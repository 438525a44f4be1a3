//! RGBA pixel buffer, the unit every transform reads and writes.
//!
//! Pixels are stored as an `ndarray` array of shape (height, width, 4) in
//! standard (row-major) layout, so the raw byte order is R,G,B,A per pixel,
//! rows top to bottom. The shape is validated once at construction and can
//! never change afterwards.

use ndarray::{Array3, ArrayView3};

use crate::error::FilterError;

/// Channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Array3<u8>,
}

impl PixelBuffer {
    /// Wrap decoded RGBA8 bytes.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels (non-zero)
    /// * `height` - Image height in pixels (non-zero)
    /// * `pixels` - Flat RGBA bytes, length must be `width * height * 4`
    ///
    /// # Returns
    /// The buffer, or `InvalidSource` when the dimensions and length disagree
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FilterError> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidSource(format!(
                "zero dimension {}x{}",
                width, height
            )));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|count| count.checked_mul(CHANNELS))
            .ok_or_else(|| {
                FilterError::InvalidSource(format!("{}x{} overflows the address space", width, height))
            })?;

        if pixels.len() != expected {
            return Err(FilterError::InvalidSource(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }

        let pixels = Array3::from_shape_vec((height as usize, width as usize, CHANNELS), pixels)
            .map_err(|e| FilterError::InvalidSource(e.to_string()))?;

        Ok(Self { pixels })
    }

    /// Wrap an existing (height, width, 4) array.
    pub fn from_array(pixels: Array3<u8>) -> Result<Self, FilterError> {
        let (height, width, channels) = pixels.dim();
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidSource(format!(
                "zero dimension {}x{}",
                width, height
            )));
        }
        if channels != CHANNELS {
            return Err(FilterError::InvalidSource(format!(
                "expected {} channels, got {}",
                CHANNELS, channels
            )));
        }
        if u32::try_from(width).is_err() || u32::try_from(height).is_err() {
            return Err(FilterError::InvalidSource(format!(
                "{}x{} exceeds u32 dimensions",
                width, height
            )));
        }
        Ok(Self::from_filtered(pixels))
    }

    /// Create a buffer filled with one color.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Result<Self, FilterError> {
        let count = (width as usize).saturating_mul(height as usize);
        let pixels = color.iter().copied().cycle().take(count.saturating_mul(CHANNELS)).collect();
        Self::from_raw(width, height, pixels)
    }

    /// Wrap filter output, which keeps the shape of an already-valid buffer.
    pub(crate) fn from_filtered(pixels: Array3<u8>) -> Self {
        debug_assert_eq!(pixels.dim().2, CHANNELS);
        if pixels.is_standard_layout() {
            Self { pixels }
        } else {
            Self {
                pixels: pixels.as_standard_layout().into_owned(),
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.dim().1 as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.dim().0 as u32
    }

    /// Number of bytes, always `width * height * 4`.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    /// RGBA value at (x, y), or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some([
            self.pixels[[y, x, 0]],
            self.pixels[[y, x, 1]],
            self.pixels[[y, x, 2]],
            self.pixels[[y, x, 3]],
        ])
    }

    /// Flat RGBA bytes, row-major.
    pub fn to_vec(&self) -> Vec<u8> {
        self.pixels.iter().copied().collect()
    }

    pub fn into_raw(self) -> Vec<u8> {
        let (raw, offset) = self.pixels.into_raw_vec_and_offset();
        match offset {
            Some(0) | None => raw,
            Some(start) => raw[start..].to_vec(),
        }
    }

    pub fn into_array(self) -> Array3<u8> {
        self.pixels
    }
}
