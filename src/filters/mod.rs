//! Filter modules for image processing effects.
//!
//! ## Supported Formats
//!
//! All filters take an `ndarray` view of shape (height, width, channels) and
//! return a new array of the same shape; the input is never modified.
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 (pipeline format) |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//!
//! ## Architecture
//!
//! - **Float math, u8 storage** - every channel is computed in f64, then clamped and rounded half to even
//! - **Alpha preservation** - alpha is untouched except by box blur, which averages it
//! - **Deterministic** - per-pixel work is parallel (rayon) but never order-dependent
//!
//! ## Filter Categories
//!
//! - **Effects** ([`FilterKind`]): vintage, oil paint, watercolor, sketch, neon, dramatic, dreamy
//! - **Tonal**: brightness, contrast, saturation (fused single pass)
//! - **Spatial**: interior-only box blur

pub mod core;
pub mod blur;
pub mod color_adjust;
pub mod edge;
pub mod stylize;

use std::fmt;
use std::str::FromStr;

use ndarray::{Array3, ArrayView3};
use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// The closed set of stylistic effects. Exactly one is current at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    #[default]
    None,
    Vintage,
    #[serde(rename = "oil", alias = "oilpaint", alias = "oil-paint")]
    OilPaint,
    Watercolor,
    Sketch,
    Neon,
    Dramatic,
    Dreamy,
}

impl FilterKind {
    /// All variants in display order.
    pub const ALL: [FilterKind; 8] = [
        FilterKind::None,
        FilterKind::Vintage,
        FilterKind::OilPaint,
        FilterKind::Watercolor,
        FilterKind::Sketch,
        FilterKind::Neon,
        FilterKind::Dramatic,
        FilterKind::Dreamy,
    ];

    /// Stable selector name.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Vintage => "vintage",
            FilterKind::OilPaint => "oil",
            FilterKind::Watercolor => "watercolor",
            FilterKind::Sketch => "sketch",
            FilterKind::Neon => "neon",
            FilterKind::Dramatic => "dramatic",
            FilterKind::Dreamy => "dreamy",
        }
    }

    /// Run this effect.
    ///
    /// # Arguments
    /// * `input` - RGBA image (height, width, 4)
    /// * `intensity` - Normalized strength, clamped to 0.0-1.0
    ///
    /// # Returns
    /// New image; `None` returns an exact copy
    pub fn apply(self, input: ArrayView3<u8>, intensity: f64) -> Array3<u8> {
        let t = if intensity.is_nan() { 0.0 } else { intensity.clamp(0.0, 1.0) };
        match self {
            FilterKind::None => input.to_owned(),
            FilterKind::Vintage => stylize::vintage_u8(input, t),
            FilterKind::OilPaint => stylize::oil_paint_u8(input, t),
            FilterKind::Watercolor => stylize::watercolor_u8(input, t),
            FilterKind::Sketch => edge::sketch_u8(input, t),
            FilterKind::Neon => stylize::neon_u8(input, t),
            FilterKind::Dramatic => stylize::dramatic_u8(input, t),
            FilterKind::Dreamy => stylize::dreamy_u8(input, t),
        }
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "none" => Ok(FilterKind::None),
            "vintage" => Ok(FilterKind::Vintage),
            "oil" | "oilpaint" | "oil-paint" => Ok(FilterKind::OilPaint),
            "watercolor" => Ok(FilterKind::Watercolor),
            "sketch" => Ok(FilterKind::Sketch),
            "neon" => Ok(FilterKind::Neon),
            "dramatic" => Ok(FilterKind::Dramatic),
            "dreamy" => Ok(FilterKind::Dreamy),
            _ => Err(FilterError::UnknownFilter(name.to_string())),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
