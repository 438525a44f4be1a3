//! Adjustment parameters and the fixed-order adjustment pipeline.
//!
//! Order: brightness, contrast, saturation (one fused pass), then box blur.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use ndarray::{Array3, ArrayView3};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::FilterError;
use crate::filters::{blur, color_adjust};

/// A named slider on the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentField {
    Intensity,
    Contrast,
    Brightness,
    Saturation,
    Blur,
}

impl AdjustmentField {
    pub const ALL: [AdjustmentField; 5] = [
        AdjustmentField::Intensity,
        AdjustmentField::Contrast,
        AdjustmentField::Brightness,
        AdjustmentField::Saturation,
        AdjustmentField::Blur,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AdjustmentField::Intensity => "intensity",
            AdjustmentField::Contrast => "contrast",
            AdjustmentField::Brightness => "brightness",
            AdjustmentField::Saturation => "saturation",
            AdjustmentField::Blur => "blur",
        }
    }

    /// Legal values for this field under `config`.
    pub fn range(self, config: &EngineConfig) -> RangeInclusive<i32> {
        match self {
            AdjustmentField::Intensity => 0..=100,
            AdjustmentField::Contrast
            | AdjustmentField::Brightness
            | AdjustmentField::Saturation => -100..=100,
            AdjustmentField::Blur => 0..=config.max_blur_radius.max(0),
        }
    }

    /// Resolve a requested value to the value that gets stored.
    ///
    /// In-range values pass through. Slider overshoot is clamped silently,
    /// except for a negative blur radius (always a caller bug) or any
    /// overshoot when `config.strict_params` is set, which are rejected.
    pub fn constrain(self, value: i32, config: &EngineConfig) -> Result<i32, FilterError> {
        let range = self.range(config);
        if range.contains(&value) {
            return Ok(value);
        }

        let (min, max) = (*range.start(), *range.end());
        if config.strict_params || (self == AdjustmentField::Blur && value < 0) {
            log::warn!("rejecting {} = {} (allowed {}..={})", self, value, min, max);
            return Err(FilterError::ParamOutOfRange {
                field: self,
                value,
                min,
                max,
            });
        }

        let clamped = value.clamp(min, max);
        log::debug!("clamped {} from {} to {}", self, value, clamped);
        Ok(clamped)
    }
}

impl FromStr for AdjustmentField {
    type Err = FilterError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "intensity" => Ok(AdjustmentField::Intensity),
            "contrast" => Ok(AdjustmentField::Contrast),
            "brightness" => Ok(AdjustmentField::Brightness),
            "saturation" => Ok(AdjustmentField::Saturation),
            "blur" | "blurradius" | "blur_radius" => Ok(AdjustmentField::Blur),
            _ => Err(FilterError::UnknownAdjustment(name.to_string())),
        }
    }
}

impl fmt::Display for AdjustmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slider state feeding the effect intensity and the adjustment pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdjustmentParams {
    /// Effect strength in percent, 0-100.
    pub intensity: i32,
    /// Percent, -100 to 100.
    pub contrast: i32,
    /// Additive level, -100 to 100.
    pub brightness: i32,
    /// Percent, -100 to 100.
    pub saturation: i32,
    /// Box blur radius in pixels.
    pub blur_radius: i32,
}

impl Default for AdjustmentParams {
    fn default() -> Self {
        Self {
            intensity: 100,
            contrast: 0,
            brightness: 0,
            saturation: 0,
            blur_radius: 0,
        }
    }
}

impl AdjustmentParams {
    pub fn get(&self, field: AdjustmentField) -> i32 {
        match field {
            AdjustmentField::Intensity => self.intensity,
            AdjustmentField::Contrast => self.contrast,
            AdjustmentField::Brightness => self.brightness,
            AdjustmentField::Saturation => self.saturation,
            AdjustmentField::Blur => self.blur_radius,
        }
    }

    /// Store a value as-is. Use [`AdjustmentField::constrain`] first.
    pub fn set(&mut self, field: AdjustmentField, value: i32) {
        match field {
            AdjustmentField::Intensity => self.intensity = value,
            AdjustmentField::Contrast => self.contrast = value,
            AdjustmentField::Brightness => self.brightness = value,
            AdjustmentField::Saturation => self.saturation = value,
            AdjustmentField::Blur => self.blur_radius = value,
        }
    }

    /// Clamp every field into its static range. Blur only loses its sign:
    /// a radius wider than the image is harmless (nothing gets recomputed).
    pub fn sanitized(&self) -> Self {
        Self {
            intensity: self.intensity.clamp(0, 100),
            contrast: self.contrast.clamp(-100, 100),
            brightness: self.brightness.clamp(-100, 100),
            saturation: self.saturation.clamp(-100, 100),
            blur_radius: self.blur_radius.max(0),
        }
    }

    /// Effect intensity normalized to 0.0-1.0.
    pub fn intensity_factor(&self) -> f64 {
        self.intensity.clamp(0, 100) as f64 / 100.0
    }

    /// True when the adjustment pipeline reduces to the identity.
    pub fn is_neutral(&self) -> bool {
        self.contrast == 0 && self.brightness == 0 && self.saturation == 0 && self.blur_radius <= 0
    }
}

/// Run the adjustment pipeline on an effect output.
///
/// # Arguments
/// * `input` - RGBA image (height, width, 4)
/// * `params` - Slider values; out-of-range values are clamped here
///
/// # Returns
/// Adjusted image; a byte-exact copy when `params` is neutral
pub fn apply_adjustments(input: ArrayView3<u8>, params: &AdjustmentParams) -> Array3<u8> {
    let params = params.sanitized();
    if params.is_neutral() {
        return input.to_owned();
    }

    let toned = color_adjust::tonal_adjust_u8(
        input,
        params.brightness,
        params.contrast,
        params.saturation,
    );

    if params.blur_radius > 0 {
        blur::box_blur_u8(toned.view(), params.blur_radius as usize)
    } else {
        toned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = AdjustmentParams::default();
        assert_eq!(params.intensity, 100);
        assert!(params.is_neutral());
        assert_eq!(params.intensity_factor(), 1.0);
    }

    #[test]
    fn test_get_set_every_field() {
        let mut params = AdjustmentParams::default();
        for (i, field) in AdjustmentField::ALL.iter().enumerate() {
            params.set(*field, i as i32 + 1);
            assert_eq!(params.get(*field), i as i32 + 1);
        }
    }

    #[test]
    fn test_constrain_clamps_slider_overshoot() {
        let config = EngineConfig::default();
        assert_eq!(AdjustmentField::Contrast.constrain(150, &config), Ok(100));
        assert_eq!(AdjustmentField::Brightness.constrain(-300, &config), Ok(-100));
        assert_eq!(AdjustmentField::Intensity.constrain(-1, &config), Ok(0));
        assert_eq!(AdjustmentField::Blur.constrain(99, &config), Ok(20));
        assert_eq!(AdjustmentField::Saturation.constrain(42, &config), Ok(42));
    }

    #[test]
    fn test_constrain_rejects_negative_blur() {
        let config = EngineConfig::default();
        assert_eq!(
            AdjustmentField::Blur.constrain(-1, &config),
            Err(FilterError::ParamOutOfRange {
                field: AdjustmentField::Blur,
                value: -1,
                min: 0,
                max: 20,
            })
        );
    }

    #[test]
    fn test_constrain_strict_rejects_overshoot() {
        let config = EngineConfig::default().strict();
        assert!(matches!(
            AdjustmentField::Contrast.constrain(101, &config),
            Err(FilterError::ParamOutOfRange { .. })
        ));
        assert_eq!(AdjustmentField::Contrast.constrain(100, &config), Ok(100));
    }

    #[test]
    fn test_field_names() {
        for field in AdjustmentField::ALL {
            assert_eq!(field.as_str().parse::<AdjustmentField>(), Ok(field));
        }
        assert_eq!("blur_radius".parse::<AdjustmentField>(), Ok(AdjustmentField::Blur));
        assert!(matches!(
            "hue".parse::<AdjustmentField>(),
            Err(FilterError::UnknownAdjustment(_))
        ));
    }

    #[test]
    fn test_sanitized() {
        let wild = AdjustmentParams {
            intensity: 400,
            contrast: -250,
            brightness: 101,
            saturation: 0,
            blur_radius: -5,
        };
        let clean = wild.sanitized();
        assert_eq!(clean.intensity, 100);
        assert_eq!(clean.contrast, -100);
        assert_eq!(clean.brightness, 100);
        assert_eq!(clean.blur_radius, 0);
    }

    #[test]
    fn test_neutral_params_are_identity() {
        let img = Array3::from_shape_fn((6, 6, 4), |(y, x, c)| ((y * 41 + x * 3 + c * 90) % 256) as u8);
        assert_eq!(apply_adjustments(img.view(), &AdjustmentParams::default()), img);
    }

    #[test]
    fn test_neutral_shortcut_matches_full_pass() {
        let img = Array3::from_shape_fn((4, 5, 4), |(y, x, c)| ((y * 67 + x * 29 + c * 11) % 256) as u8);
        let params = AdjustmentParams {
            intensity: 40,
            blur_radius: -3,
            ..AdjustmentParams::default()
        };
        assert!(params.sanitized().is_neutral());

        let shortcut = apply_adjustments(img.view(), &params);
        let full = color_adjust::tonal_adjust_u8(img.view(), 0, 0, 0);
        assert_eq!(shortcut, full);
        assert_eq!(shortcut, img);
    }

    #[test]
    fn test_blur_runs_after_tonal() {
        // Uniform image: blur cannot change it, so only brightness shows.
        let img = Array3::<u8>::from_elem((5, 5, 4), 100);
        let params = AdjustmentParams {
            brightness: 10,
            blur_radius: 1,
            ..AdjustmentParams::default()
        };
        let result = apply_adjustments(img.view(), &params);
        assert_eq!(result[[2, 2, 0]], 110);
        assert_eq!(result[[0, 0, 0]], 110);
        assert_eq!(result[[2, 2, 3]], 100);
    }
}
