//! WebAssembly exports.
//!
//! These are exposed to JavaScript via wasm-bindgen. Pixel data crosses the
//! boundary as flat RGBA bytes (length = width * height * 4), the same layout
//! as canvas `ImageData.data`.
//!
//! Errors surface as JS `Error` objects carrying the `FilterError` message.
//!
//! The engine never reads a clock, so the JS side owns the debounce timer:
//! call `render()` from a `setTimeout` after the last slider event.

use wasm_bindgen::prelude::*;

use crate::adjustments::{AdjustmentField, AdjustmentParams};
use crate::buffer::PixelBuffer;
use crate::engine::{run_pipeline, FilterEngine, PipelineResult};
use crate::filters::FilterKind;

fn bytes(result: &PipelineResult) -> Vec<u8> {
    result.buffer.to_vec()
}

// ============================================================================
// Stateful engine
// ============================================================================

/// Engine holding the pristine image and the current control state.
#[wasm_bindgen]
pub struct CanvasEngine {
    inner: FilterEngine,
}

#[wasm_bindgen]
impl CanvasEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> CanvasEngine {
        CanvasEngine {
            inner: FilterEngine::default(),
        }
    }

    /// Load a new image. Filter and sliders go back to their defaults.
    #[wasm_bindgen(js_name = setSource)]
    pub fn set_source(&mut self, data: &[u8], width: u32, height: u32) -> Result<(), JsError> {
        self.inner.load_rgba(width, height, data.to_vec())?;
        Ok(())
    }

    #[wasm_bindgen(js_name = selectFilter)]
    pub fn select_filter(&mut self, name: &str) -> Result<(), JsError> {
        self.inner.select_filter_by_name(name)?;
        Ok(())
    }

    /// Set one slider; returns the value actually stored.
    #[wasm_bindgen(js_name = setAdjustment)]
    pub fn set_adjustment(&mut self, field: &str, value: i32) -> Result<i32, JsError> {
        let field: AdjustmentField = field.parse()?;
        Ok(self.inner.set_adjustment(field, value)?)
    }

    /// Run the pipeline with the current state and return the RGBA bytes.
    pub fn render(&mut self) -> Result<Vec<u8>, JsError> {
        let result = self.inner.recompute()?;
        Ok(bytes(&result))
    }

    /// Back to the pristine image; returns its bytes.
    pub fn reset(&mut self) -> Result<Vec<u8>, JsError> {
        let result = self.inner.reset()?;
        Ok(bytes(&result))
    }

    /// Pristine bytes, for before/after display.
    pub fn original(&self) -> Result<Vec<u8>, JsError> {
        Ok(self.inner.original().require()?.to_vec())
    }

    /// Pristine and current side by side (width doubles).
    #[wasm_bindgen(js_name = compareSideBySide)]
    pub fn compare_side_by_side(&self) -> Result<Vec<u8>, JsError> {
        let joined = self.inner.compare()?.side_by_side()?;
        Ok(joined.into_raw())
    }

    #[wasm_bindgen(getter)]
    pub fn filter(&self) -> String {
        self.inner.filter().as_str().to_string()
    }
}

impl Default for CanvasEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// One-shot pipeline
// ============================================================================

/// Apply effect + adjustments to an RGBA image.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `filter` - Effect name
/// * `intensity` - Effect strength 0-100
/// * `contrast` / `brightness` / `saturation` - -100 to 100
/// * `blur_radius` - Box blur radius in pixels
///
/// # Returns
/// Flat array of RGBA bytes
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn apply_pipeline_wasm(
    data: &[u8],
    width: u32,
    height: u32,
    filter: &str,
    intensity: i32,
    contrast: i32,
    brightness: i32,
    saturation: i32,
    blur_radius: u32,
) -> Result<Vec<u8>, JsError> {
    let kind: FilterKind = filter.parse()?;
    let source = PixelBuffer::from_raw(width, height, data.to_vec())?;
    let params = AdjustmentParams {
        intensity,
        contrast,
        brightness,
        saturation,
        blur_radius: i32::try_from(blur_radius).unwrap_or(i32::MAX),
    };

    Ok(run_pipeline(&source, kind, &params).into_raw())
}
