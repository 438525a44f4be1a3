//! canvas_fx: stylistic effects and tonal adjustments for RGBA images.
//!
//! Images are processed as a fixed pipeline: one effect from a closed set
//! ([`FilterKind`]), then brightness, contrast, saturation and box blur
//! ([`AdjustmentParams`]). The pristine source is kept untouched so the
//! pipeline can be re-run from scratch on every change.
//!
//! ## Image Format
//! RGBA8 only: `(height, width, 4)` u8, row-major. Filters keep alpha intact
//! (box blur averages it along with the colors).
//!
//! ## Layers
//! - [`filters`] and [`adjustments`]: pure functions over `ndarray` views
//! - [`FilterEngine`]: state, debounce and cancellation, clock-free
//! - [`PreviewScheduler`] (`scheduler` feature): tokio driver for the engine
//! - Python (`python` feature) and WebAssembly (`wasm` feature) bindings

pub mod adjustments;
pub mod buffer;
pub mod config;
pub mod engine;
pub mod error;
pub mod filters;
pub mod original;

#[cfg(feature = "scheduler")]
pub mod scheduler;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use adjustments::{apply_adjustments, AdjustmentField, AdjustmentParams};
pub use buffer::PixelBuffer;
pub use config::EngineConfig;
pub use engine::{run_pipeline, Comparison, FilterEngine, PipelineResult, RenderJob};
pub use error::FilterError;
pub use filters::FilterKind;
pub use original::OriginalStateManager;

#[cfg(feature = "scheduler")]
pub use scheduler::PreviewScheduler;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::adjustments::{AdjustmentField, AdjustmentParams};
    use crate::buffer::PixelBuffer;
    use crate::engine::run_pipeline;
    use crate::error::FilterError;
    use crate::filters::FilterKind;

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    /// Run effect + adjustments on an RGBA u8 image.
    ///
    /// # Arguments
    /// * `image` - Input image (height, width, 4)
    /// * `filter` - Effect name: none, vintage, oil, watercolor, sketch, neon, dramatic, dreamy
    /// * `intensity` - Effect strength 0-100
    /// * `contrast` / `brightness` / `saturation` - -100 to 100
    /// * `blur` - Box blur radius in pixels
    #[pyfunction]
    #[allow(clippy::too_many_arguments)]
    #[pyo3(signature = (image, filter="none", intensity=100, contrast=0, brightness=0, saturation=0, blur=0))]
    pub fn apply_pipeline<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        filter: &str,
        intensity: i32,
        contrast: i32,
        brightness: i32,
        saturation: i32,
        blur: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let kind: FilterKind = filter.parse()?;
        if blur < 0 {
            return Err(FilterError::ParamOutOfRange {
                field: AdjustmentField::Blur,
                value: blur,
                min: 0,
                max: i32::MAX,
            }
            .into());
        }
        let source = PixelBuffer::from_array(image.as_array().to_owned())?;
        let params = AdjustmentParams {
            intensity,
            contrast,
            brightness,
            saturation,
            blur_radius: blur,
        };

        let result = py.allow_threads(|| run_pipeline(&source, kind, &params));
        Ok(result.into_array().into_pyarray(py))
    }

    /// Effect names in display order.
    #[pyfunction]
    pub fn filter_names() -> Vec<&'static str> {
        FilterKind::ALL.iter().map(|kind| kind.as_str()).collect()
    }

    /// canvas_fx extension module
    #[pymodule]
    pub fn canvas_fx(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(apply_pipeline, m)?)?;
        m.add_function(wrap_pyfunction!(filter_names, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::canvas_fx;
