//! Error type shared by the pipeline, the engine and the bindings.
//!
//! Pixel math itself never fails: every formula is clamped over its whole
//! input domain. Errors only come from the boundary (bad source buffers,
//! unknown names, out-of-contract parameters) and from engine state.

use crate::adjustments::AdjustmentField;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// Buffer length does not match `width * height * 4`, or a dimension is zero.
    #[error("invalid source buffer: {0}")]
    InvalidSource(String),

    #[error(
        "unknown filter {0:?} (expected one of: none, vintage, oil, watercolor, sketch, neon, dramatic, dreamy)"
    )]
    UnknownFilter(String),

    #[error(
        "unknown adjustment {0:?} (expected one of: intensity, contrast, brightness, saturation, blur)"
    )]
    UnknownAdjustment(String),

    /// Out-of-contract adjustment value, e.g. a negative blur radius.
    #[error("{field} value {value} is outside {min}..={max}")]
    ParamOutOfRange {
        field: AdjustmentField,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("no source image loaded")]
    NoSource,

    /// A run is already in flight; the request was deferred behind it.
    #[error("a pipeline run is already in flight")]
    Busy,
}
