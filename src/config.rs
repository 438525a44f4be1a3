//! Engine configuration.
//!
//! All tunable policy lives in [`EngineConfig`] so hosts can load it from a
//! file (the CLI accepts JSON) and tests can build independent engines with
//! their own timing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for [`FilterEngine`](crate::engine::FilterEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Quiet period after the last slider change before a debounced run starts.
    pub quiescence_ms: u64,
    /// Upper bound of the blur slider, in pixels.
    pub max_blur_radius: i32,
    /// Reject every out-of-range adjustment instead of clamping it.
    pub strict_params: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quiescence_ms: 100,
            max_blur_radius: 20,
            strict_params: false,
        }
    }
}

impl EngineConfig {
    pub fn quiescence(&self) -> Duration {
        Duration::from_millis(self.quiescence_ms)
    }

    pub fn with_quiescence(mut self, window: Duration) -> Self {
        self.quiescence_ms = window.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_params = true;
        self
    }
}
