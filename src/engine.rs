//! Filter engine: owns the pristine image, the current filter selection and
//! the adjustment parameters, and turns them into published results.
//!
//! ## Run lifecycle
//!
//! ```text
//! select_filter / set_adjustment
//!        ↓
//!   pending request (due now / after the quiescence window)
//!        ↓  poll(now) or take_due(now)
//!   start_job  ── busy = true, snapshot (epoch, source, filter, params)
//!        ↓
//!   RenderJob::run   (pure, may run on any thread)
//!        ↓
//!   complete(epoch, result) ── busy = false, publish unless the epoch moved
//! ```
//!
//! The engine never reads a clock. Callers pass `now` into [`FilterEngine::poll`]
//! and [`FilterEngine::deadline`]; a pending request starts its quiescence
//! window the first time a driver observes it, and every later change
//! restarts it (trailing-edge debounce).
//!
//! `set_source` and `reset` bump the epoch. A job started under an older
//! epoch still clears the busy flag when it completes, but its result is
//! dropped, so a stale run can never overwrite a newer image or a reset.

use std::sync::Arc;
use std::time::Instant;

use ndarray::{concatenate, Axis};

use crate::adjustments::{apply_adjustments, AdjustmentField, AdjustmentParams};
use crate::buffer::PixelBuffer;
use crate::config::EngineConfig;
use crate::error::FilterError;
use crate::filters::FilterKind;
use crate::original::OriginalStateManager;

// ============================================================================
// Results
// ============================================================================

/// A completed pipeline output and the state that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    pub buffer: Arc<PixelBuffer>,
    pub filter: FilterKind,
    pub params: AdjustmentParams,
}

impl PipelineResult {
    /// The result of `None` + default adjustments, which is the source itself.
    pub fn identity(source: Arc<PixelBuffer>) -> Self {
        Self {
            buffer: source,
            filter: FilterKind::None,
            params: AdjustmentParams::default(),
        }
    }
}

/// Pristine and current images for before/after display.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub original: Arc<PixelBuffer>,
    pub current: Arc<PipelineResult>,
}

impl Comparison {
    /// Both images next to each other: original on the left, current on the right.
    pub fn side_by_side(&self) -> Result<PixelBuffer, FilterError> {
        let joined = concatenate(
            Axis(1),
            &[self.original.view(), self.current.buffer.view()],
        )
        .map_err(|e| FilterError::InvalidSource(format!("cannot join images: {}", e)))?;
        PixelBuffer::from_array(joined)
    }
}

/// Run the whole pipeline over a source image.
///
/// The source is only read; the effect writes a new buffer and the
/// adjustments write another.
///
/// # Arguments
/// * `source` - Pristine RGBA image
/// * `filter` - Effect to apply first
/// * `params` - Intensity for the effect, then brightness, contrast, saturation, blur
///
/// # Returns
/// New buffer of the same dimensions
pub fn run_pipeline(
    source: &PixelBuffer,
    filter: FilterKind,
    params: &AdjustmentParams,
) -> PixelBuffer {
    let params = params.sanitized();
    let styled = filter.apply(source.view(), params.intensity_factor());
    let adjusted = apply_adjustments(styled.view(), &params);
    PixelBuffer::from_filtered(adjusted)
}

// ============================================================================
// Jobs
// ============================================================================

/// Snapshot of everything one pipeline run needs.
///
/// Owning its inputs lets a job run off the engine (on a worker thread)
/// while the engine keeps accepting changes.
#[derive(Debug, Clone)]
pub struct RenderJob {
    epoch: u64,
    source: Arc<PixelBuffer>,
    filter: FilterKind,
    params: AdjustmentParams,
}

impl RenderJob {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn run(&self) -> PipelineResult {
        let buffer = run_pipeline(&self.source, self.filter, &self.params);
        log::trace!("pipeline {} {}x{} finished", self.filter, buffer.width(), buffer.height());
        PipelineResult {
            buffer: Arc::new(buffer),
            filter: self.filter,
            params: self.params,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingRun {
    /// Wait for the quiescence window (slider) or run as soon as idle (filter button).
    debounced: bool,
    /// Start of the quiescence window: the change time for timed setters,
    /// otherwise the first time a driver saw the request.
    observed_at: Option<Instant>,
}

// ============================================================================
// Engine
// ============================================================================

pub struct FilterEngine {
    config: EngineConfig,
    original: OriginalStateManager,
    filter: FilterKind,
    params: AdjustmentParams,
    current: Option<Arc<PipelineResult>>,
    pending: Option<PendingRun>,
    busy: bool,
    epoch: u64,
    runs_completed: u64,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl FilterEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            original: OriginalStateManager::new(),
            filter: FilterKind::None,
            params: AdjustmentParams::default(),
            current: None,
            pending: None,
            busy: false,
            epoch: 0,
            runs_completed: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Control surface
    // ------------------------------------------------------------------------

    /// Establish a new pristine image.
    ///
    /// Resets the filter to `None` and the sliders to their defaults, drops
    /// any pending request and invalidates any run in flight. The returned
    /// result is the source itself; no pipeline run is needed.
    pub fn set_source(&mut self, buffer: PixelBuffer) -> Arc<PipelineResult> {
        log::info!("loaded source image {}x{}", buffer.width(), buffer.height());
        let pristine = self.original.load(buffer);
        self.restore(pristine)
    }

    /// Validate raw RGBA bytes and load them as the new source.
    ///
    /// On error the previous source and output stay in place.
    pub fn load_rgba(
        &mut self,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Arc<PipelineResult>, FilterError> {
        let buffer = PixelBuffer::from_raw(width, height, pixels).map_err(|err| {
            log::warn!("rejected source: {}", err);
            err
        })?;
        Ok(self.set_source(buffer))
    }

    /// Select the current effect and request a recompute (no quiescence wait).
    pub fn select_filter(&mut self, kind: FilterKind) {
        log::debug!("filter -> {}", kind);
        self.filter = kind;
        self.request(false);
    }

    /// [`select_filter`](Self::select_filter) for a change made at `now`.
    pub fn select_filter_at(&mut self, kind: FilterKind, now: Instant) {
        self.select_filter(kind);
        self.stamp(now);
    }

    /// Select the current effect by its selector name.
    pub fn select_filter_by_name(&mut self, name: &str) -> Result<(), FilterError> {
        let kind = name.parse::<FilterKind>().map_err(|err| {
            log::warn!("{}", err);
            err
        })?;
        self.select_filter(kind);
        Ok(())
    }

    /// Update one slider and request a debounced recompute.
    ///
    /// The quiescence window of an untimed change starts when a driver first
    /// observes it through [`deadline`](Self::deadline), [`take_due`](Self::take_due)
    /// or [`poll`](Self::poll). Use [`set_adjustment_at`](Self::set_adjustment_at)
    /// to start it at the change itself.
    ///
    /// # Returns
    /// The value actually stored (clamped into the field's range)
    pub fn set_adjustment(&mut self, field: AdjustmentField, value: i32) -> Result<i32, FilterError> {
        let stored = field.constrain(value, &self.config)?;
        self.params.set(field, stored);
        log::debug!("{} -> {}", field, stored);
        self.request(true);
        Ok(stored)
    }

    /// [`set_adjustment`](Self::set_adjustment) for a change made at `now`;
    /// the run becomes due at `now` plus the quiescence window.
    pub fn set_adjustment_at(
        &mut self,
        field: AdjustmentField,
        value: i32,
        now: Instant,
    ) -> Result<i32, FilterError> {
        let stored = self.set_adjustment(field, value)?;
        self.stamp(now);
        Ok(stored)
    }

    /// Run the pipeline immediately, bypassing the debounce.
    ///
    /// If a run is already in flight nothing is started: the request is
    /// queued behind it and `Busy` is returned.
    pub fn recompute(&mut self) -> Result<Arc<PipelineResult>, FilterError> {
        let job = match self.start_job() {
            Ok(job) => job,
            Err(FilterError::Busy) => {
                self.request(false);
                return Err(FilterError::Busy);
            }
            Err(err) => return Err(err),
        };

        let result = job.run();
        self.complete(job.epoch(), result)
            .or_else(|| self.current.clone())
            .ok_or(FilterError::NoSource)
    }

    /// Back to `None` with default sliders; returns the pristine image.
    pub fn reset(&mut self) -> Result<Arc<PipelineResult>, FilterError> {
        let pristine = self.original.require()?;
        log::info!("reset to original");
        Ok(self.restore(pristine))
    }

    /// Pristine image next to the current result.
    pub fn compare(&self) -> Result<Comparison, FilterError> {
        let original = self.original.require()?;
        let current = self
            .current
            .clone()
            .unwrap_or_else(|| Arc::new(PipelineResult::identity(Arc::clone(&original))));
        Ok(Comparison { original, current })
    }

    // ------------------------------------------------------------------------
    // Scheduling
    // ------------------------------------------------------------------------

    /// When the pending request becomes due, if there is one.
    ///
    /// A request from an untimed setter has its quiescence window started
    /// at `now` by the first call that sees it.
    pub fn deadline(&mut self, now: Instant) -> Option<Instant> {
        let window = self.config.quiescence();
        let pending = self.pending.as_mut()?;
        let observed = *pending.observed_at.get_or_insert(now);
        Some(if pending.debounced {
            observed + window
        } else {
            observed
        })
    }

    /// Start the pending run if it is due and nothing is in flight.
    ///
    /// A due request that finds the engine busy stays pending and is
    /// retried on a later poll; a request with no source loaded is dropped.
    pub fn take_due(&mut self, now: Instant) -> Option<RenderJob> {
        let due = self.deadline(now)?;
        if now < due {
            return None;
        }
        if !self.original.is_loaded() {
            log::debug!("dropping pending run: no source loaded");
            self.pending = None;
            return None;
        }
        if self.busy {
            log::debug!("run due but engine busy; deferring");
            return None;
        }

        match self.start_job() {
            Ok(job) => Some(job),
            Err(err) => {
                log::debug!("dropping pending run: {}", err);
                self.pending = None;
                None
            }
        }
    }

    /// Synchronous driver: run the pending request if it is due.
    ///
    /// Untimed changes are stamped by the first poll that sees them, so a
    /// host that polls rarely should use the `_at` setters.
    pub fn poll(&mut self, now: Instant) -> Option<Arc<PipelineResult>> {
        let job = self.take_due(now)?;
        let result = job.run();
        self.complete(job.epoch(), result)
    }

    /// Mark the engine busy and snapshot the inputs of one run.
    ///
    /// The snapshot covers every change made so far, so any pending request
    /// is consumed.
    pub fn start_job(&mut self) -> Result<RenderJob, FilterError> {
        if self.busy {
            return Err(FilterError::Busy);
        }
        let source = self.original.require()?;

        self.busy = true;
        self.pending = None;
        log::debug!("starting run #{} ({})", self.runs_completed + 1, self.filter);

        Ok(RenderJob {
            epoch: self.epoch,
            source,
            filter: self.filter,
            params: self.params,
        })
    }

    /// Finish a run started by [`start_job`](Self::start_job).
    ///
    /// # Returns
    /// The published result, or `None` if the job belongs to an older epoch
    pub fn complete(&mut self, epoch: u64, result: PipelineResult) -> Option<Arc<PipelineResult>> {
        self.busy = false;
        if epoch != self.epoch {
            log::debug!("discarding stale run (epoch {} != {})", epoch, self.epoch);
            return None;
        }

        self.runs_completed += 1;
        let result = Arc::new(result);
        self.current = Some(Arc::clone(&result));
        Some(result)
    }

    /// Release the busy flag after a run that produced no result.
    pub fn abandon(&mut self, epoch: u64) {
        log::warn!("run for epoch {} abandoned", epoch);
        self.busy = false;
        if epoch == self.epoch {
            self.request(false);
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn original(&self) -> &OriginalStateManager {
        &self.original
    }

    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    pub fn params(&self) -> AdjustmentParams {
        self.params
    }

    /// Last published result.
    pub fn current(&self) -> Option<Arc<PipelineResult>> {
        self.current.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of pipeline runs whose results were published.
    pub fn runs_completed(&self) -> u64 {
        self.runs_completed
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn request(&mut self, debounced: bool) {
        self.pending = Some(PendingRun {
            debounced,
            observed_at: None,
        });
    }

    fn stamp(&mut self, now: Instant) {
        if let Some(pending) = self.pending.as_mut() {
            pending.observed_at = Some(now);
        }
    }

    fn restore(&mut self, pristine: Arc<PixelBuffer>) -> Arc<PipelineResult> {
        self.filter = FilterKind::None;
        self.params = AdjustmentParams::default();
        self.pending = None;
        self.epoch += 1;

        let result = Arc::new(PipelineResult::identity(pristine));
        self.current = Some(Arc::clone(&result));
        result
    }
}
