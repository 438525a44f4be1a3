//! Async driver for [`FilterEngine`].
//!
//! A background task sleeps until the engine's next deadline and re-arms on
//! every change, so a burst of slider moves ends in a single run with the
//! latest values. Runs go to tokio's blocking pool; finished results are
//! published on a `watch` channel that a renderer can subscribe to.
//!
//! Must be created inside a tokio runtime.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::adjustments::AdjustmentField;
use crate::buffer::PixelBuffer;
use crate::config::EngineConfig;
use crate::engine::{Comparison, FilterEngine, PipelineResult, RenderJob};
use crate::error::FilterError;
use crate::filters::FilterKind;

type Published = Option<Arc<PipelineResult>>;

struct Shared {
    engine: Mutex<FilterEngine>,
    wake: Notify,
    /// Held for the whole of a run, so at most one job exists at a time.
    run_gate: tokio::sync::Mutex<()>,
    results: watch::Sender<Published>,
}

impl Shared {
    fn engine(&self) -> MutexGuard<'_, FilterEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, result: &Arc<PipelineResult>) {
        self.results.send_replace(Some(Arc::clone(result)));
    }

    /// Run a started job off the async threads and hand its result back.
    async fn execute(&self, job: RenderJob) -> Published {
        let epoch = job.epoch();
        let started = Instant::now();
        match tokio::task::spawn_blocking(move || job.run()).await {
            Ok(result) => {
                log::trace!("run for epoch {} took {:?}", epoch, started.elapsed());
                let published = self.engine().complete(epoch, result);
                if let Some(result) = &published {
                    self.publish(result);
                }
                published
            }
            Err(err) => {
                log::error!("pipeline task failed: {}", err);
                self.engine().abandon(epoch);
                self.wake.notify_one();
                None
            }
        }
    }

    async fn run_due(&self) {
        let _gate = self.run_gate.lock().await;
        let job = self.engine().take_due(Instant::now().into_std());
        if let Some(job) = job {
            self.execute(job).await;
        }
    }
}

async fn drive(shared: Arc<Shared>) {
    loop {
        let deadline = shared.engine().deadline(Instant::now().into_std());
        match deadline {
            Some(at) => {
                tokio::select! {
                    _ = sleep_until(Instant::from_std(at)) => shared.run_due().await,
                    _ = shared.wake.notified() => {}
                }
            }
            None => shared.wake.notified().await,
        }
    }
}

/// Debounced, non-overlapping preview rendering on top of a [`FilterEngine`].
pub struct PreviewScheduler {
    shared: Arc<Shared>,
    worker: JoinHandle<()>,
}

impl PreviewScheduler {
    pub fn new(config: EngineConfig) -> Self {
        let (results, _) = watch::channel(None);
        let shared = Arc::new(Shared {
            engine: Mutex::new(FilterEngine::new(config)),
            wake: Notify::new(),
            run_gate: tokio::sync::Mutex::new(()),
            results,
        });
        let worker = tokio::spawn(drive(Arc::clone(&shared)));
        Self { shared, worker }
    }

    /// Receiver of every published result.
    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.shared.results.subscribe()
    }

    pub fn set_source(&self, buffer: PixelBuffer) -> Arc<PipelineResult> {
        let result = self.shared.engine().set_source(buffer);
        self.shared.publish(&result);
        self.shared.wake.notify_one();
        result
    }

    pub fn select_filter(&self, kind: FilterKind) {
        self.shared
            .engine()
            .select_filter_at(kind, Instant::now().into_std());
        self.shared.wake.notify_one();
    }

    pub fn select_filter_by_name(&self, name: &str) -> Result<(), FilterError> {
        let kind: FilterKind = name.parse()?;
        self.select_filter(kind);
        Ok(())
    }

    pub fn set_adjustment(&self, field: AdjustmentField, value: i32) -> Result<i32, FilterError> {
        let stored = self
            .shared
            .engine()
            .set_adjustment_at(field, value, Instant::now().into_std())?;
        self.shared.wake.notify_one();
        Ok(stored)
    }

    pub fn reset(&self) -> Result<Arc<PipelineResult>, FilterError> {
        let result = self.shared.engine().reset()?;
        self.shared.publish(&result);
        self.shared.wake.notify_one();
        Ok(result)
    }

    pub fn compare(&self) -> Result<Comparison, FilterError> {
        self.shared.engine().compare()
    }

    /// Run the pipeline now with the latest state, skipping the debounce.
    ///
    /// Waits for a run already in flight to finish first.
    pub async fn render_now(&self) -> Result<Arc<PipelineResult>, FilterError> {
        let _gate = self.shared.run_gate.lock().await;
        let job = self.shared.engine().start_job()?;
        match self.shared.execute(job).await {
            Some(result) => Ok(result),
            // Superseded by set_source/reset while running.
            None => self.current().ok_or(FilterError::NoSource),
        }
    }

    pub fn current(&self) -> Option<Arc<PipelineResult>> {
        self.shared.engine().current()
    }

    pub fn runs_completed(&self) -> u64 {
        self.shared.engine().runs_completed()
    }

    pub fn is_busy(&self) -> bool {
        self.shared.engine().is_busy()
    }
}

impl Drop for PreviewScheduler {
    fn drop(&mut self) {
        self.worker.abort();
    }
}
