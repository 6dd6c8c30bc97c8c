//! The blocking and non-blocking entry points.
//!
//! Both entry points run the same measurement; they differ only in where it
//! runs and how failures are reported:
//!
//! | Entry point | Runs on | Failure |
//! |---|---|---|
//! | [`TextMeasure::measure_text`] | background pool | [`MeasureRejection`] |
//! | [`TextMeasure::measure_text_with_callback`] | background pool | [`MeasureRejection`] |
//! | [`TextMeasure::measure_text_sync`] | caller | [`SyncResponse::Failed`] |

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};

use serde_json::{Map, Value};

use horizon_measure_core::logging::targets;
use horizon_measure_core::{TaskError, TaskHandle, ThreadPool};
use horizon_measure_text::{
    strip_absent, MeasureConfig, MeasureError, MeasureResult, SetupError, TextMeasurer,
};

use crate::error::{AlreadyInitialized, MeasureRejection};
use crate::response::{MeasureCall, SyncResponse};

/// Name hosts register this module under.
pub const MODULE_NAME: &str = "ReactNativeTextMeasure";

static GLOBAL: OnceLock<TextMeasure> = OnceLock::new();

/// Outcome of a background measurement.
pub type MeasureOutcome = Result<MeasureResult, MeasureRejection>;

/// A pending background measurement.
///
/// Resolves once, either by awaiting it or through [`MeasureTask::wait`].
#[derive(Debug)]
pub struct MeasureTask {
    handle: TaskHandle<MeasureOutcome>,
}

impl MeasureTask {
    /// The underlying task ID.
    pub fn id(&self) -> u64 {
        self.handle.id()
    }

    /// Try to get the outcome without blocking.
    pub fn try_get(&mut self) -> Option<MeasureOutcome> {
        self.handle.try_get().map(flatten)
    }

    /// Block the current thread until the measurement finishes.
    pub fn wait(self) -> MeasureOutcome {
        flatten(self.handle.wait())
    }
}

impl Future for MeasureTask {
    type Output = MeasureOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(flatten)
    }
}

fn flatten(result: Result<MeasureOutcome, TaskError>) -> MeasureOutcome {
    result.map_err(MeasureRejection::from).and_then(|outcome| outcome)
}

/// Text measurement exposed to hosts.
///
/// A failed engine setup does not prevent construction: it is remembered
/// and reported by every call, so hosts can tell "unavailable" apart from a
/// failed measurement.
pub struct TextMeasure {
    measurer: Result<Arc<TextMeasurer>, SetupError>,
    pool: Option<Arc<ThreadPool>>,
}

impl TextMeasure {
    /// Build the engine described by `config`.
    pub fn new(config: &MeasureConfig) -> Self {
        let measurer = TextMeasurer::new(config).map(Arc::new);
        if let Err(err) = &measurer {
            tracing::warn!(target: targets::ENTRY, %err, "text measurement unavailable");
        }
        Self {
            measurer,
            pool: None,
        }
    }

    /// Wrap an existing measurer.
    pub fn with_measurer(measurer: Arc<TextMeasurer>) -> Self {
        Self {
            measurer: Ok(measurer),
            pool: None,
        }
    }

    /// Run background measurements on `pool` instead of the global pool.
    pub fn with_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// The process-wide instance, built with default settings on first use.
    pub fn global() -> &'static TextMeasure {
        GLOBAL.get_or_init(|| TextMeasure::new(&MeasureConfig::default()))
    }

    /// Initialize the process-wide instance with custom settings.
    ///
    /// Must be called before the first use of [`TextMeasure::global`].
    pub fn init_global(
        config: &MeasureConfig,
    ) -> Result<&'static TextMeasure, AlreadyInitialized> {
        GLOBAL
            .set(TextMeasure::new(config))
            .map_err(|_| AlreadyInitialized)?;
        GLOBAL.get().ok_or(AlreadyInitialized)
    }

    /// Whether the engine was set up successfully.
    pub fn is_available(&self) -> bool {
        self.measurer.is_ok()
    }

    /// The setup failure, if any.
    pub fn setup_error(&self) -> Option<&SetupError> {
        self.measurer.as_ref().err()
    }

    /// The underlying measurer, if available.
    pub fn measurer(&self) -> Option<&Arc<TextMeasurer>> {
        self.measurer.as_ref().ok()
    }

    /// Measure on the calling thread, with the typed error.
    pub fn measure(
        &self,
        text: Option<&str>,
        options: Option<&Map<String, Value>>,
    ) -> Result<MeasureResult, MeasureError> {
        let measurer = self.measurer.as_ref().map_err(|err| err.clone())?;
        perform(measurer, text, options)
    }

    /// Measure on a background thread.
    ///
    /// Never blocks the caller. The returned task resolves with the size or
    /// a [`MeasureRejection`].
    pub fn measure_text(
        &self,
        text: Option<&str>,
        options: Option<&Map<String, Value>>,
    ) -> MeasureTask {
        let job = self.job(text, options);
        MeasureTask {
            handle: self.pool().spawn(job),
        }
    }

    /// Measure on a background thread and deliver the outcome to `callback`.
    ///
    /// The callback runs on the worker thread.
    pub fn measure_text_with_callback<C>(
        &self,
        text: Option<&str>,
        options: Option<&Map<String, Value>>,
        callback: C,
    ) where
        C: FnOnce(MeasureOutcome) + Send + 'static,
    {
        let job = self.job(text, options);
        self.pool()
            .spawn_with_callback(job, move |result| callback(flatten(result)));
    }

    /// Measure on the calling thread, blocking until layout completes.
    pub fn measure_text_sync(
        &self,
        text: Option<&str>,
        options: Option<&Map<String, Value>>,
    ) -> SyncResponse {
        self.measure(text, options)
            .map_err(|err| err.to_string())
            .into()
    }

    /// Measure a JSON call on the calling thread.
    pub fn measure_call_sync(&self, call: &MeasureCall) -> SyncResponse {
        self.measure_text_sync(call.text.as_deref(), call.options.as_ref())
    }

    fn pool(&self) -> &ThreadPool {
        match &self.pool {
            Some(pool) => pool.as_ref(),
            None => ThreadPool::global(),
        }
    }

    /// Package a measurement for the pool. Absent options are stripped here,
    /// before anything crosses to the worker thread.
    fn job(
        &self,
        text: Option<&str>,
        options: Option<&Map<String, Value>>,
    ) -> impl FnOnce() -> MeasureOutcome + Send + use<> {
        let measurer = self.measurer.clone();
        let text = text.map(str::to_owned);
        let options = options.map(strip_absent);
        move || {
            let measurer =
                measurer.map_err(|err| MeasureRejection::from(MeasureError::from(err)))?;
            perform(&measurer, text.as_deref(), options.as_ref()).map_err(MeasureRejection::from)
        }
    }
}

impl std::fmt::Debug for TextMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMeasure")
            .field("available", &self.is_available())
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}

/// The measurement shared by every entry point.
fn perform(
    measurer: &TextMeasurer,
    text: Option<&str>,
    options: Option<&Map<String, Value>>,
) -> Result<MeasureResult, MeasureError> {
    let result = measurer.measure_raw(text, options);
    if let Err(err) = &result {
        tracing::warn!(target: targets::ENTRY, %err, "text measurement failed");
    }
    result
}
