//! Logging facilities for Horizon Measure.
//!
//! Horizon Measure uses the `tracing` crate for instrumentation. The library
//! never installs a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_measure=debug")
//!         .init();
//! }
//! ```
//!
//! Use the constants in [`targets`] to filter by subsystem.

/// Span names used throughout Horizon Measure for tracing.
pub mod span_names {
    /// A single measurement, from option parsing to the final result.
    pub const MEASURE: &str = "horizon_measure::measure";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Thread pool target.
    pub const THREADPOOL: &str = "horizon_measure::threadpool";
    /// Text measurement pipeline target.
    pub const TEXT: &str = "horizon_measure::text";
    /// Typeface resolution target.
    pub const TYPEFACE: &str = "horizon_measure::typeface";
    /// Font database loading target.
    pub const FONTS: &str = "horizon_measure::fonts";
    /// Public entry points target.
    pub const ENTRY: &str = "horizon_measure::entry";
    /// Performance spans target.
    pub const PERF: &str = "horizon_measure::perf";
}

/// A guard that records the duration of an operation as a tracing span.
///
/// The span stays entered until the guard is dropped.
///
/// # Example
///
/// ```
/// use horizon_measure_core::logging::PerfSpan;
///
/// fn expensive_operation() {
///     let _span = PerfSpan::new("expensive_operation");
///     // ... work ...
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }

    /// Create a performance span annotated with the size of the input.
    pub fn with_len(name: &'static str, len: usize) -> Self {
        let span = tracing::info_span!(
            target: targets::PERF,
            "perf",
            operation = name,
            len = len
        );
        Self {
            span: span.entered(),
        }
    }
}

impl std::fmt::Debug for PerfSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerfSpan").finish_non_exhaustive()
    }
}
