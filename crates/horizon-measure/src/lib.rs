//! Measure text without rendering it.
//!
//! Horizon Measure computes the width, height and line count a string would
//! occupy if rendered with a given style. UI code uses it to size things
//! before layout, without mounting a real text view.
//!
//! # Quick Start
//!
//! ```no_run
//! use horizon_measure::TextMeasure;
//! use serde_json::json;
//!
//! let options = json!({ "fontSize": 20, "maxWidth": 200 });
//! let response = TextMeasure::global().measure_text_sync(Some("Hello world"), options.as_object());
//!
//! // {"width":..,"height":..,"lineCount":..} or {"error":".."}
//! println!("{}", serde_json::to_string(&response)?);
//! # Ok::<(), serde_json::Error>(())
//! ```
//!
//! # Background Measurement
//!
//! [`TextMeasure::measure_text`] runs on a background thread pool and never
//! blocks the caller. The returned task can be awaited:
//!
//! ```no_run
//! use horizon_measure::TextMeasure;
//!
//! # async fn run() -> Result<(), horizon_measure::MeasureRejection> {
//! let size = TextMeasure::global().measure_text(Some("Hello world"), None).await?;
//! println!("{} x {}", size.width, size.height);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The global instance loads system fonts at density 1. Hosts with a
//! different display density or bundled fonts initialize it first:
//!
//! ```no_run
//! use horizon_measure::{FontSystemConfig, MeasureConfig, TextMeasure};
//!
//! let config = MeasureConfig::new()
//!     .density(2.625)
//!     .font(FontSystemConfig::new().asset_dir("assets/fonts"));
//! TextMeasure::init_global(&config)?;
//! # Ok::<(), horizon_measure::AlreadyInitialized>(())
//! ```
//!
//! # Logging
//!
//! Everything is instrumented with `tracing` under `horizon_measure::*`
//! targets; see [`horizon_measure_core::logging`].

mod entry;
mod error;
mod response;

pub use entry::{MeasureOutcome, MeasureTask, TextMeasure, MODULE_NAME};
pub use error::{AlreadyInitialized, MeasureRejection, MEASURE_ERROR, MEASURE_UNAVAILABLE};
pub use response::{MeasureCall, SyncResponse};

pub use horizon_measure_core::{ThreadPool, ThreadPoolConfig};
pub use horizon_measure_text::{
    FontSystemConfig, FontStyle, FontWeight, MeasureConfig, MeasureError, MeasureResult,
    StyleConfig, TextMeasurer,
};
