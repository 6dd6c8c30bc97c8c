//! Error types reported by the public entry points.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use horizon_measure_core::TaskError;
use horizon_measure_text::MeasureError;

/// Rejection code for a failed measurement.
pub const MEASURE_ERROR: &str = "MEASURE_ERROR";

/// Rejection code when the measurement engine could not be set up.
pub const MEASURE_UNAVAILABLE: &str = "MEASURE_UNAVAILABLE";

/// A structured failure delivered by the non-blocking entry point.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct MeasureRejection {
    /// Either [`MEASURE_ERROR`] or [`MEASURE_UNAVAILABLE`].
    pub code: String,
    /// Human-readable description.
    pub message: String,
}

impl MeasureRejection {
    /// Create a rejection.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether the engine could not be set up at all.
    pub fn is_unavailable(&self) -> bool {
        self.code == MEASURE_UNAVAILABLE
    }
}

impl From<&MeasureError> for MeasureRejection {
    fn from(err: &MeasureError) -> Self {
        let code = if err.is_setup() {
            MEASURE_UNAVAILABLE
        } else {
            MEASURE_ERROR
        };
        Self::new(code, err.to_string())
    }
}

impl From<MeasureError> for MeasureRejection {
    fn from(err: MeasureError) -> Self {
        Self::from(&err)
    }
}

impl From<TaskError> for MeasureRejection {
    fn from(err: TaskError) -> Self {
        Self::new(MEASURE_ERROR, err.to_string())
    }
}

/// The process-wide instance was already initialized.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("the global text measure instance is already initialized")]
pub struct AlreadyInitialized;
