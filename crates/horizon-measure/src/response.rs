//! Request and response shapes for hosts that speak JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use horizon_measure_text::MeasureResult;

/// One measurement call: `{ "text": ..., "options": { ... } }`.
///
/// Both fields may be missing or `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasureCall {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub options: Option<Map<String, Value>>,
}

impl MeasureCall {
    /// Create a call from text and options.
    pub fn new(text: impl Into<String>, options: Map<String, Value>) -> Self {
        Self {
            text: Some(text.into()),
            options: Some(options),
        }
    }
}

/// The result of the blocking entry point.
///
/// Serializes to `{ "width", "height", "lineCount" }` on success and to
/// `{ "error": "..." }` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SyncResponse {
    /// The measured size.
    Measured(MeasureResult),
    /// What went wrong.
    Failed {
        /// Human-readable description.
        error: String,
    },
}

impl SyncResponse {
    /// The measured size, if the call succeeded.
    pub fn result(&self) -> Option<&MeasureResult> {
        match self {
            SyncResponse::Measured(result) => Some(result),
            SyncResponse::Failed { .. } => None,
        }
    }

    /// The error message, if the call failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            SyncResponse::Measured(_) => None,
            SyncResponse::Failed { error } => Some(error),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<MeasureResult, String> {
        match self {
            SyncResponse::Measured(result) => Ok(result),
            SyncResponse::Failed { error } => Err(error),
        }
    }
}

impl From<Result<MeasureResult, String>> for SyncResponse {
    fn from(result: Result<MeasureResult, String>) -> Self {
        match result {
            Ok(result) => SyncResponse::Measured(result),
            Err(error) => SyncResponse::Failed { error },
        }
    }
}
