//! Error types for the measurement crate.

use thiserror::Error;

/// Errors raised while normalizing raw style options.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionsError {
    /// An option had a value of the wrong JSON type.
    #[error("option `{key}` must be {expected}")]
    InvalidType {
        key: &'static str,
        expected: &'static str,
    },

    /// A numeric option was NaN or infinite.
    #[error("option `{key}` must be a finite number")]
    NotFinite { key: &'static str },

    /// The font size was zero or negative.
    #[error("fontSize must be greater than zero, got {0}")]
    NonPositiveFontSize(f64),
}

/// Failures reported by a layout engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The engine could not read metrics for a resolved face.
    #[error("no metrics available for font face `{0}`")]
    MissingMetrics(String),

    /// The engine produced a value that is not a finite length.
    #[error("layout produced a non-finite {0}")]
    NonFinite(&'static str),

    /// The engine panicked while laying out text.
    #[error("layout engine panicked: {0}")]
    Panicked(String),

    /// Any other engine-internal failure.
    #[error("layout failed: {0}")]
    Layout(String),
}

/// Errors raised while building a measurement engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    /// No font faces were available after loading.
    #[error(
        "no fonts are available to the text layout engine; enable system font loading \
         or register bundled fonts before measuring"
    )]
    NoFonts,

    /// The configured device density was unusable.
    #[error("display density must be a finite number greater than zero, got {0}")]
    InvalidDensity(f32),
}

/// Errors returned by a measurement.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// The style options could not be normalized.
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    /// The layout engine failed.
    #[error("{0}")]
    Engine(#[from] EngineError),

    /// The measurement engine is not available in this environment.
    #[error("text measurement is unavailable: {0}")]
    Unavailable(#[from] SetupError),
}

impl MeasureError {
    /// Whether this error stems from setup rather than from one measurement.
    pub fn is_setup(&self) -> bool {
        matches!(self, MeasureError::Unavailable(_))
    }
}

/// Result type for measurement operations.
pub type TextResult<T> = Result<T, MeasureError>;
