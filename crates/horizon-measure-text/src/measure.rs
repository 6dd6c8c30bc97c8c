//! The measurement pipeline.
//!
//! [`TextMeasurer::measure`] is a pure function of its inputs: it resolves a
//! typeface, lays the text out and converts the result back to logical
//! units. The only state it touches is the engine's font data and the
//! typeface cache, both safe under concurrent use, so one measurer can serve
//! any number of threads.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::{Map, Value};

use horizon_measure_core::logging::{span_names, targets};
use horizon_measure_core::{panic_message, PerfSpan};

use crate::cosmic::{CosmicEngine, DEFAULT_POOL_SIZE};
use crate::engine::LayoutEngine;
use crate::error::{EngineError, MeasureError, SetupError, TextResult};
use crate::font_system::{FontLibrary, FontSystemConfig};
use crate::layout::LayoutInvoker;
use crate::options::{MeasureRequest, StyleConfig};
use crate::result::{build_result, MeasureResult};
use crate::typeface::{ResolvedFont, TypefaceResolver};

/// Configuration for a [`TextMeasurer`] backed by cosmic-text.
#[derive(Debug, Clone)]
pub struct MeasureConfig {
    /// Device pixel density: physical pixels per logical unit.
    pub density: f32,
    /// Font loading configuration.
    pub font: FontSystemConfig,
    /// Number of idle font systems kept for concurrent measurements.
    pub pool_size: usize,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            font: FontSystemConfig::default(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl MeasureConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the device pixel density.
    pub fn density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    /// Set the font configuration.
    pub fn font(mut self, font: FontSystemConfig) -> Self {
        self.font = font;
        self
    }

    /// Set the font system pool size.
    pub fn pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }
}

/// Measures text against one layout engine.
pub struct TextMeasurer {
    engine: Arc<dyn LayoutEngine>,
    resolver: TypefaceResolver,
}

impl TextMeasurer {
    /// Load fonts and build a cosmic-text backed measurer.
    pub fn new(config: &MeasureConfig) -> Result<Self, SetupError> {
        if !config.density.is_finite() || config.density <= 0.0 {
            return Err(SetupError::InvalidDensity(config.density));
        }
        let library = Arc::new(FontLibrary::load(&config.font));
        let engine = CosmicEngine::with_library(library, config.density, config.pool_size)?;
        Ok(Self::with_engine(Arc::new(engine)))
    }

    /// Build a measurer over any layout engine.
    pub fn with_engine(engine: Arc<dyn LayoutEngine>) -> Self {
        Self {
            engine,
            resolver: TypefaceResolver::new(),
        }
    }

    /// The layout engine.
    pub fn engine(&self) -> &Arc<dyn LayoutEngine> {
        &self.engine
    }

    /// The typeface resolver and its cache.
    pub fn resolver(&self) -> &TypefaceResolver {
        &self.resolver
    }

    /// Resolve the typeface `style` asks for.
    ///
    /// Fails only when the engine has no fonts at all.
    pub fn resolve_font(&self, style: &StyleConfig) -> TextResult<ResolvedFont> {
        self.resolver
            .resolve(
                self.engine.as_ref(),
                style.font_family.as_deref(),
                style.font_weight,
                style.font_style,
            )
            .ok_or(MeasureError::Unavailable(SetupError::NoFonts))
    }

    /// Measure `text` laid out with `style`.
    pub fn measure(&self, text: &str, style: &StyleConfig) -> TextResult<MeasureResult> {
        let _span = PerfSpan::with_len(span_names::MEASURE, text.len());
        style.validate()?;

        let font = self.resolve_font(style)?;
        let invoker = LayoutInvoker::new(self.engine.as_ref());

        let raw = panic::catch_unwind(AssertUnwindSafe(|| invoker.invoke(text, style, &font)))
            .map_err(|payload| EngineError::Panicked(panic_message(&*payload)))??;

        let result = build_result(&raw, style, &invoker.converter())?;
        tracing::debug!(
            target: targets::TEXT,
            chars = text.chars().count(),
            family = %font.family,
            width = result.width,
            height = result.height,
            line_count = result.line_count,
            "measured text"
        );
        Ok(result)
    }

    /// Measure a prepared request.
    pub fn measure_request(&self, request: &MeasureRequest) -> TextResult<MeasureResult> {
        self.measure(&request.text, &request.style)
    }

    /// Normalize raw host values and measure.
    ///
    /// Missing text measures as the empty string and missing options use
    /// every default.
    pub fn measure_raw(
        &self,
        text: Option<&str>,
        options: Option<&Map<String, Value>>,
    ) -> TextResult<MeasureResult> {
        let request = MeasureRequest::from_raw(text, options)?;
        self.measure_request(&request)
    }
}

impl std::fmt::Debug for TextMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMeasurer")
            .field("units", &self.engine.units())
            .field("cached_typefaces", &self.resolver.cached_len())
            .finish()
    }
}
