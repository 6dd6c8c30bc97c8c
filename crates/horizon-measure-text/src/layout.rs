//! Configures and drives a layout engine for one measurement.
//!
//! [`LayoutInvoker`] turns a logical [`StyleConfig`] into an engine-unit
//! [`TextRun`] and [`LayoutConstraints`]:
//!
//! - a `max_width` or `max_height` of 0 becomes [`Extent::Unbounded`]
//! - a `number_of_lines` of 0 becomes no line limit
//! - an explicit `line_height` becomes extra spacing on top of the font's
//!   natural height, so every line is exactly that tall
//! - engines with implicit paddings get them set explicitly: fragment padding
//!   is forced to zero and font padding follows `include_font_padding`

use horizon_measure_core::logging::targets;

use crate::engine::{
    LayoutConstraints, LayoutEngine, LineHeightPolicy, LineMetrics, RawLayout, TextRun,
};
use crate::error::EngineError;
use crate::options::StyleConfig;
use crate::typeface::ResolvedFont;
use crate::units::{Extent, UnitConverter};

/// Drives one [`LayoutEngine`] in its own units.
#[derive(Clone, Copy)]
pub struct LayoutInvoker<'e> {
    engine: &'e dyn LayoutEngine,
    converter: UnitConverter,
}

impl<'e> LayoutInvoker<'e> {
    /// Create an invoker for `engine`.
    pub fn new(engine: &'e dyn LayoutEngine) -> Self {
        Self {
            engine,
            converter: UnitConverter::new(engine.units()),
        }
    }

    /// The converter between logical and engine units.
    pub fn converter(&self) -> UnitConverter {
        self.converter
    }

    /// Constraints for `style`, in engine units.
    pub fn constraints(&self, style: &StyleConfig) -> LayoutConstraints {
        let traits = self.engine.traits();
        LayoutConstraints {
            width: self.converter.extent(style.max_width),
            height: self.converter.extent(style.max_height),
            max_lines: style
                .has_line_limit()
                .then_some(style.number_of_lines as usize),
            include_font_padding: traits
                .has_font_padding
                .then_some(style.include_font_padding),
            fragment_padding: traits.has_fragment_padding.then_some(0.0),
        }
    }

    /// The line height policy for `style` given the font's metrics.
    pub fn line_height_policy(
        &self,
        style: &StyleConfig,
        metrics: &LineMetrics,
    ) -> LineHeightPolicy {
        if style.line_height > 0.0 {
            let requested = self.converter.to_engine(style.line_height);
            LineHeightPolicy::Extra(requested - metrics.natural_height())
        } else {
            LineHeightPolicy::Natural
        }
    }

    /// Lay out `text` with `style` using `font`.
    pub fn invoke(
        &self,
        text: &str,
        style: &StyleConfig,
        font: &ResolvedFont,
    ) -> Result<RawLayout, EngineError> {
        let font_size = self.converter.to_engine(style.font_size);
        let metrics = self.engine.line_metrics(font, font_size)?;

        let run = TextRun {
            text,
            font,
            font_size,
            letter_spacing: self.converter.letter_spacing(style.letter_spacing, font_size),
            line_height: self.line_height_policy(style, &metrics),
        };
        let constraints = self.constraints(style);

        tracing::trace!(
            target: targets::TEXT,
            font_size,
            letter_spacing = run.letter_spacing,
            line_height = ?run.line_height,
            width = ?constraints.width,
            height = ?constraints.height,
            max_lines = ?constraints.max_lines,
            unbounded_width = self.converter.sentinel(Extent::Unbounded),
            "invoking layout engine"
        );

        self.engine.layout(&run, &constraints)
    }
}
