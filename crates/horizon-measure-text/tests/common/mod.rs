//! A deterministic layout engine for integration tests.
//!
//! Every character advances by half the font size (10% more for bold
//! weights), lines break greedily at spaces, and vertical metrics are fixed
//! fractions of the font size. That makes expected sizes easy to compute by
//! hand while exercising the whole measurement pipeline.

#![allow(dead_code)]

use std::sync::Arc;

use horizon_measure_text::{
    Candidate, EngineError, EngineTraits, EngineUnits, FaceMatch, FontCatalog, FontFaceId,
    FontStyle, FontWeight, LayoutConstraints, LayoutEngine, LineFragment, LineHeightPolicy,
    LineMetrics, RawLayout, ResolvedFont, TextMeasurer, TextRun,
};

/// Text that makes the engine panic.
pub const PANIC_TEXT: &str = "__panic__";
/// Text that makes the engine report a NaN width.
pub const NAN_TEXT: &str = "__nan__";

pub const DEFAULT_FAMILY: &str = "Fixed Sans";
pub const BUNDLED_KEY: &str = "Brand";
pub const BUNDLED_FAMILY: &str = "Brand Display";

pub struct FixedAdvanceEngine {
    units: EngineUnits,
    empty: bool,
}

impl FixedAdvanceEngine {
    pub fn logical() -> Self {
        Self {
            units: EngineUnits::logical(),
            empty: false,
        }
    }

    pub fn density(density: f32) -> Self {
        Self {
            units: EngineUnits::density(density),
            empty: false,
        }
    }

    pub fn without_fonts() -> Self {
        Self {
            units: EngineUnits::logical(),
            empty: true,
        }
    }

    fn advance(font: &ResolvedFont, font_size: f32) -> f32 {
        let base = font_size * 0.5;
        if font.weight.is_bold() { base * 1.1 } else { base }
    }

    fn spacing(&self, run: &TextRun<'_>) -> f32 {
        match self.units.letter_spacing {
            horizon_measure_text::LetterSpacingUnit::Logical => run.letter_spacing,
            horizon_measure_text::LetterSpacingUnit::Em => run.letter_spacing * run.font_size,
        }
    }
}

impl FontCatalog for FixedAdvanceEngine {
    fn lookup(
        &self,
        candidate: Candidate<'_>,
        weight: FontWeight,
        style: FontStyle,
    ) -> Option<FaceMatch> {
        if self.empty {
            return None;
        }
        let family = match candidate {
            Candidate::BundledAsset(BUNDLED_KEY) => BUNDLED_FAMILY,
            Candidate::SystemFamily("Fixed Sans") | Candidate::SystemFamily("sans-serif") => {
                DEFAULT_FAMILY
            }
            Candidate::SystemDefault => DEFAULT_FAMILY,
            _ => return None,
        };
        Some(FaceMatch {
            face_id: FontFaceId::dummy(),
            family: family.to_string(),
            weight,
            style,
        })
    }

    fn is_empty(&self) -> bool {
        self.empty
    }
}

impl LayoutEngine for FixedAdvanceEngine {
    fn units(&self) -> EngineUnits {
        self.units
    }

    fn traits(&self) -> EngineTraits {
        EngineTraits {
            has_fragment_padding: false,
            has_font_padding: true,
        }
    }

    fn line_metrics(&self, _: &ResolvedFont, font_size: f32) -> Result<LineMetrics, EngineError> {
        Ok(LineMetrics {
            ascent: font_size * 0.8,
            descent: font_size * 0.2,
            top_padding: font_size * 0.1,
            bottom_padding: font_size * 0.1,
        })
    }

    fn layout(
        &self,
        run: &TextRun<'_>,
        constraints: &LayoutConstraints,
    ) -> Result<RawLayout, EngineError> {
        if run.text == PANIC_TEXT {
            panic!("engine exploded");
        }

        let metrics = self.line_metrics(run.font, run.font_size)?;
        let line_height = metrics.natural_height() + run.line_height.extra();
        let char_width = Self::advance(run.font, run.font_size) + self.spacing(run);
        let limit = constraints.width.bounded().unwrap_or(f32::INFINITY);

        let mut widths = Vec::new();
        for paragraph in run.text.split('\n') {
            let mut current = 0usize;
            for word in paragraph.split(' ') {
                let len = word.chars().count();
                if current == 0 {
                    current = len;
                } else if (current + 1 + len) as f32 * char_width <= limit {
                    current += 1 + len;
                } else {
                    widths.push(current as f32 * char_width);
                    current = len;
                }
            }
            widths.push(current as f32 * char_width);
        }
        widths.truncate(constraints.max_lines.unwrap_or(usize::MAX));

        if run.text == NAN_TEXT {
            widths[0] = f32::NAN;
        }

        let pad = constraints.include_font_padding.unwrap_or(true)
            && run.line_height == LineHeightPolicy::Natural;
        let top = if pad { metrics.top_padding } else { 0.0 };
        let bottom = if pad { metrics.bottom_padding } else { 0.0 };

        let lines: Vec<LineFragment> = widths
            .iter()
            .enumerate()
            .map(|(i, &width)| LineFragment {
                width: if width < 0.0 { 0.0 } else { width },
                top: top + i as f32 * line_height,
                height: line_height,
            })
            .collect();
        let used_height = top + lines.len() as f32 * line_height + bottom;

        Ok(RawLayout { lines, used_height })
    }
}

pub fn measurer(engine: FixedAdvanceEngine) -> TextMeasurer {
    TextMeasurer::with_engine(Arc::new(engine))
}
