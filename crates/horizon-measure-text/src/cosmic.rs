//! Layout engine backed by cosmic-text.
//!
//! The engine works in physical pixels at a fixed device density and takes
//! letter spacing in em, like a density-based platform text stack. Line
//! breaking and shaping are cosmic-text's; vertical metrics come straight
//! from the font tables so that line heights are exact.
//!
//! cosmic-text has no letter spacing of its own, so spacing is added to
//! every shaped glyph's advance before lines are broken. Wrapping, line
//! count and width all see the spaced advances.

use std::sync::Arc;

use cosmic_text::{Attrs, AttrsList, Family, LineIter, ShapeLine, Shaping, Wrap};

use horizon_measure_core::logging::targets;

use crate::engine::{
    Candidate, EngineTraits, FaceMatch, FontCatalog, LayoutConstraints, LayoutEngine,
    LineFragment, LineHeightPolicy, LineMetrics, RawLayout, TextRun,
};
use crate::error::{EngineError, SetupError};
use crate::font_system::{FontLibrary, FontSystemConfig, FontSystemPool};
use crate::typeface::ResolvedFont;
use crate::types::{FontFamily, FontStyle, FontWeight};
use crate::units::EngineUnits;

/// Default number of idle font systems kept for reuse.
pub const DEFAULT_POOL_SIZE: usize = 4;

/// Tab stops every 8 spaces, as cosmic-text buffers use.
const TAB_WIDTH: u16 = 8;

/// A [`LayoutEngine`] driving cosmic-text over a shared font library.
#[derive(Debug)]
pub struct CosmicEngine {
    library: Arc<FontLibrary>,
    pool: FontSystemPool,
    density: f32,
}

impl CosmicEngine {
    /// Load fonts per `config` and build an engine at `density`.
    pub fn new(config: &FontSystemConfig, density: f32) -> Result<Self, SetupError> {
        Self::with_library(Arc::new(FontLibrary::load(config)), density, DEFAULT_POOL_SIZE)
    }

    /// Build an engine over an already loaded library.
    ///
    /// Fails if the library has no faces or the density is not a positive
    /// finite number.
    pub fn with_library(
        library: Arc<FontLibrary>,
        density: f32,
        pool_size: usize,
    ) -> Result<Self, SetupError> {
        if !density.is_finite() || density <= 0.0 {
            return Err(SetupError::InvalidDensity(density));
        }
        if library.is_empty() {
            return Err(SetupError::NoFonts);
        }

        tracing::debug!(
            target: targets::FONTS,
            density,
            faces = library.face_count(),
            pool_size,
            "cosmic-text engine ready"
        );

        Ok(Self {
            pool: FontSystemPool::new(library.clone(), pool_size),
            library,
            density,
        })
    }

    /// The font library.
    pub fn library(&self) -> &Arc<FontLibrary> {
        &self.library
    }

    /// The device density lengths are scaled by.
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Attributes that select exactly the resolved face.
    ///
    /// cosmic-text only matches faces whose style and stretch are equal to
    /// the requested ones, so the face's own traits are used. A requested
    /// italic the face cannot provide stays on [`ResolvedFont`] as metadata.
    fn face_attrs<'a>(&'a self, font: &'a ResolvedFont) -> Attrs<'a> {
        match self.library.database().face(font.face_id) {
            Some(face) => {
                let family = face
                    .families
                    .first()
                    .map_or(font.family.as_str(), |(name, _)| name.as_str());
                Attrs::new()
                    .family(Family::Name(family))
                    .weight(face.weight)
                    .style(face.style)
                    .stretch(face.stretch)
            }
            None => Attrs::new()
                .family(Family::Name(&font.family))
                .weight(font.face_weight.to_cosmic()),
        }
    }
}

/// Split text into paragraphs at line endings.
///
/// Empty text is one empty paragraph, and a trailing line ending opens one.
fn paragraphs(text: &str) -> Vec<&str> {
    let mut paragraphs: Vec<&str> = LineIter::new(text)
        .map(|(range, _)| &text[range])
        .collect();
    if paragraphs.is_empty() || text.ends_with(['\n', '\r']) {
        paragraphs.push("");
    }
    paragraphs
}

/// Widen every glyph advance by `spacing_em`, a fraction of the glyph's
/// font size.
fn apply_letter_spacing(shaped: &mut ShapeLine, spacing_em: f32) {
    for glyph in shaped
        .spans
        .iter_mut()
        .flat_map(|span| span.words.iter_mut())
        .flat_map(|word| word.glyphs.iter_mut())
    {
        glyph.x_advance += spacing_em;
    }
}

impl FontCatalog for CosmicEngine {
    fn lookup(
        &self,
        candidate: Candidate<'_>,
        weight: FontWeight,
        style: FontStyle,
    ) -> Option<FaceMatch> {
        match candidate {
            Candidate::BundledAsset(key) => {
                let family = self.library.asset_family(key)?;
                self.library.query(&FontFamily::name(family), weight, style)
            }
            Candidate::SystemFamily(name) => {
                self.library.query(&FontFamily::parse(name), weight, style)
            }
            Candidate::SystemDefault => self
                .library
                .query(&FontFamily::SansSerif, weight, style)
                .or_else(|| {
                    let family = self.library.default_family()?;
                    self.library.query(&FontFamily::name(family), weight, style)
                }),
        }
    }

    fn is_empty(&self) -> bool {
        self.library.is_empty()
    }
}

impl LayoutEngine for CosmicEngine {
    fn units(&self) -> EngineUnits {
        EngineUnits::density(self.density)
    }

    fn traits(&self) -> EngineTraits {
        EngineTraits {
            has_fragment_padding: false,
            has_font_padding: true,
        }
    }

    fn line_metrics(
        &self,
        font: &ResolvedFont,
        font_size: f32,
    ) -> Result<LineMetrics, EngineError> {
        let metrics = self
            .library
            .face_metrics(font.face_id)
            .filter(|metrics| metrics.units_per_em > 0)
            .ok_or_else(|| EngineError::MissingMetrics(font.family.clone()))?;

        Ok(LineMetrics {
            ascent: metrics.ascent_px(font_size),
            descent: metrics.descent_px(font_size),
            top_padding: metrics.top_padding_px(font_size),
            bottom_padding: metrics.bottom_padding_px(font_size),
        })
    }

    fn layout(
        &self,
        run: &TextRun<'_>,
        constraints: &LayoutConstraints,
    ) -> Result<RawLayout, EngineError> {
        let metrics = self.line_metrics(run.font, run.font_size)?;
        let line_height = metrics.natural_height() + run.line_height.extra();
        if !line_height.is_finite() || line_height <= 0.0 {
            return Err(EngineError::Layout(format!(
                "line height must be positive, got {line_height}"
            )));
        }

        let wrap_width = constraints.width.bounded();
        let pad = constraints.include_font_padding.unwrap_or(true)
            && run.line_height == LineHeightPolicy::Natural;
        let (top_padding, bottom_padding) = if pad {
            (metrics.top_padding, metrics.bottom_padding)
        } else {
            (0.0, 0.0)
        };

        tracing::trace!(
            target: targets::TEXT,
            font_size = run.font_size,
            line_height,
            wrap_width = ?wrap_width,
            max_lines = ?constraints.max_lines,
            letter_spacing_em = run.letter_spacing,
            pad,
            "cosmic-text layout"
        );

        let attrs = AttrsList::new(self.face_attrs(run.font));
        let limit = constraints.max_lines.unwrap_or(usize::MAX);
        let mut font_system = self.pool.checkout();
        let mut lines: Vec<LineFragment> = Vec::new();

        'paragraphs: for paragraph in paragraphs(run.text) {
            let mut shaped = ShapeLine::new(
                &mut font_system,
                paragraph,
                &attrs,
                Shaping::Advanced,
                TAB_WIDTH,
            );
            if run.letter_spacing != 0.0 {
                apply_letter_spacing(&mut shaped, run.letter_spacing);
            }

            let layout_lines =
                shaped.layout(run.font_size, wrap_width, Wrap::WordOrGlyph, None, None);
            for layout_line in layout_lines {
                if lines.len() >= limit {
                    break 'paragraphs;
                }
                let top = top_padding + lines.len() as f32 * line_height;
                lines.push(LineFragment {
                    width: layout_line.w,
                    top,
                    height: line_height,
                });
            }
        }

        if lines.is_empty() {
            lines.push(LineFragment {
                width: 0.0,
                top: top_padding,
                height: line_height,
            });
        }

        let bottom = lines
            .last()
            .map(|line| line.top + line.height)
            .unwrap_or(top_padding);

        Ok(RawLayout {
            lines,
            used_height: bottom + bottom_padding,
        })
    }
}
