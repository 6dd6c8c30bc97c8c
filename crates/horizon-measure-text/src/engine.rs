//! The seam between measurement and a text layout engine.
//!
//! Shaping, Unicode line breaking and raw font metrics belong to the
//! engine. This crate only configures a layout, drives it and reads the
//! geometry back. Any type implementing [`LayoutEngine`] can be plugged into
//! a [`TextMeasurer`](crate::TextMeasurer); the crate ships
//! [`CosmicEngine`](crate::CosmicEngine).
//!
//! All lengths crossing this seam are in the engine's own units, as declared
//! by [`LayoutEngine::units`].

use crate::error::EngineError;
use crate::typeface::ResolvedFont;
use crate::types::{FontStyle, FontWeight};
use crate::units::{EngineUnits, Extent};

/// Identifier of a font face inside an engine's font database.
pub type FontFaceId = fontdb::ID;

/// One stage of the typeface fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate<'a> {
    /// A font asset bundled with the application, looked up by key.
    BundledAsset(&'a str),
    /// An installed system family (or generic family keyword).
    SystemFamily(&'a str),
    /// The platform default font.
    SystemDefault,
}

/// A face found by a [`FontCatalog`].
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMatch {
    /// The face identifier.
    pub face_id: FontFaceId,
    /// The family name the face belongs to.
    pub family: String,
    /// The face's actual weight.
    pub weight: FontWeight,
    /// The face's actual style.
    pub style: FontStyle,
}

/// Font lookup, as provided by a layout engine.
pub trait FontCatalog {
    /// Find the best face for `candidate` with the requested traits.
    ///
    /// Returns `None` when the candidate is not available at all. A family
    /// that exists but lacks the requested traits still returns its closest
    /// face.
    fn lookup(
        &self,
        candidate: Candidate<'_>,
        weight: FontWeight,
        style: FontStyle,
    ) -> Option<FaceMatch>;

    /// Whether the catalog holds no faces at all.
    fn is_empty(&self) -> bool;
}

/// Implicit paddings an engine adds on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineTraits {
    /// The engine pads each paragraph horizontally unless told otherwise.
    pub has_fragment_padding: bool,
    /// The engine pads the first and last line to the font's bounding box
    /// unless told otherwise.
    pub has_font_padding: bool,
}

/// Vertical metrics of a font at a given size, in engine units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Distance from the top of a line to the baseline.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of a line (positive).
    pub descent: f32,
    /// Extra space above the first line when font padding is on.
    pub top_padding: f32,
    /// Extra space below the last line when font padding is on.
    pub bottom_padding: f32,
}

impl LineMetrics {
    /// The font's natural line height: ascent plus descent.
    pub fn natural_height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// How tall each line is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineHeightPolicy {
    /// The font's natural height.
    Natural,
    /// The natural height plus extra spacing, which may be negative.
    Extra(f32),
}

impl LineHeightPolicy {
    /// The extra spacing added to each line.
    pub fn extra(self) -> f32 {
        match self {
            LineHeightPolicy::Natural => 0.0,
            LineHeightPolicy::Extra(extra) => extra,
        }
    }
}

/// A single-style run of text ready for layout.
#[derive(Debug, Clone, Copy)]
pub struct TextRun<'a> {
    /// The text.
    pub text: &'a str,
    /// The resolved typeface.
    pub font: &'a ResolvedFont,
    /// Font size in engine units.
    pub font_size: f32,
    /// Letter spacing in the engine's letter spacing unit.
    pub letter_spacing: f32,
    /// Line height policy.
    pub line_height: LineHeightPolicy,
}

/// The box and limits a run is laid out in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstraints {
    /// Wrap width.
    pub width: Extent,
    /// Box height. Layout never drops lines to fit it.
    pub height: Extent,
    /// Maximum number of lines; `None` means unlimited.
    pub max_lines: Option<usize>,
    /// Explicit font padding setting, for engines with implicit padding.
    pub include_font_padding: Option<bool>,
    /// Explicit fragment padding, for engines with implicit padding.
    pub fragment_padding: Option<f32>,
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self {
            width: Extent::Unbounded,
            height: Extent::Unbounded,
            max_lines: None,
            include_font_padding: None,
            fragment_padding: None,
        }
    }
}

/// Geometry of one laid-out line, in engine units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFragment {
    /// Measured width of the line's content.
    pub width: f32,
    /// Top of the line relative to the layout's top.
    pub top: f32,
    /// Line height.
    pub height: f32,
}

/// The complete output of one layout pass, in engine units.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawLayout {
    /// Emitted lines, after any line limit.
    pub lines: Vec<LineFragment>,
    /// Total height used, including any padding.
    pub used_height: f32,
}

impl RawLayout {
    /// The widest line.
    pub fn max_line_width(&self) -> f32 {
        self.lines
            .iter()
            .map(|line| line.width)
            .fold(0.0, f32::max)
    }
}

/// A text layout engine.
///
/// Implementations must lay out the whole run before returning: callers
/// read every line of the result and never ask for more.
pub trait LayoutEngine: FontCatalog + Send + Sync {
    /// The unit conventions of this engine.
    fn units(&self) -> EngineUnits;

    /// Paddings this engine applies unless overridden.
    fn traits(&self) -> EngineTraits;

    /// Vertical metrics for `font` at `font_size` (engine units).
    fn line_metrics(&self, font: &ResolvedFont, font_size: f32)
    -> Result<LineMetrics, EngineError>;

    /// Lay out `run` within `constraints`.
    fn layout(
        &self,
        run: &TextRun<'_>,
        constraints: &LayoutConstraints,
    ) -> Result<RawLayout, EngineError>;
}
