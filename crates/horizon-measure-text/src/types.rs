//! Font-related types and enumerations.

use std::fmt;

/// Font weight, typically ranging from 100 (thin) to 900 (black).
///
/// Common weight constants are provided for convenience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Thin weight (100).
    pub const THIN: Self = Self(100);
    /// Extra-light weight (200).
    pub const EXTRA_LIGHT: Self = Self(200);
    /// Light weight (300).
    pub const LIGHT: Self = Self(300);
    /// Normal/regular weight (400).
    pub const NORMAL: Self = Self(400);
    /// Medium weight (500).
    pub const MEDIUM: Self = Self(500);
    /// Semi-bold weight (600).
    pub const SEMI_BOLD: Self = Self(600);
    /// Bold weight (700).
    pub const BOLD: Self = Self(700);
    /// Extra-bold weight (800).
    pub const EXTRA_BOLD: Self = Self(800);
    /// Black/heavy weight (900).
    pub const BLACK: Self = Self(900);

    /// Create a font weight from a numeric value (100-900).
    pub fn new(weight: u16) -> Self {
        Self(weight.clamp(100, 900))
    }

    /// Get the numeric weight value.
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Snap this weight to the nearest of the nine discrete tiers.
    ///
    /// Halfway values round up, so 550 becomes 600.
    pub fn tier(self) -> Self {
        let clamped = self.0.clamp(100, 900);
        Self(((clamped + 50) / 100 * 100).min(900))
    }

    /// Whether this weight renders as bold (600 and above).
    pub fn is_bold(self) -> bool {
        self.0 >= 600
    }

    /// Parse a weight keyword or number.
    ///
    /// Accepts `"normal"`, `"bold"` (case-insensitive) and numeric strings.
    /// Numeric values are snapped to the nearest tier. Returns `None` for
    /// anything else.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("normal") || value.eq_ignore_ascii_case("regular") {
            return Some(Self::NORMAL);
        }
        if value.eq_ignore_ascii_case("bold") {
            return Some(Self::BOLD);
        }
        value
            .parse::<f64>()
            .ok()
            .and_then(Self::from_number)
    }

    /// Build a tiered weight from a numeric value.
    pub fn from_number(value: f64) -> Option<Self> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        let clamped = value.clamp(100.0, 900.0).round() as u16;
        Some(Self(clamped).tier())
    }

    /// Convert to fontdb Weight.
    pub fn to_fontdb(self) -> fontdb::Weight {
        fontdb::Weight(self.0)
    }

    /// Create from fontdb Weight.
    pub fn from_fontdb(weight: fontdb::Weight) -> Self {
        Self(weight.0)
    }

    /// Convert to cosmic-text Weight.
    pub fn to_cosmic(self) -> cosmic_text::Weight {
        cosmic_text::Weight(self.0)
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl From<u16> for FontWeight {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Font style (normal, italic, or oblique).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    /// Normal upright style.
    #[default]
    Normal,
    /// Italic style (designed italic glyphs).
    Italic,
    /// Oblique style (slanted normal glyphs).
    Oblique,
}

impl FontStyle {
    /// Parse a style keyword. Anything other than `italic`/`oblique` is normal.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("italic") {
            FontStyle::Italic
        } else if value.eq_ignore_ascii_case("oblique") {
            FontStyle::Oblique
        } else {
            FontStyle::Normal
        }
    }

    /// Whether this style is slanted (italic or oblique).
    pub fn is_slanted(self) -> bool {
        !matches!(self, FontStyle::Normal)
    }

    /// Convert to fontdb Style.
    pub fn to_fontdb(self) -> fontdb::Style {
        match self {
            FontStyle::Normal => fontdb::Style::Normal,
            FontStyle::Italic => fontdb::Style::Italic,
            FontStyle::Oblique => fontdb::Style::Oblique,
        }
    }

    /// Create from fontdb Style.
    pub fn from_fontdb(style: fontdb::Style) -> Self {
        match style {
            fontdb::Style::Normal => FontStyle::Normal,
            fontdb::Style::Italic => FontStyle::Italic,
            fontdb::Style::Oblique => FontStyle::Oblique,
        }
    }

    /// Convert to cosmic-text Style.
    pub fn to_cosmic(self) -> cosmic_text::Style {
        match self {
            FontStyle::Normal => cosmic_text::Style::Normal,
            FontStyle::Italic => cosmic_text::Style::Italic,
            FontStyle::Oblique => cosmic_text::Style::Oblique,
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontStyle::Normal => write!(f, "normal"),
            FontStyle::Italic => write!(f, "italic"),
            FontStyle::Oblique => write!(f, "oblique"),
        }
    }
}

/// A requested font family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A specific font family by name.
    Name(String),
    /// Generic serif family.
    Serif,
    /// Generic sans-serif family.
    SansSerif,
    /// Generic monospace family.
    Monospace,
    /// Generic cursive family.
    Cursive,
    /// Generic fantasy family.
    Fantasy,
}

impl FontFamily {
    /// Create a named font family.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Interpret a family string, recognizing the generic keywords.
    ///
    /// `system-ui` and `sans-serif` both map to the generic sans-serif family.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "serif" => FontFamily::Serif,
            "sans-serif" | "sans serif" | "system-ui" => FontFamily::SansSerif,
            "monospace" => FontFamily::Monospace,
            "cursive" => FontFamily::Cursive,
            "fantasy" => FontFamily::Fantasy,
            _ => FontFamily::Name(name.trim().to_string()),
        }
    }

    /// Whether this is one of the generic families.
    pub fn is_generic(&self) -> bool {
        !matches!(self, FontFamily::Name(_))
    }

    /// Convert to fontdb Family.
    pub fn to_fontdb(&self) -> fontdb::Family<'_> {
        match self {
            FontFamily::Name(name) => fontdb::Family::Name(name.as_str()),
            FontFamily::Serif => fontdb::Family::Serif,
            FontFamily::SansSerif => fontdb::Family::SansSerif,
            FontFamily::Monospace => fontdb::Family::Monospace,
            FontFamily::Cursive => fontdb::Family::Cursive,
            FontFamily::Fantasy => fontdb::Family::Fantasy,
        }
    }
}

impl Default for FontFamily {
    fn default() -> Self {
        Self::SansSerif
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFamily::Name(name) => write!(f, "{}", name),
            FontFamily::Serif => write!(f, "serif"),
            FontFamily::SansSerif => write!(f, "sans-serif"),
            FontFamily::Monospace => write!(f, "monospace"),
            FontFamily::Cursive => write!(f, "cursive"),
            FontFamily::Fantasy => write!(f, "fantasy"),
        }
    }
}

/// Vertical font metrics in font units.
///
/// All values are in font units and need to be scaled by `size / units_per_em`
/// to get pixel values at a specific font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// The number of font units per em.
    pub units_per_em: u16,
    /// The distance from the baseline to the ascender line.
    pub ascent: i16,
    /// The distance from the baseline to the descender line (typically negative).
    pub descent: i16,
    /// The recommended additional spacing between lines.
    pub line_gap: i16,
    /// Top of the font's global bounding box.
    pub bbox_top: i16,
    /// Bottom of the font's global bounding box (typically negative).
    pub bbox_bottom: i16,
}

impl FontMetrics {
    /// Scale font units to pixels for a given font size.
    pub fn scale_to_pixels(&self, font_units: i16, font_size: f32) -> f32 {
        font_units as f32 * font_size / self.units_per_em as f32
    }

    /// Get the ascent scaled to pixels for a given font size.
    pub fn ascent_px(&self, font_size: f32) -> f32 {
        self.scale_to_pixels(self.ascent, font_size)
    }

    /// Get the descent depth below the baseline in pixels (positive).
    pub fn descent_px(&self, font_size: f32) -> f32 {
        -self.scale_to_pixels(self.descent, font_size)
    }

    /// Extra space the bounding box needs above the ascent, in pixels.
    pub fn top_padding_px(&self, font_size: f32) -> f32 {
        self.scale_to_pixels(self.bbox_top.saturating_sub(self.ascent), font_size)
            .max(0.0)
    }

    /// Extra space the bounding box needs below the descent, in pixels.
    pub fn bottom_padding_px(&self, font_size: f32) -> f32 {
        self.scale_to_pixels(self.descent.saturating_sub(self.bbox_bottom), font_size)
            .max(0.0)
    }
}
