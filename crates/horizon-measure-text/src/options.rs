//! Style options and their normalization from raw key/value maps.
//!
//! Hosts hand over options as a loosely typed map (`serde_json` object).
//! [`StyleConfig::from_options`] turns that into a fully defaulted
//! configuration:
//!
//! - unknown keys are ignored
//! - `null` is treated exactly like a missing key, so the default applies
//! - values of the wrong type are rejected with an [`OptionsError`]
//!
//! # Example
//!
//! ```
//! use horizon_measure_text::StyleConfig;
//! use serde_json::json;
//!
//! let options = json!({ "fontSize": 20, "fontWeight": "bold", "maxWidth": null });
//! let style = StyleConfig::from_options(options.as_object()).unwrap();
//!
//! assert_eq!(style.font_size, 20.0);
//! assert_eq!(style.max_width, 0.0); // null means "use the default"
//! ```

use serde_json::{Map, Value};

use crate::error::OptionsError;
use crate::types::{FontStyle, FontWeight};

/// Option keys understood by the normalizer.
pub mod keys {
    pub const FONT_SIZE: &str = "fontSize";
    pub const FONT_FAMILY: &str = "fontFamily";
    pub const FONT_WEIGHT: &str = "fontWeight";
    pub const FONT_STYLE: &str = "fontStyle";
    pub const LETTER_SPACING: &str = "letterSpacing";
    pub const LINE_HEIGHT: &str = "lineHeight";
    pub const MAX_WIDTH: &str = "maxWidth";
    pub const MAX_HEIGHT: &str = "maxHeight";
    pub const NUMBER_OF_LINES: &str = "numberOfLines";
    pub const INCLUDE_FONT_PADDING: &str = "includeFontPadding";
}

/// Default font size in logical units.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// A fully defaulted text style, in logical units.
///
/// Zero is the "off" value for every constraint: a `max_width` of 0 means
/// unbounded, a `line_height` of 0 means the font's natural line height and
/// a `number_of_lines` of 0 means no line limit.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    /// Font size (> 0).
    pub font_size: f32,
    /// Requested font family, if any.
    pub font_family: Option<String>,
    /// Requested weight, already snapped to a tier.
    pub font_weight: FontWeight,
    /// Requested style.
    pub font_style: FontStyle,
    /// Extra spacing between glyphs; may be negative.
    pub letter_spacing: f32,
    /// Exact line height, or 0 for the natural height.
    pub line_height: f32,
    /// Wrap width, or 0 for unbounded.
    pub max_width: f32,
    /// Height clamp, or 0 for unclamped.
    pub max_height: f32,
    /// Maximum number of lines, or 0 for unlimited.
    pub number_of_lines: u32,
    /// Whether the engine's ascent/descent padding is included.
    pub include_font_padding: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_family: None,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
            letter_spacing: 0.0,
            line_height: 0.0,
            max_width: 0.0,
            max_height: 0.0,
            number_of_lines: 0,
            include_font_padding: true,
        }
    }
}

impl StyleConfig {
    /// Create a style with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a raw option map. `None` behaves like an empty map.
    pub fn from_options(options: Option<&Map<String, Value>>) -> Result<Self, OptionsError> {
        let Some(map) = options else {
            return Ok(Self::default());
        };
        let defaults = Self::default();

        let font_size = float(map, keys::FONT_SIZE)?.unwrap_or(defaults.font_size as f64);
        if font_size <= 0.0 {
            return Err(OptionsError::NonPositiveFontSize(font_size));
        }

        Ok(Self {
            font_size: font_size as f32,
            font_family: string(map, keys::FONT_FAMILY)?.filter(|family| !family.trim().is_empty()),
            font_weight: weight(map)?,
            font_style: string(map, keys::FONT_STYLE)?
                .map(|style| FontStyle::parse(&style))
                .unwrap_or(defaults.font_style),
            letter_spacing: float(map, keys::LETTER_SPACING)?
                .map(|v| v as f32)
                .unwrap_or(defaults.letter_spacing),
            line_height: non_negative(float(map, keys::LINE_HEIGHT)?),
            max_width: non_negative(float(map, keys::MAX_WIDTH)?),
            max_height: non_negative(float(map, keys::MAX_HEIGHT)?),
            number_of_lines: float(map, keys::NUMBER_OF_LINES)?
                .map(|lines| lines.clamp(0.0, u32::MAX as f64) as u32)
                .unwrap_or(defaults.number_of_lines),
            include_font_padding: boolean(map, keys::INCLUDE_FONT_PADDING)?
                .unwrap_or(defaults.include_font_padding),
        })
    }

    /// Set the font size.
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the font family.
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Set the font weight.
    pub fn font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight.tier();
        self
    }

    /// Set the font style.
    pub fn font_style(mut self, style: FontStyle) -> Self {
        self.font_style = style;
        self
    }

    /// Set the letter spacing.
    pub fn letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = spacing;
        self
    }

    /// Set an exact line height.
    pub fn line_height(mut self, height: f32) -> Self {
        self.line_height = height.max(0.0);
        self
    }

    /// Set the wrap width.
    pub fn max_width(mut self, width: f32) -> Self {
        self.max_width = width.max(0.0);
        self
    }

    /// Set the height clamp.
    pub fn max_height(mut self, height: f32) -> Self {
        self.max_height = height.max(0.0);
        self
    }

    /// Set the maximum number of lines.
    pub fn number_of_lines(mut self, lines: u32) -> Self {
        self.number_of_lines = lines;
        self
    }

    /// Toggle the engine's font padding.
    pub fn include_font_padding(mut self, include: bool) -> Self {
        self.include_font_padding = include;
        self
    }

    /// Whether a line limit applies.
    pub fn has_line_limit(&self) -> bool {
        self.number_of_lines > 0
    }

    /// Check a style built through the typed setters against the rules
    /// option maps are normalized with.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let lengths = [
            (keys::FONT_SIZE, self.font_size),
            (keys::LETTER_SPACING, self.letter_spacing),
            (keys::LINE_HEIGHT, self.line_height),
            (keys::MAX_WIDTH, self.max_width),
            (keys::MAX_HEIGHT, self.max_height),
        ];
        if let Some(&(key, _)) = lengths.iter().find(|(_, value)| !value.is_finite()) {
            return Err(OptionsError::NotFinite { key });
        }
        if self.font_size <= 0.0 {
            return Err(OptionsError::NonPositiveFontSize(f64::from(self.font_size)));
        }
        Ok(())
    }
}

/// A single measurement request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasureRequest {
    /// The text to measure; may be empty.
    pub text: String,
    /// The style to measure it with.
    pub style: StyleConfig,
}

impl MeasureRequest {
    /// Create a request from typed parts.
    pub fn new(text: impl Into<String>, style: StyleConfig) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create a request from raw host values. Missing text is the empty string.
    pub fn from_raw(
        text: Option<&str>,
        options: Option<&Map<String, Value>>,
    ) -> Result<Self, OptionsError> {
        Ok(Self {
            text: text.unwrap_or_default().to_string(),
            style: StyleConfig::from_options(options)?,
        })
    }
}

/// Remove every `null` entry, so that only present options cross an
/// interop boundary.
pub fn strip_absent(options: &Map<String, Value>) -> Map<String, Value> {
    options
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Look up a key, treating `null` as absent.
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

fn float(map: &Map<String, Value>, key: &'static str) -> Result<Option<f64>, OptionsError> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::Number(number)) => {
            let value = number.as_f64().ok_or(OptionsError::NotFinite { key })?;
            // Lengths are single precision downstream.
            if value.is_finite() && (value as f32).is_finite() {
                Ok(Some(value))
            } else {
                Err(OptionsError::NotFinite { key })
            }
        }
        Some(_) => Err(OptionsError::InvalidType {
            key,
            expected: "a number",
        }),
    }
}

fn string(map: &Map<String, Value>, key: &'static str) -> Result<Option<String>, OptionsError> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(OptionsError::InvalidType {
            key,
            expected: "a string",
        }),
    }
}

fn boolean(map: &Map<String, Value>, key: &'static str) -> Result<Option<bool>, OptionsError> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(OptionsError::InvalidType {
            key,
            expected: "a boolean",
        }),
    }
}

/// Weights accept keywords or numbers; anything unrecognized is normal.
fn weight(map: &Map<String, Value>) -> Result<FontWeight, OptionsError> {
    let parsed = match present(map, keys::FONT_WEIGHT) {
        None => None,
        Some(Value::String(value)) => FontWeight::parse(value),
        Some(Value::Number(number)) => number.as_f64().and_then(FontWeight::from_number),
        Some(_) => {
            return Err(OptionsError::InvalidType {
                key: keys::FONT_WEIGHT,
                expected: "a string or a number",
            });
        }
    };
    Ok(parsed.unwrap_or(FontWeight::NORMAL))
}

/// Negative constraints mean "off", like zero.
fn non_negative(value: Option<f64>) -> f32 {
    value.map(|v| v.max(0.0) as f32).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> Result<StyleConfig, OptionsError> {
        StyleConfig::from_options(value.as_object())
    }

    #[test]
    fn missing_map_uses_defaults() {
        let style = StyleConfig::from_options(None).unwrap();
        assert_eq!(style, StyleConfig::default());
        assert_eq!(style.font_size, 14.0);
        assert!(style.include_font_padding);
    }

    #[test]
    fn null_is_absent() {
        let style = normalize(json!({
            "fontSize": null,
            "fontFamily": null,
            "fontWeight": null,
            "maxWidth": null,
            "numberOfLines": null,
            "includeFontPadding": null,
        }))
        .unwrap();
        assert_eq!(style, StyleConfig::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let style = normalize(json!({ "color": "red", "textAlign": "center" })).unwrap();
        assert_eq!(style, StyleConfig::default());
    }

    #[test]
    fn all_fields_parse() {
        let style = normalize(json!({
            "fontSize": 20,
            "fontFamily": "Inter",
            "fontWeight": "600",
            "fontStyle": "italic",
            "letterSpacing": -0.5,
            "lineHeight": 24,
            "maxWidth": 200.5,
            "maxHeight": 100,
            "numberOfLines": 3,
            "includeFontPadding": false,
        }))
        .unwrap();

        assert_eq!(style.font_size, 20.0);
        assert_eq!(style.font_family.as_deref(), Some("Inter"));
        assert_eq!(style.font_weight, FontWeight::SEMI_BOLD);
        assert_eq!(style.font_style, FontStyle::Italic);
        assert_eq!(style.letter_spacing, -0.5);
        assert_eq!(style.line_height, 24.0);
        assert_eq!(style.max_width, 200.5);
        assert_eq!(style.max_height, 100.0);
        assert_eq!(style.number_of_lines, 3);
        assert!(!style.include_font_padding);
    }

    #[test]
    fn weight_keywords_and_numbers() {
        let bold = normalize(json!({ "fontWeight": "bold" })).unwrap();
        let numeric = normalize(json!({ "fontWeight": 900 })).unwrap();
        let garbage = normalize(json!({ "fontWeight": "heaviest" })).unwrap();

        assert_eq!(bold.font_weight, FontWeight::BOLD);
        assert_eq!(numeric.font_weight, FontWeight::BLACK);
        assert_eq!(garbage.font_weight, FontWeight::NORMAL);
        assert!(normalize(json!({ "fontWeight": true })).is_err());
    }

    #[test]
    fn empty_family_is_absent() {
        let style = normalize(json!({ "fontFamily": "  " })).unwrap();
        assert_eq!(style.font_family, None);
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert_eq!(
            normalize(json!({ "fontSize": "big" })),
            Err(OptionsError::InvalidType {
                key: "fontSize",
                expected: "a number"
            })
        );
        assert!(normalize(json!({ "includeFontPadding": "yes" })).is_err());
        assert!(normalize(json!({ "fontFamily": 12 })).is_err());
    }

    #[test]
    fn font_size_must_be_positive() {
        assert_eq!(
            normalize(json!({ "fontSize": 0 })),
            Err(OptionsError::NonPositiveFontSize(0.0))
        );
        assert!(normalize(json!({ "fontSize": -3 })).is_err());
    }

    #[test]
    fn values_beyond_single_precision_are_not_finite() {
        assert_eq!(
            normalize(json!({ "fontSize": 1e39 })),
            Err(OptionsError::NotFinite { key: "fontSize" })
        );
        assert_eq!(
            normalize(json!({ "maxWidth": -1e300 })),
            Err(OptionsError::NotFinite { key: "maxWidth" })
        );
    }

    #[test]
    fn typed_styles_are_validated_like_option_maps() {
        assert_eq!(StyleConfig::new().font_size(18.0).validate(), Ok(()));
        assert_eq!(
            StyleConfig::new().font_size(0.0).validate(),
            Err(OptionsError::NonPositiveFontSize(0.0))
        );
        assert_eq!(
            StyleConfig::new().font_size(f32::INFINITY).validate(),
            Err(OptionsError::NotFinite { key: "fontSize" })
        );
        assert_eq!(
            StyleConfig::new().letter_spacing(f32::NAN).validate(),
            Err(OptionsError::NotFinite { key: "letterSpacing" })
        );
    }

    #[test]
    fn negative_constraints_switch_off() {
        let style = normalize(json!({
            "maxWidth": -10,
            "maxHeight": -1,
            "lineHeight": -4,
            "numberOfLines": -2,
        }))
        .unwrap();
        assert_eq!(style.max_width, 0.0);
        assert_eq!(style.max_height, 0.0);
        assert_eq!(style.line_height, 0.0);
        assert_eq!(style.number_of_lines, 0);
    }

    #[test]
    fn fractional_line_count_truncates() {
        let style = normalize(json!({ "numberOfLines": 2.7 })).unwrap();
        assert_eq!(style.number_of_lines, 2);
    }

    #[test]
    fn builder_matches_normalizer() {
        let built = StyleConfig::new()
            .font_size(20.0)
            .font_weight(FontWeight(680))
            .max_width(200.0)
            .number_of_lines(2);
        let parsed = normalize(json!({
            "fontSize": 20,
            "fontWeight": 700,
            "maxWidth": 200,
            "numberOfLines": 2,
        }))
        .unwrap();
        assert_eq!(built, parsed);
        assert!(built.has_line_limit());
    }

    #[test]
    fn strip_absent_drops_nulls_only() {
        let raw = json!({ "fontSize": 12, "maxWidth": null, "fontFamily": "" });
        let stripped = strip_absent(raw.as_object().unwrap());
        assert_eq!(stripped.len(), 2);
        assert!(!stripped.contains_key("maxWidth"));
        assert_eq!(stripped["fontFamily"], json!(""));
    }

    #[test]
    fn request_from_raw_defaults_text() {
        let request = MeasureRequest::from_raw(None, None).unwrap();
        assert_eq!(request.text, "");
        assert_eq!(request.style, StyleConfig::default());
    }
}
