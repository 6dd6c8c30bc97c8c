//! Conversion of raw engine output into a logical measurement.

use serde::{Deserialize, Serialize};

use crate::engine::RawLayout;
use crate::error::EngineError;
use crate::options::StyleConfig;
use crate::units::UnitConverter;

/// Float noise below this many logical units does not round up.
pub const ROUNDING_TOLERANCE: f32 = 1e-3;

/// The size text occupies, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureResult {
    /// Width of the widest line.
    pub width: f32,
    /// Total height, clamped to `maxHeight` when one is set.
    pub height: f32,
    /// Number of lines after any line limit.
    pub line_count: u32,
}

impl MeasureResult {
    /// Create a result.
    pub fn new(width: f32, height: f32, line_count: u32) -> Self {
        Self {
            width,
            height,
            line_count,
        }
    }
}

/// Round up to the next whole unit, ignoring float noise.
pub fn round_up(value: f32) -> f32 {
    let floor = value.floor();
    if value - floor <= ROUNDING_TOLERANCE {
        floor
    } else {
        value.ceil()
    }
}

/// Build the logical result for `raw`, laid out with `style`.
///
/// `converter` must be the one the layout was invoked with.
pub fn build_result(
    raw: &RawLayout,
    style: &StyleConfig,
    converter: &UnitConverter,
) -> Result<MeasureResult, EngineError> {
    if raw.lines.iter().any(|line| !line.width.is_finite()) {
        return Err(EngineError::NonFinite("line width"));
    }
    if !raw.used_height.is_finite() {
        return Err(EngineError::NonFinite("height"));
    }

    let mut line_count = raw.lines.len();
    if style.has_line_limit() {
        line_count = line_count.min(style.number_of_lines as usize);
    }

    let widest = raw.max_line_width();
    let mut width = round_up(converter.to_logical(widest).max(0.0));
    // Lines that fit the engine's box report at most `maxWidth`, even when
    // rounding the box to whole pixels or the width to whole units overshoots.
    if let Some(box_width) = converter.extent(style.max_width).bounded() {
        let fits = widest <= box_width + ROUNDING_TOLERANCE * converter.density();
        if fits && width > style.max_width {
            width = style.max_width;
        }
    }
    let mut height = round_up(converter.to_logical(raw.used_height).max(0.0));
    if style.max_height > 0.0 && height > style.max_height {
        height = style.max_height;
    }

    Ok(MeasureResult {
        width,
        height,
        line_count: u32::try_from(line_count).unwrap_or(u32::MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LineFragment;
    use crate::units::EngineUnits;

    fn layout(widths: &[f32], line_height: f32) -> RawLayout {
        RawLayout {
            lines: widths
                .iter()
                .enumerate()
                .map(|(i, &width)| LineFragment {
                    width,
                    top: i as f32 * line_height,
                    height: line_height,
                })
                .collect(),
            used_height: widths.len() as f32 * line_height,
        }
    }

    #[test]
    fn rounding_ignores_noise() {
        assert_eq!(round_up(40.0000002), 40.0);
        assert_eq!(round_up(40.2), 41.0);
        assert_eq!(round_up(39.9999), 40.0);
        assert_eq!(round_up(0.0), 0.0);
    }

    #[test]
    fn width_is_widest_line() {
        let converter = UnitConverter::new(EngineUnits::logical());
        let result =
            build_result(&layout(&[10.5, 30.2, 12.0], 10.0), &StyleConfig::new(), &converter).unwrap();
        assert_eq!(result, MeasureResult::new(31.0, 30.0, 3));
    }

    #[test]
    fn density_output_is_logical() {
        let converter = UnitConverter::new(EngineUnits::density(2.0));
        let result = build_result(&layout(&[81.0], 40.0), &StyleConfig::new(), &converter).unwrap();
        assert_eq!(result, MeasureResult::new(41.0, 20.0, 1));
    }

    #[test]
    fn height_clamps_to_max_height_exactly() {
        let converter = UnitConverter::new(EngineUnits::logical());
        let style = StyleConfig::new().max_height(25.5);
        let result = build_result(&layout(&[5.0, 5.0, 5.0], 10.0), &style, &converter).unwrap();
        assert_eq!(result.height, 25.5);
        assert_eq!(result.line_count, 3);
    }

    #[test]
    fn fitting_width_never_exceeds_max_width() {
        // 100.3 * 2.625 rounds to a 263px box, which is 100.19 logical.
        let converter = UnitConverter::new(EngineUnits::density(2.625));
        let style = StyleConfig::new().max_width(100.3);
        let result = build_result(&layout(&[263.0], 40.0), &style, &converter).unwrap();
        assert_eq!(result.width, 100.3);

        // 100.1 * 2.625 rounds up to the same 263px box.
        let style = StyleConfig::new().max_width(100.1);
        let result = build_result(&layout(&[262.9], 40.0), &style, &converter).unwrap();
        assert_eq!(result.width, 100.1);
    }

    #[test]
    fn overflowing_line_reports_its_width() {
        let converter = UnitConverter::new(EngineUnits::logical());
        let style = StyleConfig::new().max_width(20.0);
        let result = build_result(&layout(&[12.0, 31.5], 10.0), &style, &converter).unwrap();
        assert_eq!(result.width, 32.0);
    }

    #[test]
    fn line_count_respects_limit() {
        let converter = UnitConverter::new(EngineUnits::logical());
        let style = StyleConfig::new().number_of_lines(2);
        let result = build_result(&layout(&[5.0, 5.0, 5.0], 10.0), &style, &converter).unwrap();
        assert_eq!(result.line_count, 2);
    }

    #[test]
    fn non_finite_output_is_an_error() {
        let converter = UnitConverter::new(EngineUnits::logical());
        let mut raw = layout(&[f32::NAN], 10.0);
        assert_eq!(
            build_result(&raw, &StyleConfig::new(), &converter),
            Err(EngineError::NonFinite("line width"))
        );

        raw.lines[0].width = 1.0;
        raw.used_height = f32::INFINITY;
        assert_eq!(
            build_result(&raw, &StyleConfig::new(), &converter),
            Err(EngineError::NonFinite("height"))
        );
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(MeasureResult::new(12.0, 17.0, 1)).unwrap();
        assert_eq!(json, serde_json::json!({ "width": 12.0, "height": 17.0, "lineCount": 1 }));
    }
}
