//! Integration tests for the cosmic-text engine with real fonts.
//!
//! These tests use the host's installed fonts. On hosts without any fonts
//! the engine cannot be built and each test returns early.

use std::path::PathBuf;
use std::sync::Arc;

use horizon_measure_text::{
    FontLibrary, FontSource, FontStyle, FontSystemConfig, FontWeight, MeasureConfig, SetupError,
    StyleConfig, TextMeasurer,
};

fn measurer(density: f32) -> Option<TextMeasurer> {
    match TextMeasurer::new(&MeasureConfig::new().density(density)) {
        Ok(measurer) => Some(measurer),
        Err(SetupError::NoFonts) => {
            eprintln!("skipping: no system fonts available");
            None
        }
        Err(err) => panic!("unexpected setup failure: {err}"),
    }
}

/// Path of an installed upright TrueType font, if any.
fn system_font_file() -> Option<PathBuf> {
    let library = FontLibrary::load(&FontSystemConfig::new());
    library.database().faces().find_map(|face| match &face.source {
        fontdb::Source::File(path)
            if face.style == fontdb::Style::Normal
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf")) =>
        {
            Some(path.clone())
        }
        _ => None,
    })
}

/// A measurer whose only font is an upright face registered as `Brand`.
fn upright_brand_measurer() -> Option<(TextMeasurer, tempfile::TempDir)> {
    let Some(font_file) = system_font_file() else {
        eprintln!("skipping: no TrueType font file found");
        return None;
    };
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(&font_file, dir.path().join("Brand.ttf")).unwrap();

    let fonts = FontSystemConfig::new()
        .load_system_fonts(false)
        .asset_dir(dir.path());
    let measurer = TextMeasurer::new(&MeasureConfig::new().font(fonts)).unwrap();
    Some((measurer, dir))
}

#[test]
fn test_empty_text() {
    let Some(measurer) = measurer(1.0) else {
        return;
    };
    let result = measurer
        .measure("", &StyleConfig::new().font_size(14.0))
        .unwrap();

    assert_eq!(result.width, 0.0);
    assert_eq!(result.line_count, 1);
    assert!(result.height > 0.0);
}

#[test]
fn test_hello_world_within_wrap_width() {
    let Some(measurer) = measurer(2.0) else {
        return;
    };
    let style = StyleConfig::new().font_size(20.0).max_width(200.0);
    let result = measurer.measure("Hello world", &style).unwrap();

    assert!(result.width > 0.0);
    assert!(result.width <= 200.0);
    assert!(result.height > 0.0);
    assert!(result.line_count >= 1);
}

#[test]
fn test_unbounded_text_stays_on_one_line() {
    let Some(measurer) = measurer(1.0) else {
        return;
    };
    let result = measurer
        .measure("A sentence that would wrap in any narrow box", &StyleConfig::new())
        .unwrap();
    assert_eq!(result.line_count, 1);
}

#[test]
fn test_narrow_width_wraps() {
    let Some(measurer) = measurer(1.0) else {
        return;
    };
    let text = "one two three four five six seven eight nine ten";
    let wide = measurer.measure(text, &StyleConfig::new()).unwrap();
    let narrow = measurer
        .measure(text, &StyleConfig::new().max_width(wide.width / 3.0))
        .unwrap();

    assert!(narrow.line_count >= 3);
    assert!(narrow.height > wide.height);
    assert!(narrow.width <= wide.width);
}

#[test]
fn test_width_monotonic_in_font_size() {
    let Some(measurer) = measurer(1.0) else {
        return;
    };
    let mut previous = 0.0;
    for size in [8.0, 12.0, 16.0, 24.0, 36.0] {
        let width = measurer
            .measure("Monotonic", &StyleConfig::new().font_size(size))
            .unwrap()
            .width;
        assert!(width >= previous);
        previous = width;
    }
}

#[test]
fn test_explicit_line_height() {
    let Some(measurer) = measurer(2.0) else {
        return;
    };
    let text = "one two three four five six seven eight nine ten";
    let style = StyleConfig::new()
        .font_size(14.0)
        .line_height(20.0)
        .max_width(40.0)
        .number_of_lines(3);

    let result = measurer.measure(text, &style).unwrap();

    assert_eq!(result.line_count, 3);
    assert_eq!(result.height, 60.0);
}

#[test]
fn test_max_height_clamp() {
    let Some(measurer) = measurer(1.0) else {
        return;
    };
    let text = "one two three four five six seven eight nine ten";
    let style = StyleConfig::new().max_width(40.0).max_height(30.0);
    let result = measurer.measure(text, &style).unwrap();

    assert_eq!(result.height, 30.0);
    assert!(result.line_count > 1);
}

#[test]
fn test_font_padding_never_shrinks_height() {
    let Some(measurer) = measurer(1.0) else {
        return;
    };
    let padded = measurer.measure("Ågj", &StyleConfig::new()).unwrap();
    let tight = measurer
        .measure("Ågj", &StyleConfig::new().include_font_padding(false))
        .unwrap();
    assert!(padded.height >= tight.height);
}

#[test]
fn test_idempotent() {
    let Some(measurer) = measurer(3.0) else {
        return;
    };
    let style = StyleConfig::new()
        .font_size(17.0)
        .letter_spacing(0.5)
        .max_width(150.0);
    let text = "The quick brown fox jumps over the lazy dog";
    let first = measurer.measure(text, &style).unwrap();
    assert_eq!(measurer.measure(text, &style).unwrap(), first);
}

#[test]
fn test_concurrent_measurements() {
    let Some(measurer) = measurer(2.0) else {
        return;
    };
    let measurer = Arc::new(measurer);
    let style = StyleConfig::new().font_size(15.0).max_width(100.0);
    let expected = measurer.measure("parallel measurement", &style).unwrap();

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let measurer = measurer.clone();
            let style = style.clone();
            std::thread::spawn(move || measurer.measure("parallel measurement", &style).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_bundled_asset_directory() {
    let Some((measurer, _dir)) = upright_brand_measurer() else {
        return;
    };

    let font = measurer
        .resolve_font(&StyleConfig::new().font_family("Brand"))
        .unwrap();
    assert_eq!(font.source, FontSource::BundledAsset);

    let result = measurer
        .measure("Bundled", &StyleConfig::new().font_family("Brand"))
        .unwrap();
    assert!(result.width > 0.0);
}

#[test]
fn test_bundled_font_bytes() {
    let Some(font_file) = system_font_file() else {
        eprintln!("skipping: no TrueType font file found");
        return;
    };
    let data = std::fs::read(&font_file).unwrap();
    let fonts = FontSystemConfig::new()
        .load_system_fonts(false)
        .bundled_font("Inline", data);
    let measurer = TextMeasurer::new(&MeasureConfig::new().font(fonts)).unwrap();

    let bundled = measurer
        .resolve_font(&StyleConfig::new().font_family("Inline"))
        .unwrap();
    let unknown = measurer
        .resolve_font(&StyleConfig::new().font_family("Not Installed Anywhere"))
        .unwrap();

    assert_eq!(bundled.source, FontSource::BundledAsset);
    assert_eq!(unknown.source, FontSource::SystemDefault);
}

#[test]
fn test_italic_without_italic_face_uses_upright_face() {
    let Some((measurer, _dir)) = upright_brand_measurer() else {
        return;
    };
    let upright_style = StyleConfig::new().font_family("Brand").font_size(16.0);
    let italic_style = upright_style.clone().font_style(FontStyle::Italic);

    let upright = measurer.measure("Hello world", &upright_style).unwrap();
    let italic = measurer.measure("Hello world", &italic_style).unwrap();
    assert_eq!(italic, upright);
    assert!(italic.width > 0.0);

    let font = measurer.resolve_font(&italic_style).unwrap();
    assert!(font.synthetic_italic);
}

#[test]
fn test_bold_without_bold_face_uses_regular_face() {
    let Some((measurer, _dir)) = upright_brand_measurer() else {
        return;
    };
    let style = StyleConfig::new()
        .font_family("Brand")
        .font_weight(FontWeight::BLACK);
    let result = measurer.measure("Heavy request", &style).unwrap();
    assert!(result.width > 0.0);
    assert_eq!(result.line_count, 1);
}

#[test]
fn test_letter_spacing_widens_every_glyph() {
    let Some(measurer) = measurer(1.0) else {
        return;
    };
    let text = "aaaa bbbb cccc";
    let style = StyleConfig::new().font_size(14.0);
    let plain = measurer.measure(text, &style).unwrap();
    let spaced = measurer
        .measure(text, &style.clone().letter_spacing(10.0))
        .unwrap();

    // 14 glyphs, 10 units each.
    assert!(spaced.width >= plain.width + 139.0);
    assert!(spaced.width <= plain.width + 141.0);
    assert_eq!(spaced.line_count, 1);
}

#[test]
fn test_letter_spacing_breaks_lines() {
    let Some(measurer) = measurer(1.0) else {
        return;
    };
    let text = "aaaa bbbb cccc";
    let style = StyleConfig::new().font_size(14.0);
    let plain = measurer.measure(text, &style).unwrap();
    let box_width = plain.width + 10.0;

    let unspaced = measurer
        .measure(text, &style.clone().max_width(box_width))
        .unwrap();
    let spaced = measurer
        .measure(
            text,
            &style.clone().letter_spacing(10.0).max_width(box_width),
        )
        .unwrap();

    assert_eq!(unspaced.line_count, 1);
    assert!(spaced.line_count >= 2);
    assert!(spaced.height > unspaced.height);
    assert!(spaced.width <= box_width);
}

#[test]
fn test_letter_spacing_respects_line_limit() {
    let Some(measurer) = measurer(2.0) else {
        return;
    };
    let text = "aaaa bbbb cccc dddd eeee";
    let style = StyleConfig::new()
        .font_size(14.0)
        .letter_spacing(10.0)
        .line_height(20.0)
        .max_width(80.0)
        .number_of_lines(2);
    let result = measurer.measure(text, &style).unwrap();

    assert_eq!(result.line_count, 2);
    assert_eq!(result.height, 40.0);
}

#[test]
fn test_trailing_line_ending_opens_a_line() {
    let Some(measurer) = measurer(1.0) else {
        return;
    };
    let single = measurer.measure("line", &StyleConfig::new()).unwrap();
    let trailing = measurer.measure("line\n", &StyleConfig::new()).unwrap();
    let two = measurer.measure("line\nline", &StyleConfig::new()).unwrap();

    assert_eq!(single.line_count, 1);
    assert_eq!(trailing.line_count, 2);
    assert_eq!(two.line_count, 2);
    assert_eq!(trailing.width, single.width);
}
