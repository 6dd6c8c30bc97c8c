//! Text measurement for Horizon Measure.
//!
//! This crate computes the size a string would occupy if rendered with a
//! given style, without rendering anything. Shaping and line breaking are
//! delegated to a layout engine behind the [`LayoutEngine`] trait; the crate
//! ships one built on cosmic-text and fontdb.
//!
//! # Getting Started
//!
//! ```no_run
//! use horizon_measure_text::{MeasureConfig, StyleConfig, TextMeasurer};
//!
//! // Loads system fonts; a density of 2 means 2 physical pixels per unit.
//! let measurer = TextMeasurer::new(&MeasureConfig::new().density(2.0))?;
//!
//! let style = StyleConfig::new().font_size(20.0).max_width(200.0);
//! let size = measurer.measure("Hello world", &style)?;
//!
//! assert!(size.width <= 200.0);
//! println!("{} x {} in {} lines", size.width, size.height, size.line_count);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Options From Hosts
//!
//! Hosts that speak JSON pass a raw option map; `null` means "use the
//! default" and unknown keys are ignored:
//!
//! ```no_run
//! use horizon_measure_text::{MeasureConfig, TextMeasurer};
//! use serde_json::json;
//!
//! let measurer = TextMeasurer::new(&MeasureConfig::default())?;
//! let options = json!({ "fontSize": 16, "fontWeight": "bold", "numberOfLines": 2 });
//! let size = measurer.measure_raw(Some("Some long label"), options.as_object())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Bundled Fonts
//!
//! Fonts shipped with an application are registered up front and selected
//! by key through `fontFamily`:
//!
//! ```no_run
//! use horizon_measure_text::{FontSystemConfig, MeasureConfig, StyleConfig, TextMeasurer};
//!
//! let fonts = FontSystemConfig::new().asset_dir("assets/fonts"); // assets/fonts/Brand.ttf
//! let measurer = TextMeasurer::new(&MeasureConfig::new().font(fonts))?;
//! let size = measurer.measure("Logo", &StyleConfig::new().font_family("Brand"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod cosmic;
mod engine;
mod error;
mod font_system;
mod layout;
mod measure;
pub mod options;
mod result;
mod typeface;
mod types;
mod units;

pub use cosmic::{CosmicEngine, DEFAULT_POOL_SIZE};
pub use engine::{
    Candidate, EngineTraits, FaceMatch, FontCatalog, FontFaceId, LayoutConstraints, LayoutEngine,
    LineFragment, LineHeightPolicy, LineMetrics, RawLayout, TextRun,
};
pub use error::{EngineError, MeasureError, OptionsError, SetupError, TextResult};
pub use font_system::{
    BundledFont, FontLibrary, FontSystemConfig, FontSystemPool, PooledFontSystem,
};
pub use layout::LayoutInvoker;
pub use measure::{MeasureConfig, TextMeasurer};
pub use options::{strip_absent, MeasureRequest, StyleConfig, DEFAULT_FONT_SIZE};
pub use result::{build_result, round_up, MeasureResult, ROUNDING_TOLERANCE};
pub use typeface::{FontSource, ResolvedFont, TypefaceResolver};
pub use types::{FontFamily, FontMetrics, FontStyle, FontWeight};
pub use units::{EngineUnits, Extent, LetterSpacingUnit, UnitConverter, UnitScale};
