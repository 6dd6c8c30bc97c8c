//! Font loading and the pool of cosmic-text font systems.
//!
//! A [`FontLibrary`] is built once from a [`FontSystemConfig`]: system fonts,
//! asset directories and in-memory bundled fonts all go into one `fontdb`
//! database, which is immutable from then on. Layout needs exclusive access
//! to a `cosmic_text::FontSystem`, so [`FontSystemPool`] hands out font
//! systems cloned from that database, one per concurrent measurement.

use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use horizon_measure_core::logging::targets;

use crate::engine::{FaceMatch, FontFaceId};
use crate::types::{FontFamily, FontMetrics, FontStyle, FontWeight};

/// File extensions recognized as font assets.
const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "ttc", "otc"];

/// Families tried, in order, when the configured sans-serif family is missing.
const DEFAULT_FAMILY_PREFERENCES: [&str; 8] = [
    "Roboto",
    "Noto Sans",
    "DejaVu Sans",
    "Liberation Sans",
    "Helvetica",
    "Arial",
    "Segoe UI",
    "Cantarell",
];

/// A font bundled with the application, registered under a lookup key.
#[derive(Clone)]
pub struct BundledFont {
    /// The key a `fontFamily` option names to select this font.
    pub key: String,
    /// Raw TTF, OTF, TTC or OTC data.
    pub data: Arc<Vec<u8>>,
}

impl BundledFont {
    /// Create a bundled font from raw data.
    pub fn new(key: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            data: Arc::new(data.into()),
        }
    }
}

impl std::fmt::Debug for BundledFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundledFont")
            .field("key", &self.key)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Configuration for loading fonts.
#[derive(Debug, Clone)]
pub struct FontSystemConfig {
    /// Whether to load system fonts.
    pub load_system_fonts: bool,
    /// Locale string for text shaping (e.g., "en-US").
    pub locale: String,
    /// Default serif font family name.
    pub serif_family: Option<String>,
    /// Default sans-serif font family name; also the platform default font.
    pub sans_serif_family: Option<String>,
    /// Default monospace font family name.
    pub monospace_family: Option<String>,
    /// Directories holding bundled font assets named `<key>.ttf` (or
    /// `.otf`, `.ttc`, `.otc`).
    pub asset_dirs: Vec<PathBuf>,
    /// Bundled fonts supplied as bytes.
    pub bundled_fonts: Vec<BundledFont>,
}

impl Default for FontSystemConfig {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
            locale: sys_locale::get_locale().unwrap_or_else(|| "en-US".to_string()),
            serif_family: None,
            sans_serif_family: None,
            monospace_family: None,
            asset_dirs: Vec::new(),
            bundled_fonts: Vec::new(),
        }
    }
}

impl FontSystemConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to load system fonts.
    pub fn load_system_fonts(mut self, load: bool) -> Self {
        self.load_system_fonts = load;
        self
    }

    /// Set the locale for text shaping.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the default serif font family.
    pub fn serif_family(mut self, family: impl Into<String>) -> Self {
        self.serif_family = Some(family.into());
        self
    }

    /// Set the default sans-serif font family.
    pub fn sans_serif_family(mut self, family: impl Into<String>) -> Self {
        self.sans_serif_family = Some(family.into());
        self
    }

    /// Set the default monospace font family.
    pub fn monospace_family(mut self, family: impl Into<String>) -> Self {
        self.monospace_family = Some(family.into());
        self
    }

    /// Add a directory of bundled font assets.
    pub fn asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dirs.push(dir.into());
        self
    }

    /// Add a bundled font from raw data.
    pub fn bundled_font(mut self, key: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.bundled_fonts.push(BundledFont::new(key, data));
        self
    }
}

/// The loaded font database plus the bundled asset registry.
pub struct FontLibrary {
    db: Arc<fontdb::Database>,
    assets: HashMap<String, String>,
    default_family: Option<String>,
    locale: String,
}

impl FontLibrary {
    /// Load every font source named by `config`.
    ///
    /// Unreadable assets are skipped with a warning. The library may end up
    /// empty; callers decide whether that is fatal.
    pub fn load(config: &FontSystemConfig) -> Self {
        let mut db = fontdb::Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
        }

        let mut assets = HashMap::new();
        for dir in &config.asset_dirs {
            register_asset_dir(&mut db, dir, &mut assets);
        }
        for font in &config.bundled_fonts {
            let before = face_ids(&db);
            db.load_font_source(fontdb::Source::Binary(font.data.clone()));
            register_new_faces(&db, &before, &font.key, &mut assets);
        }

        if let Some(ref family) = config.serif_family {
            db.set_serif_family(family);
        }
        if let Some(ref family) = config.monospace_family {
            db.set_monospace_family(family);
        }

        let default_family = config
            .sans_serif_family
            .clone()
            .filter(|family| has_family(&db, family))
            .or_else(|| pick_default_family(&db));
        if let Some(ref family) = default_family {
            db.set_sans_serif_family(family);
        }

        tracing::debug!(
            target: targets::FONTS,
            faces = db.len(),
            bundled = assets.len(),
            default_family = ?default_family,
            "font library loaded"
        );

        Self {
            db: Arc::new(db),
            assets,
            default_family,
            locale: config.locale.clone(),
        }
    }

    /// The underlying font database.
    pub fn database(&self) -> &fontdb::Database {
        &self.db
    }

    /// The locale used for shaping.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Number of loaded faces.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Whether no faces are loaded.
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// The family a bundled asset key was registered as.
    pub fn asset_family(&self, key: &str) -> Option<&str> {
        self.assets.get(key).map(String::as_str)
    }

    /// Keys of all bundled assets.
    pub fn asset_keys(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    /// The family used as the platform default font.
    pub fn default_family(&self) -> Option<&str> {
        self.default_family.as_deref()
    }

    /// Check if a font family exists in the database.
    pub fn has_family(&self, family: &str) -> bool {
        has_family(&self.db, family)
    }

    /// Find the closest face within `family`.
    pub fn query(
        &self,
        family: &FontFamily,
        weight: FontWeight,
        style: FontStyle,
    ) -> Option<FaceMatch> {
        let families = [family.to_fontdb()];
        let query = fontdb::Query {
            families: &families,
            weight: weight.to_fontdb(),
            stretch: fontdb::Stretch::Normal,
            style: style.to_fontdb(),
        };
        let id = self.db.query(&query)?;
        self.face_match(id)
    }

    /// Describe a loaded face.
    pub fn face_match(&self, face_id: FontFaceId) -> Option<FaceMatch> {
        self.db.face(face_id).and_then(|face| {
            face.families.first().map(|(name, _)| FaceMatch {
                face_id,
                family: name.clone(),
                weight: FontWeight::from_fontdb(face.weight),
                style: FontStyle::from_fontdb(face.style),
            })
        })
    }

    /// Get vertical metrics for a face.
    ///
    /// This requires parsing the font file, so the result is computed on each call.
    pub fn face_metrics(&self, face_id: FontFaceId) -> Option<FontMetrics> {
        self.db
            .with_face_data(face_id, |data, face_index| {
                ttf_parser::Face::parse(data, face_index)
                    .ok()
                    .map(|face| {
                        let bbox = face.global_bounding_box();
                        FontMetrics {
                            units_per_em: face.units_per_em(),
                            ascent: face.ascender(),
                            descent: face.descender(),
                            line_gap: face.line_gap(),
                            bbox_top: bbox.y_max,
                            bbox_bottom: bbox.y_min,
                        }
                    })
            })
            .flatten()
    }

    /// A fresh cosmic-text font system over a copy of this database.
    pub fn font_system(&self) -> cosmic_text::FontSystem {
        cosmic_text::FontSystem::new_with_locale_and_db(
            self.locale.clone(),
            fontdb::Database::clone(&self.db),
        )
    }
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("face_count", &self.face_count())
            .field("assets", &self.assets)
            .field("default_family", &self.default_family)
            .finish()
    }
}

fn face_ids(db: &fontdb::Database) -> HashSet<FontFaceId> {
    db.faces().map(|face| face.id).collect()
}

fn has_family(db: &fontdb::Database, family: &str) -> bool {
    db.faces().any(|face| {
        face.families
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(family))
    })
}

/// Register the first family among faces added since `before` under `key`.
fn register_new_faces(
    db: &fontdb::Database,
    before: &HashSet<FontFaceId>,
    key: &str,
    assets: &mut HashMap<String, String>,
) {
    let family = db
        .faces()
        .filter(|face| !before.contains(&face.id))
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()));

    match family {
        Some(family) => {
            tracing::debug!(target: targets::FONTS, key, %family, "registered bundled font");
            assets.insert(key.to_string(), family);
        }
        None => {
            tracing::warn!(target: targets::FONTS, key, "bundled font contained no usable faces");
        }
    }
}

fn register_asset_dir(
    db: &mut fontdb::Database,
    dir: &Path,
    assets: &mut HashMap<String, String>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(
                target: targets::FONTS,
                dir = %dir.display(),
                error = %err,
                "cannot read font asset directory"
            );
            return;
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_font_file(path))
        .collect();
    paths.sort();

    for path in paths {
        let Some(key) = path.file_stem().and_then(OsStr::to_str).map(str::to_owned) else {
            continue;
        };
        if assets.contains_key(&key) {
            continue;
        }
        let before = face_ids(db);
        if let Err(err) = db.load_font_file(&path) {
            tracing::warn!(
                target: targets::FONTS,
                path = %path.display(),
                error = %err,
                "failed to load font asset"
            );
            continue;
        }
        register_new_faces(db, &before, &key, assets);
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            FONT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn pick_default_family(db: &fontdb::Database) -> Option<String> {
    DEFAULT_FAMILY_PREFERENCES
        .iter()
        .find(|family| has_family(db, family))
        .map(|family| family.to_string())
        .or_else(|| {
            db.faces()
                .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
                .min()
        })
}

/// A pool of cosmic-text font systems sharing one font database.
///
/// # Thread Safety
///
/// `cosmic_text::FontSystem` needs `&mut` access for every layout. The pool
/// lock is held only while checking a system out or returning it.
pub struct FontSystemPool {
    library: Arc<FontLibrary>,
    idle: Mutex<Vec<cosmic_text::FontSystem>>,
    max_idle: usize,
}

impl FontSystemPool {
    /// Create a pool keeping at most `max_idle` systems around between uses.
    pub fn new(library: Arc<FontLibrary>, max_idle: usize) -> Self {
        Self {
            library,
            idle: Mutex::new(Vec::new()),
            max_idle: max_idle.max(1),
        }
    }

    /// The library every pooled system is built from.
    pub fn library(&self) -> &Arc<FontLibrary> {
        &self.library
    }

    /// Take a font system, building a new one if none is idle.
    pub fn checkout(&self) -> PooledFontSystem<'_> {
        let idle = self.idle.lock().pop();
        let system = idle.unwrap_or_else(|| {
            tracing::trace!(target: targets::FONTS, "building pooled font system");
            self.library.font_system()
        });
        PooledFontSystem {
            pool: self,
            system: Some(system),
        }
    }

    /// Number of idle systems.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    fn give_back(&self, system: cosmic_text::FontSystem) {
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(system);
        }
    }
}

impl std::fmt::Debug for FontSystemPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSystemPool")
            .field("idle", &self.idle_count())
            .field("max_idle", &self.max_idle)
            .finish()
    }
}

/// A font system checked out of a [`FontSystemPool`].
///
/// Returned to the pool on drop.
pub struct PooledFontSystem<'a> {
    pool: &'a FontSystemPool,
    system: Option<cosmic_text::FontSystem>,
}

impl Deref for PooledFontSystem<'_> {
    type Target = cosmic_text::FontSystem;

    fn deref(&self) -> &Self::Target {
        self.system.as_ref().expect("font system is present until drop")
    }
}

impl DerefMut for PooledFontSystem<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.system.as_mut().expect("font system is present until drop")
    }
}

impl Drop for PooledFontSystem<'_> {
    fn drop(&mut self) {
        if let Some(system) = self.system.take() {
            self.pool.give_back(system);
        }
    }
}
