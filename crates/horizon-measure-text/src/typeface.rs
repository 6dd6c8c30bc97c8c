//! Typeface resolution with an ordered fallback chain.
//!
//! A requested family is tried, in order, as a bundled font asset, as an
//! installed system family and finally as the platform default font. The
//! first candidate the engine's [`FontCatalog`] knows wins. Resolution never
//! fails for an unknown family; it only comes up empty when the catalog has
//! no faces at all.
//!
//! Results are cached per (family, weight tier, italic) so repeated
//! measurements with the same style skip the font database entirely.

use std::collections::HashMap;

use parking_lot::RwLock;

use horizon_measure_core::logging::targets;

use crate::engine::{Candidate, FaceMatch, FontCatalog, FontFaceId};
use crate::types::{FontStyle, FontWeight};

/// The fallback stage that produced a [`ResolvedFont`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSource {
    /// A bundled font asset registered with the engine.
    BundledAsset,
    /// An installed system family.
    SystemFamily,
    /// The platform default font.
    SystemDefault,
}

impl<'a> From<Candidate<'a>> for FontSource {
    fn from(candidate: Candidate<'a>) -> Self {
        match candidate {
            Candidate::BundledAsset(_) => FontSource::BundledAsset,
            Candidate::SystemFamily(_) => FontSource::SystemFamily,
            Candidate::SystemDefault => FontSource::SystemDefault,
        }
    }
}

/// A concrete typeface plus the traits actually applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFont {
    /// The face used for metrics and shaping.
    pub face_id: FontFaceId,
    /// Family name of the face.
    pub family: String,
    /// The weight tier applied as a trait.
    pub weight: FontWeight,
    /// The weight of the face itself, which may differ from `weight`.
    pub face_weight: FontWeight,
    /// The style requested; shaping uses the face's own style.
    pub style: FontStyle,
    /// Italic was requested but no slanted face exists, so it is synthesized.
    pub synthetic_italic: bool,
    /// The fallback stage that produced this font.
    pub source: FontSource,
}

impl ResolvedFont {
    fn from_match(
        found: FaceMatch,
        source: FontSource,
        weight: FontWeight,
        style: FontStyle,
    ) -> Self {
        let synthetic_italic = style.is_slanted() && !found.style.is_slanted();
        Self {
            face_id: found.face_id,
            family: found.family,
            weight,
            face_weight: found.weight,
            style: if style.is_slanted() { FontStyle::Italic } else { found.style },
            synthetic_italic,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    family: Option<String>,
    weight: FontWeight,
    italic: bool,
}

/// Resolves (family, weight, style) requests to concrete faces.
#[derive(Debug, Default)]
pub struct TypefaceResolver {
    cache: RwLock<HashMap<CacheKey, ResolvedFont>>,
}

impl TypefaceResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a typeface against `catalog`.
    ///
    /// The weight is snapped to its tier first. Returns `None` only when no
    /// candidate, including the platform default, is available.
    pub fn resolve(
        &self,
        catalog: &dyn FontCatalog,
        family: Option<&str>,
        weight: FontWeight,
        style: FontStyle,
    ) -> Option<ResolvedFont> {
        let weight = weight.tier();
        let key = CacheKey {
            family: family.map(str::to_owned),
            weight,
            italic: style.is_slanted(),
        };

        if let Some(hit) = self.cache.read().get(&key) {
            return Some(hit.clone());
        }

        let resolved = Self::resolve_uncached(catalog, family, weight, style)?;
        self.cache.write().insert(key, resolved.clone());
        Some(resolved)
    }

    /// Number of cached resolutions.
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    /// Forget all cached resolutions.
    pub fn clear(&self) {
        self.cache.write().clear();
    }

    fn resolve_uncached(
        catalog: &dyn FontCatalog,
        family: Option<&str>,
        weight: FontWeight,
        style: FontStyle,
    ) -> Option<ResolvedFont> {
        let chain = candidates(family);
        let (candidate, found) = chain.iter().find_map(|&candidate| {
            let found = catalog.lookup(candidate, weight, style);
            if found.is_none() {
                tracing::debug!(
                    target: targets::TYPEFACE,
                    ?candidate,
                    "typeface candidate unavailable, trying next"
                );
            }
            found.map(|found| (candidate, found))
        })?;

        // Italic missing on the resolved family: use the system font instead.
        if style.is_slanted() && !found.style.is_slanted() && candidate != Candidate::SystemDefault
        {
            if let Some(fallback) = catalog.lookup(Candidate::SystemDefault, weight, style) {
                tracing::debug!(
                    target: targets::TYPEFACE,
                    family = %found.family,
                    fallback = %fallback.family,
                    "family has no italic face, falling back to the system font"
                );
                return Some(ResolvedFont::from_match(
                    fallback,
                    FontSource::SystemDefault,
                    weight,
                    style,
                ));
            }
        }

        let resolved = ResolvedFont::from_match(found, candidate.into(), weight, style);
        tracing::debug!(
            target: targets::TYPEFACE,
            family = %resolved.family,
            source = ?resolved.source,
            weight = %resolved.weight,
            synthetic_italic = resolved.synthetic_italic,
            "resolved typeface"
        );
        Some(resolved)
    }
}

/// The ordered fallback chain for a requested family.
fn candidates(family: Option<&str>) -> Vec<Candidate<'_>> {
    match family {
        Some(name) => vec![
            Candidate::BundledAsset(name),
            Candidate::SystemFamily(name),
            Candidate::SystemDefault,
        ],
        None => vec![Candidate::SystemDefault],
    }
}
