//! Conversion between logical units and the layout engine's units.
//!
//! Every public input and output of this crate is expressed in logical
//! (device-independent) units. Engines that lay out in physical pixels
//! declare a [`UnitScale::Density`] and get every length multiplied by the
//! device density on the way in and divided on the way out.

/// How an engine's lengths relate to logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitScale {
    /// The engine works directly in logical units.
    Logical,
    /// The engine works in physical pixels at the given density.
    Density(f32),
}

/// How an engine expects letter spacing to be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LetterSpacingUnit {
    /// Spacing in the same units as every other length.
    #[default]
    Logical,
    /// Spacing as a fraction of the (engine-unit) font size.
    Em,
}

/// The unit conventions an engine declares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineUnits {
    /// Length scale.
    pub scale: UnitScale,
    /// Letter spacing representation.
    pub letter_spacing: LetterSpacingUnit,
    /// The largest extent the engine can represent; used as "unbounded".
    pub max_extent: f32,
}

impl EngineUnits {
    /// Units for an engine that works in logical units.
    pub fn logical() -> Self {
        Self {
            scale: UnitScale::Logical,
            letter_spacing: LetterSpacingUnit::Logical,
            max_extent: f32::MAX,
        }
    }

    /// Units for a physical pixel engine at `density`, with em letter spacing.
    pub fn density(density: f32) -> Self {
        Self {
            scale: UnitScale::Density(density),
            letter_spacing: LetterSpacingUnit::Em,
            max_extent: f32::MAX,
        }
    }
}

impl Default for EngineUnits {
    fn default() -> Self {
        Self::logical()
    }
}

/// A layout extent in engine units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// A finite constraint.
    Bounded(f32),
    /// No constraint; the engine sees its maximum representable value.
    Unbounded,
}

impl Extent {
    /// Whether this extent constrains layout.
    pub fn is_bounded(self) -> bool {
        matches!(self, Extent::Bounded(_))
    }

    /// The finite value, if any.
    pub fn bounded(self) -> Option<f32> {
        match self {
            Extent::Bounded(value) => Some(value),
            Extent::Unbounded => None,
        }
    }
}

/// Converts lengths between logical units and one engine's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    units: EngineUnits,
}

impl UnitConverter {
    /// Create a converter for the given engine units.
    pub fn new(units: EngineUnits) -> Self {
        Self { units }
    }

    /// The engine units this converter targets.
    pub fn units(&self) -> EngineUnits {
        self.units
    }

    /// The multiplier applied to logical lengths on the way in.
    pub fn density(&self) -> f32 {
        match self.units.scale {
            UnitScale::Logical => 1.0,
            UnitScale::Density(density) => density,
        }
    }

    /// Convert a logical length to engine units.
    pub fn to_engine(&self, logical: f32) -> f32 {
        logical * self.density()
    }

    /// Convert an engine length back to logical units.
    pub fn to_logical(&self, engine: f32) -> f32 {
        engine / self.density()
    }

    /// Convert an optional constraint, where `0` means unbounded.
    ///
    /// Physical pixel engines receive whole pixels.
    pub fn extent(&self, logical: f32) -> Extent {
        if logical <= 0.0 {
            return Extent::Unbounded;
        }
        let engine = match self.units.scale {
            UnitScale::Logical => logical,
            UnitScale::Density(density) => (logical * density).round(),
        };
        if engine >= self.units.max_extent {
            Extent::Unbounded
        } else {
            Extent::Bounded(engine.max(1.0))
        }
    }

    /// The value an engine should see for `extent`.
    pub fn sentinel(&self, extent: Extent) -> f32 {
        match extent {
            Extent::Bounded(value) => value,
            Extent::Unbounded => self.units.max_extent,
        }
    }

    /// Convert letter spacing to the engine's representation.
    ///
    /// `font_size_engine` is the font size already converted to engine units.
    pub fn letter_spacing(&self, logical: f32, font_size_engine: f32) -> f32 {
        if logical == 0.0 {
            return 0.0;
        }
        match self.units.letter_spacing {
            LetterSpacingUnit::Logical => self.to_engine(logical),
            LetterSpacingUnit::Em => {
                if font_size_engine > 0.0 {
                    self.to_engine(logical) / font_size_engine
                } else {
                    0.0
                }
            }
        }
    }
}
