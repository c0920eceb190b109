//! The font-metrics provider consumed by the layout engine.
//!
//! The engine never touches font files itself. Everything it needs, per
//! glyph and per font, comes through the [`MathFont`] trait in font design
//! units; the style context scales design units to points at the active
//! font size. [`OpenTypeMathFont`] implements the trait on top of
//! `ttf-parser` for fonts with a MATH table.

mod opentype;

pub use opentype::OpenTypeMathFont;

use crate::geom::{Axis, Corner};

/// A font-internal glyph identifier.
pub type GlyphId = u16;

/// Construction of a math font provider failed.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum MathFontError {
    /// The font carries no MATH table.
    #[error("font has no MATH table")]
    MissingMathTable,
    /// The MATH table carries no constants record.
    #[error("MATH table has no constants")]
    MissingConstants,
}

/// Per-glyph metrics, in design units.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct GlyphMetrics {
    /// The horizontal advance.
    pub advance: f64,
    /// Extent of the bounding box above the baseline.
    pub ascent: f64,
    /// Extent of the bounding box below the baseline.
    pub descent: f64,
    /// The MATH table's italic correction, zero if absent.
    pub italics_correction: f64,
    /// The MATH table's top accent attachment point, if any.
    pub accent_attachment: Option<f64>,
    /// Whether the glyph is listed in the extended shape coverage.
    pub is_extended_shape: bool,
}

/// A pre-sized stretch variant of a glyph.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphVariant {
    pub glyph: GlyphId,
    /// The variant's advance along the stretch axis, in design units.
    pub advance: f64,
}

/// One part of a glyph assembly recipe.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AssemblyPart {
    pub glyph: GlyphId,
    /// Connector length at the start of the part, in design units.
    pub start_connector: f64,
    /// Connector length at the end of the part, in design units.
    pub end_connector: f64,
    /// The part's full advance along the stretch axis, in design units.
    pub full_advance: f64,
    /// Whether the part may be repeated to extend the assembly.
    pub extender: bool,
}

/// An assembly recipe for building an arbitrarily large glyph from parts.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphAssembly {
    pub parts: Vec<AssemblyPart>,
    /// Italic correction of the assembled glyph, in design units.
    pub italics_correction: f64,
}

/// The MATH constants record, in design units (percentages excepted).
///
/// Every gap, shift, and thickness used by the structural layouts is read
/// from here rather than fixed by the engine, so results track the font.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MathConstants {
    /// Percentage scale-down applied in script style.
    pub script_percent_scale_down: f64,
    /// Percentage scale-down applied in script-script style.
    pub script_script_percent_scale_down: f64,

    pub axis_height: f64,
    pub accent_base_height: f64,

    pub fraction_rule_thickness: f64,
    pub fraction_numerator_shift_up: f64,
    pub fraction_numerator_display_style_shift_up: f64,
    pub fraction_denominator_shift_down: f64,
    pub fraction_denominator_display_style_shift_down: f64,
    pub fraction_numerator_gap_min: f64,
    pub fraction_num_display_style_gap_min: f64,
    pub fraction_denominator_gap_min: f64,
    pub fraction_denom_display_style_gap_min: f64,

    pub superscript_shift_up: f64,
    pub superscript_shift_up_cramped: f64,
    pub superscript_bottom_min: f64,
    pub superscript_baseline_drop_max: f64,
    pub superscript_bottom_max_with_subscript: f64,
    pub subscript_shift_down: f64,
    pub subscript_top_max: f64,
    pub subscript_baseline_drop_min: f64,
    pub sub_superscript_gap_min: f64,
    pub space_after_script: f64,

    pub upper_limit_gap_min: f64,
    pub upper_limit_baseline_rise_min: f64,
    pub lower_limit_gap_min: f64,
    pub lower_limit_baseline_drop_min: f64,

    pub radical_vertical_gap: f64,
    pub radical_display_style_vertical_gap: f64,
    pub radical_rule_thickness: f64,
    pub radical_extra_ascender: f64,
    pub radical_kern_before_degree: f64,
    pub radical_kern_after_degree: f64,
    /// Percentage of the radical's vertical extent by which a degree is
    /// raised from the bottom.
    pub radical_degree_bottom_raise_percent: f64,

    pub overbar_extra_ascender: f64,
    pub overbar_rule_thickness: f64,
    pub overbar_vertical_gap: f64,
    pub underbar_extra_descender: f64,
    pub underbar_rule_thickness: f64,
    pub underbar_vertical_gap: f64,
}

/// Provides glyphs and MATH metrics to the layout engine.
///
/// All returned lengths are in design units; scale with
/// [`units_per_em`](Self::units_per_em) and the font size to get points.
pub trait MathFont {
    /// The design units per em square.
    fn units_per_em(&self) -> f64;

    /// Maps a character to a glyph, if the font covers it.
    fn glyph_index(&self, c: char) -> Option<GlyphId>;

    /// Metrics for a glyph.
    fn glyph_metrics(&self, glyph: GlyphId) -> GlyphMetrics;

    /// The font's MATH constants.
    fn constants(&self) -> &MathConstants;

    /// Pre-sized variants for a glyph along the given axis, from smallest
    /// to largest.
    fn variants(&self, glyph: GlyphId, axis: Axis) -> Vec<GlyphVariant>;

    /// The assembly recipe for a glyph along the given axis, if any.
    fn assembly(&self, glyph: GlyphId, axis: Axis) -> Option<GlyphAssembly>;

    /// The minimum connector overlap for assemblies, in design units.
    fn min_connector_overlap(&self) -> f64;

    /// The kerning adjustment for a glyph corner at the given correction
    /// height (both in design units).
    fn kern_at_height(&self, glyph: GlyphId, corner: Corner, height: f64) -> f64;
}

/// A font handle bound to a concrete font size.
///
/// This is the form the layout code consumes: it converts design units to
/// points on the fly.
#[derive(Copy, Clone)]
pub struct ScaledFont<'a> {
    pub font: &'a dyn MathFont,
    pub size: f64,
}

impl<'a> ScaledFont<'a> {
    /// Converts a design-unit length to points.
    pub fn to_points(&self, units: f64) -> f64 {
        units * self.size / self.font.units_per_em()
    }

    /// Converts a point length to design units.
    pub fn to_units(&self, points: f64) -> f64 {
        points * self.font.units_per_em() / self.size
    }

    /// Resolves a font-relative length to points.
    pub fn em(&self, em: crate::geom::Em) -> f64 {
        em.at(self.size)
    }

    /// Metrics for a glyph, converted to points.
    pub fn glyph_metrics(&self, glyph: GlyphId) -> GlyphMetrics {
        let m = self.font.glyph_metrics(glyph);
        GlyphMetrics {
            advance: self.to_points(m.advance),
            ascent: self.to_points(m.ascent),
            descent: self.to_points(m.descent),
            italics_correction: self.to_points(m.italics_correction),
            accent_attachment: m.accent_attachment.map(|v| self.to_points(v)),
            is_extended_shape: m.is_extended_shape,
        }
    }

    /// The kerning adjustment at a corner, taking and returning points.
    pub fn kern_at_height(&self, glyph: GlyphId, corner: Corner, height: f64) -> f64 {
        let units = self.font.kern_at_height(glyph, corner, self.to_units(height));
        self.to_points(units)
    }
}
