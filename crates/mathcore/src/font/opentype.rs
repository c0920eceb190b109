//! `ttf-parser` backed implementation of the [`MathFont`] provider.

use ttf_parser::math::{self, MathValue};
use ttf_parser::Face;

use super::{
    AssemblyPart, GlyphAssembly, GlyphId, GlyphMetrics, GlyphVariant, MathConstants,
    MathFont, MathFontError,
};
use crate::geom::{Axis, Corner};

/// A [`MathFont`] reading metrics from an OpenType font's MATH table.
pub struct OpenTypeMathFont<'a> {
    face: Face<'a>,
    table: math::Table<'a>,
    constants: MathConstants,
    units_per_em: f64,
    min_connector_overlap: f64,
}

impl<'a> OpenTypeMathFont<'a> {
    /// Wraps a parsed face, failing if it is unusable for math layout.
    pub fn new(face: Face<'a>) -> Result<Self, MathFontError> {
        let table = face.tables().math.ok_or(MathFontError::MissingMathTable)?;
        let raw = table.constants.ok_or(MathFontError::MissingConstants)?;
        let constants = read_constants(&raw);
        let units_per_em = face.units_per_em() as f64;
        let min_connector_overlap = table
            .variants
            .map_or(0.0, |variants| variants.min_connector_overlap as f64);
        Ok(Self { face, table, constants, units_per_em, min_connector_overlap })
    }

    fn construction(&self, glyph: GlyphId, axis: Axis) -> Option<math::GlyphConstruction<'a>> {
        let variants = self.table.variants?;
        let constructions = match axis {
            Axis::X => variants.horizontal_constructions,
            Axis::Y => variants.vertical_constructions,
        };
        constructions.get(ttf_parser::GlyphId(glyph))
    }
}

impl MathFont for OpenTypeMathFont<'_> {
    fn units_per_em(&self) -> f64 {
        self.units_per_em
    }

    fn glyph_index(&self, c: char) -> Option<GlyphId> {
        self.face.glyph_index(c).map(|id| id.0)
    }

    fn glyph_metrics(&self, glyph: GlyphId) -> GlyphMetrics {
        let id = ttf_parser::GlyphId(glyph);
        let advance = self.face.glyph_hor_advance(id).unwrap_or(0) as f64;
        // Both can be negative: an accent's ink sits entirely above the
        // baseline, giving it a negative descent.
        let (ascent, descent) = self
            .face
            .glyph_bounding_box(id)
            .map_or((0.0, 0.0), |bbox| (bbox.y_max as f64, -bbox.y_min as f64));

        let info = self.table.glyph_info;
        let italics_correction = info
            .and_then(|info| info.italic_corrections?.get(id))
            .map_or(0.0, |v| v.value as f64);
        let accent_attachment = info
            .and_then(|info| info.top_accent_attachments?.get(id))
            .map(|v| v.value as f64);
        let is_extended_shape = info
            .and_then(|info| info.extended_shapes)
            .is_some_and(|coverage| coverage.contains(id));

        GlyphMetrics {
            advance,
            ascent,
            descent,
            italics_correction,
            accent_attachment,
            is_extended_shape,
        }
    }

    fn constants(&self) -> &MathConstants {
        &self.constants
    }

    fn variants(&self, glyph: GlyphId, axis: Axis) -> Vec<GlyphVariant> {
        self.construction(glyph, axis)
            .map(|construction| {
                construction
                    .variants
                    .into_iter()
                    .map(|variant| GlyphVariant {
                        glyph: variant.variant_glyph.0,
                        advance: variant.advance_measurement as f64,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn assembly(&self, glyph: GlyphId, axis: Axis) -> Option<GlyphAssembly> {
        let assembly = self.construction(glyph, axis)?.assembly?;
        let parts = assembly
            .parts
            .into_iter()
            .map(|part| AssemblyPart {
                glyph: part.glyph_id.0,
                start_connector: part.start_connector_length as f64,
                end_connector: part.end_connector_length as f64,
                full_advance: part.full_advance as f64,
                extender: part.part_flags.0 & 0x0001 != 0,
            })
            .collect();
        Some(GlyphAssembly {
            parts,
            italics_correction: assembly.italics_correction.value as f64,
        })
    }

    fn min_connector_overlap(&self) -> f64 {
        self.min_connector_overlap
    }

    fn kern_at_height(&self, glyph: GlyphId, corner: Corner, height: f64) -> f64 {
        let Some(info) = self
            .table
            .glyph_info
            .and_then(|info| info.kern_infos?.get(ttf_parser::GlyphId(glyph)))
        else {
            return 0.0;
        };

        let kern = match corner {
            Corner::TopLeft => info.top_left,
            Corner::TopRight => info.top_right,
            Corner::BottomLeft => info.bottom_left,
            Corner::BottomRight => info.bottom_right,
        };
        let Some(kern) = kern else { return 0.0 };

        // The kern table stores `count` correction heights partitioning the
        // glyph edge into `count + 1` ranges, each with its own kern value.
        let count = kern.count();
        let mut i = 0;
        while i < count && kern.height(i).map_or(0.0, value) < height {
            i += 1;
        }
        kern.kern(i).map_or(0.0, value)
    }
}

fn value(v: MathValue) -> f64 {
    v.value as f64
}

fn read_constants(c: &math::Constants) -> MathConstants {
    MathConstants {
        script_percent_scale_down: c.script_percent_scale_down() as f64,
        script_script_percent_scale_down: c.script_script_percent_scale_down() as f64,

        axis_height: value(c.axis_height()),
        accent_base_height: value(c.accent_base_height()),

        fraction_rule_thickness: value(c.fraction_rule_thickness()),
        fraction_numerator_shift_up: value(c.fraction_numerator_shift_up()),
        fraction_numerator_display_style_shift_up: value(
            c.fraction_numerator_display_style_shift_up(),
        ),
        fraction_denominator_shift_down: value(c.fraction_denominator_shift_down()),
        fraction_denominator_display_style_shift_down: value(
            c.fraction_denominator_display_style_shift_down(),
        ),
        fraction_numerator_gap_min: value(c.fraction_numerator_gap_min()),
        fraction_num_display_style_gap_min: value(c.fraction_num_display_style_gap_min()),
        fraction_denominator_gap_min: value(c.fraction_denominator_gap_min()),
        fraction_denom_display_style_gap_min: value(c.fraction_denom_display_style_gap_min()),

        superscript_shift_up: value(c.superscript_shift_up()),
        superscript_shift_up_cramped: value(c.superscript_shift_up_cramped()),
        superscript_bottom_min: value(c.superscript_bottom_min()),
        superscript_baseline_drop_max: value(c.superscript_baseline_drop_max()),
        superscript_bottom_max_with_subscript: value(
            c.superscript_bottom_max_with_subscript(),
        ),
        subscript_shift_down: value(c.subscript_shift_down()),
        subscript_top_max: value(c.subscript_top_max()),
        subscript_baseline_drop_min: value(c.subscript_baseline_drop_min()),
        sub_superscript_gap_min: value(c.sub_superscript_gap_min()),
        space_after_script: value(c.space_after_script()),

        upper_limit_gap_min: value(c.upper_limit_gap_min()),
        upper_limit_baseline_rise_min: value(c.upper_limit_baseline_rise_min()),
        lower_limit_gap_min: value(c.lower_limit_gap_min()),
        lower_limit_baseline_drop_min: value(c.lower_limit_baseline_drop_min()),

        radical_vertical_gap: value(c.radical_vertical_gap()),
        radical_display_style_vertical_gap: value(c.radical_display_style_vertical_gap()),
        radical_rule_thickness: value(c.radical_rule_thickness()),
        radical_extra_ascender: value(c.radical_extra_ascender()),
        radical_kern_before_degree: value(c.radical_kern_before_degree()),
        radical_kern_after_degree: value(c.radical_kern_after_degree()),
        radical_degree_bottom_raise_percent: c.radical_degree_bottom_raise_percent() as f64,

        overbar_extra_ascender: value(c.overbar_extra_ascender()),
        overbar_rule_thickness: value(c.overbar_rule_thickness()),
        overbar_vertical_gap: value(c.overbar_vertical_gap()),
        underbar_extra_descender: value(c.underbar_extra_descender()),
        underbar_rule_thickness: value(c.underbar_rule_thickness()),
        underbar_vertical_gap: value(c.underbar_vertical_gap()),
    }
}
