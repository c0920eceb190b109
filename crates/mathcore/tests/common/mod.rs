//! A deterministic in-memory math font for the integration tests.
//!
//! Design units are per 1000 em. At the conventional test size of 10pt one
//! design unit is 0.01pt, which keeps expected values easy to read: an
//! advance of 500 units is 5pt.

use mathcore::font::{
    AssemblyPart, GlyphAssembly, GlyphId, GlyphMetrics, GlyphVariant, MathFont,
    MathConstants,
};
use mathcore::geom::{Axis, Corner};

pub const FONT_SIZE: f64 = 10.0;

// Ids above the Unicode range used for stretch variants and assembly parts.
const PAREN_V1: GlyphId = 1001;
const PAREN_V2: GlyphId = 1002;
const PAREN_TOP: GlyphId = 1003;
const PAREN_EXT: GlyphId = 1004;
const PAREN_BOT: GlyphId = 1005;
const BRACE_V1: GlyphId = 1011;
const BRACE_V2: GlyphId = 1012;
const SQRT_V1: GlyphId = 1021;
const SQRT_V2: GlyphId = 1022;
const SQRT_TOP: GlyphId = 1023;
const SQRT_EXT: GlyphId = 1024;
const SQRT_BOT: GlyphId = 1025;
const HAT_V1: GlyphId = 1031;
const HAT_V2: GlyphId = 1032;
const ARROW_V1: GlyphId = 1041;
const INT_V1: GlyphId = 1051;
const INT_TOP: GlyphId = 1052;
const INT_EXT: GlyphId = 1053;
const INT_BOT: GlyphId = 1054;

pub struct FixtureFont {
    constants: MathConstants,
}

impl FixtureFont {
    pub fn new() -> Self {
        Self {
            constants: MathConstants {
                script_percent_scale_down: 70.0,
                script_script_percent_scale_down: 50.0,

                axis_height: 250.0,
                accent_base_height: 450.0,

                fraction_rule_thickness: 40.0,
                fraction_numerator_shift_up: 400.0,
                fraction_numerator_display_style_shift_up: 700.0,
                fraction_denominator_shift_down: 400.0,
                fraction_denominator_display_style_shift_down: 700.0,
                fraction_numerator_gap_min: 100.0,
                fraction_num_display_style_gap_min: 300.0,
                fraction_denominator_gap_min: 100.0,
                fraction_denom_display_style_gap_min: 300.0,

                superscript_shift_up: 360.0,
                superscript_shift_up_cramped: 280.0,
                superscript_bottom_min: 100.0,
                superscript_baseline_drop_max: 250.0,
                superscript_bottom_max_with_subscript: 300.0,
                subscript_shift_down: 210.0,
                subscript_top_max: 400.0,
                subscript_baseline_drop_min: 50.0,
                sub_superscript_gap_min: 150.0,
                space_after_script: 40.0,

                upper_limit_gap_min: 100.0,
                upper_limit_baseline_rise_min: 300.0,
                lower_limit_gap_min: 100.0,
                lower_limit_baseline_drop_min: 300.0,

                radical_vertical_gap: 100.0,
                radical_display_style_vertical_gap: 300.0,
                radical_rule_thickness: 40.0,
                radical_extra_ascender: 80.0,
                radical_kern_before_degree: 300.0,
                radical_kern_after_degree: -500.0,
                radical_degree_bottom_raise_percent: 60.0,

                overbar_extra_ascender: 40.0,
                overbar_rule_thickness: 40.0,
                overbar_vertical_gap: 100.0,
                underbar_extra_descender: 40.0,
                underbar_rule_thickness: 40.0,
                underbar_vertical_gap: 100.0,
            },
        }
    }
}

fn metrics(advance: f64, ascent: f64, descent: f64) -> GlyphMetrics {
    GlyphMetrics { advance, ascent, descent, ..Default::default() }
}

impl MathFont for FixtureFont {
    fn units_per_em(&self) -> f64 {
        1000.0
    }

    fn glyph_index(&self, c: char) -> Option<GlyphId> {
        let covered = c.is_ascii_alphanumeric()
            || matches!(
                c,
                '+' | '-' | '=' | '*' | ',' | '.' | '−'
                    | '(' | ')' | '[' | ']' | '{' | '}' | '|'
                    | '√' | '\u{302}' | '→' | '∑' | '∫'
            );
        covered.then_some(c as GlyphId)
    }

    fn glyph_metrics(&self, glyph: GlyphId) -> GlyphMetrics {
        match glyph {
            PAREN_V1 => metrics(400.0, 950.0, 450.0),
            PAREN_V2 => metrics(400.0, 1250.0, 750.0),
            PAREN_TOP | PAREN_BOT => metrics(400.0, 700.0, 0.0),
            PAREN_EXT => metrics(400.0, 600.0, 0.0),
            BRACE_V1 => metrics(450.0, 950.0, 450.0),
            BRACE_V2 => metrics(450.0, 1250.0, 750.0),
            SQRT_V1 => metrics(700.0, 1050.0, 450.0),
            SQRT_V2 => metrics(700.0, 1350.0, 750.0),
            SQRT_TOP | SQRT_BOT => metrics(700.0, 700.0, 0.0),
            SQRT_EXT => metrics(700.0, 600.0, 0.0),
            HAT_V1 => GlyphMetrics {
                advance: 700.0,
                ascent: 550.0,
                descent: -450.0,
                accent_attachment: Some(350.0),
                ..Default::default()
            },
            HAT_V2 => GlyphMetrics {
                advance: 1100.0,
                ascent: 550.0,
                descent: -450.0,
                accent_attachment: Some(550.0),
                ..Default::default()
            },
            ARROW_V1 => metrics(1600.0, 500.0, 0.0),
            INT_V1 => metrics(900.0, 950.0, 450.0),
            INT_TOP | INT_BOT => metrics(900.0, 700.0, 0.0),
            INT_EXT => metrics(900.0, 600.0, 0.0),
            _ => match char::from_u32(glyph as u32) {
                Some(c) if c.is_ascii_digit() => metrics(500.0, 600.0, 0.0),
                Some(c) if c.is_ascii_alphabetic() => metrics(500.0, 450.0, 0.0),
                Some('+' | '-' | '=' | '*' | '−') => metrics(600.0, 500.0, 0.0),
                Some(',' | '.') => metrics(300.0, 100.0, 100.0),
                Some('(' | ')' | '[' | ']') => metrics(400.0, 750.0, 250.0),
                Some('{' | '}' | '|') => metrics(450.0, 750.0, 250.0),
                Some('√') => metrics(700.0, 750.0, 250.0),
                // The hat's ink sits entirely above the baseline, giving a
                // negative descent.
                Some('\u{302}') => GlyphMetrics {
                    advance: 400.0,
                    ascent: 550.0,
                    descent: -450.0,
                    accent_attachment: Some(200.0),
                    ..Default::default()
                },
                Some('→') => metrics(800.0, 500.0, 0.0),
                Some('∑' | '∫') => metrics(900.0, 750.0, 250.0),
                _ => metrics(500.0, 600.0, 200.0),
            },
        }
    }

    fn constants(&self) -> &MathConstants {
        &self.constants
    }

    fn variants(&self, glyph: GlyphId, axis: Axis) -> Vec<GlyphVariant> {
        let v = |glyph, advance| GlyphVariant { glyph, advance };
        match (char::from_u32(glyph as u32), axis) {
            (Some('(' | ')'), Axis::Y) => {
                vec![v(PAREN_V1, 1400.0), v(PAREN_V2, 2000.0)]
            }
            (Some('{' | '}'), Axis::Y) => {
                vec![v(BRACE_V1, 1400.0), v(BRACE_V2, 2000.0)]
            }
            (Some('√'), Axis::Y) => vec![v(SQRT_V1, 1500.0), v(SQRT_V2, 2100.0)],
            (Some('∫'), Axis::Y) => vec![v(INT_V1, 1400.0)],
            (Some('\u{302}'), Axis::X) => {
                vec![v(HAT_V1, 700.0), v(HAT_V2, 1100.0)]
            }
            (Some('→'), Axis::X) => vec![v(ARROW_V1, 1600.0)],
            _ => Vec::new(),
        }
    }

    fn assembly(&self, glyph: GlyphId, axis: Axis) -> Option<GlyphAssembly> {
        let part = |glyph, start, end, extender| AssemblyPart {
            glyph,
            start_connector: start,
            end_connector: end,
            full_advance: if extender { 600.0 } else { 700.0 },
            extender,
        };
        match (char::from_u32(glyph as u32), axis) {
            (Some('(' | ')'), Axis::Y) => Some(GlyphAssembly {
                parts: vec![
                    part(PAREN_BOT, 0.0, 200.0, false),
                    part(PAREN_EXT, 200.0, 200.0, true),
                    part(PAREN_TOP, 200.0, 0.0, false),
                ],
                italics_correction: 0.0,
            }),
            (Some('√'), Axis::Y) => Some(GlyphAssembly {
                parts: vec![
                    part(SQRT_BOT, 0.0, 200.0, false),
                    part(SQRT_EXT, 200.0, 200.0, true),
                    part(SQRT_TOP, 200.0, 0.0, false),
                ],
                italics_correction: 0.0,
            }),
            // The slanted integral keeps an italic correction even when
            // assembled.
            (Some('∫'), Axis::Y) => Some(GlyphAssembly {
                parts: vec![
                    part(INT_BOT, 0.0, 200.0, false),
                    part(INT_EXT, 200.0, 200.0, true),
                    part(INT_TOP, 200.0, 0.0, false),
                ],
                italics_correction: 300.0,
            }),
            _ => None,
        }
    }

    fn min_connector_overlap(&self) -> f64 {
        100.0
    }

    fn kern_at_height(&self, _glyph: GlyphId, _corner: Corner, _height: f64) -> f64 {
        0.0
    }
}

#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
