//! Glyph stretching via pre-sized variants and part assemblies.

use std::cell::RefCell;

use log::warn;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::class::{Limits, MathClass};
use crate::font::{AssemblyPart, GlyphId, ScaledFont};
use crate::fragment::{GlyphFragment, MathFragment};
use crate::geom::{Axis, Em, Point};
use crate::style::MathContext;
use crate::surface::RenderSurface;

/// An open/close delimiter pair, either side optional.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DelimiterPair {
    pub open: Option<char>,
    pub close: Option<char>,
}

impl DelimiterPair {
    pub const NONE: Self = Self { open: None, close: None };
    pub const PAREN: Self = Self { open: Some('('), close: Some(')') };
    pub const BRACKET: Self = Self { open: Some('['), close: Some(']') };
    pub const BRACE: Self = Self { open: Some('{'), close: Some('}') };
    pub const VERT: Self = Self { open: Some('|'), close: Some('|') };
}

/// A stretched glyph built from several positioned part glyphs, or a single
/// oversized variant that needed metric overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantFragment {
    /// The character the variant stands for.
    pub ch: char,
    pub(crate) origin: Point,
    pub size: f64,
    /// The part glyphs with their offsets from the fragment origin.
    glyphs: SmallVec<[(GlyphId, Point); 4]>,
    width: f64,
    ascent: f64,
    descent: f64,
    italics_correction: f64,
    accent_attachment: f64,
    pub class: MathClass,
    pub limits: Limits,
}

impl VariantFragment {
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }

    pub fn italics_correction(&self) -> f64 {
        self.italics_correction
    }

    pub fn accent_attachment(&self) -> f64 {
        self.accent_attachment
    }

    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        for &(glyph, offset) in &self.glyphs {
            surface.draw_glyph(glyph, self.size, pos + offset);
        }
    }
}

/// Memoizes stretched fragments across a layout pass.
///
/// Stretching the same delimiter to the same target is common when editing
/// reflows a formula repeatedly. The key quantizes the point lengths so
/// float noise below a 64th of a point still hits.
#[derive(Debug, Default)]
pub struct StretchCache {
    map: RefCell<FxHashMap<StretchKey, MathFragment>>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct StretchKey {
    glyph: GlyphId,
    axis: Axis,
    size: i64,
    target: i64,
    shortfall: i64,
}

impl StretchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.map.borrow_mut().clear();
    }

    fn get_or_insert(
        &self,
        key: StretchKey,
        compute: impl FnOnce() -> MathFragment,
    ) -> MathFragment {
        if let Some(hit) = self.map.borrow().get(&key) {
            return hit.clone();
        }
        let fragment = compute();
        self.map.borrow_mut().insert(key, fragment.clone());
        fragment
    }
}

fn quantize(points: f64) -> i64 {
    (points * 64.0).round() as i64
}

/// Stretches a glyph until its extent along `axis` reaches at least
/// `target - shortfall`.
///
/// Tries, in order: the base glyph itself, the font's pre-sized variants
/// from smallest to largest, and the part assembly. A font that cannot
/// reach the target yields its largest variant rather than an error.
pub fn stretch_glyph(
    base: GlyphFragment,
    axis: Axis,
    target: f64,
    shortfall: f64,
    ctx: &MathContext,
) -> MathFragment {
    let min_advance = target - shortfall;
    let advance = match axis {
        Axis::X => base.width(),
        Axis::Y => base.ascent() + base.descent(),
    };
    if advance >= min_advance {
        return MathFragment::Glyph(base);
    }

    let key = StretchKey {
        glyph: base.glyph,
        axis,
        size: quantize(base.size),
        target: quantize(target),
        shortfall: quantize(shortfall),
    };
    ctx.cache().get_or_insert(key, || stretch_uncached(&base, axis, min_advance, ctx))
}

fn stretch_uncached(
    base: &GlyphFragment,
    axis: Axis,
    min_advance: f64,
    ctx: &MathContext,
) -> MathFragment {
    let font = ctx.font();

    // The smallest pre-sized variant that is large enough wins.
    let mut best = base.glyph;
    for variant in font.font.variants(base.glyph, axis) {
        best = variant.glyph;
        if font.to_points(variant.advance) >= min_advance {
            return MathFragment::Glyph(GlyphFragment::with_glyph(
                base.ch,
                variant.glyph,
                &font,
            )
            .with_class(base.class)
            .with_limits(base.limits));
        }
    }

    let Some(assembly) = font.font.assembly(base.glyph, axis) else {
        // No recipe; the largest variant is the best the font can do.
        return MathFragment::Glyph(
            GlyphFragment::with_glyph(base.ch, best, &font)
                .with_class(base.class)
                .with_limits(base.limits),
        );
    };

    let min_overlap = font.font.min_connector_overlap();
    let (parts, ratio, total) =
        search_assembly(&assembly.parts, min_overlap, min_advance, &font);
    let italics_correction = font.to_points(assembly.italics_correction);
    MathFragment::Variant(from_parts(
        base,
        &parts,
        ratio,
        total,
        italics_correction,
        axis,
        ctx,
    ))
}

/// Advance and growth headroom of an assembly, in design units.
///
/// The advance assumes maximum overlap at every joint; `stretch` is how
/// much the assembly can grow by relaxing all joints to minimum overlap.
fn assembly_extent(parts: &[AssemblyPart], min_overlap: f64) -> (f64, f64) {
    let mut advance = 0.0;
    let mut stretch = 0.0;
    for (i, part) in parts.iter().enumerate() {
        advance += part.full_advance;
        if let Some(next) = parts.get(i + 1) {
            let max_overlap = part.end_connector.min(next.start_connector);
            if max_overlap < min_overlap {
                warn!("assembly connectors are shorter than the minimum overlap");
            }
            advance -= max_overlap;
            stretch += max_overlap - min_overlap;
        }
    }
    (advance, stretch)
}

/// Finds the repetition count and joint ratio reaching the target.
///
/// Extender parts are repeated a growing number of times until the
/// assembly, fully relaxed, covers the target; the ratio then interpolates
/// each joint between maximum and minimum overlap.
fn search_assembly(
    parts: &[AssemblyPart],
    min_overlap: f64,
    min_advance: f64,
    font: &ScaledFont,
) -> (Vec<AssemblyPart>, f64, f64) {
    const MAX_REPEATS: usize = 1024;

    let target = font.to_units(min_advance);
    let mut expanded = Vec::new();
    let mut ratio = 0.0;
    let mut advance = 0.0;

    for repeats in 0..MAX_REPEATS {
        expanded.clear();
        for part in parts {
            let count = if part.extender { repeats } else { 1 };
            expanded.extend(std::iter::repeat(*part).take(count));
        }

        let (tight, stretch) = assembly_extent(&expanded, min_overlap);
        advance = tight;
        if tight >= target {
            ratio = 0.0;
            break;
        }
        if tight + stretch >= target {
            ratio = if stretch > 0.0 { ((target - tight) / stretch).min(1.0) } else { 0.0 };
            advance = tight + ratio * stretch;
            break;
        }
    }

    (expanded, ratio, font.to_points(advance))
}

/// Assembles the positioned part glyphs into a variant fragment.
fn from_parts(
    base: &GlyphFragment,
    parts: &[AssemblyPart],
    ratio: f64,
    total_advance: f64,
    italics_correction: f64,
    axis: Axis,
    ctx: &MathContext,
) -> VariantFragment {
    let font = ctx.font();
    let min_overlap = font.font.min_connector_overlap();

    let mut glyphs = SmallVec::new();
    let mut max_width: f64 = 0.0;
    let mut offsets = Vec::with_capacity(parts.len());
    let mut offset = 0.0;
    for (i, part) in parts.iter().enumerate() {
        let mut advance = part.full_advance;
        if let Some(next) = parts.get(i + 1) {
            let max_overlap = part.end_connector.min(next.start_connector);
            advance -= max_overlap;
            advance += ratio * (max_overlap - min_overlap);
        }
        let metrics = font.glyph_metrics(part.glyph);
        max_width = max_width.max(metrics.advance);
        offsets.push((offset, metrics.descent));
        offset += font.to_points(advance);
    }

    let (width, ascent, descent, accent_attachment) = match axis {
        Axis::X => (total_advance, base.ascent(), base.descent(), total_advance / 2.0),
        Axis::Y => {
            let axis_height = font.to_points(ctx.constants().axis_height);
            let ascent = total_advance / 2.0 + axis_height;
            (max_width, ascent, total_advance - ascent, base.accent_attachment())
        }
    };

    for (part, (offset, part_descent)) in parts.iter().zip(offsets) {
        let pos = match axis {
            Axis::X => Point::new(offset, 0.0),
            // Parts run bottom to top; each sits on its own baseline.
            Axis::Y => Point::new(0.0, descent - offset - part_descent),
        };
        glyphs.push((part.glyph, pos));
    }

    VariantFragment {
        ch: base.ch,
        origin: Point::zero(),
        size: font.size,
        glyphs,
        width,
        ascent,
        descent,
        italics_correction,
        accent_attachment,
        class: base.class,
        limits: base.limits,
    }
}

/// Stretches a delimiter pair to span a vertical target extent.
///
/// Returns the open and close fragments with their origins still at zero;
/// callers position them. Characters the font lacks are skipped with a
/// warning rather than drawn as notdef fences.
pub fn layout_delimiters(
    delimiters: DelimiterPair,
    target: f64,
    shortfall: Em,
    ctx: &MathContext,
) -> (Option<MathFragment>, Option<MathFragment>) {
    let shortfall = ctx.font().em(shortfall);
    let stretch_side = |c: Option<char>| {
        let c = c?;
        let Some(glyph) = GlyphFragment::try_new(c, ctx) else {
            warn!("no glyph for delimiter {c:?}");
            return None;
        };
        Some(glyph.stretch(Axis::Y, target, shortfall, ctx))
    };
    let open = stretch_side(delimiters.open);
    let close = stretch_side(delimiters.close);
    (open, close)
}
