//! Leaf fragments: single glyphs, rules, and embedded text runs.

use ecow::EcoString;
use log::warn;

use crate::class::{default_math_class, Limits, MathClass};
use crate::font::{GlyphId, ScaledFont};
use crate::fragment::MathFragment;
use crate::geom::{Axis, Color, Corner, Point};
use crate::style::MathContext;
use crate::surface::RenderSurface;

/// A single font glyph for one Unicode scalar at one font size.
///
/// Metrics come verbatim from the font; the width additionally folds in the
/// italic correction for non-extended shapes, so that adjacent fragments
/// clear slanted ink.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphFragment {
    pub glyph: GlyphId,
    pub ch: char,
    pub(crate) origin: Point,
    /// The font size the glyph was measured at.
    pub size: f64,
    width: f64,
    ascent: f64,
    descent: f64,
    italics_correction: f64,
    accent_attachment: f64,
    pub class: MathClass,
    pub limits: Limits,
    pub is_extended_shape: bool,
}

impl GlyphFragment {
    /// Shapes a character, if the font covers it.
    pub fn try_new(c: char, ctx: &MathContext) -> Option<Self> {
        let font = ctx.font();
        let glyph = font.font.glyph_index(c)?;
        Some(Self::with_glyph(c, glyph, &font))
    }

    /// Shapes a character, falling back to the notdef glyph when the font
    /// has no mapping. Layout never aborts over a missing glyph.
    pub fn new(c: char, ctx: &MathContext) -> Self {
        Self::try_new(c, ctx).unwrap_or_else(|| {
            warn!("no glyph for {c:?}, falling back to notdef");
            Self::with_glyph(c, 0, &ctx.font())
        })
    }

    /// Builds the fragment for a known glyph id.
    pub(crate) fn with_glyph(c: char, glyph: GlyphId, font: &ScaledFont) -> Self {
        let metrics = font.glyph_metrics(glyph);
        let accent_attachment = metrics
            .accent_attachment
            .unwrap_or((metrics.advance + metrics.italics_correction) / 2.0);
        let width = if metrics.is_extended_shape {
            metrics.advance
        } else {
            metrics.advance + metrics.italics_correction
        };

        Self {
            glyph,
            ch: c,
            origin: Point::zero(),
            size: font.size,
            width,
            ascent: metrics.ascent,
            descent: metrics.descent,
            italics_correction: metrics.italics_correction,
            accent_attachment,
            class: default_math_class(c),
            limits: Limits::for_char(c),
            is_extended_shape: metrics.is_extended_shape,
        }
    }

    /// The same glyph with an overridden math class.
    pub fn with_class(mut self, class: MathClass) -> Self {
        self.class = class;
        self
    }

    /// The same glyph with an overridden limits policy.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Stretches the glyph to the target extent along the given axis.
    pub fn stretch(
        self,
        axis: Axis,
        target: f64,
        shortfall: f64,
        ctx: &MathContext,
    ) -> MathFragment {
        crate::stretch::stretch_glyph(self, axis, target, shortfall, ctx)
    }

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

    pub fn class(&self) -> MathClass {
        self.class
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Only fences are surrounded by explicit spaces.
    pub fn is_spaced(&self) -> bool {
        self.class == MathClass::Fence
    }

    /// A glyph is text-like unless it is a large operator.
    pub fn is_text_like(&self) -> bool {
        self.class != MathClass::Large
    }

    pub fn layout_length(&self) -> usize {
        1
    }

    /// The kern adjustment at the given corner and correction height.
    pub fn kern_at_height(&self, ctx: &MathContext, corner: Corner, height: f64) -> f64 {
        let font = ScaledFont { font: ctx.font().font, size: self.size };
        font.kern_at_height(self.glyph, corner, height)
    }

    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        surface.draw_glyph(self.glyph, self.size, pos);
    }
}

/// A filled rectangle, vertically centered on its position.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFragment {
    pub(crate) origin: Point,
    width: f64,
    thickness: f64,
    /// Overrides the ambient ink color, used for missing-glyph placeholders.
    color: Option<Color>,
}

impl RuleFragment {
    pub fn new(width: f64, thickness: f64) -> Self {
        Self { origin: Point::zero(), width, thickness, color: None }
    }

    /// A placeholder rule standing in for a glyph the font lacks.
    pub fn placeholder(width: f64, thickness: f64) -> Self {
        Self { origin: Point::zero(), width, thickness, color: Some(Color::RED) }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn ascent(&self) -> f64 {
        self.thickness / 2.0
    }

    pub fn descent(&self) -> f64 {
        self.thickness / 2.0
    }

    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        if let Some(color) = self.color {
            surface.set_color(color);
        }
        surface.draw_rule(pos, self.width, self.thickness);
    }
}

/// A plain laid-out text run embedded in math as a single fragment.
///
/// Used for text-mode material and for named operators like "lim". The run
/// is measured through the math font's advances; shaping of rich non-math
/// text is the host's business.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: EcoString,
    pub(crate) origin: Point,
    size: f64,
    width: f64,
    ascent: f64,
    descent: f64,
    glyphs: Vec<(GlyphId, f64)>,
    pub class: MathClass,
    pub limits: Limits,
    layout_length: usize,
}

impl TextFragment {
    /// An embedded text-mode run. It consumes one host content unit per
    /// character.
    pub fn text_mode(text: &str, ctx: &MathContext) -> Self {
        let layout_length = text.chars().count();
        Self::measure(text, MathClass::Normal, Limits::Never, layout_length, ctx)
    }

    /// A named operator, upright and of class Large.
    pub fn operator(name: &str, limits: Limits, ctx: &MathContext) -> Self {
        Self::measure(name, MathClass::Large, limits, 1, ctx)
    }

    fn measure(
        text: &str,
        class: MathClass,
        limits: Limits,
        layout_length: usize,
        ctx: &MathContext,
    ) -> Self {
        let font = ctx.font();
        let mut glyphs = Vec::new();
        let mut x = 0.0;
        let mut ascent: f64 = 0.0;
        let mut descent: f64 = 0.0;
        for c in text.chars() {
            let glyph = font.font.glyph_index(c).unwrap_or_else(|| {
                warn!("no glyph for {c:?} in text run, falling back to notdef");
                0
            });
            let metrics = font.glyph_metrics(glyph);
            glyphs.push((glyph, x));
            x += metrics.advance;
            ascent = ascent.max(metrics.ascent);
            descent = descent.max(metrics.descent);
        }

        Self {
            text: text.into(),
            origin: Point::zero(),
            size: font.size,
            width: x,
            ascent,
            descent,
            glyphs,
            class,
            limits,
            layout_length,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }

    pub fn layout_length(&self) -> usize {
        self.layout_length
    }

    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        for &(glyph, dx) in &self.glyphs {
            surface.draw_glyph(glyph, self.size, Point::new(pos.x + dx, pos.y));
        }
    }
}
