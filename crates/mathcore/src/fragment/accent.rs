//! Accents above or below a nucleus.

use crate::class::MathClass;
use crate::fragment::{GlyphFragment, MathFragment, RuleFragment};
use crate::geom::{Axis, Em, Point};
use crate::list::MathListFragment;
use crate::nav::{MathIndex, RayshootResult, VerticalDirection};
use crate::style::MathContext;
use crate::surface::RenderSurface;

/// How much a wide accent may be shorter than its base.
const ACCENT_SHORTFALL: Em = Em::new(0.5);

/// Where an accent sits and whether it stretches to the base's width.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AccentKind {
    Top,
    TopWide,
    Bottom,
    BottomWide,
}

impl AccentKind {
    fn is_top(self) -> bool {
        matches!(self, Self::Top | Self::TopWide)
    }

    fn is_wide(self) -> bool {
        matches!(self, Self::TopWide | Self::BottomWide)
    }
}

/// A nucleus with an accent character above or below it.
///
/// The fragment is spacing-transparent: class, italic correction, and
/// attachment point all come from the nucleus.
#[derive(Debug, Clone)]
pub struct AccentFragment {
    pub kind: AccentKind,
    /// The accent character.
    pub accent: char,
    nucleus: MathListFragment,
    glyph: Option<MathFragment>,
    pub(crate) origin: Point,
    width: f64,
    ascent: f64,
    descent: f64,
}

impl AccentFragment {
    pub fn new(kind: AccentKind, accent: char, nucleus: MathListFragment) -> Self {
        Self {
            kind,
            accent,
            nucleus,
            glyph: None,
            origin: Point::zero(),
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
        }
    }

    pub fn nucleus(&self) -> &MathListFragment {
        &self.nucleus
    }

    pub fn nucleus_mut(&mut self) -> &mut MathListFragment {
        &mut self.nucleus
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
        self.nucleus.italics_correction()
    }

    pub fn accent_attachment(&self) -> f64 {
        self.nucleus.accent_attachment()
    }

    pub fn class(&self) -> MathClass {
        self.nucleus.class()
    }

    pub fn is_text_like(&self) -> bool {
        self.nucleus.is_text_like()
    }

    pub fn fix_layout(&mut self, ctx: &MathContext) {
        let font = ctx.font();
        let accent = self.accent_glyph(ctx);
        let accent_base_height = font.to_points(ctx.constants().accent_base_height);

        let (pos, ascent, descent) = if self.kind.is_top() {
            let x = self.nucleus.accent_attachment() - accent.accent_attachment();
            // Small bases keep the accent at the accent base height instead
            // of dropping it onto the ink.
            let gap = (self.nucleus.ascent() - accent_base_height).max(0.0);
            (
                Point::new(x, -gap),
                self.nucleus.ascent().max(accent.ascent() + gap),
                self.nucleus.descent(),
            )
        } else {
            let x = self.nucleus.width() / 2.0 - accent.accent_attachment();
            let gap = self.nucleus.descent().max(0.0);
            (
                Point::new(x, gap),
                self.nucleus.ascent(),
                self.nucleus.descent().max(accent.descent() + gap),
            )
        };

        let mut accent = accent;
        accent.set_origin(pos);
        self.glyph = Some(accent);
        self.nucleus.origin = Point::zero();
        self.width = self.nucleus.width();
        self.ascent = ascent;
        self.descent = descent;
    }

    fn accent_glyph(&self, ctx: &MathContext) -> MathFragment {
        let font = ctx.font();
        let Some(glyph) = GlyphFragment::try_new(self.accent, ctx) else {
            return MathFragment::Rule(RuleFragment::placeholder(font.size, 1.0));
        };
        if self.kind.is_wide() {
            let shortfall = font.em(ACCENT_SHORTFALL);
            glyph.stretch(Axis::X, self.nucleus.width(), shortfall, ctx)
        } else {
            MathFragment::Glyph(glyph)
        }
    }

    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        if let Some(glyph) = &self.glyph {
            glyph.draw(pos + glyph.origin(), surface);
        }
        self.nucleus.draw(pos + self.nucleus.origin, surface);
    }

    pub fn get_math_index(&self, _point: Point) -> Option<MathIndex> {
        Some(MathIndex::Nucleus)
    }

    pub fn rayshoot(
        &self,
        point: Point,
        component: MathIndex,
        direction: VerticalDirection,
    ) -> Option<RayshootResult> {
        debug_assert_eq!(component, MathIndex::Nucleus);
        match direction {
            VerticalDirection::Up => {
                Some(RayshootResult::new(point.with_y(-self.ascent), false))
            }
            VerticalDirection::Down => {
                Some(RayshootResult::new(point.with_y(self.descent), false))
            }
        }
    }
}
