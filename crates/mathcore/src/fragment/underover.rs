//! Lines, spreaders, and extensible arrows over or under a nucleus.

use crate::class::{Limits, MathClass};
use crate::fragment::{GlyphFragment, MathFragment, RuleFragment};
use crate::geom::{Axis, Em, Point};
use crate::list::MathListFragment;
use crate::nav::{MathIndex, RayshootResult, VerticalDirection};
use crate::style::MathContext;
use crate::surface::RenderSurface;

const SPREADER_GAP: Em = Em::new(0.1);
const SPREADER_SHORTFALL: Em = Em::new(0.25);
const XARROW_EXTENDER: Em = Em::new(0.5);

/// What is spread over or under the nucleus.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnderOverKind {
    /// A rule above, using the font's overbar constants.
    Overline,
    /// A rule below, using the font's underbar constants.
    Underline,
    /// A character stretched over the nucleus, like an over-brace.
    Overspreader(char),
    /// A character stretched under the nucleus.
    Underspreader(char),
    /// An extensible arrow carrying the nucleus as its upper limit.
    Xarrow(char),
}

/// A nucleus decorated above or below along its whole width.
#[derive(Debug, Clone)]
pub struct UnderOverFragment {
    pub kind: UnderOverKind,
    nucleus: MathListFragment,
    decor: Option<MathFragment>,
    pub(crate) origin: Point,
    width: f64,
    ascent: f64,
    descent: f64,
}

impl UnderOverFragment {
    pub fn new(kind: UnderOverKind, nucleus: MathListFragment) -> Self {
        Self {
            kind,
            nucleus,
            decor: None,
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

    pub fn class(&self) -> MathClass {
        match self.kind {
            UnderOverKind::Xarrow(_) => MathClass::Relation,
            _ => self.nucleus.class(),
        }
    }

    pub fn limits(&self) -> Limits {
        Limits::Always
    }

    pub fn fix_layout(&mut self, ctx: &MathContext) {
        match self.kind {
            UnderOverKind::Overline => self.fix_line(true, ctx),
            UnderOverKind::Underline => self.fix_line(false, ctx),
            UnderOverKind::Overspreader(c) => self.fix_spreader(true, c, ctx),
            UnderOverKind::Underspreader(c) => self.fix_spreader(false, c, ctx),
            UnderOverKind::Xarrow(c) => self.fix_xarrow(c, ctx),
        }
    }

    fn fix_line(&mut self, over: bool, ctx: &MathContext) {
        let font = ctx.font();
        let constants = ctx.constants();

        let (line_pos, line_adjust, thickness, extra) = if over {
            let sep = font.to_points(constants.overbar_extra_ascender);
            let thickness = font.to_points(constants.overbar_rule_thickness);
            let gap = font.to_points(constants.overbar_vertical_gap);
            let line_y = -(self.nucleus.ascent() + gap + thickness / 2.0);
            (Point::new(0.0, line_y), 0.0, thickness, sep + thickness + gap)
        } else {
            let sep = font.to_points(constants.underbar_extra_descender);
            let thickness = font.to_points(constants.underbar_rule_thickness);
            let gap = font.to_points(constants.underbar_vertical_gap);
            let line_y = self.nucleus.descent() + gap + thickness / 2.0;
            // The slanted right edge pulls the underline back in.
            let adjust = -self.nucleus.italics_correction();
            (Point::new(0.0, line_y), adjust, thickness, sep + thickness + gap)
        };

        let width = self.nucleus.width();
        let mut rule =
            MathFragment::Rule(RuleFragment::new(width + line_adjust, thickness));
        rule.set_origin(line_pos);
        self.decor = Some(rule);
        self.nucleus.origin = Point::zero();

        self.width = width;
        if over {
            self.ascent = self.nucleus.ascent() + extra;
            self.descent = self.nucleus.descent();
        } else {
            self.ascent = self.nucleus.ascent();
            self.descent = self.nucleus.descent() + extra;
        }
    }

    fn fix_spreader(&mut self, over: bool, c: char, ctx: &MathContext) {
        let font = ctx.font();
        let gap = font.em(SPREADER_GAP);
        let shortfall = font.em(SPREADER_SHORTFALL);

        let attach = match GlyphFragment::try_new(c, ctx) {
            Some(glyph) => glyph.stretch(Axis::X, self.nucleus.width(), shortfall, ctx),
            None => MathFragment::Rule(RuleFragment::placeholder(
                self.nucleus.width(),
                2.0,
            )),
        };

        let attach_y = if over {
            -(self.nucleus.ascent() + gap + attach.descent())
        } else {
            self.nucleus.descent() + gap + attach.ascent()
        };
        if over {
            self.ascent = self.nucleus.ascent() + gap + attach.height();
            self.descent = self.nucleus.descent();
        } else {
            self.ascent = self.nucleus.ascent();
            self.descent = self.nucleus.descent() + gap + attach.height();
        }

        let total_width = attach.width().max(self.nucleus.width());
        let mut attach = attach;
        attach.set_origin(Point::new((total_width - attach.width()) / 2.0, attach_y));
        self.decor = Some(attach);
        self.nucleus.origin =
            Point::new((total_width - self.nucleus.width()) / 2.0, 0.0);
        self.width = total_width;
    }

    fn fix_xarrow(&mut self, c: char, ctx: &MathContext) {
        let font = ctx.font();
        let constants = ctx.constants();
        let extender = font.em(XARROW_EXTENDER);

        // The nucleus rides on the arrow as an upper limit.
        let base = match GlyphFragment::try_new(c, ctx) {
            Some(glyph) => {
                glyph.stretch(Axis::X, self.nucleus.width() + extender, 0.0, ctx)
            }
            None => MathFragment::Rule(RuleFragment::placeholder(
                self.nucleus.width(),
                2.0,
            )),
        };

        let gap_min = font.to_points(constants.upper_limit_gap_min);
        let rise_min = font.to_points(constants.upper_limit_baseline_rise_min);
        let t_shift =
            base.ascent() + rise_min.max(gap_min + self.nucleus.descent());

        self.ascent = t_shift + self.nucleus.ascent();
        self.descent = base.descent();

        let total_width = base.width().max(self.nucleus.width());
        self.nucleus.origin =
            Point::new((total_width - self.nucleus.width()) / 2.0, -t_shift);
        let mut base = base;
        base.set_origin(Point::new((total_width - base.width()) / 2.0, 0.0));
        self.decor = Some(base);
        self.width = total_width;
    }

    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        if let Some(decor) = &self.decor {
            decor.draw(pos + decor.origin(), surface);
        }
        self.nucleus.draw(pos + self.nucleus.origin, surface);
    }

    pub fn get_math_index(&self, point: Point) -> Option<MathIndex> {
        match self.kind {
            UnderOverKind::Xarrow(_) => {
                let min_x = self.nucleus.min_x() / 2.0;
                let max_x = (self.width + self.nucleus.max_x()) / 2.0;
                (point.x >= min_x && point.x <= max_x).then_some(MathIndex::Nucleus)
            }
            _ => Some(MathIndex::Nucleus),
        }
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
