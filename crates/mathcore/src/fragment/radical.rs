//! Radical layout: surd, overline, radicand, and optional degree.

use crate::fragment::{GlyphFragment, MathFragment, RuleFragment};
use crate::geom::{Axis, Point};
use crate::list::MathListFragment;
use crate::nav::{MathIndex, RayshootResult, VerticalDirection};
use crate::style::{MathContext, MathStyle};
use crate::surface::RenderSurface;

/// A radicand under a stretched surd, with an optional degree.
#[derive(Debug, Clone)]
pub struct RadicalFragment {
    radicand: MathListFragment,
    degree: Option<MathListFragment>,
    decor: Vec<MathFragment>,
    pub(crate) origin: Point,
    width: f64,
    ascent: f64,
    descent: f64,
}

impl RadicalFragment {
    pub fn new(radicand: MathListFragment, degree: Option<MathListFragment>) -> Self {
        Self {
            radicand,
            degree,
            decor: Vec::new(),
            origin: Point::zero(),
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
        }
    }

    pub fn radicand(&self) -> &MathListFragment {
        &self.radicand
    }

    pub fn radicand_mut(&mut self) -> &mut MathListFragment {
        &mut self.radicand
    }

    pub fn degree(&self) -> Option<&MathListFragment> {
        self.degree.as_ref()
    }

    pub fn degree_mut(&mut self) -> Option<&mut MathListFragment> {
        self.degree.as_mut()
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

    pub fn fix_layout(&mut self, ctx: &MathContext) {
        let font = ctx.font();
        let constants = ctx.constants();
        let display = ctx.style == MathStyle::Display;

        let gap = font.to_points(if display {
            constants.radical_display_style_vertical_gap
        } else {
            constants.radical_vertical_gap
        });
        let thickness = font.to_points(constants.radical_rule_thickness);
        let extra_ascender = font.to_points(constants.radical_extra_ascender);
        let kern_before = font.to_points(constants.radical_kern_before_degree);
        let kern_after = font.to_points(constants.radical_kern_after_degree);
        let raise_factor = constants.radical_degree_bottom_raise_percent / 100.0;

        let target = self.radicand.height() + thickness + gap;
        let surd = match GlyphFragment::try_new('√', ctx) {
            Some(glyph) => glyph.stretch(Axis::Y, target, 0.0, ctx),
            None => MathFragment::Rule(RuleFragment::new(1.0, target)),
        };

        // Keep the prescribed gap and split any leftover space from an
        // oversized surd evenly above and below the radicand.
        let new_gap =
            gap.max((surd.height() - thickness - self.radicand.height() + gap) / 2.0);

        let surd_ascent = self.radicand.ascent() + new_gap + thickness;
        let total_descent = surd.height() - surd_ascent;
        let inner_ascent = surd_ascent + extra_ascender;

        let mut surd_offset = 0.0;
        let mut shift_up = 0.0;
        let mut total_ascent = inner_ascent;

        if let Some(degree) = &self.degree {
            surd_offset = kern_before + degree.width() + kern_after;
            // Raised from the radical's bottom by the font's percentage,
            // plus the degree's descent so descenders clear the surd.
            shift_up =
                raise_factor * (inner_ascent - total_descent) + degree.descent();
            total_ascent = total_ascent.max(shift_up + degree.ascent());
        }

        let surd_x = surd_offset.max(0.0);
        let surd_y = -(surd_ascent - surd.ascent());
        let radicand_x = surd_x + surd.width();
        self.width = radicand_x + self.radicand.width();
        self.ascent = total_ascent;
        self.descent = total_descent;

        if let Some(degree) = &mut self.degree {
            degree.origin =
                Point::new(-surd_offset.min(0.0) + kern_before, -shift_up);
        }
        self.radicand.origin = Point::new(radicand_x, 0.0);

        self.decor.clear();
        let mut surd = surd;
        surd.set_origin(Point::new(surd_x, surd_y));
        self.decor.push(surd);
        let mut line =
            MathFragment::Rule(RuleFragment::new(self.radicand.width(), thickness));
        line.set_origin(Point::new(
            radicand_x,
            -self.radicand.ascent() - new_gap - thickness / 2.0,
        ));
        self.decor.push(line);
    }

    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        if let Some(degree) = &self.degree {
            degree.draw(pos + degree.origin, surface);
        }
        for frag in &self.decor {
            frag.draw(pos + frag.origin(), surface);
        }
        self.radicand.draw(pos + self.radicand.origin, surface);
    }

    pub fn get_math_index(&self, point: Point) -> Option<MathIndex> {
        match &self.degree {
            Some(degree) => {
                let mid_x = (degree.max_x() + self.radicand.min_x()) / 2.0;
                if point.x >= mid_x {
                    Some(MathIndex::Radicand)
                } else {
                    Some(MathIndex::Index)
                }
            }
            None => {
                let mid_x = self.radicand.min_x() / 2.0;
                (point.x >= mid_x).then_some(MathIndex::Radicand)
            }
        }
    }

    pub fn rayshoot(
        &self,
        point: Point,
        _component: MathIndex,
        direction: VerticalDirection,
    ) -> Option<RayshootResult> {
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
