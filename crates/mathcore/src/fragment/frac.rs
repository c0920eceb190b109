//! Fraction and binomial layout.

use crate::fragment::{MathFragment, RuleFragment};
use crate::geom::{Em, Point};
use crate::list::MathListFragment;
use crate::nav::{MathIndex, RayshootResult, VerticalDirection};
use crate::stretch::{layout_delimiters, DelimiterPair};
use crate::style::{MathContext, MathStyle};
use crate::surface::RenderSurface;

const DELIMITER_SHORTFALL: Em = Em::new(0.1);
const FRACTION_SPACING: Em = Em::new(0.1);
const MIN_RULE_WIDTH: Em = Em::new(0.3);

/// The flavor of a stacked pair: a ruled fraction, a binomial, or any
/// other combination of rule and surrounding delimiters.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FracKind {
    pub rule: bool,
    pub delimiters: DelimiterPair,
}

impl FracKind {
    pub const FRACTION: Self = Self { rule: true, delimiters: DelimiterPair::NONE };
    pub const BINOMIAL: Self = Self { rule: false, delimiters: DelimiterPair::PAREN };
}

/// A numerator stacked over a denominator, centered on the math axis.
#[derive(Debug, Clone)]
pub struct FracFragment {
    pub kind: FracKind,
    numerator: MathListFragment,
    denominator: MathListFragment,
    pub(crate) origin: Point,
    width: f64,
    ascent: f64,
    descent: f64,
    /// Left end of the rule's center line, also the axis line for
    /// hit-testing when no rule is drawn.
    rule_pos: Point,
    rule_width: f64,
    decor: Vec<MathFragment>,
}

impl FracFragment {
    /// Wraps the children; the fragment is unusable until
    /// [`fix_layout`](Self::fix_layout) runs.
    pub fn new(
        kind: FracKind,
        numerator: MathListFragment,
        denominator: MathListFragment,
    ) -> Self {
        Self {
            kind,
            numerator,
            denominator,
            origin: Point::zero(),
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
            rule_pos: Point::zero(),
            rule_width: 0.0,
            decor: Vec::new(),
        }
    }

    pub fn numerator(&self) -> &MathListFragment {
        &self.numerator
    }

    pub fn numerator_mut(&mut self) -> &mut MathListFragment {
        &mut self.numerator
    }

    pub fn denominator(&self) -> &MathListFragment {
        &self.denominator
    }

    pub fn denominator_mut(&mut self) -> &mut MathListFragment {
        &mut self.denominator
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
        let axis = font.to_points(constants.axis_height);
        let thickness = if self.kind.rule {
            font.to_points(constants.fraction_rule_thickness)
        } else {
            0.0
        };
        let (shift_up, shift_down, num_gap_min, denom_gap_min) = if display {
            (
                constants.fraction_numerator_display_style_shift_up,
                constants.fraction_denominator_display_style_shift_down,
                constants.fraction_num_display_style_gap_min,
                constants.fraction_denom_display_style_gap_min,
            )
        } else {
            (
                constants.fraction_numerator_shift_up,
                constants.fraction_denominator_shift_down,
                constants.fraction_numerator_gap_min,
                constants.fraction_denominator_gap_min,
            )
        };
        let shift_up = font.to_points(shift_up);
        let shift_down = font.to_points(shift_down);
        let num_gap_min = font.to_points(num_gap_min);
        let denom_gap_min = font.to_points(denom_gap_min);

        let num_gap = (shift_up - (axis + thickness / 2.0) - self.numerator.descent())
            .max(num_gap_min);
        let denom_gap = (shift_down + (axis - thickness / 2.0)
            - self.denominator.ascent())
        .max(denom_gap_min);

        let spacing = font.em(FRACTION_SPACING);
        let rule_width = self
            .numerator
            .width()
            .max(self.denominator.width())
            .max(font.em(MIN_RULE_WIDTH));
        let inner_width = rule_width + 2.0 * spacing;
        let ascent =
            self.numerator.height() + num_gap + thickness / 2.0 + axis;
        let descent = self.denominator.height() + denom_gap + thickness / 2.0 - axis;

        // Delimiters stretch symmetrically about the axis.
        let target = 2.0 * (ascent - axis).max(descent + axis);
        let (left, right) =
            layout_delimiters(self.kind.delimiters, target, DELIMITER_SHORTFALL, ctx);

        let left_width = left.as_ref().map_or(0.0, |f| f.width());
        let right_width = right.as_ref().map_or(0.0, |f| f.width());

        self.numerator.origin = Point::new(
            left_width + spacing + (rule_width - self.numerator.width()) / 2.0,
            -(axis + thickness / 2.0 + num_gap + self.numerator.descent()),
        );
        self.denominator.origin = Point::new(
            left_width + spacing + (rule_width - self.denominator.width()) / 2.0,
            -axis + thickness / 2.0 + denom_gap + self.denominator.ascent(),
        );
        self.rule_pos = Point::new(left_width + spacing, -axis);
        self.rule_width = rule_width;

        self.decor.clear();
        if let Some(mut left) = left {
            left.set_origin(Point::zero());
            self.decor.push(left);
        }
        if self.kind.rule {
            let mut rule = MathFragment::Rule(RuleFragment::new(rule_width, thickness));
            rule.set_origin(self.rule_pos);
            self.decor.push(rule);
        }
        if let Some(mut right) = right {
            right.set_origin(Point::new(left_width + inner_width, 0.0));
            self.decor.push(right);
        }

        self.width = left_width + inner_width + right_width;
        let mut ascent = ascent;
        let mut descent = descent;
        for frag in &self.decor {
            ascent = ascent.max(-frag.min_y());
            descent = descent.max(frag.max_y());
        }
        self.ascent = ascent;
        self.descent = descent;
    }

    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        for frag in &self.decor {
            frag.draw(pos + frag.origin(), surface);
        }
        self.numerator.draw(pos + self.numerator.origin, surface);
        self.denominator.draw(pos + self.denominator.origin, surface);
    }

    /// The child under a point, split by the rule line.
    pub fn get_math_index(&self, point: Point) -> Option<MathIndex> {
        let lo = self.rule_pos.x / 2.0;
        let hi = (self.rule_pos.x + self.rule_width + self.width) / 2.0;
        if point.x < lo || point.x > hi {
            return None;
        }
        if point.y < self.rule_pos.y {
            Some(MathIndex::Num)
        } else {
            Some(MathIndex::Denom)
        }
    }

    pub fn rayshoot(
        &self,
        point: Point,
        component: MathIndex,
        direction: VerticalDirection,
    ) -> Option<RayshootResult> {
        use VerticalDirection::*;
        match (component, direction) {
            (MathIndex::Num, Up) => {
                Some(RayshootResult::new(point.with_y(-self.ascent), false))
            }
            (MathIndex::Num, Down) => {
                let y = if self.denominator.is_empty() {
                    self.rule_pos.y + 0.1
                } else {
                    self.denominator.origin.y - self.denominator.ascent()
                };
                Some(RayshootResult::new(point.with_y(y), true))
            }
            (MathIndex::Denom, Up) => {
                let y = if self.numerator.is_empty() {
                    self.rule_pos.y - 0.1
                } else {
                    self.numerator.origin.y + self.numerator.descent()
                };
                Some(RayshootResult::new(point.with_y(y), true))
            }
            (MathIndex::Denom, Down) => {
                Some(RayshootResult::new(point.with_y(self.descent), false))
            }
            _ => None,
        }
    }
}
