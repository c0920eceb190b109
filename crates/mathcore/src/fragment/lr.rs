//! Auto-sized delimiter groups.

use crate::class::MathClass;
use crate::geom::{Em, Point};
use crate::list::MathListFragment;
use crate::nav::{MathIndex, RayshootResult, VerticalDirection};
use crate::stretch::{layout_delimiters, DelimiterPair};
use crate::style::MathContext;
use crate::surface::RenderSurface;

const DELIMITER_SHORTFALL: Em = Em::new(0.1);

/// A nucleus wrapped in delimiters stretched to its vertical extent.
///
/// The whole group takes class `Special`, the closest stand-in for TeX's
/// Inner atoms.
#[derive(Debug, Clone)]
pub struct LeftRightFragment {
    pub delimiters: DelimiterPair,
    nucleus: MathListFragment,
    decor: Vec<crate::fragment::MathFragment>,
    pub(crate) origin: Point,
    width: f64,
    ascent: f64,
    descent: f64,
}

impl LeftRightFragment {
    pub fn new(delimiters: DelimiterPair, nucleus: MathListFragment) -> Self {
        Self {
            delimiters,
            nucleus,
            decor: Vec::new(),
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
        MathClass::Special
    }

    pub fn fix_layout(&mut self, ctx: &MathContext) {
        let font = ctx.font();
        let axis = font.to_points(ctx.constants().axis_height);

        // The delimiters size to twice the nucleus's larger extent from
        // the math axis, so they stay centered on it.
        let max_extent = (self.nucleus.ascent() - axis)
            .max(self.nucleus.descent() + axis);
        let target = 2.0 * max_extent;

        let (left, right) =
            layout_delimiters(self.delimiters, target, DELIMITER_SHORTFALL, ctx);

        self.decor.clear();
        let mut x = 0.0;
        let mut ascent = self.nucleus.ascent();
        let mut descent = self.nucleus.descent();
        if let Some(mut left) = left {
            left.set_origin(Point::new(x, 0.0));
            x += left.width();
            ascent = ascent.max(left.ascent());
            descent = descent.max(left.descent());
            self.decor.push(left);
        }
        self.nucleus.origin = Point::new(x, 0.0);
        x += self.nucleus.width();
        if let Some(mut right) = right {
            right.set_origin(Point::new(x, 0.0));
            x += right.width();
            ascent = ascent.max(right.ascent());
            descent = descent.max(right.descent());
            self.decor.push(right);
        }

        self.width = x;
        self.ascent = ascent;
        self.descent = descent;
    }

    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        for frag in &self.decor {
            frag.draw(pos + frag.origin(), surface);
        }
        self.nucleus.draw(pos + self.nucleus.origin, surface);
    }

    pub fn get_math_index(&self, point: Point) -> Option<MathIndex> {
        let x1 = self.nucleus.min_x() / 2.0;
        let x2 = (self.width + self.nucleus.max_x()) / 2.0;
        (point.x >= x1 && point.x <= x2).then_some(MathIndex::Nucleus)
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
