//! The measured fragment tree.
//!
//! Every laid-out piece of math is a [`MathFragment`]: either a leaf (a
//! glyph, a stretched variant, a rule, a text run) or a structural fragment
//! owning child lists. The enum is closed; structural recursion happens by
//! matching, and every query a host needs (metrics, drawing, hit-testing,
//! vertical navigation) dispatches through it.

mod accent;
mod attach;
mod frac;
mod glyph;
mod lr;
mod matrix;
mod radical;
mod underover;

pub use accent::{AccentFragment, AccentKind};
pub use attach::AttachFragment;
pub use frac::{FracFragment, FracKind};
pub use glyph::{GlyphFragment, RuleFragment, TextFragment};
pub use lr::LeftRightFragment;
pub use matrix::{MatrixFragment, MatrixKind};
pub use radical::RadicalFragment;
pub use underover::{UnderOverFragment, UnderOverKind};

use crate::class::{Limits, MathClass};
use crate::geom::{Corner, Point};
use crate::list::MathListFragment;
use crate::nav::{ComponentIndex, RayshootResult, VerticalDirection};
use crate::stretch::VariantFragment;
use crate::style::MathContext;
use crate::surface::RenderSurface;

/// A measured piece of math.
#[derive(Debug, Clone)]
pub enum MathFragment {
    Glyph(GlyphFragment),
    Variant(VariantFragment),
    Rule(RuleFragment),
    Text(TextFragment),
    List(MathListFragment),
    Accent(Box<AccentFragment>),
    Attach(Box<AttachFragment>),
    Frac(Box<FracFragment>),
    Radical(Box<RadicalFragment>),
    Matrix(Box<MatrixFragment>),
    LeftRight(Box<LeftRightFragment>),
    UnderOver(Box<UnderOverFragment>),
}

macro_rules! dispatch {
    ($self:expr, $inner:pat_param => $body:expr) => {
        match $self {
            MathFragment::Glyph($inner) => $body,
            MathFragment::Variant($inner) => $body,
            MathFragment::Rule($inner) => $body,
            MathFragment::Text($inner) => $body,
            MathFragment::List($inner) => $body,
            MathFragment::Accent($inner) => $body,
            MathFragment::Attach($inner) => $body,
            MathFragment::Frac($inner) => $body,
            MathFragment::Radical($inner) => $body,
            MathFragment::Matrix($inner) => $body,
            MathFragment::LeftRight($inner) => $body,
            MathFragment::UnderOver($inner) => $body,
        }
    };
}

impl MathFragment {
    pub fn width(&self) -> f64 {
        dispatch!(self, f => f.width())
    }

    pub fn ascent(&self) -> f64 {
        dispatch!(self, f => f.ascent())
    }

    pub fn descent(&self) -> f64 {
        dispatch!(self, f => f.descent())
    }

    pub fn height(&self) -> f64 {
        self.ascent() + self.descent()
    }

    /// Position of the fragment's baseline origin in its parent.
    pub fn origin(&self) -> Point {
        dispatch!(self, f => f.origin)
    }

    pub fn set_origin(&mut self, origin: Point) {
        dispatch!(self, f => f.origin = origin)
    }

    pub fn min_x(&self) -> f64 {
        self.origin().x
    }

    pub fn max_x(&self) -> f64 {
        self.origin().x + self.width()
    }

    pub fn mid_x(&self) -> f64 {
        self.origin().x + self.width() / 2.0
    }

    pub fn min_y(&self) -> f64 {
        self.origin().y - self.ascent()
    }

    pub fn max_y(&self) -> f64 {
        self.origin().y + self.descent()
    }

    pub fn italics_correction(&self) -> f64 {
        match self {
            Self::Glyph(f) => f.italics_correction(),
            Self::Variant(f) => f.italics_correction(),
            Self::List(f) => f.italics_correction(),
            Self::Accent(f) => f.italics_correction(),
            _ => 0.0,
        }
    }

    /// Where a top accent attaches, measured from the fragment's left edge.
    pub fn accent_attachment(&self) -> f64 {
        match self {
            Self::Glyph(f) => f.accent_attachment(),
            Self::Variant(f) => f.accent_attachment(),
            Self::List(f) => f.accent_attachment(),
            Self::Accent(f) => f.accent_attachment(),
            _ => self.width() / 2.0,
        }
    }

    pub fn class(&self) -> MathClass {
        match self {
            Self::Glyph(f) => f.class(),
            Self::Variant(f) => f.class,
            Self::Text(f) => f.class,
            Self::List(f) => f.class(),
            Self::Accent(f) => f.class(),
            Self::Attach(f) => f.class(),
            Self::LeftRight(f) => f.class(),
            Self::UnderOver(f) => f.class(),
            Self::Rule(_) | Self::Frac(_) | Self::Radical(_) | Self::Matrix(_) => {
                MathClass::Normal
            }
        }
    }

    pub fn limits(&self) -> Limits {
        match self {
            Self::Glyph(f) => f.limits(),
            Self::Variant(f) => f.limits,
            Self::Text(f) => f.limits,
            Self::List(f) => f.limits(),
            Self::UnderOver(f) => f.limits(),
            _ => Limits::Never,
        }
    }

    pub fn is_spaced(&self) -> bool {
        match self {
            Self::Glyph(f) => f.is_spaced(),
            Self::Variant(f) => f.class == MathClass::Fence,
            Self::List(f) => f.is_spaced(),
            _ => false,
        }
    }

    pub fn is_text_like(&self) -> bool {
        match self {
            Self::Glyph(f) => f.is_text_like(),
            Self::Variant(f) => f.class != MathClass::Large,
            Self::Text(_) => true,
            Self::List(f) => f.is_text_like(),
            Self::Accent(f) => f.is_text_like(),
            _ => false,
        }
    }

    /// How many content units of the host document the fragment spans.
    pub fn layout_length(&self) -> usize {
        match self {
            Self::Text(f) => f.layout_length(),
            _ => 1,
        }
    }

    /// The kern adjustment at a corner, at the given correction height.
    ///
    /// Nonzero only for glyphs and for lists that wrap a single glyph.
    pub fn kern_at_height(&self, ctx: &MathContext, corner: Corner, height: f64) -> f64 {
        match self {
            Self::Glyph(f) => f.kern_at_height(ctx, corner, height),
            Self::List(f) => f.kern_at_height(ctx, corner, height),
            _ => 0.0,
        }
    }

    /// Recomputes internal positions after children changed.
    ///
    /// Leaves are immutable and ignore this.
    pub fn fix_layout(&mut self, ctx: &MathContext) {
        match self {
            Self::Glyph(_) | Self::Variant(_) | Self::Rule(_) | Self::Text(_) => {}
            Self::List(f) => f.fix_layout(ctx),
            Self::Accent(f) => f.fix_layout(ctx),
            Self::Attach(f) => f.fix_layout(ctx),
            Self::Frac(f) => f.fix_layout(ctx),
            Self::Radical(f) => f.fix_layout(ctx),
            Self::Matrix(f) => f.fix_layout(ctx),
            Self::LeftRight(f) => f.fix_layout(ctx),
            Self::UnderOver(f) => f.fix_layout(ctx),
        }
    }

    /// Draws the fragment with its baseline origin at `pos`.
    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        dispatch!(self, f => f.draw(pos, surface))
    }

    /// The logical component under a point in the fragment's own
    /// coordinates, if the fragment is structural and the point addresses
    /// one of its children.
    pub fn get_math_index(&self, point: Point) -> Option<ComponentIndex> {
        match self {
            Self::Accent(f) => f.get_math_index(point).map(Into::into),
            Self::Attach(f) => f.get_math_index(point).map(Into::into),
            Self::Frac(f) => f.get_math_index(point).map(Into::into),
            Self::Radical(f) => f.get_math_index(point).map(Into::into),
            Self::Matrix(f) => f.get_grid_index(point, false).map(Into::into),
            Self::LeftRight(f) => f.get_math_index(point).map(Into::into),
            Self::UnderOver(f) => f.get_math_index(point).map(Into::into),
            _ => None,
        }
    }

    /// Shoots a vertical ray out of the named child component.
    ///
    /// `point` is in the fragment's own coordinates. `None` means the
    /// fragment is not structural or the component does not apply.
    pub fn rayshoot(
        &self,
        point: Point,
        component: ComponentIndex,
        direction: VerticalDirection,
    ) -> Option<RayshootResult> {
        match (self, component) {
            (Self::Accent(f), ComponentIndex::Math(index)) => {
                f.rayshoot(point, index, direction)
            }
            (Self::Attach(f), ComponentIndex::Math(index)) => {
                f.rayshoot(point, index, direction)
            }
            (Self::Frac(f), ComponentIndex::Math(index)) => {
                f.rayshoot(point, index, direction)
            }
            (Self::Radical(f), ComponentIndex::Math(index)) => {
                f.rayshoot(point, index, direction)
            }
            (Self::Matrix(f), ComponentIndex::Grid(index)) => {
                f.rayshoot(point, index, direction)
            }
            (Self::LeftRight(f), ComponentIndex::Math(index)) => {
                f.rayshoot(point, index, direction)
            }
            (Self::UnderOver(f), ComponentIndex::Math(index)) => {
                f.rayshoot(point, index, direction)
            }
            _ => None,
        }
    }
}
