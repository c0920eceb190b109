//! Math layout with OpenType MATH metrics.
//!
//! The engine turns a read-only [`MathExpr`] tree into a measured tree of
//! [`MathFragment`]s: boxes carrying width, ascent, and descent, positioned
//! on a shared baseline coordinate system and ready to be drawn onto a
//! [`RenderSurface`] or queried for interactive cursor movement.
//!
//! The pieces:
//!
//! - [`font`]: the [`MathFont`] provider trait plus an [`OpenTypeMathFont`]
//!   implementation on top of `ttf-parser`. All constants used by the
//!   structural layouts come from the font's MATH table.
//! - [`style`]: the four TeX math styles, crampedness, and the immutable
//!   [`MathContext`] threaded through a layout pass.
//! - [`class`]: math classes, inter-atom spacing, and limit policies.
//! - [`stretch`]: glyph stretching via pre-sized variants and part
//!   assemblies, memoised in a [`StretchCache`].
//! - [`list`]: the horizontal math list with its two-phase edit protocol,
//!   spacing resolution, cursor queries, and reflow.
//! - [`fragment`]: the structural fragments (fractions, scripts, radicals,
//!   accents, grids, delimiter groups) and the closed [`MathFragment`]
//!   enum dispatching their shared contract.
//! - [`nav`]: the index vocabulary for hit-testing ([`get_math_index`])
//!   and vertical cursor navigation ([`rayshoot`]).
//!
//! [`get_math_index`]: MathFragment::get_math_index
//! [`rayshoot`]: MathFragment::rayshoot

pub mod class;
pub mod expr;
pub mod font;
pub mod fragment;
pub mod geom;
pub mod list;
pub mod nav;
pub mod stretch;
pub mod style;
pub mod surface;

pub use crate::class::{Limits, MathClass};
pub use crate::expr::{layout, layout_list, MathExpr};
pub use crate::font::{MathFont, MathFontError, OpenTypeMathFont};
pub use crate::fragment::MathFragment;
pub use crate::geom::{Axis, Color, Corner, Em, Point};
pub use crate::list::MathListFragment;
pub use crate::nav::{
    ComponentIndex, GridIndex, MathIndex, RayshootResult, VerticalDirection,
};
pub use crate::stretch::{DelimiterPair, StretchCache};
pub use crate::style::{MathContext, MathStyle};
pub use crate::surface::RenderSurface;
