//! The index vocabulary and result types of the navigation layer.

use crate::geom::Point;

/// A logical sub-position inside a structural fragment.
///
/// The same values address children for layout enumeration and for the
/// navigation queries; the two must agree.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum MathIndex {
    LeftSub,
    LeftSup,
    Nucleus,
    Sub,
    Sup,
    Num,
    Denom,
    /// The degree of a radical.
    Index,
    Radicand,
}

/// Maximum representable row index, exclusive.
pub const MAX_ROW: usize = 32767;
/// Maximum representable column index, exclusive.
pub const MAX_COLUMN: usize = 63;

/// A cell address inside a matrix fragment.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GridIndex {
    pub row: usize,
    pub column: usize,
}

impl GridIndex {
    /// Creates a grid index.
    ///
    /// Addresses beyond [`MAX_ROW`]/[`MAX_COLUMN`] are caller bugs.
    pub fn new(row: usize, column: usize) -> Self {
        debug_assert!(row < MAX_ROW && column < MAX_COLUMN);
        Self { row, column }
    }
}

/// Either kind of component address, as returned by hit-testing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ComponentIndex {
    Math(MathIndex),
    Grid(GridIndex),
}

impl From<MathIndex> for ComponentIndex {
    fn from(index: MathIndex) -> Self {
        Self::Math(index)
    }
}

impl From<GridIndex> for ComponentIndex {
    fn from(index: GridIndex) -> Self {
        Self::Grid(index)
    }
}

/// The vertical direction of a ray-shoot query.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VerticalDirection {
    Up,
    Down,
}

/// The answer to a ray-shoot query.
///
/// When `resolved` is true the position is a final destination inside the
/// queried fragment; otherwise it is a boundary crossing and the caller
/// must continue shooting from there in the same direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RayshootResult {
    pub position: Point,
    pub resolved: bool,
}

impl RayshootResult {
    pub fn new(position: Point, resolved: bool) -> Self {
        Self { position, resolved }
    }
}
