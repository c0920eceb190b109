//! Grid layout for matrices, cases, and aligned equation blocks.

use crate::class::resolve_spacing;
use crate::fragment::{GlyphFragment, MathFragment};
use crate::geom::{clamp_inset, Color, Em, Point, TOLERANCE};
use crate::list::MathListFragment;
use crate::nav::{GridIndex, RayshootResult, VerticalDirection, MAX_COLUMN, MAX_ROW};
use crate::stretch::{layout_delimiters, DelimiterPair};
use crate::style::MathContext;
use crate::surface::RenderSurface;

/// Ratio of the delimiter shortfall used as extra vertical padding.
const VERTICAL_PADDING: f64 = 0.1;
const DELIMITER_SHORTFALL: Em = Em::new(0.1);

const ALIGN_ROW_GAP: Em = Em::new(0.5);
const ALIGN_COL_GAP: Em = Em::new(1.0);
const MATRIX_ROW_GAP: Em = Em::new(0.3);
const MATRIX_COL_GAP: Em = Em::new(0.8);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum CellAlignment {
    Start,
    Center,
    End,
}

impl CellAlignment {
    fn position(self, extent: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => extent / 2.0,
            Self::End => extent,
        }
    }
}

/// The flavor of a grid.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MatrixKind {
    /// Alternating right/left columns, as in an `aligned` block.
    Aligned,
    /// Left-aligned rows behind a single brace.
    Cases,
    /// Centered cells inside the given delimiters.
    Matrix(DelimiterPair),
}

impl MatrixKind {
    fn delimiters(self) -> DelimiterPair {
        match self {
            Self::Aligned => DelimiterPair::NONE,
            Self::Cases => DelimiterPair { open: Some('{'), close: None },
            Self::Matrix(delimiters) => delimiters,
        }
    }

    fn row_gap(self) -> Em {
        match self {
            Self::Aligned => ALIGN_ROW_GAP,
            Self::Cases | Self::Matrix(_) => MATRIX_ROW_GAP,
        }
    }

    fn alignment(self, column: usize) -> CellAlignment {
        match self {
            Self::Aligned => {
                if column % 2 == 0 {
                    CellAlignment::End
                } else {
                    CellAlignment::Start
                }
            }
            Self::Cases => CellAlignment::Start,
            Self::Matrix(_) => CellAlignment::Center,
        }
    }
}

/// A grid of cell lists centered on the math axis.
///
/// Cells are addressed by [`GridIndex`] and are independent lists; rows
/// and columns can be inserted and removed between layout fixes.
#[derive(Debug, Clone)]
pub struct MatrixFragment {
    pub kind: MatrixKind,
    /// Column-major cell storage.
    columns: Vec<Vec<MathListFragment>>,
    color: Color,
    decor: Vec<MathFragment>,
    /// Top edges of the rows, plus the bottom edge of the last.
    row_edges: Vec<f64>,
    /// Left edges of the columns, plus the right edge of the last.
    column_edges: Vec<f64>,
    pub(crate) origin: Point,
    width: f64,
    ascent: f64,
    descent: f64,
}

impl MatrixFragment {
    pub fn new(rows: usize, columns: usize, kind: MatrixKind, ctx: &MathContext) -> Self {
        debug_assert!(rows > 0 && columns > 0);
        debug_assert!(rows < MAX_ROW && columns < MAX_COLUMN);
        let color = ctx.color;
        let columns = (0..columns)
            .map(|_| (0..rows).map(|_| MathListFragment::with_color(color)).collect())
            .collect();
        Self {
            kind,
            columns,
            color,
            decor: Vec::new(),
            row_edges: Vec::new(),
            column_edges: Vec::new(),
            origin: Point::zero(),
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, index: GridIndex) -> &MathListFragment {
        &self.columns[index.column][index.row]
    }

    pub fn cell_mut(&mut self, index: GridIndex) -> &mut MathListFragment {
        &mut self.columns[index.column][index.row]
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

    // Structure edits. The grid must be re-fixed afterwards.

    pub fn insert_row(&mut self, at: usize) {
        debug_assert!(at <= self.row_count());
        debug_assert!(self.row_count() + 1 < MAX_ROW);
        for column in &mut self.columns {
            column.insert(at, MathListFragment::with_color(self.color));
        }
    }

    pub fn remove_row(&mut self, at: usize) {
        debug_assert!(at < self.row_count() && self.row_count() > 1);
        for column in &mut self.columns {
            column.remove(at);
        }
    }

    pub fn insert_column(&mut self, at: usize) {
        debug_assert!(at <= self.column_count());
        debug_assert!(self.column_count() + 1 < MAX_COLUMN);
        let rows = self.row_count();
        let column =
            (0..rows).map(|_| MathListFragment::with_color(self.color)).collect();
        self.columns.insert(at, column);
    }

    pub fn remove_column(&mut self, at: usize) {
        debug_assert!(at < self.column_count() && self.column_count() > 1);
        self.columns.remove(at);
    }

    /// The gap between a column and its successor.
    fn column_gap(&self, index: usize, ctx: &MathContext) -> Em {
        match self.kind {
            MatrixKind::Cases | MatrixKind::Matrix(_) => MATRIX_COL_GAP,
            MatrixKind::Aligned => {
                // An equation split at a relation rejoins its halves with
                // the spacing the relation would have had inline.
                if index + 1 >= self.column_count()
                    || self.kind.alignment(index) != CellAlignment::End
                    || self.kind.alignment(index + 1) != CellAlignment::Start
                {
                    return ALIGN_COL_GAP;
                }
                let mut max_spacing = Em::zero();
                for (lhs, rhs) in
                    self.columns[index].iter().zip(&self.columns[index + 1])
                {
                    let (Some(lhs), Some(rhs)) = (lhs.last(), rhs.first()) else {
                        continue;
                    };
                    let spacing = resolve_spacing(lhs.class(), rhs.class(), ctx.style)
                        .unwrap_or(Em::zero());
                    if spacing > max_spacing {
                        max_spacing = spacing;
                    }
                }
                max_spacing
            }
        }
    }

    pub fn fix_layout(&mut self, ctx: &MathContext) {
        let font = ctx.font();
        let axis = font.to_points(ctx.constants().axis_height);
        let row_gap = font.em(self.kind.row_gap());
        let row_count = self.row_count();
        let column_count = self.column_count();

        // Pad every row with the paren's extents so small matrices align
        // with delimited neighbors.
        let (paren_ascent, paren_descent) = GlyphFragment::try_new('(', ctx)
            .map_or((0.0, 0.0), |paren| (paren.ascent(), paren.descent()));
        let mut heights = vec![(paren_ascent, paren_descent); row_count];
        for column in &self.columns {
            for (height, cell) in heights.iter_mut().zip(column) {
                height.0 = height.0.max(cell.ascent());
                height.1 = height.1.max(cell.descent());
            }
        }

        let total_height: f64 =
            heights.iter().map(|(a, d)| a + d).sum::<f64>()
                + (row_count - 1) as f64 * row_gap;
        let mut total_ascent = total_height / 2.0 + axis;
        let mut total_descent = total_height - total_ascent;

        self.row_edges.clear();
        let mut y = -total_ascent;
        for (ascent, descent) in &heights {
            self.row_edges.push(y);
            y += ascent + descent + row_gap;
        }
        self.row_edges.push(y - row_gap);

        let shortfall = font.em(DELIMITER_SHORTFALL);
        let target = total_height + shortfall * VERTICAL_PADDING;
        let (left, right) =
            layout_delimiters(self.kind.delimiters(), target, DELIMITER_SHORTFALL, ctx);

        let x_delta = left.as_ref().map_or(0.0, |f| f.width());
        let y_delta = -(axis + total_height / 2.0);

        // Precompute the gaps to keep the borrow on the cells short.
        let gaps: Vec<f64> = (0..column_count)
            .map(|j| font.em(self.column_gap(j, ctx)))
            .collect();

        self.column_edges.clear();
        let mut x = x_delta;
        let mut gap = 0.0;
        for (j, column) in self.columns.iter_mut().enumerate() {
            self.column_edges.push(x);
            let column_width =
                column.iter().map(MathListFragment::width).fold(0.0, f64::max);

            let mut y = y_delta;
            for (cell, &(ascent, descent)) in column.iter_mut().zip(&heights) {
                let alignment = self.kind.alignment(j);
                cell.origin = Point::new(
                    x + alignment.position(column_width - cell.width()),
                    y + ascent,
                );
                y += ascent + descent + row_gap;
            }

            x += column_width;
            gap = gaps[j];
            x += gap;
        }
        x -= gap;
        self.column_edges.push(x);

        self.decor.clear();
        if let Some(mut left) = left {
            left.set_origin(Point::zero());
            total_ascent = total_ascent.max(left.ascent());
            total_descent = total_descent.max(left.descent());
            self.decor.push(left);
        }
        if let Some(mut right) = right {
            right.set_origin(Point::new(x, 0.0));
            x += right.width();
            total_ascent = total_ascent.max(right.ascent());
            total_descent = total_descent.max(right.descent());
            self.decor.push(right);
        }

        self.width = x;
        self.ascent = total_ascent;
        self.descent = total_descent;
    }

    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        for frag in &self.decor {
            frag.draw(pos + frag.origin(), surface);
        }
        for column in &self.columns {
            for cell in column {
                cell.draw(pos + cell.origin, surface);
            }
        }
    }

    /// The cell under a point in the fragment's own coordinates.
    ///
    /// With `clamp` set, points outside the grid's horizontal range snap
    /// to the nearest column instead of missing.
    pub fn get_grid_index(&self, point: Point, clamp: bool) -> Option<GridIndex> {
        let row_count = self.row_count();
        let column_count = self.column_count();
        if row_count == 0 || column_count == 0 {
            return None;
        }

        let min_x = self.column_edges[0] / 2.0;
        let max_x = (self.width + self.column_edges[column_count]) / 2.0;
        let x = if clamp {
            point.x.clamp(min_x, max_x)
        } else {
            if point.x < min_x || point.x > max_x {
                return None;
            }
            point.x
        };

        let i = self.row_edges.partition_point(|&edge| edge <= point.y);
        let j = self.column_edges.partition_point(|&edge| edge <= x);
        let ii = if i > 0 { (i - 1).min(row_count - 1) } else { 0 };
        let jj = if j > 0 { (j - 1).min(column_count - 1) } else { 0 };
        Some(GridIndex::new(ii, jj))
    }

    pub fn rayshoot(
        &self,
        point: Point,
        index: GridIndex,
        direction: VerticalDirection,
    ) -> Option<RayshootResult> {
        let eps = TOLERANCE;
        match direction {
            VerticalDirection::Up => {
                if index.row > 0 {
                    let cell = self.cell(GridIndex::new(index.row - 1, index.column));
                    let x = clamp_inset(point.x, cell.min_x(), cell.max_x(), eps);
                    Some(RayshootResult::new(Point::new(x, cell.max_y() - eps), true))
                } else {
                    Some(RayshootResult::new(point.with_y(-self.ascent), false))
                }
            }
            VerticalDirection::Down => {
                if index.row + 1 < self.row_count() {
                    let cell = self.cell(GridIndex::new(index.row + 1, index.column));
                    let x = clamp_inset(point.x, cell.min_x(), cell.max_x(), eps);
                    Some(RayshootResult::new(Point::new(x, cell.min_y() + eps), true))
                } else {
                    Some(RayshootResult::new(point.with_y(self.descent), false))
                }
            }
        }
    }
}
