//! Incremental editing, structure edits, and reflow.

mod common;

use common::{assert_close, FixtureFont, FONT_SIZE};
use mathcore::fragment::MatrixKind;
use mathcore::geom::Point;
use mathcore::{
    layout, layout_list, Color, DelimiterPair, GridIndex, MathContext,
    MathExpr, MathFragment, MathStyle, StretchCache,
};

fn sym(c: char) -> MathExpr {
    MathExpr::Symbol(c)
}

fn syms(s: &str) -> Vec<MathExpr> {
    s.chars().map(MathExpr::Symbol).collect()
}

#[test]
fn removing_and_reinserting_restores_the_metrics() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let mut list = layout_list(&syms("x+y"), &ctx);
    let width = list.width();
    let ascent = list.ascent();
    let descent = list.descent();
    assert_eq!(list.content_layout_length(), 3);

    list.begin_editing();
    let plus = list.remove(1);
    list.end_editing();
    list.fix_layout(&ctx);

    // Two ordinary atoms left, with no spacing between them.
    assert_eq!(list.content_layout_length(), 2);
    assert_close(list.width(), 10.0);

    list.begin_editing();
    list.insert(plus, 1);
    list.end_editing();
    list.fix_layout(&ctx);

    assert_eq!(list.content_layout_length(), 3);
    assert_close(list.width(), width);
    assert_close(list.ascent(), ascent);
    assert_close(list.descent(), descent);
}

#[test]
fn incremental_fixes_match_a_fresh_layout() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let mut edited = layout_list(&syms("a+b"), &ctx);
    edited.begin_editing();
    edited.remove(2);
    edited.push(layout(&sym('c'), &ctx));
    edited.end_editing();
    edited.fix_layout(&ctx);

    let fresh = layout_list(&syms("a+c"), &ctx);
    assert_close(edited.width(), fresh.width());
    assert_close(edited.ascent(), fresh.ascent());
    assert_close(edited.descent(), fresh.descent());
    for offset in 0..=3 {
        assert_close(
            edited.cursor_distance_through_upstream(offset),
            fresh.cursor_distance_through_upstream(offset),
        );
    }
}

#[test]
fn subrange_removal_keeps_the_offsets_consistent() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let mut list = layout_list(&syms("a+b=c"), &ctx);
    list.begin_editing();
    list.remove_subrange(1..4);
    list.end_editing();
    list.fix_layout(&ctx);

    assert_eq!(list.len(), 2);
    assert_eq!(list.content_layout_length(), 2);
    assert_close(list.width(), 10.0);
    assert_close(list.cursor_distance_through_upstream(1), 5.0);
}

#[test]
fn matrix_row_edits_grow_and_shrink_the_grid() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let frag = layout(
        &MathExpr::Matrix {
            kind: MatrixKind::Matrix(DelimiterPair::NONE),
            rows: vec![
                vec![vec![sym('1')], vec![sym('2')]],
                vec![vec![sym('3')], vec![sym('4')]],
            ],
        },
        &ctx,
    );
    let MathFragment::Matrix(mut matrix) = frag else {
        panic!("expected a matrix fragment");
    };
    assert_close(matrix.ascent() + matrix.descent(), 23.0);

    // An empty row still spans the delimiter reference height plus a gap.
    matrix.insert_row(1);
    matrix.fix_layout(&ctx);
    assert_eq!(matrix.row_count(), 3);
    assert_close(matrix.ascent() + matrix.descent(), 36.0);
    assert_close(matrix.width(), 18.0);

    matrix.remove_row(1);
    matrix.fix_layout(&ctx);
    assert_eq!(matrix.row_count(), 2);
    assert_close(matrix.ascent() + matrix.descent(), 23.0);
}

#[test]
fn matrix_column_edits_grow_and_shrink_the_grid() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let frag = layout(
        &MathExpr::Matrix {
            kind: MatrixKind::Matrix(DelimiterPair::NONE),
            rows: vec![
                vec![vec![sym('1')], vec![sym('2')]],
                vec![vec![sym('3')], vec![sym('4')]],
            ],
        },
        &ctx,
    );
    let MathFragment::Matrix(mut matrix) = frag else {
        panic!("expected a matrix fragment");
    };
    assert_close(matrix.width(), 18.0);

    // The empty column contributes no width but keeps its gaps.
    matrix.insert_column(1);
    matrix.fix_layout(&ctx);
    assert_eq!(matrix.column_count(), 3);
    assert_close(matrix.width(), 26.0);

    matrix.remove_column(1);
    matrix.fix_layout(&ctx);
    assert_eq!(matrix.column_count(), 2);
    assert_close(matrix.width(), 18.0);
}

#[test]
fn matrix_cell_edits_widen_their_column() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let frag = layout(
        &MathExpr::Matrix {
            kind: MatrixKind::Matrix(DelimiterPair::NONE),
            rows: vec![
                vec![vec![sym('1')], vec![sym('2')]],
                vec![vec![sym('3')], vec![sym('4')]],
            ],
        },
        &ctx,
    );
    let MathFragment::Matrix(mut matrix) = frag else {
        panic!("expected a matrix fragment");
    };

    let index = GridIndex::new(0, 0);
    let cell = matrix.cell_mut(index);
    cell.begin_editing();
    cell.push(layout(&sym('2'), &ctx));
    cell.end_editing();
    cell.fix_layout(&ctx);
    matrix.fix_layout(&ctx);

    assert_close(matrix.cell(index).width(), 10.0);
    assert_close(matrix.width(), 23.0);
    // The single-digit cell below recenters in the widened column.
    assert_close(matrix.cell(GridIndex::new(1, 0)).min_x(), 2.5);
}

#[test]
fn reflow_splits_after_binaries_and_relations() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);
    let medium = FONT_SIZE * 2.0 / 9.0;
    let thick = FONT_SIZE * 5.0 / 18.0;

    let mut list = layout_list(&syms("a+b=c"), &ctx);
    assert_close(list.width(), 37.0);
    list.perform_reflow();

    let segments = list.reflow_segments();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].offset_range, 0..2);
    assert_eq!(segments[1].offset_range, 2..4);
    assert_eq!(segments[2].offset_range, 4..5);

    // Spacing at a break becomes the previous segment's downstream slack,
    // so the segment widths sum back to the list width.
    assert_close(segments[0].width(), 11.0 + 2.0 * medium);
    assert_close(segments[1].width(), 11.0 + 2.0 * thick);
    assert_close(segments[2].width(), 5.0);
    let total: f64 = segments.iter().map(|seg| seg.width()).sum();
    assert_close(total, list.width());

    assert_eq!(list.segment_index_containing(0), 0);
    assert_eq!(list.segment_index_containing(2), 1);
    assert_eq!(list.segment_index_containing(5), 2);
}

#[test]
fn segment_queries_work_in_segment_coordinates() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let mut list = layout_list(&syms("a+b=c"), &ctx);
    list.perform_reflow();
    let segment = list.reflow_segments()[1].clone();

    // One point into the segment lands a fifth of the way through 'b'.
    let (range, fraction) = list.segment_layout_range(&segment, Point::new(1.0, 0.0));
    assert_eq!(range, 2..3);
    assert_close(fraction, 0.2);

    let (range, _) = list.segment_layout_range(&segment, Point::new(-1.0, 0.0));
    assert_eq!(range, 2..2);
    let (range, _) = list.segment_layout_range(&segment, Point::new(100.0, 0.0));
    assert_eq!(range, 4..4);

    assert_close(list.segment_distance_through_upstream(&segment, 2), 0.0);
    // The cursor after 'b' hugs the letter, upstream of the thick space.
    assert_close(list.segment_distance_through_upstream(&segment, 3), 5.0);
}

#[test]
fn unbroken_lists_reflow_to_a_single_segment() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let mut list = layout_list(&syms("xy"), &ctx);
    list.perform_reflow();

    let segments = list.reflow_segments();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].offset_range, 0..2);
    assert_close(segments[0].width(), list.width());
}
