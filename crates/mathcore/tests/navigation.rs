//! Hit-testing and vertical cursor navigation.

mod common;

use common::{assert_close, FixtureFont, FONT_SIZE};
use mathcore::fragment::{FracKind, MatrixKind};
use mathcore::geom::Point;
use mathcore::{
    layout, layout_list, Color, ComponentIndex, DelimiterPair, GridIndex,
    MathContext, MathExpr, MathIndex, MathStyle, StretchCache,
    VerticalDirection,
};

fn sym(c: char) -> MathExpr {
    MathExpr::Symbol(c)
}

fn math(index: MathIndex) -> ComponentIndex {
    ComponentIndex::Math(index)
}

#[test]
fn fractions_split_on_the_rule_line() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let frag = layout(
        &MathExpr::Frac {
            kind: FracKind::FRACTION,
            numerator: vec![sym('1')],
            denominator: vec![sym('2')],
        },
        &ctx,
    );

    // The rule line sits at the axis height.
    assert_eq!(
        frag.get_math_index(Point::new(2.0, -3.0)),
        Some(math(MathIndex::Num))
    );
    assert_eq!(
        frag.get_math_index(Point::new(2.0, 1.0)),
        Some(math(MathIndex::Denom))
    );
    // Points left of the fragment miss.
    assert_eq!(frag.get_math_index(Point::new(-1.0, 0.0)), None);

    // Shooting down from the numerator lands inside the denominator.
    let down = frag
        .rayshoot(Point::new(2.0, -3.0), math(MathIndex::Num), VerticalDirection::Down)
        .unwrap();
    assert!(down.resolved);
    assert_close(down.position.y, -0.2);
    assert_close(down.position.x, 2.0);

    // Shooting up proposes the fragment's top edge for the caller.
    let up = frag
        .rayshoot(Point::new(2.0, -3.0), math(MathIndex::Num), VerticalDirection::Up)
        .unwrap();
    assert!(!up.resolved);
    assert_close(up.position.y, -8.2);

    let up = frag
        .rayshoot(Point::new(2.0, 1.0), math(MathIndex::Denom), VerticalDirection::Up)
        .unwrap();
    assert!(up.resolved);
    // Numerator bottom edge.
    assert_close(up.position.y, -4.0);
}

#[test]
fn attach_navigation_walks_nucleus_and_scripts() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let frag = layout(
        &MathExpr::Attach {
            nucleus: vec![sym('x')],
            lsub: None,
            lsup: None,
            sub: Some(vec![sym('3')]),
            sup: Some(vec![sym('2')]),
        },
        &ctx,
    );

    // Above and right of the nucleus: the superscript.
    assert_eq!(
        frag.get_math_index(Point::new(6.0, -5.0)),
        Some(math(MathIndex::Sup))
    );
    assert_eq!(
        frag.get_math_index(Point::new(3.0, 0.0)),
        Some(math(MathIndex::Nucleus))
    );
    assert_eq!(
        frag.get_math_index(Point::new(6.0, 1.5)),
        Some(math(MathIndex::Sub))
    );

    // From the right half of the nucleus, up enters the superscript.
    let up = frag
        .rayshoot(
            Point::new(4.0, -1.0),
            math(MathIndex::Nucleus),
            VerticalDirection::Up,
        )
        .unwrap();
    assert!(up.resolved);
    assert_close(up.position.y, -3.6);
    assert!(up.position.x >= 5.0);

    // Up from the subscript stays above both the nucleus and the script.
    let up = frag
        .rayshoot(Point::new(6.0, 1.5), math(MathIndex::Sub), VerticalDirection::Up)
        .unwrap();
    assert!(up.resolved);
    assert_close(up.position.y, -2.1);
    assert!(up.position.x <= 5.0);

    // Down from the superscript lands on the nucleus's top edge.
    let down = frag
        .rayshoot(Point::new(6.0, -5.0), math(MathIndex::Sup), VerticalDirection::Down)
        .unwrap();
    assert!(down.resolved);
    assert_close(down.position.y, -4.5);

    // Down from the subscript exits the fragment.
    let down = frag
        .rayshoot(Point::new(6.0, 1.5), math(MathIndex::Sub), VerticalDirection::Down)
        .unwrap();
    assert!(!down.resolved);
    assert_close(down.position.y, 2.1);
}

#[test]
fn matrices_move_between_rows_via_edges() {
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

    // Baseline-level points are inside the second row.
    assert_eq!(
        frag.get_math_index(Point::new(3.0, 0.0)),
        Some(ComponentIndex::Grid(GridIndex::new(1, 0)))
    );
    assert_eq!(
        frag.get_math_index(Point::new(14.0, -6.0)),
        Some(ComponentIndex::Grid(GridIndex::new(0, 1)))
    );
    // Far outside the columns: a miss.
    assert_eq!(frag.get_math_index(Point::new(-5.0, 0.0)), None);

    // Up from the second row enters the cell above, clamped into its box.
    let up = frag
        .rayshoot(
            Point::new(2.0, 0.0),
            ComponentIndex::Grid(GridIndex::new(1, 0)),
            VerticalDirection::Up,
        )
        .unwrap();
    assert!(up.resolved);
    assert!((up.position.y + 6.5).abs() < 1e-3);
    assert_close(up.position.x, 2.0);

    // Up from the first row exits the grid.
    let up = frag
        .rayshoot(
            Point::new(2.0, -8.0),
            ComponentIndex::Grid(GridIndex::new(0, 0)),
            VerticalDirection::Up,
        )
        .unwrap();
    assert!(!up.resolved);
    assert_close(up.position.y, -14.0);

    // Down from the second row exits the grid.
    let down = frag
        .rayshoot(
            Point::new(2.0, 0.0),
            ComponentIndex::Grid(GridIndex::new(1, 0)),
            VerticalDirection::Down,
        )
        .unwrap();
    assert!(!down.resolved);
    assert_close(down.position.y, 9.0);
}

#[test]
fn radicals_route_between_degree_and_radicand() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let plain = layout(
        &MathExpr::Radical { radicand: vec![sym('2')], degree: None },
        &ctx,
    );
    // The radicand starts after the 7pt surd.
    assert_eq!(
        plain.get_math_index(Point::new(8.0, 0.0)),
        Some(math(MathIndex::Radicand))
    );
    assert_eq!(plain.get_math_index(Point::new(2.0, 0.0)), None);

    let with_degree = layout(
        &MathExpr::Radical { radicand: vec![sym('2')], degree: Some(vec![sym('3')]) },
        &ctx,
    );
    assert_eq!(
        with_degree.get_math_index(Point::new(1.0, 0.0)),
        Some(math(MathIndex::Index))
    );
    assert_eq!(
        with_degree.get_math_index(Point::new(9.0, 0.0)),
        Some(math(MathIndex::Radicand))
    );

    // Radicals always propose their own edge.
    let up = plain
        .rayshoot(
            Point::new(8.0, 0.0),
            math(MathIndex::Radicand),
            VerticalDirection::Up,
        )
        .unwrap();
    assert!(!up.resolved);
    assert_close(up.position.y, -9.5);
}

#[test]
fn lists_hit_test_by_binary_search() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let list = layout_list(&[sym('x'), sym('+'), sym('y')], &ctx);
    let medium = FONT_SIZE * 2.0 / 9.0;

    let (range, fraction) = list.get_layout_range(Point::new(2.5, 0.0));
    assert_eq!(range, 0..1);
    assert_close(fraction, 0.5);

    // Inside the plus, one fragment over.
    let (range, _) = list.get_layout_range(Point::new(5.0 + medium + 1.0, 0.0));
    assert_eq!(range, 1..2);

    // Outside the list: the empty ranges at either end.
    let (range, _) = list.get_layout_range(Point::new(-1.0, 0.0));
    assert_eq!(range, 0..0);
    let (range, _) = list.get_layout_range(Point::new(100.0, 0.0));
    assert_eq!(range, 3..3);

    // Cursor distances include the trailing spacing per the position class:
    // the cursor hugs the letter before the binary, but sits downstream of
    // the spacing before the letter that follows it.
    assert_close(list.cursor_distance_through_upstream(0), 0.0);
    assert_close(list.cursor_distance_through_upstream(1), 5.0);
    assert_close(
        list.cursor_distance_through_upstream(2),
        5.0 + medium + 6.0 + medium,
    );
    assert_close(list.cursor_distance_through_upstream(3), list.width());
}

#[test]
fn cursor_spacing_splits_between_non_text_atoms() {
    let font = FixtureFont::new();
    let cache = StretchCache::new();
    let ctx = MathContext::new(&font, FONT_SIZE, MathStyle::Text, Color::BLACK, &cache);

    let list = layout_list(
        &[MathExpr::Symbol('a'), MathExpr::Symbol('+'), MathExpr::Symbol('(')],
        &ctx,
    );
    let medium = FONT_SIZE * 2.0 / 9.0;

    // Against the letter the cursor stays upstream of the spacing; between
    // the binary and the opening paren it sits halfway through it.
    assert_close(list.cursor_distance_through_upstream(1), 5.0);
    assert_close(list.cursor_distance_through_upstream(2), 11.0 + 1.5 * medium);
}
