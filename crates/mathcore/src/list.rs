//! The horizontal math list and its editing, spacing, and reflow logic.

use std::ops::Range;

use smallvec::SmallVec;

use crate::class::{
    is_variable, resolve_math_class, resolve_spacing, Limits, MathClass,
};
use crate::fragment::MathFragment;
use crate::geom::{Color, Corner, Point};
use crate::style::MathContext;
use crate::surface::RenderSurface;

/// Which side of the trailing spacing a cursor next to a fragment hugs.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CursorPosition {
    /// At the fragment's own right edge, before the spacing.
    #[default]
    Upstream,
    /// Halfway through the spacing.
    Middle,
    /// After the spacing, at the next fragment's left edge.
    Downstream,
}

/// A fragment plus the per-slot data the list derives for it.
#[derive(Debug, Clone)]
pub struct AnnotatedFragment {
    pub fragment: MathFragment,
    /// Spacing after the fragment, in points.
    pub spacing: f64,
    pub cursor_position: CursorPosition,
    /// Whether a reflow break is allowed after this fragment.
    pub penalty: bool,
    /// Content offset of the fragment within the list.
    pub layout_offset: usize,
}

impl From<MathFragment> for AnnotatedFragment {
    fn from(fragment: MathFragment) -> Self {
        Self {
            fragment,
            spacing: 0.0,
            cursor_position: CursorPosition::default(),
            penalty: false,
            layout_offset: 0,
        }
    }
}

/// A maximal run of fragments that must stay on one line.
///
/// Breaks are only allowed after fragments carrying a penalty; the spacing
/// at a break is split into the previous segment's downstream slack and the
/// next segment's upstream slack, so that the segment widths sum back to
/// the list width.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflowSegment {
    /// Fragment indices covered by the segment.
    pub range: Range<usize>,
    /// Content offsets covered by the segment.
    pub offset_range: Range<usize>,
    /// Slack carried over from the spacing before the segment.
    pub upstream: f64,
    /// Slack kept from the spacing after the segment.
    pub downstream: f64,
    pub(crate) min_x: f64,
    width: f64,
    ascent: f64,
    descent: f64,
}

impl ReflowSegment {
    /// The segment's width including both slacks.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }

    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// A measured horizontal sequence of fragments sharing a baseline.
///
/// The list is the unit of editing: mutations happen between
/// [`begin_editing`] and [`end_editing`], after which [`fix_layout`]
/// re-derives classes, spacing, and positions from the first invalidated
/// slot onward. Metrics must not be read while an edit is open or a fix is
/// pending.
///
/// [`begin_editing`]: Self::begin_editing
/// [`end_editing`]: Self::end_editing
/// [`fix_layout`]: Self::fix_layout
#[derive(Debug, Clone)]
pub struct MathListFragment {
    fragments: Vec<AnnotatedFragment>,
    pub(crate) origin: Point,
    color: Color,
    width: f64,
    ascent: f64,
    descent: f64,
    content_layout_length: usize,
    dirty_index: Option<usize>,
    editing: bool,
    reflow_dirty: bool,
    reflow_segments: Vec<ReflowSegment>,
}

impl MathListFragment {
    pub fn new(ctx: &MathContext) -> Self {
        Self::with_color(ctx.color)
    }

    pub(crate) fn with_color(color: Color) -> Self {
        Self {
            fragments: Vec::new(),
            origin: Point::zero(),
            color,
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
            content_layout_length: 0,
            dirty_index: None,
            editing: false,
            reflow_dirty: true,
            reflow_segments: Vec::new(),
        }
    }

    // Editing.

    /// Opens an edit session. Nesting sessions or opening one over a
    /// pending fix is a caller bug.
    pub fn begin_editing(&mut self) {
        debug_assert!(!self.editing, "edit session already open");
        self.editing = true;
    }

    /// Closes the edit session. The list stays invalid until
    /// [`fix_layout`](Self::fix_layout) runs.
    pub fn end_editing(&mut self) {
        debug_assert!(self.editing, "no edit session open");
        self.editing = false;
    }

    /// Inserts a fragment at the given slot.
    pub fn insert(&mut self, fragment: MathFragment, at: usize) {
        debug_assert!(self.editing, "mutation outside an edit session");
        self.content_layout_length += fragment.layout_length();
        self.fragments.insert(at, fragment.into());
        self.mark_dirty(at);
    }

    /// Appends a fragment.
    pub fn push(&mut self, fragment: MathFragment) {
        self.insert(fragment, self.fragments.len());
    }

    /// Removes and returns the fragment at the given slot.
    pub fn remove(&mut self, at: usize) -> MathFragment {
        debug_assert!(self.editing, "mutation outside an edit session");
        let slot = self.fragments.remove(at);
        self.content_layout_length -= slot.fragment.layout_length();
        self.mark_dirty(at);
        slot.fragment
    }

    /// Removes a range of slots.
    pub fn remove_subrange(&mut self, range: Range<usize>) {
        debug_assert!(self.editing, "mutation outside an edit session");
        let start = range.start;
        for slot in self.fragments.drain(range) {
            self.content_layout_length -= slot.fragment.layout_length();
        }
        self.mark_dirty(start);
    }

    /// Grants mutable access to a nested fragment, invalidating its slot.
    ///
    /// After mutating a child (for example re-fixing a nested list), the
    /// outer list's positions from this slot onward are stale.
    pub fn fragment_mut(&mut self, at: usize) -> &mut MathFragment {
        debug_assert!(self.editing, "mutation outside an edit session");
        self.mark_dirty(at);
        &mut self.fragments[at].fragment
    }

    /// Marks a slot and everything after it as needing a fix.
    pub fn invalidate(&mut self, at: usize) {
        self.mark_dirty(at);
    }

    fn mark_dirty(&mut self, at: usize) {
        let at = at.min(self.fragments.len());
        self.dirty_index = Some(self.dirty_index.map_or(at, |d| d.min(at)));
        self.reflow_dirty = true;
    }

    // Access.

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn get(&self, at: usize) -> Option<&MathFragment> {
        self.fragments.get(at).map(|slot| &slot.fragment)
    }

    pub fn first(&self) -> Option<&MathFragment> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&MathFragment> {
        self.fragments.last().map(|slot| &slot.fragment)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MathFragment> {
        self.fragments.iter().map(|slot| &slot.fragment)
    }

    pub(crate) fn slots(&self) -> &[AnnotatedFragment] {
        &self.fragments
    }

    fn only_element(&self) -> Option<&MathFragment> {
        match self.fragments.as_slice() {
            [slot] => Some(&slot.fragment),
            _ => None,
        }
    }

    // Metrics.

    fn assert_fixed(&self) {
        debug_assert!(
            !self.editing && self.dirty_index.is_none(),
            "metrics read while the layout is stale"
        );
    }

    pub fn width(&self) -> f64 {
        self.assert_fixed();
        self.width
    }

    pub fn ascent(&self) -> f64 {
        self.assert_fixed();
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.assert_fixed();
        self.descent
    }

    pub fn height(&self) -> f64 {
        self.ascent() + self.descent()
    }

    // Box edges in the parent's coordinates.

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.width()
    }

    pub fn mid_x(&self) -> f64 {
        self.origin.x + self.width() / 2.0
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y - self.ascent()
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.descent()
    }

    /// The list occupies one content unit in its parent.
    pub fn layout_length(&self) -> usize {
        1
    }

    /// The number of content units inside the list.
    pub fn content_layout_length(&self) -> usize {
        self.content_layout_length
    }

    // A singleton list is spacing-transparent: it exposes its only
    // element's atom properties to the enclosing list.

    pub fn italics_correction(&self) -> f64 {
        self.only_element().map_or(0.0, |f| f.italics_correction())
    }

    pub fn accent_attachment(&self) -> f64 {
        self.only_element().map_or(self.width() / 2.0, |f| f.accent_attachment())
    }

    pub fn class(&self) -> MathClass {
        self.only_element().map_or(MathClass::Normal, |f| f.class())
    }

    pub fn limits(&self) -> Limits {
        self.only_element().map_or(Limits::Never, |f| f.limits())
    }

    pub fn is_spaced(&self) -> bool {
        self.only_element().is_some_and(|f| f.is_spaced())
    }

    pub fn is_text_like(&self) -> bool {
        self.only_element().is_some_and(|f| f.is_text_like())
    }

    pub(crate) fn kern_at_height(
        &self,
        ctx: &MathContext,
        corner: Corner,
        height: f64,
    ) -> f64 {
        self.only_element().map_or(0.0, |f| f.kern_at_height(ctx, corner, height))
    }

    // Layout.

    /// Re-derives classes, spacing, and positions from the first stale slot.
    pub fn fix_layout(&mut self, ctx: &MathContext) {
        self.fix_layout_continuing(None, ctx);
    }

    /// Like [`fix_layout`](Self::fix_layout), for lists that continue an
    /// outer run whose last atom has the given class.
    pub fn fix_layout_continuing(
        &mut self,
        previous_class: Option<MathClass>,
        ctx: &MathContext,
    ) {
        debug_assert!(!self.editing, "layout fixed mid-edit");
        let Some(dirty) = self.dirty_index.take() else { return };
        self.reflow_dirty = true;

        let count = self.fragments.len();
        // Restart from the last stable atom before the stale slot. Vary
        // atoms are unstable: their resolution depends on what follows.
        let start = self.fragments[..dirty.min(count)]
            .iter()
            .rposition(|slot| !is_variable(slot.fragment.class()))
            .unwrap_or(0);

        if start < count {
            let font = ctx.font();
            let classes: SmallVec<[MathClass; 16]> = self.fragments[start..]
                .iter()
                .map(|slot| slot.fragment.class())
                .collect();
            let previous = if start == 0 { previous_class } else { None };
            let resolved = resolve_math_class(&classes, previous);

            let mut position = if start == 0 {
                0.0
            } else {
                self.fragments[start].fragment.origin().x
            };
            let mut offset = if start == 0 {
                0
            } else {
                self.fragments[start].layout_offset
            };

            for i in start..count {
                let next = self.fragments.get(i + 1).map(|slot| &slot.fragment);
                let spacing = match next {
                    Some(_) => resolve_spacing(
                        resolved[i - start],
                        resolved[i - start + 1],
                        ctx.style,
                    )
                    .map_or(0.0, |em| font.em(em)),
                    None => 0.0,
                };
                let cursor_position = match next {
                    Some(_) => Self::resolve_cursor_position(
                        resolved[i - start],
                        resolved[i - start + 1],
                    ),
                    None => CursorPosition::Upstream,
                };
                let penalty = match next {
                    Some(_) => {
                        resolved[i - start] == MathClass::Binary
                            || (resolved[i - start] == MathClass::Relation
                                && resolved[i - start + 1] != MathClass::Relation)
                    }
                    None => false,
                };

                let slot = &mut self.fragments[i];
                slot.layout_offset = offset;
                offset += slot.fragment.layout_length();
                slot.fragment.set_origin(Point::new(position, 0.0));
                slot.spacing = spacing;
                slot.cursor_position = cursor_position;
                slot.penalty = penalty;
                position += slot.fragment.width() + spacing;
            }
            self.content_layout_length = offset;
            self.width = position;
        } else {
            self.content_layout_length = 0;
            self.width = 0.0;
        }

        self.ascent = 0.0;
        self.descent = 0.0;
        for slot in &self.fragments {
            self.ascent = self.ascent.max(slot.fragment.ascent());
            self.descent = self.descent.max(slot.fragment.descent());
        }
    }

    /// Only Alphabetic and Normal atoms count as text here: a cursor next
    /// to them hugs the glyph, while spacing around operators is split.
    fn resolve_cursor_position(current: MathClass, next: MathClass) -> CursorPosition {
        let text = |class| matches!(class, MathClass::Alphabetic | MathClass::Normal);
        match (text(current), text(next)) {
            (_, true) => CursorPosition::Downstream,
            (true, false) => CursorPosition::Upstream,
            (false, false) => CursorPosition::Middle,
        }
    }

    // Hit-testing.

    /// The content range and the fraction through it under a point.
    ///
    /// Points left of the list resolve to the empty range at offset zero,
    /// points right of it to the empty range at the end.
    pub fn get_layout_range(&self, point: Point) -> (Range<usize>, f64) {
        self.assert_fixed();
        if point.x <= 0.0 {
            return (0..0, 0.0);
        }
        if point.x >= self.width {
            let end = self.content_layout_length;
            return (end..end, 0.0);
        }

        let jj =
            self.fragments.partition_point(|slot| slot.fragment.origin().x < point.x);
        let j = jj.saturating_sub(1);
        let slot = &self.fragments[j];
        let range = slot.layout_offset
            ..slot.layout_offset + slot.fragment.layout_length();
        let width = slot.fragment.width();
        let fraction = if width > 0.0 {
            ((point.x - slot.fragment.origin().x) / width).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (range, fraction)
    }

    /// The x distance from the list origin to the cursor at a content
    /// offset, approached from upstream.
    pub fn cursor_distance_through_upstream(&self, offset: usize) -> f64 {
        self.assert_fixed();
        debug_assert!(offset <= self.content_layout_length);
        if offset == 0 {
            return 0.0;
        }
        let ii = self.fragments.partition_point(|slot| {
            slot.layout_offset + slot.fragment.layout_length() <= offset
        });
        if ii == 0 {
            return 0.0;
        }
        let slot = &self.fragments[ii - 1];
        let max_x = slot.fragment.origin().x + slot.fragment.width();
        max_x
            + match slot.cursor_position {
                CursorPosition::Upstream => 0.0,
                CursorPosition::Middle => slot.spacing / 2.0,
                CursorPosition::Downstream => slot.spacing,
            }
    }

    // Reflow.

    /// Splits the list into unbreakable segments.
    pub fn perform_reflow(&mut self) {
        self.assert_fixed();
        if !self.reflow_dirty {
            return;
        }
        self.reflow_segments.clear();

        let count = self.fragments.len();
        let mut seg_start = 0;
        let mut unused_previous = 0.0;
        for i in 0..count {
            let slot = &self.fragments[i];
            let is_last = i + 1 == count;
            if !slot.penalty && !is_last {
                continue;
            }

            let downstream = if is_last {
                0.0
            } else {
                match slot.cursor_position {
                    CursorPosition::Upstream => 0.0,
                    CursorPosition::Middle => slot.spacing / 2.0,
                    CursorPosition::Downstream => slot.spacing,
                }
            };
            self.reflow_segments.push(self.make_segment(
                seg_start..i + 1,
                unused_previous,
                downstream,
            ));
            unused_previous = slot.spacing - downstream;
            seg_start = i + 1;
        }

        self.reflow_dirty = false;
    }

    fn make_segment(
        &self,
        range: Range<usize>,
        upstream: f64,
        downstream: f64,
    ) -> ReflowSegment {
        let slots = &self.fragments[range.clone()];
        let first = &slots[0];
        let last = &slots[slots.len() - 1];
        let min_x = first.fragment.origin().x;
        let max_x = last.fragment.origin().x + last.fragment.width();
        let offset_range = first.layout_offset
            ..last.layout_offset + last.fragment.layout_length();
        let mut ascent: f64 = 0.0;
        let mut descent: f64 = 0.0;
        for slot in slots {
            ascent = ascent.max(slot.fragment.ascent());
            descent = descent.max(slot.fragment.descent());
        }
        ReflowSegment {
            range,
            offset_range,
            upstream,
            downstream,
            min_x,
            width: max_x - min_x + upstream + downstream,
            ascent,
            descent,
        }
    }

    /// The segments from the last [`perform_reflow`](Self::perform_reflow).
    pub fn reflow_segments(&self) -> &[ReflowSegment] {
        debug_assert!(!self.reflow_dirty, "reflow segments read while stale");
        &self.reflow_segments
    }

    /// The segment containing a content offset.
    pub fn segment_index_containing(&self, offset: usize) -> usize {
        debug_assert!(!self.reflow_dirty, "reflow segments read while stale");
        let ii = self
            .reflow_segments
            .partition_point(|seg| seg.offset_range.end <= offset);
        ii.min(self.reflow_segments.len().saturating_sub(1))
    }

    /// Maps a point in segment coordinates to list coordinates.
    pub fn segment_point_to_list(&self, segment: &ReflowSegment, point: Point) -> Point {
        Point::new(point.x + segment.min_x - segment.upstream, point.y)
    }

    /// Like [`get_layout_range`](Self::get_layout_range), within a segment.
    pub fn segment_layout_range(
        &self,
        segment: &ReflowSegment,
        point: Point,
    ) -> (Range<usize>, f64) {
        if point.x <= 0.0 {
            return (segment.offset_range.start..segment.offset_range.start, 0.0);
        }
        if point.x >= segment.width() {
            return (segment.offset_range.end..segment.offset_range.end, 0.0);
        }
        let (range, fraction) =
            self.get_layout_range(self.segment_point_to_list(segment, point));
        let start = range.start.clamp(segment.offset_range.start, segment.offset_range.end);
        let end = range.end.clamp(segment.offset_range.start, segment.offset_range.end);
        (start..end, fraction)
    }

    /// Like [`cursor_distance_through_upstream`]
    /// (Self::cursor_distance_through_upstream), within a segment.
    pub fn segment_distance_through_upstream(
        &self,
        segment: &ReflowSegment,
        offset: usize,
    ) -> f64 {
        debug_assert!(
            offset >= segment.offset_range.start && offset <= segment.offset_range.end
        );
        if offset == segment.offset_range.start {
            return 0.0;
        }
        self.cursor_distance_through_upstream(offset) - segment.min_x
            + segment.upstream
    }

    // Drawing.

    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        surface.set_color(self.color);
        for slot in &self.fragments {
            slot.fragment.draw(pos + slot.fragment.origin(), surface);
        }
    }

    /// Draws one reflow segment with its upstream slack as left padding.
    pub fn draw_segment(
        &self,
        segment: &ReflowSegment,
        pos: Point,
        surface: &mut dyn RenderSurface,
    ) {
        surface.set_color(self.color);
        let shift = segment.upstream - segment.min_x;
        for slot in &self.fragments[segment.range.clone()] {
            let origin = slot.fragment.origin();
            slot.fragment
                .draw(pos + Point::new(origin.x + shift, origin.y), surface);
        }
    }
}
