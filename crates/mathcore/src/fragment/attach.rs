//! Scripts and limits attached to a nucleus.

use crate::class::MathClass;
use crate::geom::{clamp_inset, Corner, Point, TOLERANCE};
use crate::list::MathListFragment;
use crate::nav::{MathIndex, RayshootResult, VerticalDirection};
use crate::style::MathContext;
use crate::surface::RenderSurface;

/// A nucleus with up to four scripts.
///
/// Whether the right-hand scripts render as corner scripts or as limits
/// above and below depends on the nucleus's limit policy and the active
/// style, decided afresh at every [`fix_layout`](Self::fix_layout).
#[derive(Debug, Clone)]
pub struct AttachFragment {
    nucleus: MathListFragment,
    lsub: Option<MathListFragment>,
    lsup: Option<MathListFragment>,
    sub: Option<MathListFragment>,
    sup: Option<MathListFragment>,
    pub(crate) origin: Point,
    width: f64,
    ascent: f64,
    descent: f64,
    limits_active: bool,
}

impl AttachFragment {
    pub fn new(
        nucleus: MathListFragment,
        lsub: Option<MathListFragment>,
        lsup: Option<MathListFragment>,
        sub: Option<MathListFragment>,
        sup: Option<MathListFragment>,
    ) -> Self {
        Self {
            nucleus,
            lsub,
            lsup,
            sub,
            sup,
            origin: Point::zero(),
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
            limits_active: false,
        }
    }

    pub fn nucleus(&self) -> &MathListFragment {
        &self.nucleus
    }

    pub fn nucleus_mut(&mut self) -> &mut MathListFragment {
        &mut self.nucleus
    }

    pub fn component(&self, index: MathIndex) -> Option<&MathListFragment> {
        match index {
            MathIndex::Nucleus => Some(&self.nucleus),
            MathIndex::LeftSub => self.lsub.as_ref(),
            MathIndex::LeftSup => self.lsup.as_ref(),
            MathIndex::Sub => self.sub.as_ref(),
            MathIndex::Sup => self.sup.as_ref(),
            _ => None,
        }
    }

    pub fn component_mut(&mut self, index: MathIndex) -> Option<&mut MathListFragment> {
        match index {
            MathIndex::Nucleus => Some(&mut self.nucleus),
            MathIndex::LeftSub => self.lsub.as_mut(),
            MathIndex::LeftSup => self.lsup.as_mut(),
            MathIndex::Sub => self.sub.as_mut(),
            MathIndex::Sup => self.sup.as_mut(),
            _ => None,
        }
    }

    /// Whether the last fix placed `sub`/`sup` as limits.
    pub fn limits_active(&self) -> bool {
        self.limits_active
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
        self.nucleus.class()
    }

    pub fn fix_layout(&mut self, ctx: &MathContext) {
        self.limits_active = self.nucleus.limits().is_active(ctx.style);

        let font = ctx.font();
        let constants = ctx.constants();
        let space_after_script = font.to_points(constants.space_after_script);

        // Slot the four scripts as corners or limits.
        let metrics = |list: &Option<MathListFragment>| {
            list.as_ref().map(|f| (f.width(), f.ascent(), f.descent()))
        };
        let (tl, bl) = (metrics(&self.lsup), metrics(&self.lsub));
        let (t, tr, b, br) = if self.limits_active {
            (metrics(&self.sup), None, metrics(&self.sub), None)
        } else {
            (None, metrics(&self.sup), None, metrics(&self.sub))
        };

        let base_width = self.nucleus.width();
        let base_ascent = self.nucleus.ascent();
        let base_descent = self.nucleus.descent();
        let base_ic = self.nucleus.italics_correction();
        let base_text_like = self.nucleus.is_text_like();

        // Distance from the base's baseline to the corner scripts'
        // baselines.
        let (tx_shift, bx_shift) =
            if tl.is_none() && tr.is_none() && bl.is_none() && br.is_none() {
                (0.0, 0.0)
            } else {
                compute_script_shifts(
                    ctx,
                    (base_ascent, base_descent, base_text_like),
                    tl,
                    tr,
                    bl,
                    br,
                )
            };

        // Distance from the base's baseline to the limits' baselines.
        let t_shift = t.map_or(0.0, |(_, _, t_descent)| {
            let gap_min = font.to_points(constants.upper_limit_gap_min);
            let rise_min = font.to_points(constants.upper_limit_baseline_rise_min);
            base_ascent + rise_min.max(gap_min + t_descent)
        });
        let b_shift = b.map_or(0.0, |(_, b_ascent, _)| {
            let gap_min = font.to_points(constants.lower_limit_gap_min);
            let drop_min = font.to_points(constants.lower_limit_baseline_drop_min);
            base_descent + drop_min.max(gap_min + b_ascent)
        });

        let ascent = base_ascent
            .max(tx_shift + tr.map_or(0.0, |m| m.1))
            .max(tx_shift + tl.map_or(0.0, |m| m.1))
            .max(t_shift + t.map_or(0.0, |m| m.1));
        let descent = base_descent
            .max(bx_shift + br.map_or(0.0, |m| m.2))
            .max(bx_shift + bl.map_or(0.0, |m| m.2))
            .max(b_shift + b.map_or(0.0, |m| m.2));

        // The upper (lower) limit is shifted right (left) of the base's
        // center by half the base's italic correction.
        let delta = base_ic / 2.0;
        let (t_pre_width, t_post_width) = t.map_or((0.0, 0.0), |(t_width, ..)| {
            let half = (t_width - base_width) / 2.0;
            (half - delta, half + delta)
        });
        let (b_pre_width, b_post_width) = b.map_or((0.0, 0.0), |(b_width, ..)| {
            let half = (b_width - base_width) / 2.0;
            (half + delta, half - delta)
        });

        // Pre-scripts extend left of the base by their width plus kerning,
        // with the script space at the far left.
        let kern = |script: &Option<MathListFragment>, shift: f64, corner: Corner| {
            script.as_ref().map_or(0.0, |script| {
                math_kern(ctx, &self.nucleus, script, shift, corner)
            })
        };
        let tl_kern = kern(&self.lsup, tx_shift, Corner::TopLeft);
        let bl_kern = kern(&self.lsub, bx_shift, Corner::BottomLeft);
        let tl_pre_width = tl
            .map_or(0.0, |(w, ..)| space_after_script + w + tl_kern);
        let bl_pre_width = bl
            .map_or(0.0, |(w, ..)| space_after_script + w + bl_kern);

        // Post-scripts extend right of the base by their width plus
        // kerning. The base's box already folds in its italic correction,
        // so the post-subscript moves back left by that amount.
        let (tr_kern, br_kern) = if self.limits_active {
            (0.0, 0.0)
        } else {
            (
                kern(&self.sup, tx_shift, Corner::TopRight),
                kern(&self.sub, bx_shift, Corner::BottomRight) - base_ic,
            )
        };
        let tr_post_width =
            tr.map_or(0.0, |(w, ..)| space_after_script + w + tr_kern);
        let br_post_width =
            br.map_or(0.0, |(w, ..)| space_after_script + w + br_kern);

        let pre_width = t_pre_width
            .max(b_pre_width)
            .max(tl_pre_width)
            .max(bl_pre_width)
            .max(0.0);
        let post_width = t_post_width
            .max(b_post_width)
            .max(tr_post_width)
            .max(br_post_width)
            .max(0.0);
        self.width = pre_width + base_width + post_width;
        self.ascent = ascent;
        self.descent = descent;

        self.nucleus.origin = Point::new(pre_width, 0.0);
        if let Some(lsup) = &mut self.lsup {
            lsup.origin =
                Point::new(pre_width - tl_pre_width + space_after_script, -tx_shift);
        }
        if let Some(lsub) = &mut self.lsub {
            lsub.origin =
                Point::new(pre_width - bl_pre_width + space_after_script, bx_shift);
        }
        if self.limits_active {
            if let Some(sup) = &mut self.sup {
                sup.origin = Point::new(pre_width - t_pre_width, -t_shift);
            }
            if let Some(sub) = &mut self.sub {
                sub.origin = Point::new(pre_width - b_pre_width, b_shift);
            }
        } else {
            if let Some(sup) = &mut self.sup {
                sup.origin = Point::new(pre_width + base_width + tr_kern, -tx_shift);
            }
            if let Some(sub) = &mut self.sub {
                sub.origin = Point::new(pre_width + base_width + br_kern, bx_shift);
            }
        }
    }

    pub fn draw(&self, pos: Point, surface: &mut dyn RenderSurface) {
        self.nucleus.draw(pos + self.nucleus.origin, surface);
        for script in [&self.lsup, &self.lsub, &self.sup, &self.sub]
            .into_iter()
            .flatten()
        {
            script.draw(pos + script.origin, surface);
        }
    }

    pub fn get_math_index(&self, point: Point) -> Option<MathIndex> {
        if !self.limits_active {
            // Left scripts sit strictly to the left of the nucleus.
            if point.x < self.nucleus.min_x() {
                if let Some(lsup) = &self.lsup {
                    if point.y <= lsup.max_y() {
                        return Some(MathIndex::LeftSup);
                    }
                }
                if let Some(lsub) = &self.lsub {
                    if point.y >= lsub.min_y() {
                        return Some(MathIndex::LeftSub);
                    }
                }
                return None;
            }

            if let Some(sub) = &self.sub {
                if point.y >= sub.min_y() && point.x >= sub.min_x() {
                    return Some(MathIndex::Sub);
                }
            }

            if point.x <= self.nucleus.max_x() {
                return Some(MathIndex::Nucleus);
            }

            if let Some(sup) = &self.sup {
                if point.y <= sup.max_y() {
                    return Some(MathIndex::Sup);
                }
            }
            None
        } else {
            if let Some(sub) = &self.sub {
                if point.y >= sub.min_y() {
                    return Some(MathIndex::Sub);
                }
            }
            if let Some(sup) = &self.sup {
                if point.y <= sup.max_y() {
                    return Some(MathIndex::Sup);
                }
            }
            Some(MathIndex::Nucleus)
        }
    }

    pub fn rayshoot(
        &self,
        point: Point,
        component: MathIndex,
        direction: VerticalDirection,
    ) -> Option<RayshootResult> {
        // Lands just inside a script's bottom edge.
        let bottom_of = |list: &MathListFragment| {
            let x = clamp_inset(point.x, list.min_x(), list.max_x(), TOLERANCE);
            Point::new(x, list.max_y())
        };
        let top_of = |list: &MathListFragment| {
            let x = clamp_inset(point.x, list.min_x(), list.max_x(), TOLERANCE);
            Point::new(x, list.min_y())
        };

        match direction {
            VerticalDirection::Up => match component {
                MathIndex::Nucleus => {
                    // From the left half of the nucleus, prefer the left
                    // superscript; from the right half, the right one.
                    let (first, second) = if point.x < self.nucleus.mid_x() {
                        (&self.lsup, &self.sup)
                    } else {
                        (&self.sup, &self.lsup)
                    };
                    Some(
                        first
                            .as_ref()
                            .or(second.as_ref())
                            .map(|s| RayshootResult::new(bottom_of(s), true))
                            .unwrap_or(RayshootResult::new(
                                point.with_y(-self.ascent),
                                false,
                            )),
                    )
                }
                MathIndex::LeftSub => {
                    Some(RayshootResult::new(bottom_of(&self.nucleus), true))
                }
                MathIndex::Sub => {
                    // The nucleus and subscript boxes may overlap; stay
                    // above both.
                    let x = clamp_inset(
                        point.x,
                        self.nucleus.min_x(),
                        self.nucleus.max_x(),
                        TOLERANCE,
                    );
                    let y = self
                        .sub
                        .as_ref()
                        .map_or(self.nucleus.max_y(), |sub| {
                            self.nucleus.max_y().min(sub.min_y())
                        });
                    Some(RayshootResult::new(Point::new(x, y), true))
                }
                MathIndex::LeftSup | MathIndex::Sup => {
                    Some(RayshootResult::new(point.with_y(-self.ascent), false))
                }
                _ => None,
            },
            VerticalDirection::Down => match component {
                MathIndex::Nucleus => {
                    let (first, second) = if point.x < self.nucleus.mid_x() {
                        (&self.lsub, &self.sub)
                    } else {
                        (&self.sub, &self.lsub)
                    };
                    Some(
                        first
                            .as_ref()
                            .or(second.as_ref())
                            .map(|s| RayshootResult::new(top_of(s), true))
                            .unwrap_or(RayshootResult::new(
                                point.with_y(self.descent),
                                false,
                            )),
                    )
                }
                MathIndex::LeftSup | MathIndex::Sup => {
                    Some(RayshootResult::new(top_of(&self.nucleus), true))
                }
                MathIndex::LeftSub | MathIndex::Sub => {
                    Some(RayshootResult::new(point.with_y(self.descent), false))
                }
                _ => None,
            },
        }
    }
}

/// The distance from the base's baseline to the superscripts' and
/// subscripts' baselines. Script metrics are `(width, ascent, descent)`.
fn compute_script_shifts(
    ctx: &MathContext,
    (base_ascent, base_descent, base_text_like): (f64, f64, bool),
    tl: Option<(f64, f64, f64)>,
    tr: Option<(f64, f64, f64)>,
    bl: Option<(f64, f64, f64)>,
    br: Option<(f64, f64, f64)>,
) -> (f64, f64) {
    let font = ctx.font();
    let constants = ctx.constants();

    let sup_shift_up = font.to_points(if ctx.cramped {
        constants.superscript_shift_up_cramped
    } else {
        constants.superscript_shift_up
    });
    let sup_bottom_min = font.to_points(constants.superscript_bottom_min);
    let sup_bottom_max_with_sub =
        font.to_points(constants.superscript_bottom_max_with_subscript);
    let sup_drop_max = font.to_points(constants.superscript_baseline_drop_max);
    let gap_min = font.to_points(constants.sub_superscript_gap_min);
    let sub_shift_down = font.to_points(constants.subscript_shift_down);
    let sub_top_max = font.to_points(constants.subscript_top_max);
    let sub_drop_min = font.to_points(constants.subscript_baseline_drop_min);

    let mut shift_up: f64 = 0.0;
    let mut shift_down: f64 = 0.0;

    if tl.is_some() || tr.is_some() {
        shift_up = shift_up
            .max(sup_shift_up)
            .max(if base_text_like { 0.0 } else { base_ascent - sup_drop_max })
            .max(sup_bottom_min + tl.map_or(0.0, |m| m.2))
            .max(sup_bottom_min + tr.map_or(0.0, |m| m.2));
    }

    if bl.is_some() || br.is_some() {
        shift_down = shift_down
            .max(sub_shift_down)
            .max(if base_text_like { 0.0 } else { base_descent + sub_drop_min })
            .max(bl.map_or(0.0, |m| m.1) - sub_top_max)
            .max(br.map_or(0.0, |m| m.1) - sub_top_max);
    }

    // Scripts on the same side must keep a minimum vertical gap. The
    // superscript may rise until its bottom reaches the cap, the rest is
    // split between the two shifts.
    for (sup, sub) in [(tl, bl), (tr, br)] {
        let (Some(sup), Some(sub)) = (sup, sub) else { continue };
        let sup_bottom = shift_up - sup.2;
        let sub_top = sub.1 - shift_down;
        let gap = sup_bottom - sub_top;
        if gap >= gap_min {
            continue;
        }
        let increase = gap_min - gap;
        let sup_only = (sup_bottom_max_with_sub - sup_bottom).clamp(0.0, increase);
        let rest = (increase - sup_only) / 2.0;
        shift_up += sup_only + rest;
        shift_down += rest;
    }

    (shift_up, shift_down)
}

/// The kerning between the base and a script at one corner.
///
/// Positive moves the script away from the base. Kern values are sampled
/// at two correction heights, once where the script crosses the base's
/// edge and once where the base crosses the script's; the larger sum wins
/// so that glyphs never collide.
fn math_kern(
    ctx: &MathContext,
    base: &MathListFragment,
    script: &MathListFragment,
    shift: f64,
    corner: Corner,
) -> f64 {
    let (height_top, height_bottom) = match corner {
        Corner::TopLeft | Corner::TopRight => {
            (base.ascent() - shift, shift - script.descent())
        }
        Corner::BottomLeft | Corner::BottomRight => {
            (script.ascent() - shift, shift - base.descent())
        }
    };

    let summed = |height: f64| {
        base.kern_at_height(ctx, corner, height)
            + script.kern_at_height(ctx, corner.opposite(), height)
    };

    summed(height_top).max(summed(height_bottom))
}
