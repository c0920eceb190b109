//! The read-only expression tree and the layout pass over it.
//!
//! [`MathExpr`] is the input vocabulary: a plain tree the host hands to
//! [`layout`], which turns it into a measured [`MathFragment`] tree. The
//! pass is the only place style and crampedness transitions happen; every
//! structural fragment receives children already laid out in the right
//! derived context and then fixes its own geometry in the parent context.

use ecow::EcoString;

use crate::class::Limits;
use crate::fragment::{
    AccentFragment, AccentKind, AttachFragment, FracFragment, FracKind,
    GlyphFragment, LeftRightFragment, MathFragment, MatrixFragment, MatrixKind,
    RadicalFragment, TextFragment, UnderOverFragment, UnderOverKind,
};
use crate::list::MathListFragment;
use crate::nav::GridIndex;
use crate::stretch::DelimiterPair;
use crate::style::{MathContext, MathStyle};

/// A read-only mathematical expression.
#[derive(Debug, Clone, PartialEq)]
pub enum MathExpr {
    /// A single character atom.
    Symbol(char),
    /// An embedded text-mode run.
    Text(EcoString),
    /// A named operator like `lim`, upright and with a limits policy.
    Operator { name: EcoString, limits: Limits },
    Frac {
        kind: FracKind,
        numerator: Vec<MathExpr>,
        denominator: Vec<MathExpr>,
    },
    Attach {
        nucleus: Vec<MathExpr>,
        lsub: Option<Vec<MathExpr>>,
        lsup: Option<Vec<MathExpr>>,
        sub: Option<Vec<MathExpr>>,
        sup: Option<Vec<MathExpr>>,
    },
    Radical {
        radicand: Vec<MathExpr>,
        degree: Option<Vec<MathExpr>>,
    },
    /// Row-major cells. Every row must have the same number of columns.
    Matrix {
        kind: MatrixKind,
        rows: Vec<Vec<Vec<MathExpr>>>,
    },
    LeftRight {
        delimiters: DelimiterPair,
        nucleus: Vec<MathExpr>,
    },
    Accent {
        kind: AccentKind,
        accent: char,
        nucleus: Vec<MathExpr>,
    },
    UnderOver {
        kind: UnderOverKind,
        nucleus: Vec<MathExpr>,
    },
}

/// Lays out a sequence of expressions as a measured math list.
pub fn layout_list(exprs: &[MathExpr], ctx: &MathContext) -> MathListFragment {
    let mut list = MathListFragment::new(ctx);
    list.begin_editing();
    for expr in exprs {
        list.push(layout(expr, ctx));
    }
    list.end_editing();
    list.fix_layout(ctx);
    list
}

/// Lays out one expression as a measured fragment.
pub fn layout(expr: &MathExpr, ctx: &MathContext) -> MathFragment {
    match expr {
        MathExpr::Symbol(c) => MathFragment::Glyph(GlyphFragment::new(*c, ctx)),
        MathExpr::Text(text) => {
            MathFragment::Text(TextFragment::text_mode(text, ctx))
        }
        MathExpr::Operator { name, limits } => {
            MathFragment::Text(TextFragment::operator(name, *limits, ctx))
        }
        MathExpr::Frac { kind, numerator, denominator } => {
            let numerator = layout_list(numerator, &ctx.numerator());
            let denominator = layout_list(denominator, &ctx.denominator());
            let mut frac = FracFragment::new(*kind, numerator, denominator);
            frac.fix_layout(ctx);
            MathFragment::Frac(Box::new(frac))
        }
        MathExpr::Attach { nucleus, lsub, lsup, sub, sup } => {
            let script = |exprs: &Option<Vec<MathExpr>>, ctx: &MathContext| {
                exprs.as_deref().map(|exprs| layout_list(exprs, ctx))
            };
            let nucleus = layout_list(nucleus, ctx);
            let mut attach = AttachFragment::new(
                nucleus,
                script(lsub, &ctx.subscript()),
                script(lsup, &ctx.superscript()),
                script(sub, &ctx.subscript()),
                script(sup, &ctx.superscript()),
            );
            attach.fix_layout(ctx);
            MathFragment::Attach(Box::new(attach))
        }
        MathExpr::Radical { radicand, degree } => {
            let radicand = layout_list(radicand, &ctx.with_cramped(true));
            let degree = degree.as_deref().map(|exprs| {
                layout_list(exprs, &ctx.with_style(MathStyle::ScriptScript))
            });
            let mut radical = RadicalFragment::new(radicand, degree);
            radical.fix_layout(ctx);
            MathFragment::Radical(Box::new(radical))
        }
        MathExpr::Matrix { kind, rows } => {
            let row_count = rows.len();
            let column_count = rows.first().map_or(0, Vec::len);
            debug_assert!(row_count > 0 && column_count > 0);
            debug_assert!(rows.iter().all(|row| row.len() == column_count));
            let mut matrix =
                MatrixFragment::new(row_count, column_count, *kind, ctx);
            for (i, row) in rows.iter().enumerate() {
                for (j, cell) in row.iter().enumerate() {
                    *matrix.cell_mut(GridIndex::new(i, j)) = layout_list(cell, ctx);
                }
            }
            matrix.fix_layout(ctx);
            MathFragment::Matrix(Box::new(matrix))
        }
        MathExpr::LeftRight { delimiters, nucleus } => {
            let nucleus = layout_list(nucleus, ctx);
            let mut lr = LeftRightFragment::new(*delimiters, nucleus);
            lr.fix_layout(ctx);
            MathFragment::LeftRight(Box::new(lr))
        }
        MathExpr::Accent { kind, accent, nucleus } => {
            let nucleus = layout_list(nucleus, &ctx.with_cramped(true));
            let mut frag = AccentFragment::new(*kind, *accent, nucleus);
            frag.fix_layout(ctx);
            MathFragment::Accent(Box::new(frag))
        }
        MathExpr::UnderOver { kind, nucleus } => {
            let nucleus_ctx = match kind {
                UnderOverKind::Overline => ctx.with_cramped(true),
                _ => *ctx,
            };
            let nucleus = layout_list(nucleus, &nucleus_ctx);
            let mut frag = UnderOverFragment::new(*kind, nucleus);
            frag.fix_layout(ctx);
            MathFragment::UnderOver(Box::new(frag))
        }
    }
}
