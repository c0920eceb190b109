//! Math classes, limit policies, and the inter-atom spacing table.

pub use unicode_math_class::MathClass;

use crate::geom::Em;
use crate::style::MathStyle;

/// Determines the math class of a character.
///
/// Starts from the Unicode math-class property with a handful of overrides
/// that produce better spacing in practice.
pub fn default_math_class(c: char) -> MathClass {
    match c {
        // Treat as relation rather than punctuation.
        ':' => MathClass::Relation,
        // Treat as ordinary rather than their Unicode classes, which give
        // awkward spacing inside running formulas.
        '.' | '/' | '⋯' | '⋮' | '⋰' | '⋱' => MathClass::Normal,
        // The ASCII stand-ins for proper minus and asterisk operators.
        '-' => MathClass::Vary,
        '*' => MathClass::Binary,
        _ => unicode_math_class::class(c).unwrap_or(MathClass::Normal),
    }
}

/// Whether a class resolves differently depending on its neighbors.
pub(crate) fn is_variable(class: MathClass) -> bool {
    class == MathClass::Vary
}

/// Where an operator's attachments go.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Limits {
    /// Scripts are placed at the corners.
    #[default]
    Never,
    /// Scripts become limits above/below, but only in display style.
    Display,
    /// Scripts are always placed above/below.
    Always,
}

impl Limits {
    /// The default policy for a character.
    pub fn for_char(c: char) -> Self {
        match unicode_math_class::class(c) {
            Some(MathClass::Large) => {
                if is_integral_char(c) {
                    Self::Never
                } else {
                    Self::Display
                }
            }
            Some(MathClass::Relation) => Self::Always,
            _ => Self::Never,
        }
    }

    /// Whether the limits placement is active in the given style.
    pub fn is_active(self, style: MathStyle) -> bool {
        match self {
            Self::Never => false,
            Self::Display => style == MathStyle::Display,
            Self::Always => true,
        }
    }
}

/// Integrals default to corner scripts even in display style.
fn is_integral_char(c: char) -> bool {
    ('∫'..='∳').contains(&c) || ('⨋'..='⨜').contains(&c)
}

/// Resolves the running math classes of a fragment sequence.
///
/// `Vary` atoms become `Binary` between operands and `Normal` elsewhere,
/// following TeX's rules for ambiguous signs. `previous` is the class
/// preceding the sequence, for sequences that continue an outer run.
pub fn resolve_math_class(
    classes: &[MathClass],
    previous: Option<MathClass>,
) -> Vec<MathClass> {
    // The neighbor classes that force Vary to Normal.
    fn match_previous(class: Option<MathClass>) -> bool {
        match class {
            Some(class) => !matches!(
                class,
                MathClass::Normal
                    | MathClass::Alphabetic
                    | MathClass::Closing
                    | MathClass::Fence
                    | MathClass::Special
            ),
            None => true,
        }
    }

    fn match_next(class: MathClass) -> bool {
        matches!(
            class,
            MathClass::Relation | MathClass::Closing | MathClass::Punctuation
        )
    }

    let mut resolved = Vec::with_capacity(classes.len());
    let mut previous = previous;

    for (i, &current) in classes.iter().enumerate() {
        if i + 1 == classes.len() {
            // A trailing Vary is never a binary operator.
            resolved.push(if is_variable(current) { MathClass::Normal } else { current });
            break;
        }
        let next = classes[i + 1];
        if is_variable(current) {
            let class = if match_previous(previous) || match_next(next) {
                MathClass::Normal
            } else {
                MathClass::Binary
            };
            previous = Some(class);
            resolved.push(class);
        } else {
            previous = Some(current);
            resolved.push(current);
        }
    }

    resolved
}

/// The inter-atom spacing between two resolved classes.
///
/// Total over all class pairs; `None` means no spacing. Derived from the
/// TeXbook's spacing matrix, with thin/medium/thick suppressed in the
/// script styles as TeX prescribes.
pub fn resolve_spacing(lhs: MathClass, rhs: MathClass, style: MathStyle) -> Option<Em> {
    use MathClass::*;
    let full = style.is_full_size();

    match (lhs, rhs) {
        // Explicit space mutes automatic spacing.
        (Space, _) | (_, Space) => None,

        // No spacing before punctuation; thin spacing after it, unless in
        // script size.
        (_, Punctuation) => None,
        (Punctuation, _) => full.then_some(Em::THIN),

        // No spacing after opening and before closing delimiters.
        (Opening, _) | (_, Closing) => None,

        // Thick spacing around relations, unless followed by another
        // relation or in script size.
        (Relation, Relation) => None,
        (Relation, _) | (_, Relation) => full.then_some(Em::THICK),

        // Medium spacing around binary operators, unless in script size.
        (Binary, _) | (_, Binary) => full.then_some(Em::MEDIUM),

        // Thin spacing around large operators, except to the left of an
        // opening delimiter.
        (Large, Opening) | (Large, Fence) => None,
        (Large, _) | (_, Large) => Some(Em::THIN),

        // Inner atoms (auto-sized delimiter groups) take thin spacing.
        (Special, _) | (_, Special) => full.then_some(Em::THIN),

        _ => None,
    }
}
