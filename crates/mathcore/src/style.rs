//! Math styles and the per-scope style context.

use crate::font::{MathConstants, MathFont, ScaledFont};
use crate::geom::Color;
use crate::stretch::StretchCache;

/// The four TeX math styles, from largest to smallest.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum MathStyle {
    Display,
    Text,
    Script,
    ScriptScript,
}

impl MathStyle {
    /// The style for numerators and denominators of a fraction laid out in
    /// this style.
    pub fn fraction_style(self) -> Self {
        match self {
            Self::Display => Self::Text,
            Self::Text => Self::Script,
            Self::Script | Self::ScriptScript => Self::ScriptScript,
        }
    }

    /// The style for sub- and superscripts attached in this style.
    pub fn script_style(self) -> Self {
        match self {
            Self::Display | Self::Text => Self::Script,
            Self::Script | Self::ScriptScript => Self::ScriptScript,
        }
    }

    /// Whether this is one of the two full-size styles.
    pub fn is_full_size(self) -> bool {
        matches!(self, Self::Display | Self::Text)
    }
}

/// The immutable per-scope bundle threaded through a layout pass.
///
/// A context is narrowed, never mutated: descending into a structural
/// fragment's children produces derived contexts via [`with_style`] and
/// [`with_cramped`].
///
/// [`with_style`]: Self::with_style
/// [`with_cramped`]: Self::with_cramped
#[derive(Copy, Clone)]
pub struct MathContext<'a> {
    font: &'a dyn MathFont,
    /// The font size of the full-size styles, in points.
    base_size: f64,
    pub style: MathStyle,
    pub cramped: bool,
    pub color: Color,
    cache: &'a StretchCache,
}

impl<'a> MathContext<'a> {
    pub fn new(
        font: &'a dyn MathFont,
        font_size: f64,
        style: MathStyle,
        color: Color,
        cache: &'a StretchCache,
    ) -> Self {
        Self { font, base_size: font_size, style, cramped: false, color, cache }
    }

    /// The same context with a different style.
    pub fn with_style(self, style: MathStyle) -> Self {
        Self { style, ..self }
    }

    /// The same context with the cramped flag set.
    pub fn with_cramped(self, cramped: bool) -> Self {
        Self { cramped, ..self }
    }

    /// The context for a fraction's numerator.
    pub fn numerator(self) -> Self {
        self.with_style(self.style.fraction_style())
    }

    /// The context for a fraction's denominator, which is always cramped.
    pub fn denominator(self) -> Self {
        self.with_style(self.style.fraction_style()).with_cramped(true)
    }

    /// The context for a superscript.
    pub fn superscript(self) -> Self {
        self.with_style(self.style.script_style())
    }

    /// The context for a subscript, which is always cramped.
    pub fn subscript(self) -> Self {
        self.with_style(self.style.script_style()).with_cramped(true)
    }

    /// The font's MATH constants.
    pub fn constants(&self) -> &'a MathConstants {
        self.font.constants()
    }

    /// The font scaled for the current style.
    ///
    /// Script and script-script scopes scale the base size by the font's
    /// MATH percentage constants.
    pub fn font(&self) -> ScaledFont<'a> {
        let constants = self.font.constants();
        let percent = match self.style {
            MathStyle::Display | MathStyle::Text => 100.0,
            MathStyle::Script => constants.script_percent_scale_down,
            MathStyle::ScriptScript => constants.script_script_percent_scale_down,
        };
        let percent = if percent > 0.0 { percent } else { 100.0 };
        ScaledFont { font: self.font, size: self.base_size * percent / 100.0 }
    }

    pub(crate) fn cache(&self) -> &'a StretchCache {
        self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::MathStyle::*;

    #[test]
    fn fraction_style_saturates() {
        assert_eq!(Display.fraction_style(), Text);
        assert_eq!(Text.fraction_style(), Script);
        assert_eq!(Script.fraction_style(), ScriptScript);
        assert_eq!(ScriptScript.fraction_style(), ScriptScript);
    }

    #[test]
    fn script_style_is_idempotent_once_script_script() {
        for style in [Display, Text, Script, ScriptScript] {
            let once = style.script_style();
            assert_eq!(once.script_style().script_style(), once.script_style());
        }
        assert_eq!(Display.script_style(), Script);
        assert_eq!(Script.script_style(), ScriptScript);
    }
}
