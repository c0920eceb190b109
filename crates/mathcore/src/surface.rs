//! The drawing surface abstraction.

use crate::font::GlyphId;
use crate::geom::{Color, Point};

/// Receives draw commands from a fragment tree.
///
/// The surface is expected to know which font the pass was laid out with;
/// glyph ids are only meaningful for that font. Positions are baseline
/// origins in the surface's coordinate system, y growing downward.
pub trait RenderSurface {
    /// Sets the ink color for subsequent commands.
    fn set_color(&mut self, color: Color);

    /// Draws a single glyph at the given font size.
    fn draw_glyph(&mut self, glyph: GlyphId, size: f64, pos: Point);

    /// Fills a rule. `pos` is the left end of the rule's vertical center
    /// line, `width` its horizontal extent and `thickness` its height.
    fn draw_rule(&mut self, pos: Point, width: f64, thickness: f64);
}

/// A surface that records commands, mainly for tests and debugging.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

/// One recorded draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetColor(Color),
    Glyph { glyph: GlyphId, size: f64, pos: Point },
    Rule { pos: Point, width: f64, thickness: f64 },
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The glyphs drawn so far, in order.
    pub fn glyphs(&self) -> impl Iterator<Item = GlyphId> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Glyph { glyph, .. } => Some(*glyph),
            _ => None,
        })
    }
}

impl RenderSurface for RecordingSurface {
    fn set_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetColor(color));
    }

    fn draw_glyph(&mut self, glyph: GlyphId, size: f64, pos: Point) {
        self.commands.push(DrawCommand::Glyph { glyph, size, pos });
    }

    fn draw_rule(&mut self, pos: Point, width: f64, thickness: f64) {
        self.commands.push(DrawCommand::Rule { pos, width, thickness });
    }
}
