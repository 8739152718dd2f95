//! Greedy word wrap.
//!
//! Lines are built word by word as `line + word + " "` and committed on
//! the first candidate wider than the limit. There is no line cap and no
//! height clipping: long copy runs off the bottom of the canvas.

use crate::design::Color;
use crate::surface::{Font, Surface, TextAlign};

/// A committed line and its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub y: f32,
}

/// Break `text` into baseline-positioned lines no wider than `max_width`.
///
/// Words are split on single spaces and never broken; the first word is
/// always accepted even if it alone overflows. The trailing partial line is
/// always emitted, so empty input yields one line at `y`.
pub fn wrap_text<F>(text: &str, y: f32, max_width: f32, line_height: f32, measure: F) -> Vec<TextLine>
where
    F: Fn(&str) -> f32,
{
    let mut lines = vec![];
    let mut line = String::new();
    let mut current_y = y;

    for (n, word) in text.split(' ').enumerate() {
        let candidate = format!("{line}{word} ");
        if measure(&candidate) > max_width && n > 0 {
            lines.push(TextLine { text: std::mem::take(&mut line), y: current_y });
            line = format!("{word} ");
            current_y += line_height;
        } else {
            line = candidate;
        }
    }

    lines.push(TextLine { text: line, y: current_y });
    lines
}

/// Where and how a block of wrapped copy is drawn.
#[derive(Debug, Clone)]
pub struct TextBlock<'a> {
    pub x: f32,
    pub y: f32,
    pub max_width: f32,
    pub line_height: f32,
    pub font: &'a Font,
    pub align: TextAlign,
    pub color: Color,
}

/// Wrap `text` with the surface's metrics and draw every line.
pub fn draw_wrapped(surface: &mut dyn Surface, text: &str, block: &TextBlock<'_>) -> Vec<TextLine> {
    let lines = wrap_text(text, block.y, block.max_width, block.line_height, |s| {
        surface.measure_text(s, block.font)
    });
    for line in &lines {
        surface.draw_text(&line.text, block.x, line.y, block.font, block.align, block.color);
    }
    lines
}
