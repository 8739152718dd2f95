//! Drawing Surface - the only seam between layout and pixels
//!
//! Archetype layouts talk to a [`Surface`]; [`RasterSurface`] is the
//! software rasteriser behind the exported artifacts and
//! [`RecordingSurface`] captures draw calls for inspection.

use image::{Rgba, RgbaImage};
use serde::Serialize;
use thiserror::Error;

use crate::design::Color;
use crate::glyphs::{self, GLYPH_COLUMNS, GLYPH_ROWS};
use crate::templates::TemplateDimensions;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Cannot allocate an empty {0}x{1} surface")]
    Empty(u32, u32),

    #[error("Surface of {pixels} pixels exceeds the limit of {max}")]
    TooLarge { pixels: u64, max: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Two-stop linear gradient between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub from: Color,
    pub to: Color,
}

impl LinearGradient {
    /// Interpolation parameter of a point projected onto the gradient axis.
    pub fn offset_at(&self, x: f32, y: f32) -> f32 {
        let (dx, dy) = (self.end.0 - self.start.0, self.end.1 - self.start.1);
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return 0.0;
        }
        (((x - self.start.0) * dx + (y - self.start.1) * dy) / len_sq).clamp(0.0, 1.0)
    }

    pub fn color_at(&self, x: f32, y: f32) -> Color {
        self.from.lerp(self.to, self.offset_at(x, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A sized font from a CSS-style family stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub bold: bool,
}

impl Font {
    pub fn regular(family: &str, size: f32) -> Self {
        Self { family: family.to_string(), size, bold: false }
    }

    pub fn bold(family: &str, size: f32) -> Self {
        Self { family: family.to_string(), size, bold: true }
    }

    pub fn advance(&self) -> f32 {
        glyphs::advance_ratio(&self.family, self.bold) * self.size
    }

    /// Width of `text` in pixels: one fixed advance per character.
    pub fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance()
    }
}

/// 2D drawing capability used by the archetype layouts.
pub trait Surface {
    fn dimensions(&self) -> TemplateDimensions;

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32);

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, alpha: f32);

    /// Cover the whole surface with a gradient.
    fn draw_gradient_background(&mut self, gradient: &LinearGradient);

    fn measure_text(&self, text: &str, font: &Font) -> f32;

    /// Draw one line of text with its alphabetic baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, font: &Font, align: TextAlign, color: Color);
}

fn aligned_left(x: f32, width: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Left => x,
        TextAlign::Center => x - width / 2.0,
        TextAlign::Right => x - width,
    }
}

// --- Raster ---

/// Software RGBA rasteriser. Starts fully transparent.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    pub fn new(dimensions: TemplateDimensions, max_pixels: u64) -> Result<Self, SurfaceError> {
        let TemplateDimensions { width, height } = dimensions;
        if width == 0 || height == 0 {
            return Err(SurfaceError::Empty(width, height));
        }
        let pixels = width as u64 * height as u64;
        if pixels > max_pixels {
            return Err(SurfaceError::TooLarge { pixels, max: max_pixels });
        }
        Ok(Self { image: RgbaImage::new(width, height) })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Pixel span covered by `[start, end)`; a pixel is in when its centre is.
    fn span(start: f32, end: f32, limit: u32) -> std::ops::Range<u32> {
        let clamp = |v: f32| v.round().clamp(0.0, limit as f32) as u32;
        clamp(start)..clamp(end)
    }

    fn blend(&mut self, x: u32, y: u32, color: Color, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        let dst = self.image.get_pixel_mut(x, y);
        if alpha >= 1.0 {
            *dst = Rgba([color.r, color.g, color.b, 255]);
            return;
        }
        let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
        let out_alpha = alpha * 255.0 + dst[3] as f32 * (1.0 - alpha);
        *dst = Rgba([
            mix(color.r, dst[0]),
            mix(color.g, dst[1]),
            mix(color.b, dst[2]),
            out_alpha.round() as u8,
        ]);
    }
}

impl Surface for RasterSurface {
    fn dimensions(&self) -> TemplateDimensions {
        TemplateDimensions::new(self.image.width(), self.image.height())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32) {
        let xs = Self::span(rect.x, rect.x + rect.width, self.image.width());
        let ys = Self::span(rect.y, rect.y + rect.height, self.image.height());
        for y in ys {
            for x in xs.clone() {
                self.blend(x, y, color, alpha);
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, alpha: f32) {
        let xs = Self::span(cx - radius, cx + radius, self.image.width());
        let ys = Self::span(cy - radius, cy + radius, self.image.height());
        let r_sq = radius * radius;
        for y in ys {
            let dy = y as f32 + 0.5 - cy;
            for x in xs.clone() {
                let dx = x as f32 + 0.5 - cx;
                if dx * dx + dy * dy <= r_sq {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    fn draw_gradient_background(&mut self, gradient: &LinearGradient) {
        for (x, y, px) in self.image.enumerate_pixels_mut() {
            let c = gradient.color_at(x as f32 + 0.5, y as f32 + 0.5);
            *px = Rgba([c.r, c.g, c.b, 255]);
        }
    }

    fn measure_text(&self, text: &str, font: &Font) -> f32 {
        font.measure(text)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font: &Font, align: TextAlign, color: Color) {
        let advance = font.advance();
        let cell_w = advance / (GLYPH_COLUMNS + 1) as f32;
        let cell_h = font.size / 10.0;
        let stroke_w = if font.bold { cell_w * 1.35 } else { cell_w };
        let mut pen = aligned_left(x, font.measure(text), align);

        for c in text.chars() {
            let columns = glyphs::glyph(c);
            for col in 0..GLYPH_COLUMNS {
                for row in 0..GLYPH_ROWS {
                    if glyphs::is_lit(&columns, col, row) {
                        let top = y - (GLYPH_ROWS - row) as f32 * cell_h;
                        let cell = Rect::new(pen + col as f32 * cell_w, top, stroke_w, cell_h);
                        self.fill_rect(cell, color, 1.0);
                    }
                }
            }
            pen += advance;
        }
    }
}

// --- Recording ---

/// One captured draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Color, alpha: f32 },
    FillCircle { cx: f32, cy: f32, radius: f32, color: Color, alpha: f32 },
    Gradient(LinearGradient),
    Text { text: String, x: f32, y: f32, font: Font, align: TextAlign, color: Color },
}

/// Surface that records draw calls instead of rasterising them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    dimensions: TemplateDimensions,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(dimensions: TemplateDimensions) -> Self {
        Self { dimensions, ops: vec![] }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text draws in call order as `(text, y)` pairs.
    pub fn text_lines(&self) -> Vec<(&str, f32)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, y, .. } => Some((text.as_str(), *y)),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::FillCircle { .. })).count()
    }

    /// Shapes drawn with partial opacity; only accent geometry uses it.
    pub fn translucent_shapes(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| match op {
                DrawOp::FillRect { alpha, .. } | DrawOp::FillCircle { alpha, .. } => *alpha < 1.0,
                _ => false,
            })
            .count()
    }
}

impl Surface for RecordingSurface {
    fn dimensions(&self) -> TemplateDimensions {
        self.dimensions
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32) {
        self.ops.push(DrawOp::FillRect { rect, color, alpha });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, alpha: f32) {
        self.ops.push(DrawOp::FillCircle { cx, cy, radius, color, alpha });
    }

    fn draw_gradient_background(&mut self, gradient: &LinearGradient) {
        self.ops.push(DrawOp::Gradient(*gradient));
    }

    fn measure_text(&self, text: &str, font: &Font) -> f32 {
        font.measure(text)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font: &Font, align: TextAlign, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font: font.clone(),
            align,
            color,
        });
    }
}
