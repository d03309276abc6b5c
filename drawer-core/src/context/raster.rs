//! Software raster context.
//!
//! Renders into a [`tiny_skia::Pixmap`] without anti-aliasing, so every
//! pixel is either untouched or takes the fill color exactly. Text is
//! approximated with one filled block per visible glyph, which is enough to
//! see labels in an exported frame; every run is also recorded so callers
//! can inspect what was drawn.

use kurbo::PathEl;
use serde::Serialize;
use tiny_skia::{ColorU8, FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

use super::{DrawingContext, ImageData, TextAlign, TextBaseline};
use crate::{DrawerError, DrawerResult, Path2D, Rgb};

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 10.0;

/// A recorded `fill_text` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    /// Text drawn.
    pub text: String,
    /// Anchor X.
    pub x: f32,
    /// Anchor Y.
    pub y: f32,
    /// Fill color at the time of the call.
    pub color: Rgb,
    /// Alignment at the time of the call.
    pub align: TextAlign,
    /// Baseline at the time of the call.
    pub baseline: TextBaseline,
}

/// In-memory 2D context.
#[derive(Clone)]
pub struct RasterContext {
    pixmap: Pixmap,
    fill_style: Rgb,
    text_align: TextAlign,
    text_baseline: TextBaseline,
    font_size: f32,
    paths_begun: usize,
    text_runs: Vec<TextRun>,
}

impl std::fmt::Debug for RasterContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterContext")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("fill_style", &self.fill_style)
            .field("text_runs", &self.text_runs.len())
            .finish_non_exhaustive()
    }
}

impl RasterContext {
    /// Create a transparent surface.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::InvalidSurface`] if either dimension is zero
    /// or the surface is too large to allocate.
    pub fn new(width: u32, height: u32) -> DrawerResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            DrawerError::InvalidSurface(format!("cannot allocate a {width}x{height} surface"))
        })?;
        Ok(Self {
            pixmap,
            fill_style: Rgb::BLACK,
            text_align: TextAlign::Start,
            text_baseline: TextBaseline::Alphabetic,
            font_size: DEFAULT_FONT_SIZE,
            paths_begun: 0,
            text_runs: Vec::new(),
        })
    }

    /// Create a surface pre-filled with an opaque color.
    ///
    /// # Errors
    ///
    /// Same as [`RasterContext::new`].
    pub fn with_background(width: u32, height: u32, background: Rgb) -> DrawerResult<Self> {
        let mut context = Self::new(width, height)?;
        context.pixmap.fill(tiny_skia::Color::from_rgba8(
            background.r,
            background.g,
            background.b,
            255,
        ));
        Ok(context)
    }

    /// Set the font size used for text layout.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size.max(1.0);
    }

    /// Straight-alpha RGBA value at a pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|px| {
            let color = px.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
    }

    /// Copy of the whole surface.
    #[must_use]
    pub fn image_data(&self) -> ImageData {
        self.get_image_data(0, 0, self.pixmap.width(), self.pixmap.height())
    }

    /// Every text run drawn so far.
    #[must_use]
    pub fn text_runs(&self) -> &[TextRun] {
        &self.text_runs
    }

    /// How many times a fresh path was opened.
    #[must_use]
    pub fn paths_begun(&self) -> usize {
        self.paths_begun
    }

    /// Write the surface as a PNG file.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::Export`] if encoding or writing fails.
    #[cfg(feature = "png")]
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> DrawerResult<()> {
        self.image_data().save_png(path)
    }

    fn glyph_width(&self) -> f32 {
        self.font_size * 0.6
    }

    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        let Rgb { r, g, b } = self.fill_style;
        paint.set_color_rgba8(r, g, b, 255);
        paint.anti_alias = false;
        paint
    }

    /// Normalize negative extents; `None` for an empty rectangle.
    fn rect(x: f32, y: f32, width: f32, height: f32) -> Option<Rect> {
        let (left, right) = if width < 0.0 { (x + width, x) } else { (x, x + width) };
        let (top, bottom) = if height < 0.0 { (y + height, y) } else { (y, y + height) };
        if right - left <= 0.0 || bottom - top <= 0.0 {
            return None;
        }
        Rect::from_ltrb(left, top, right, bottom)
    }

    fn in_bounds(&self, x: i64, y: i64) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|x| *x < self.pixmap.width())?;
        let y = u32::try_from(y).ok().filter(|y| *y < self.pixmap.height())?;
        Some(y as usize * self.pixmap.width() as usize + x as usize)
    }
}

fn to_skia_path(path: &Path2D) -> Option<tiny_skia::Path> {
    #[allow(clippy::cast_possible_truncation)]
    let pt = |p: kurbo::Point| (p.x as f32, p.y as f32);

    let mut builder = PathBuilder::new();
    for element in path.outline().elements() {
        match *element {
            PathEl::MoveTo(p) => {
                let (x, y) = pt(p);
                builder.move_to(x, y);
            }
            PathEl::LineTo(p) => {
                let (x, y) = pt(p);
                builder.line_to(x, y);
            }
            PathEl::QuadTo(c, p) => {
                let ((cx, cy), (x, y)) = (pt(c), pt(p));
                builder.quad_to(cx, cy, x, y);
            }
            PathEl::CurveTo(c1, c2, p) => {
                let ((ax, ay), (bx, by), (x, y)) = (pt(c1), pt(c2), pt(p));
                builder.cubic_to(ax, ay, bx, by, x, y);
            }
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

impl DrawingContext for RasterContext {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn begin_path(&mut self) {
        self.paths_begun += 1;
    }

    fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> ImageData {
        let mut region = ImageData::new(width, height);
        let pixels = self.pixmap.pixels();
        for ry in 0..i64::from(height) {
            for rx in 0..i64::from(width) {
                if let Some(i) = self.in_bounds(i64::from(x) + rx, i64::from(y) + ry) {
                    let color = pixels[i].demultiply();
                    region.set_pixel(
                        rx,
                        ry,
                        [color.red(), color.green(), color.blue(), color.alpha()],
                    );
                }
            }
        }
        region
    }

    fn put_image_data(&mut self, image: &ImageData, x: i32, y: i32) {
        for ry in 0..i64::from(image.height) {
            for rx in 0..i64::from(image.width) {
                let target = self.in_bounds(i64::from(x) + rx, i64::from(y) + ry);
                if let (Some(i), Some([r, g, b, a])) = (target, image.pixel(rx, ry)) {
                    self.pixmap.pixels_mut()[i] = ColorU8::from_rgba(r, g, b, a).premultiply();
                }
            }
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if let Some(rect) = Self::rect(x, y, width, height) {
            let paint = self.paint();
            self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if let Some(rect) = Self::rect(x, y, width, height) {
            let paint = Paint {
                blend_mode: tiny_skia::BlendMode::Clear,
                anti_alias: false,
                ..Paint::default()
            };
            self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    fn fill_path(&mut self, path: &Path2D) {
        let Some(skia_path) = to_skia_path(path) else {
            return;
        };
        let paint = self.paint();
        self.pixmap.fill_path(
            &skia_path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn set_fill_style(&mut self, color: Rgb) {
        self.fill_style = color;
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.text_align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.text_baseline = baseline;
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let advance = self.measure_text(text);
        let glyph_w = self.glyph_width();
        let glyph_h = self.font_size * 0.7;

        let left = match self.text_align {
            TextAlign::Left | TextAlign::Start => x,
            TextAlign::Center => x - advance / 2.0,
            TextAlign::Right | TextAlign::End => x - advance,
        };
        let top = match self.text_baseline {
            TextBaseline::Top | TextBaseline::Hanging => y,
            TextBaseline::Middle => y - glyph_h / 2.0,
            TextBaseline::Alphabetic | TextBaseline::Ideographic | TextBaseline::Bottom => {
                y - glyph_h
            }
        };

        // Glyph blocks sit on whole pixels.
        let top = top.floor();
        let paint = self.paint();
        let mut cursor = left;
        for ch in text.chars() {
            if !ch.is_whitespace() {
                if let Some(block) = Self::rect(cursor.floor(), top, glyph_w - 1.0, glyph_h) {
                    self.pixmap.fill_rect(block, &paint, Transform::identity(), None);
                }
            }
            cursor += glyph_w;
        }

        tracing::trace!("fill_text {text:?} at ({x}, {y})");
        self.text_runs.push(TextRun {
            text: text.to_string(),
            x,
            y,
            color: self.fill_style,
            align: self.text_align,
            baseline: self.text_baseline,
        });
    }

    #[allow(clippy::cast_precision_loss)]
    fn measure_text(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.glyph_width()
    }
}
