//! Drawing context abstraction.
//!
//! The host supplies a 2D context; shapes only ever talk to it through
//! [`DrawingContext`]. [`raster::RasterContext`] is a software
//! implementation backed by a `tiny-skia` pixmap.

pub mod raster;

use serde::{Deserialize, Serialize};

use crate::{Path2D, Rgb};

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Anchor is the left edge.
    #[default]
    Left,
    /// Anchor is the right edge.
    Right,
    /// Anchor is the middle.
    Center,
    /// Same as `Left` for left-to-right text.
    Start,
    /// Same as `Right` for left-to-right text.
    End,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    /// Anchor is the top of the em box.
    Top,
    /// Anchor is the hanging baseline.
    Hanging,
    /// Anchor is the middle of the em box.
    #[default]
    Middle,
    /// Anchor is the alphabetic baseline.
    Alphabetic,
    /// Anchor is the ideographic baseline.
    Ideographic,
    /// Anchor is the bottom of the em box.
    Bottom,
}

/// A rectangular block of RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl ImageData {
    /// Fully transparent block of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    /// RGBA value at a pixel, `None` outside the block.
    #[must_use]
    pub fn pixel(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        self.index(x, y).map(|i| {
            let mut px = [0u8; 4];
            px.copy_from_slice(&self.data[i..i + 4]);
            px
        })
    }

    /// Overwrite a pixel. Writes outside the block are ignored.
    pub fn set_pixel(&mut self, x: i64, y: i64, rgba: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.data[i..i + 4].copy_from_slice(&rgba);
        }
    }

    /// Encode the block as a PNG file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DrawerError::Export`] if encoding or writing fails.
    #[cfg(feature = "png")]
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> crate::DrawerResult<()> {
        let path = path.as_ref();
        let image = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| crate::DrawerError::Export("buffer size mismatch".to_string()))?;
        image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| crate::DrawerError::Export(e.to_string()))?;
        tracing::debug!("Saved {}x{} frame to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// The 2D drawing primitives shapes rely on.
pub trait DrawingContext {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Open a fresh current path.
    fn begin_path(&mut self);

    /// Whether `(x, y)` lies inside `path`.
    fn is_point_in_path(&self, path: &Path2D, x: f32, y: f32) -> bool {
        path.contains(x, y)
    }

    /// Copy a region of the pixel buffer.
    fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> ImageData;

    /// Replace a region of the pixel buffer.
    fn put_image_data(&mut self, image: &ImageData, x: i32, y: i32);

    /// Fill a rectangle with the current fill style.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Reset a rectangle to transparent black.
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Fill `path` with the current fill style under the non-zero rule.
    fn fill_path(&mut self, path: &Path2D);

    /// Set the fill color used by `fill_rect` and `fill_text`.
    fn set_fill_style(&mut self, color: Rgb);

    /// Set horizontal text alignment.
    fn set_text_align(&mut self, align: TextAlign);

    /// Set vertical text alignment.
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    /// Draw a line of text at an anchor point.
    fn fill_text(&mut self, text: &str, x: f32, y: f32);

    /// Advance width of `text` in pixels.
    fn measure_text(&self, text: &str) -> f32;
}
