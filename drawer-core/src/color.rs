//! Color math: hex conversion, relative luminance and contrast.
//!
//! Luminance and contrast follow the WCAG 2 definitions, so a ratio of
//! `3.0` is the threshold used for large text and graphical objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DrawerError, DrawerResult};

/// Minimum ratio accepted by [`find_contrasting_gray`].
pub const MIN_GRAPHIC_CONTRAST: f64 = 3.0;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Fixed color used to highlight focused text.
    pub const ALERT: Self = Self::new(255, 0, 0);

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A gray with all three channels set to `level`.
    #[must_use]
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Channels as an RGBA quadruple at full opacity.
    #[must_use]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Lowercase `#rrggbb` form.
    #[must_use]
    pub fn to_hex(self) -> String {
        to_hex(self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = DrawerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        to_rgb(s)
    }
}

/// Format three channels as a lowercase `#rrggbb` string.
#[must_use]
pub fn to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Parse `#rgb`, `#rrggbb`, `rgb` or `rrggbb`.
///
/// The short form duplicates each digit (`#fa0` is `#ffaa00`).
///
/// # Errors
///
/// Returns [`DrawerError::InvalidColorFormat`] for any other length or for
/// non-hex digits.
pub fn to_rgb(hex: &str) -> DrawerResult<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DrawerError::InvalidColorFormat(hex.to_string()));
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(DrawerError::InvalidColorFormat(hex.to_string())),
    };

    let value = u32::from_str_radix(&expanded, 16)
        .map_err(|_| DrawerError::InvalidColorFormat(hex.to_string()))?;

    #[allow(clippy::cast_possible_truncation)]
    Ok(Rgb::new(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}

/// Relative luminance in `[0, 1]`.
#[must_use]
pub fn luminance(color: Rgb) -> f64 {
    fn linear(channel: u8) -> f64 {
        let v = f64::from(channel) / 255.0;
        if v <= 0.039_28 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    }

    linear(color.r) * 0.2126 + linear(color.g) * 0.7152 + linear(color.b) * 0.0722
}

/// Contrast ratio between two colors, in `[1, 21]`.
#[must_use]
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = luminance(a);
    let lb = luminance(b);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

/// Darkest gray whose contrast against `hex` reaches 3:1.
///
/// Gray levels are scanned upwards from black. When no level qualifies the
/// last level tried (white) is returned instead of an error.
///
/// # Errors
///
/// Returns [`DrawerError::InvalidColorFormat`] if `hex` does not parse.
pub fn find_contrasting_gray(hex: &str) -> DrawerResult<Rgb> {
    let original = to_rgb(hex)?;
    let found = (0..=u8::MAX)
        .map(Rgb::gray)
        .find(|gray| contrast_ratio(original, *gray) >= MIN_GRAPHIC_CONTRAST)
        .unwrap_or(Rgb::gray(u8::MAX));
    Ok(found)
}
