//! Pixel focus ring.
//!
//! The ring is found by edge detection on path containment rather than by
//! stroking the path: every inside pixel with an outside 8-neighbour is
//! painted black. For the four axis-aligned directions the pixel on the
//! opposite side is painted too when it is inside, which thickens the
//! ring inwards along straight edges but not along diagonals.
//!
//! The buffer is read once, the ring is computed against containment only
//! and the result is written back in a single pass, so the algorithm never
//! observes its own output.

use std::collections::BTreeSet;

use crate::context::DrawingContext;
use crate::Path2D;

/// Color of ring pixels.
pub const RING_RGBA: [u8; 4] = [0, 0, 0, 255];

const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Containment of every pixel of a surface plus a one pixel margin.
#[derive(Debug, Clone)]
pub struct PathMask {
    width: u32,
    height: u32,
    inside: Vec<bool>,
}

impl PathMask {
    /// Evaluate `path` at each integer coordinate in `-1..=width`, `-1..=height`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn build(context: &dyn DrawingContext, path: &Path2D) -> Self {
        let width = context.width();
        let height = context.height();
        let stride = width as usize + 2;
        let mut inside = Vec::with_capacity(stride * (height as usize + 2));
        // Nothing outside the bounding box can be inside the path.
        let bounds = path.bounds();
        let within = |x: f32, y: f32| {
            bounds.is_some_and(|b| {
                x >= b.min_x - 1.0 && x <= b.max_x + 1.0 && y >= b.min_y - 1.0 && y <= b.max_y + 1.0
            })
        };
        for y in -1..=i64::from(height) {
            for x in -1..=i64::from(width) {
                let (px, py) = (x as f32, y as f32);
                inside.push(within(px, py) && context.is_point_in_path(path, px, py));
            }
        }
        Self {
            width,
            height,
            inside,
        }
    }

    /// Whether `(x, y)` is inside. Coordinates beyond the margin are outside.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        if x < -1 || y < -1 || x > i64::from(self.width) || y > i64::from(self.height) {
            return false;
        }
        let stride = self.width as usize + 2;
        self.inside[(y + 1) as usize * stride + (x + 1) as usize]
    }

    /// Inside pixels that lie on the surface, row by row.
    pub fn inside_pixels(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        (0..i64::from(self.height))
            .flat_map(move |y| (0..i64::from(self.width)).map(move |x| (x, y)))
            .filter(|&(x, y)| self.contains(x, y))
    }
}

/// Pixels that make up the ring for `mask`, deduplicated, row by row.
#[must_use]
pub fn ring_pixels(mask: &PathMask) -> Vec<(i64, i64)> {
    // Keyed by (y, x) so iteration is row-major.
    let mut ring = BTreeSet::new();

    for (x, y) in mask.inside_pixels() {
        for (dx, dy) in NEIGHBOURS {
            if mask.contains(x + dx, y + dy) {
                continue;
            }
            ring.insert((y, x));
            let orthogonal = dx == 0 || dy == 0;
            if orthogonal && mask.contains(x - dx, y - dy) {
                ring.insert((y - dy, x - dx));
            }
        }
    }

    ring.into_iter().map(|(y, x)| (x, y)).collect()
}

/// Paint the ring for `path` onto the context. Returns the pixel count.
pub fn draw_focus_ring(context: &mut dyn DrawingContext, path: &Path2D) -> usize {
    let mask = PathMask::build(context, path);
    let ring = ring_pixels(&mask);

    let mut image = context.get_image_data(0, 0, context.width(), context.height());
    for &(x, y) in &ring {
        image.set_pixel(x, y, RING_RGBA);
    }
    context.put_image_data(&image, 0, 0);

    tracing::trace!("Focus ring painted {} pixels", ring.len());
    ring.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::raster::RasterContext;
    use crate::Rgb;

    fn rect_path(x: f32, y: f32, w: f32, h: f32) -> Path2D {
        let mut path = Path2D::new();
        path.rect(x, y, w, h);
        path
    }

    #[test]
    fn mask_includes_margin() {
        let context = RasterContext::new(4, 4).unwrap();
        let mask = PathMask::build(&context, &rect_path(-1.0, -1.0, 6.0, 6.0));
        assert!(mask.contains(-1, -1));
        assert!(mask.contains(4, 4));
        assert!(!mask.contains(5, 5));
        assert_eq!(mask.inside_pixels().count(), 16);
    }

    #[test]
    fn ring_on_rect_is_two_pixels_thick_on_straight_edges() {
        let context = RasterContext::new(20, 20).unwrap();
        let mask = PathMask::build(&context, &rect_path(5.0, 5.0, 8.0, 6.0));
        let ring = ring_pixels(&mask);

        // Outer border.
        assert!(ring.contains(&(5, 8)));
        assert!(ring.contains(&(13, 8)));
        assert!(ring.contains(&(9, 5)));
        assert!(ring.contains(&(9, 11)));
        // Thickened one pixel inwards.
        assert!(ring.contains(&(6, 8)));
        assert!(ring.contains(&(12, 8)));
        assert!(ring.contains(&(9, 6)));
        assert!(ring.contains(&(9, 10)));
        // Interior untouched.
        assert!(!ring.contains(&(9, 8)));
        assert!(!ring.contains(&(7, 8)));
        // Nothing outside the path.
        assert!(ring.iter().all(|&(x, y)| mask.contains(x, y)));
    }

    #[test]
    fn diagonal_edges_are_not_thickened() {
        let context = RasterContext::new(5, 5).unwrap();
        let mut mask = PathMask::build(&context, &rect_path(-1.0, -1.0, 7.0, 7.0));
        // Punch out pixel (0, 0).
        let stride = mask.width as usize + 2;
        mask.inside[stride + 1] = false;

        let ring = ring_pixels(&mask);
        // (1, 1) only sees the hole diagonally, so (2, 2) stays clear.
        assert_eq!(ring, vec![(1, 0), (2, 0), (0, 1), (1, 1), (0, 2)]);
    }

    #[test]
    fn draw_focus_ring_writes_black_pixels() {
        let mut context = RasterContext::with_background(20, 20, Rgb::WHITE).unwrap();
        let painted = draw_focus_ring(&mut context, &rect_path(5.0, 5.0, 8.0, 6.0));

        assert!(painted > 0);
        assert_eq!(context.pixel(5, 8), Some(RING_RGBA));
        assert_eq!(context.pixel(9, 8), Some([255, 255, 255, 255]));
        assert_eq!(context.pixel(4, 8), Some([255, 255, 255, 255]));
    }
}
