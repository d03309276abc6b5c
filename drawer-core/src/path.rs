//! Vector paths and point containment.
//!
//! A [`Path2D`] records its commands and keeps a [`kurbo::BezPath`] outline
//! in step with them, every subpath closed. Containment uses the non-zero
//! winding rule on that outline, and a point lying exactly on an edge
//! counts as inside.

use kurbo::{BezPath, ParamCurveNearest, Point, Shape};
use serde::{Deserialize, Serialize};

const EDGE_EPSILON: f64 = 1e-4;
const NEAREST_ACCURACY: f64 = 1e-9;

/// A single path construction command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    /// Start a new subpath at a point.
    MoveTo {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Straight line from the current point.
    LineTo {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Closed rectangular subpath.
    Rect {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width (may be negative).
        width: f32,
        /// Height (may be negative).
        height: f32,
    },
    /// Close the current subpath.
    ClosePath,
}

/// Axis-aligned bounds of a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest X.
    pub min_x: f32,
    /// Smallest Y.
    pub min_y: f32,
    /// Largest X.
    pub max_x: f32,
    /// Largest Y.
    pub max_y: f32,
}

/// A retained vector path.
///
/// Serializes as its command list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<PathCommand>", into = "Vec<PathCommand>")]
pub struct Path2D {
    commands: Vec<PathCommand>,
    outline: BezPath,
}

impl PartialEq for Path2D {
    fn eq(&self, other: &Self) -> bool {
        self.commands == other.commands
    }
}

impl From<Vec<PathCommand>> for Path2D {
    fn from(commands: Vec<PathCommand>) -> Self {
        let outline = build_outline(&commands);
        Self { commands, outline }
    }
}

impl From<Path2D> for Vec<PathCommand> {
    fn from(path: Path2D) -> Self {
        path.commands
    }
}

impl Path2D {
    /// Create an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, command: PathCommand) -> &mut Self {
        self.commands.push(command);
        self.outline = build_outline(&self.commands);
        self
    }

    /// Begin a new subpath.
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.push(PathCommand::MoveTo { x, y })
    }

    /// Add a line segment.
    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.push(PathCommand::LineTo { x, y })
    }

    /// Add a closed rectangle.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.push(PathCommand::Rect {
            x,
            y,
            width,
            height,
        })
    }

    /// Close the current subpath. Closing an already closed subpath is a no-op.
    pub fn close_path(&mut self) -> &mut Self {
        if !matches!(self.commands.last(), None | Some(PathCommand::ClosePath)) {
            self.push(PathCommand::ClosePath);
        }
        self
    }

    /// Whether no commands were added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The recorded commands.
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// The outline with every subpath closed.
    #[must_use]
    pub fn outline(&self) -> &BezPath {
        &self.outline
    }

    /// Bounding box of all segments, or `None` when there are none.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn bounds(&self) -> Option<Bounds> {
        self.outline.segments().next()?;
        let rect = self.outline.bounding_box();
        Some(Bounds {
            min_x: rect.x0 as f32,
            min_y: rect.y0 as f32,
            max_x: rect.x1 as f32,
            max_y: rect.y1 as f32,
        })
    }

    /// Non-zero winding containment test.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let point = Point::new(f64::from(x), f64::from(y));
        let on_edge = self.outline.segments().any(|segment| {
            segment.nearest(point, NEAREST_ACCURACY).distance_sq <= EDGE_EPSILON * EDGE_EPSILON
        });
        on_edge || self.outline.contains(point)
    }
}

/// Replay `commands` into a closed outline. A `LineTo` with no open
/// subpath starts one at the last subpath start, as a 2D canvas does.
fn build_outline(commands: &[PathCommand]) -> BezPath {
    let mut outline = BezPath::new();
    let mut start: Option<Point> = None;
    let mut open = false;

    for command in commands {
        match *command {
            PathCommand::MoveTo { x, y } => {
                if open {
                    outline.close_path();
                }
                let point = to_point(x, y);
                outline.move_to(point);
                start = Some(point);
                open = true;
            }
            PathCommand::LineTo { x, y } => {
                let point = to_point(x, y);
                if !open {
                    let from = start.unwrap_or(point);
                    outline.move_to(from);
                    start = Some(from);
                    open = true;
                }
                outline.line_to(point);
            }
            PathCommand::Rect {
                x,
                y,
                width,
                height,
            } => {
                if open {
                    outline.close_path();
                }
                let origin = to_point(x, y);
                outline.move_to(origin);
                outline.line_to(to_point(x + width, y));
                outline.line_to(to_point(x + width, y + height));
                outline.line_to(to_point(x, y + height));
                outline.close_path();
                start = Some(origin);
                open = false;
            }
            PathCommand::ClosePath => {
                if open {
                    outline.close_path();
                    open = false;
                }
            }
        }
    }
    if open {
        outline.close_path();
    }
    outline
}

fn to_point(x: f32, y: f32) -> Point {
    Point::new(f64::from(x), f64::from(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_interior_and_edges() {
        let mut path = Path2D::new();
        path.rect(10.0, 10.0, 50.0, 30.0);

        assert!(path.contains(30.0, 25.0));
        assert!(path.contains(10.0, 10.0));
        assert!(path.contains(60.0, 40.0));
        assert!(path.contains(10.0, 25.0));
        assert!(!path.contains(9.0, 25.0));
        assert!(!path.contains(61.0, 25.0));
        assert!(!path.contains(5.0, 5.0));
    }

    #[test]
    fn negative_rect_is_normalized_by_winding() {
        let mut path = Path2D::new();
        path.rect(60.0, 40.0, -50.0, -30.0);
        assert!(path.contains(30.0, 25.0));
        assert!(!path.contains(0.0, 0.0));
    }

    #[test]
    fn open_triangle_is_implicitly_closed() {
        let mut path = Path2D::new();
        path.move_to(0.0, 0.0).line_to(20.0, 0.0).line_to(0.0, 20.0);

        assert!(path.contains(5.0, 5.0));
        assert!(path.contains(10.0, 10.0));
        assert!(!path.contains(15.0, 15.0));
    }

    #[test]
    fn nested_same_direction_rects_fill_under_nonzero() {
        let mut path = Path2D::new();
        path.rect(0.0, 0.0, 40.0, 40.0).rect(10.0, 10.0, 20.0, 20.0);
        assert!(path.contains(20.0, 20.0));
    }

    #[test]
    fn close_path_is_idempotent() {
        let mut path = Path2D::new();
        path.move_to(0.0, 0.0).line_to(5.0, 0.0).line_to(5.0, 5.0);
        path.close_path().close_path();
        assert_eq!(path.commands().len(), 4);

        let mut empty = Path2D::new();
        empty.close_path();
        assert!(empty.is_empty());
    }

    #[test]
    fn line_after_close_starts_from_subpath_start() {
        let mut path = Path2D::new();
        path.move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(10.0, 10.0);
        path.close_path();
        path.line_to(0.0, 10.0).line_to(-10.0, 10.0);

        assert!(path.contains(-2.0, 6.0));
        assert!(!path.contains(-8.0, 2.0));
        assert_eq!(path.outline().segments().count(), 6);
    }

    #[test]
    fn serializes_as_command_list() {
        let mut path = Path2D::new();
        path.rect(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&path).unwrap();
        assert!(json.starts_with(r#"[{"op":"rect""#));

        let back: Path2D = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert!(back.contains(2.0, 3.0));
    }

    #[test]
    fn bounds_cover_all_subpaths() {
        let mut path = Path2D::new();
        path.rect(10.0, 10.0, 5.0, 5.0).rect(40.0, 2.0, 1.0, 1.0);
        let bounds = path.bounds().expect("bounds");
        assert!((bounds.min_x - 10.0).abs() < f32::EPSILON);
        assert!((bounds.min_y - 2.0).abs() < f32::EPSILON);
        assert!((bounds.max_x - 41.0).abs() < f32::EPSILON);
        assert!((bounds.max_y - 15.0).abs() < f32::EPSILON);
        assert!(Path2D::new().bounds().is_none());
    }
}
