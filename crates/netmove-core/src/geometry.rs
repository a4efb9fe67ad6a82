//! Geometry primitives: positions with elevation, shape points and polylines.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A position in world coordinates with an elevation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Planar location.
    pub point: Point,
    /// Elevation.
    #[serde(default)]
    pub z: f64,
}

impl Position {
    /// Create a planar position (elevation 0).
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
            z: 0.0,
        }
    }

    /// Create a position with an explicit elevation.
    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self {
            point: Point::new(x, y),
            z,
        }
    }

    /// Placeholder for a 1-D offset along a lane, stored as `(offset, 0)`.
    pub fn along_lane(pos_over_lane: f64) -> Self {
        Self::new(pos_over_lane, 0.0)
    }

    /// The lane offset held by a placeholder created with [`Position::along_lane`].
    pub fn pos_over_lane(&self) -> f64 {
        self.point.x
    }

    pub fn y(&self) -> f64 {
        self.point.y
    }

    /// Translate by `(dx, dy, dz)`.
    pub fn add(&mut self, dx: f64, dy: f64, dz: f64) {
        self.point.x += dx;
        self.point.y += dy;
        self.z += dz;
    }

    /// Per-axis comparison: true when every axis differs by less than `max_div`.
    pub fn almost_same(&self, other: &Position, max_div: f64) -> bool {
        (self.point.x - other.point.x).abs() < max_div
            && (self.point.y - other.point.y).abs() < max_div
            && (self.z - other.z).abs() < max_div
    }
}

impl From<Point> for Position {
    fn from(point: Point) -> Self {
        Self { point, z: 0.0 }
    }
}

/// A shape point that may be missing.
///
/// Elements whose geometry is not yet computed carry `Invalid` points. The move
/// engine refuses to offset them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GeometryPoint {
    Valid(Position),
    Invalid,
}

impl GeometryPoint {
    /// Get the position, if valid.
    pub fn position(&self) -> Option<Position> {
        match self {
            GeometryPoint::Valid(position) => Some(*position),
            GeometryPoint::Invalid => None,
        }
    }

    /// Invalid points are never considered the same as anything.
    pub fn almost_same(&self, other: &GeometryPoint, max_div: f64) -> bool {
        match (self, other) {
            (GeometryPoint::Valid(a), GeometryPoint::Valid(b)) => a.almost_same(b, max_div),
            _ => false,
        }
    }
}

impl From<Position> for GeometryPoint {
    fn from(position: Position) -> Self {
        GeometryPoint::Valid(position)
    }
}

impl From<Point> for GeometryPoint {
    fn from(point: Point) -> Self {
        GeometryPoint::Valid(point.into())
    }
}

/// Build a shape from planar points.
pub fn shape_from_points(points: &[Point]) -> Vec<GeometryPoint> {
    points.iter().map(|&p| GeometryPoint::from(p)).collect()
}

/// Remove consecutive points closer than `min_dist` on every axis.
///
/// Never reduces the shape below two points. When the final pair collapses the
/// last point is kept and the one before it removed, so the shape end stays
/// where the user dropped it.
pub fn remove_double_points(points: &mut Vec<GeometryPoint>, min_dist: f64) {
    let mut last = 0;
    let mut i = 1;
    while i < points.len() && points.len() > 2 {
        if points[last].almost_same(&points[i], min_dist) {
            if i + 1 == points.len() {
                points.remove(last);
                break;
            }
            points.remove(i);
        } else {
            last = i;
            i += 1;
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}

/// Offset of the point on segment `start→end` closest to `point`.
///
/// With `perpendicular` set, returns `None` when the perpendicular foot lies
/// outside the segment; otherwise the result is clamped to the segment.
fn nearest_offset_on_segment(
    start: Point,
    end: Point,
    point: Point,
    perpendicular: bool,
) -> Option<f64> {
    let length = start.distance(end);
    if length == 0.0 {
        return Some(0.0);
    }
    let dir: Vec2 = end - start;
    let u = (point - start).dot(dir) / (length * length);
    if !(0.0..=1.0).contains(&u) {
        if perpendicular {
            return None;
        }
        return Some(if u < 0.0 { 0.0 } else { length });
    }
    Some(u * length)
}

fn position_at_segment_offset(start: Point, end: Point, offset: f64) -> Point {
    let length = start.distance(end);
    if length == 0.0 {
        return start;
    }
    start.lerp(end, (offset / length).clamp(0.0, 1.0))
}

/// An open polyline, used for lane center lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Planar length of all segments.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Point at `offset` along the polyline, clamped to its extent.
    pub fn position_at_offset(&self, offset: f64) -> Point {
        let Some(&first) = self.points.first() else {
            return Point::ZERO;
        };
        if offset <= 0.0 {
            return first;
        }
        let mut seen = 0.0;
        for w in self.points.windows(2) {
            let next = w[0].distance(w[1]);
            if seen + next > offset {
                return position_at_segment_offset(w[0], w[1], offset - seen);
            }
            seen += next;
        }
        self.points.last().copied().unwrap_or(first)
    }

    /// Offset along the polyline of the point nearest to `point`.
    ///
    /// In perpendicular mode only feet that fall inside a segment count, plus
    /// inner corners that are closer than any such foot. `None` means no
    /// perpendicular projection exists, which includes a single-point polyline.
    /// In non-perpendicular mode the result is always clamped into `[0, length]`.
    pub fn nearest_offset(&self, point: Point, perpendicular: bool) -> Option<f64> {
        match self.points.len() {
            0 => return None,
            1 => return (!perpendicular).then_some(0.0),
            _ => {}
        }
        let mut nearest = None;
        let mut min_dist_sq = f64::MAX;
        let mut seen = 0.0;
        for (i, w) in self.points.windows(2).enumerate() {
            let (start, end) = (w[0], w[1]);
            if let Some(pos) = nearest_offset_on_segment(start, end, point, perpendicular) {
                let dist_sq = point.distance_squared(position_at_segment_offset(start, end, pos));
                if dist_sq < min_dist_sq {
                    nearest = Some(seen + pos);
                    min_dist_sq = dist_sq;
                }
            }
            if perpendicular && i > 0 && min_dist_sq > 0.0 {
                // Convex side of an inner corner has no perpendicular foot.
                let corner_dist_sq = point.distance_squared(start);
                if corner_dist_sq < min_dist_sq {
                    let prev = self.points[i - 1];
                    let before = nearest_offset_on_segment(prev, start, point, false);
                    let after = nearest_offset_on_segment(start, end, point, false);
                    if before == Some(prev.distance(start)) && after == Some(0.0) {
                        nearest = Some(seen);
                        min_dist_sq = corner_dist_sq;
                    }
                }
            }
            seen += start.distance(end);
        }
        nearest
    }
}
