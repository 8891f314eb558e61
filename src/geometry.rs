//! Hit-test primitives shared by all canvas controls.
//!
//! Coordinates are logical canvas units with the y axis pointing down, the
//! same orientation the windowing layer reports pointer positions in.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A point (or offset) on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product, positive when `other` is
    /// clockwise of `self` on screen.
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn norm2(self) -> f64 {
        self.dot(self)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Squared distance between two points.
pub fn distance2(a: Point, b: Point) -> f64 {
    (a - b).norm2()
}

/// True when `p` lies on or inside the circle.
pub fn inside_circle(p: Point, center: Point, radius: f64) -> bool {
    distance2(p, center) <= radius * radius
}

/// Result of projecting a point onto the line through a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Signed perpendicular offset from the line, in canvas units.
    pub lateral: f64,
    /// Position along the segment: 0 at the start, 1 at the end. Not clamped.
    pub along: f64,
}

/// Projects `p` onto the line through `start` and `end`.
///
/// The segment must have non-zero length; controls check this when they are
/// constructed.
pub fn point_to_segment(p: Point, start: Point, end: Point) -> SegmentProjection {
    let dir = end - start;
    let len2 = dir.norm2();
    let rel = p - start;
    SegmentProjection {
        lateral: dir.cross(rel) / len2.sqrt(),
        along: dir.dot(rel) / len2,
    }
}

/// Shape checks used both by the control constructors and by config
/// validation, so a layout that validates always constructs.
pub mod checks {
    use super::Point;

    pub fn point(what: &str, p: Point) -> Result<(), String> {
        if p.is_finite() {
            Ok(())
        } else {
            Err(format!("{} must be finite, got ({}, {})", what, p.x, p.y))
        }
    }

    pub fn radius(radius: f64) -> Result<(), String> {
        if radius > 0.0 && radius.is_finite() {
            Ok(())
        } else {
            Err(format!("radius must be positive, got {}", radius))
        }
    }

    /// Finite end points and a non-zero length.
    pub fn segment(start: Point, end: Point) -> Result<(), String> {
        point("track start", start)?;
        point("track end", end)?;
        if (end - start).norm2() > f64::EPSILON {
            Ok(())
        } else {
            Err("track has zero length".to_string())
        }
    }

    /// Finite corners and non-zero width and height.
    pub fn rect(start: Point, end: Point) -> Result<(), String> {
        point("first corner", start)?;
        point("second corner", end)?;
        let span = end - start;
        if span.x.abs() > f64::EPSILON && span.y.abs() > f64::EPSILON {
            Ok(())
        } else {
            Err("area has zero width or height".to_string())
        }
    }
}
