//! Basic planar types: points, extents, angular intervals and circles.
//!
//! - `Point`: nalgebra `Vector2<f64>`, unit centimetres, image space (y grows down).
//! - `ArcAngles`: directed interval in degrees, `start <= end`, no seam wrap.
//! - `Circle`: radical-axis intersections and angle/point conversions.
//!
//! Angle convention
//! - `angle_of` and `Circle::point_at` are mutual inverses: angle 0 points
//!   along +x and the angle grows towards +y. With y pointing down this is a
//!   clockwise walk on screen, which is what `Rotation::Clockwise` names.

use std::ops::Add;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::cfg::EPS;

/// Planar position in centimetres.
pub type Point = Vector2<f64>;

/// Shorthand constructor for a `Point`.
#[inline]
pub fn point(x: f64, y: f64) -> Point {
    Vector2::new(x, y)
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (a - b).norm()
}

/// Angle (degrees, `[0, 360)`) of `p` as seen from `center`.
///
/// `atan2(-(center.y - p.y), p.x - center.x)`; inverse of `Circle::point_at`.
#[inline]
pub fn angle_of(center: Point, p: Point) -> f64 {
    let deg = (-(center.y - p.y)).atan2(p.x - center.x).to_degrees();
    normalize_degrees(deg)
}

/// Fold any finite angle into `[0, 360)`.
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Rectangular extents (stage, podium).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub length: f64,
    pub width: f64,
}

impl Dimension {
    #[inline]
    pub fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }

    /// Top-left and bottom-right corners of a rectangle of these extents centred at `center`.
    pub fn corners_around(&self, center: Point) -> (Point, Point) {
        let half = point(self.length / 2.0, self.width / 2.0);
        (center - half, center + half)
    }
}

impl Add for Dimension {
    type Output = Dimension;
    #[inline]
    fn add(self, rhs: Dimension) -> Self::Output {
        Dimension {
            length: self.length + rhs.length,
            width: self.width + rhs.width,
        }
    }
}

/// Directed angular interval in degrees.
///
/// Invariants (callers):
/// - `start <= end`; the seam at 0/360 is never crossed inside one value.
/// - `start == end` marks a single point (one central seat).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcAngles {
    pub start: f64,
    pub end: f64,
}

impl ArcAngles {
    #[inline]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// The whole circle, `[0, 360]`.
    #[inline]
    pub fn full() -> Self {
        Self::new(0.0, 360.0)
    }

    #[inline]
    pub fn span(&self) -> f64 {
        (self.end - self.start).abs()
    }

    #[inline]
    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        self.span() <= EPS
    }
}

/// Rotational sense of a walk along a circle (screen view, y down).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    /// Increasing angle.
    Clockwise,
    /// Decreasing angle.
    CounterClockwise,
}

/// Circle in the plane; `radius > 0` for anything that gets walked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    #[inline]
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Point on the circle at `deg` degrees.
    #[inline]
    pub fn point_at(&self, deg: f64) -> Point {
        let rad = deg.to_radians();
        self.center + point(self.radius * rad.cos(), self.radius * rad.sin())
    }

    /// Angle of `p` as seen from this circle's center.
    #[inline]
    pub fn angle_of(&self, p: Point) -> f64 {
        angle_of(self.center, p)
    }

    /// Length of the arc covered by `arc`: `2πr · |end − start| / 360`.
    #[inline]
    pub fn arc_length(&self, arc: &ArcAngles) -> f64 {
        std::f64::consts::TAU * self.radius * (arc.span() / 360.0)
    }

    /// Radical-axis construction shared by the intersection queries.
    ///
    /// Returns the foot point on the center line, the unit normal pointing to
    /// the clockwise solution, and the half chord `h`. `None` for concentric
    /// or disjoint circles.
    fn radical(&self, other: &Circle) -> Option<(Point, Point, f64)> {
        let delta = other.center - self.center;
        let d = delta.norm();
        if d <= EPS {
            return None;
        }
        let a = (self.radius.powi(2) - other.radius.powi(2) + d.powi(2)) / (2.0 * d);
        let h2 = self.radius.powi(2) - a.powi(2);
        if !h2.is_finite() || h2 < -EPS * self.radius.max(1.0).powi(2) {
            return None;
        }
        let h = h2.max(0.0).sqrt();
        let foot = self.center + delta * (a / d);
        let normal = point(-delta.y, delta.x) / d;
        Some((foot, normal, h))
    }

    /// Intersection point lying in the given rotational sense from the line
    /// of centres (seen from `self.center`).
    pub fn intersection(&self, other: &Circle, rotation: Rotation) -> Option<Point> {
        let (foot, normal, h) = self.radical(other)?;
        Some(match rotation {
            Rotation::Clockwise => foot + normal * h,
            Rotation::CounterClockwise => foot - normal * h,
        })
    }

    /// All intersection points: empty, one (tangent) or two (clockwise first).
    pub fn intersections(&self, other: &Circle) -> Vec<Point> {
        match self.radical(other) {
            None => Vec::new(),
            Some((foot, _, h)) if h <= EPS => vec![foot],
            Some((foot, normal, h)) => vec![foot + normal * h, foot - normal * h],
        }
    }
}
