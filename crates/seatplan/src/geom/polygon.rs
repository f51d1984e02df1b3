//! Polygons and seating areas.
//!
//! - `Polygon`: simple closed vertex loop; membership by even–odd ray casting.
//! - `Sector`: circular sector (the "arc-shaped" area of a hall document).
//! - `Area`: tagged union of the two; consumers match exhaustively.

use serde::Serialize;

use super::cfg::{EPS, SECTOR_STEP_DEG};
use super::types::{angle_of, point, ArcAngles, Circle, Dimension, Point};

/// Simple (non self-intersecting) closed polygon; the last vertex connects to the first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    #[inline]
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle with one corner at the origin.
    pub fn rectangle(dim: Dimension) -> Self {
        Self::new(vec![
            point(0.0, 0.0),
            point(dim.length, 0.0),
            point(dim.length, dim.width),
            point(0.0, dim.width),
        ])
    }

    /// Closed edge loop as `(from, to)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Even–odd containment. Points exactly on the boundary may land either way.
    pub fn contains(&self, p: Point) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Shortest distance from `p` to any edge.
    pub fn boundary_distance(&self, p: Point) -> f64 {
        self.edges()
            .map(|(a, b)| segment_distance(p, a, b))
            .fold(f64::INFINITY, f64::min)
    }

    /// Points where `circle` crosses the polygon boundary (unsorted, may repeat at vertices).
    pub fn circle_crossings(&self, circle: &Circle) -> Vec<Point> {
        let mut out = Vec::new();
        for (a, b) in self.edges() {
            segment_circle_crossings(a, b, circle, &mut out);
        }
        out
    }

    /// `(min, max)` corners of the bounding box, `None` for an empty polygon.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (point(lo.x.min(v.x), lo.y.min(v.y)), point(hi.x.max(v.x), hi.y.max(v.y)))
        }))
    }
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= EPS {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

fn segment_circle_crossings(a: Point, b: Point, circle: &Circle, out: &mut Vec<Point>) {
    let dir = b - a;
    let f = a - circle.center;
    let qa = dir.norm_squared();
    if qa <= EPS {
        return;
    }
    let qb = 2.0 * f.dot(&dir);
    let qc = f.norm_squared() - circle.radius.powi(2);
    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return;
    }
    let root = disc.sqrt();
    let t1 = (-qb - root) / (2.0 * qa);
    let t2 = (-qb + root) / (2.0 * qa);
    for t in [t1, t2] {
        if (-EPS..=1.0 + EPS).contains(&t) {
            out.push(a + dir * t);
        }
    }
}

/// Circular sector: all points within `radius` of `center` whose angle lies
/// in `angles`, plus every point within `clearance` of those.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sector {
    pub center: Point,
    pub radius: f64,
    pub angles: ArcAngles,
    /// Band kept free around the sector (seat radius for hidden areas).
    pub clearance: f64,
}

impl Sector {
    pub fn new(center: Point, radius: f64, angles: ArcAngles) -> Self {
        Self {
            center,
            radius,
            angles,
            clearance: 0.0,
        }
    }

    fn is_full(&self) -> bool {
        self.angles.span() >= 360.0 - EPS
    }

    fn spans_angle(&self, deg: f64) -> bool {
        let (lo, hi) = (self.angles.start - EPS, self.angles.end + EPS);
        (deg >= lo && deg <= hi) || (deg + 360.0 >= lo && deg + 360.0 <= hi)
    }

    fn core_contains(&self, p: Point) -> bool {
        if (p - self.center).norm() > self.radius + EPS {
            return false;
        }
        self.is_full() || self.spans_angle(angle_of(self.center, p))
    }

    pub fn contains(&self, p: Point) -> bool {
        if self.clearance <= EPS {
            self.core_contains(p)
        } else {
            self.core_distance(p) <= self.clearance + EPS
        }
    }

    /// Distance from `p` to the sector without its clearance; zero inside.
    pub fn core_distance(&self, p: Point) -> f64 {
        if self.core_contains(p) {
            return 0.0;
        }
        let r = (p - self.center).norm();
        if self.is_full() {
            return r - self.radius;
        }
        let rim = Circle::new(self.center, self.radius);
        let mut d = if self.spans_angle(angle_of(self.center, p)) {
            r - self.radius
        } else {
            f64::INFINITY
        };
        for deg in [self.angles.start, self.angles.end] {
            d = d.min(segment_distance(p, self.center, rim.point_at(deg)));
        }
        d
    }

    /// Points where `circle` meets the pieces the boundary is made of: rims,
    /// straight edges and, with a clearance, the rounded corners. Every real
    /// boundary crossing is among them.
    pub fn boundary_candidates(&self, circle: &Circle) -> Vec<Point> {
        let c = self.clearance.max(0.0);
        let mut rims = vec![self.radius + c];
        if c > EPS {
            rims.push((self.radius - c).abs());
        }
        let mut out = Vec::new();
        for r in rims {
            if r > EPS {
                out.extend(circle.intersections(&Circle::new(self.center, r)));
            }
        }
        if self.is_full() {
            return out;
        }

        let rim = Circle::new(self.center, self.radius);
        for deg in [self.angles.start, self.angles.end] {
            let tip = rim.point_at(deg);
            if c <= EPS {
                segment_circle_crossings(self.center, tip, circle, &mut out);
                continue;
            }
            let along = tip - self.center;
            let len = along.norm();
            if len > EPS {
                let side = point(-along.y, along.x) * (c / len);
                for offset in [side, -side] {
                    segment_circle_crossings(self.center + offset, tip + offset, circle, &mut out);
                }
            }
            for corner in [self.center, tip] {
                out.extend(circle.intersections(&Circle::new(corner, c)));
            }
        }
        out
    }

    /// Flatten the sector (clearance not included) into a polygon: center
    /// plus the arc sampled every few degrees. A full-turn sector becomes a
    /// plain ring polygon without the center.
    pub fn to_polygon(&self) -> Polygon {
        let rim = Circle::new(self.center, self.radius);
        let span = self.angles.span();
        let steps = (span / SECTOR_STEP_DEG).ceil().max(1.0) as usize;
        let full = self.is_full();
        let mut vertices = Vec::with_capacity(steps + 2);
        if !full {
            vertices.push(self.center);
        }
        let last = if full { steps - 1 } else { steps };
        for k in 0..=last {
            let deg = self.angles.start + span * (k as f64) / (steps as f64);
            vertices.push(rim.point_at(deg));
        }
        Polygon::new(vertices)
    }
}

/// Stage, percussion or hidden region.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Area {
    Polygon(Polygon),
    Sector(Sector),
}

impl Area {
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Area::Polygon(poly) => poly.contains(p),
            Area::Sector(sector) => sector.contains(p),
        }
    }

    /// Polygonal outline (exact for polygons, sampled for sectors).
    pub fn outline(&self) -> Polygon {
        match self {
            Area::Polygon(poly) => poly.clone(),
            Area::Sector(sector) => sector.to_polygon(),
        }
    }
}
