//! Planar geometry for seating layouts.
//!
//! Purpose
//! - Points, circles, angle intervals and polygons with the few exact
//!   operations the layout needs: distances, circle–circle and
//!   circle–polygon crossings, point-at-angle and arc lengths.
//!
//! Conventions
//! - Units are centimetres and degrees; coordinates are image space (y down).
//! - Degenerate inputs (concentric or disjoint circles) yield `None`/empty,
//!   never a panic; callers decide what "nothing here" means.
//!
//! Code cross-refs: `types::{Circle, ArcAngles, Rotation}`, `polygon::{Polygon, Area}`

pub(crate) mod cfg;
mod polygon;
mod types;

pub use polygon::{Area, Polygon, Sector};
pub use types::{
    angle_of, distance, normalize_degrees, point, ArcAngles, Circle, Dimension, Point, Rotation,
};
