//! Per-vertex polygon offset used to keep seat disks clear of edges.
//!
//! Each vertex moves to one of its four diagonal neighbours `(±m, ±m)`:
//! among the candidates on the requested side of the boundary (inside for a
//! negative margin, outside for a positive one) the one farthest from the
//! unshifted boundary wins. Exact for axis-aligned rectangles; an
//! approximation elsewhere, and concave corners may come out uneven.
//! Vertex count and order never change.

use tracing::debug;

use crate::geom::cfg::EPS;
use crate::geom::{point, Area, Point, Polygon, Sector};

const DIAGONALS: [(f64, f64); 4] = [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)];

/// Grow (`margin > 0`) or shrink (`margin < 0`) a polygon.
pub fn enlarge(poly: &Polygon, margin: f64) -> Polygon {
    if margin.abs() <= EPS {
        return poly.clone();
    }
    let vertices = poly
        .vertices
        .iter()
        .map(|&v| displaced_vertex(poly, v, margin))
        .collect();
    Polygon::new(vertices)
}

fn displaced_vertex(poly: &Polygon, v: Point, margin: f64) -> Point {
    let m = margin.abs();
    let want_inside = margin < 0.0;
    let mut best: Option<(Point, f64)> = None;
    for (sx, sy) in DIAGONALS {
        let cand = v + point(sx * m, sy * m);
        if poly.contains(cand) != want_inside {
            continue;
        }
        let d = poly.boundary_distance(cand);
        if best.map_or(true, |(_, bd)| d > bd) {
            best = Some((cand, d));
        }
    }
    match best {
        Some((p, _)) => p,
        None => {
            debug!(x = v.x, y = v.y, margin, "offset: no diagonal on the requested side, vertex kept");
            v
        }
    }
}

/// Offset any area. Polygons move per vertex. Sectors grow by widening their
/// clearance band, which keeps the straight edges covered as well as the rim;
/// shrinking eats the clearance first, then the radius (clamped at zero).
pub fn offset_area(area: &Area, margin: f64) -> Area {
    match area {
        Area::Polygon(poly) => Area::Polygon(enlarge(poly, margin)),
        Area::Sector(sector) => {
            let clearance = sector.clearance + margin;
            Area::Sector(if clearance >= 0.0 {
                Sector {
                    clearance,
                    ..*sector
                }
            } else {
                Sector {
                    clearance: 0.0,
                    radius: (sector.radius + clearance).max(0.0),
                    ..*sector
                }
            })
        }
    }
}
