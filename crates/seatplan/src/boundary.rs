//! Circle ∩ area: which parts of a band's circumference lie inside a region.
//!
//! Polygon algorithm
//! - Collect every crossing of the circle with the polygon boundary and sort
//!   the crossing angles ascending (near-equal angles from vertex hits merge).
//! - Walk consecutive pairs; if the circle point at the pair's mid angle is
//!   inside, the pair is an inside arc and the walk jumps two crossings,
//!   otherwise it moves one (a graze).
//! - The arc through the 0/360 seam is tested separately and emitted as
//!   `[0, first]` and `[last, 360]`.
//! - No crossings: the circle is entirely inside or entirely outside, decided
//!   by testing one point of the circle.

use tracing::trace;

use crate::geom::cfg::{ANGLE_EPS, EPS};
use crate::geom::{ArcAngles, Area, Circle, Point, Polygon, Sector};

/// Arcs of `circle` lying inside `area`, sorted by start angle.
pub fn arcs_inside(circle: &Circle, area: &Area) -> Vec<ArcAngles> {
    match area {
        Area::Polygon(poly) => arcs_inside_polygon(circle, poly),
        Area::Sector(sector) => arcs_inside_sector(circle, sector),
    }
}

/// Arcs of `circle` lying inside `poly`, sorted by start angle.
pub fn arcs_inside_polygon(circle: &Circle, poly: &Polygon) -> Vec<ArcAngles> {
    let mut angles: Vec<f64> = poly
        .circle_crossings(circle)
        .into_iter()
        .map(|p| circle.angle_of(p))
        .collect();
    angles.sort_by(f64::total_cmp);
    angles.dedup_by(|a, b| (*a - *b).abs() < ANGLE_EPS);
    // a crossing sitting on the seam shows up as both ~0 and ~360
    if angles.len() > 1 && angles[0] < ANGLE_EPS && angles[angles.len() - 1] > 360.0 - ANGLE_EPS {
        angles.pop();
    }
    trace!(crossings = ?angles, "circle_polygon_crossings");

    if angles.is_empty() {
        return if poly.contains(circle.point_at(0.0)) {
            vec![ArcAngles::full()]
        } else {
            Vec::new()
        };
    }

    let inside_mid = |from: f64, to: f64| poly.contains(circle.point_at((from + to) / 2.0));
    let mut out = Vec::with_capacity(angles.len() / 2 + 1);
    let mut i = 0;
    while i + 1 < angles.len() {
        if inside_mid(angles[i], angles[i + 1]) {
            out.push(ArcAngles::new(angles[i], angles[i + 1]));
            i += 2;
        } else {
            i += 1;
        }
    }

    let first = angles[0];
    let last = angles[angles.len() - 1];
    if inside_mid(last, first + 360.0) {
        if first > ANGLE_EPS {
            out.insert(0, ArcAngles::new(0.0, first));
        }
        if last < 360.0 - ANGLE_EPS {
            out.push(ArcAngles::new(last, 360.0));
        }
    }
    out
}

/// A sector without clearance sharing the band's center is resolved directly;
/// every other sector goes through its boundary candidates.
fn arcs_inside_sector(circle: &Circle, sector: &Sector) -> Vec<ArcAngles> {
    let concentric = (circle.center - sector.center).norm() <= EPS;
    if concentric && sector.clearance <= EPS {
        return if circle.radius <= sector.radius + EPS {
            vec![sector.angles]
        } else {
            Vec::new()
        };
    }
    arcs_between(circle, sector.boundary_candidates(circle), |p| sector.contains(p))
}

/// Arcs of `circle` inside a region, given a superset of the points where the
/// circle crosses its boundary. Each gap between neighbouring candidates is
/// wholly inside or wholly outside, so one midpoint test per gap decides it.
fn arcs_between(
    circle: &Circle,
    candidates: Vec<Point>,
    inside: impl Fn(Point) -> bool,
) -> Vec<ArcAngles> {
    let mut angles: Vec<f64> = candidates.into_iter().map(|p| circle.angle_of(p)).collect();
    angles.sort_by(f64::total_cmp);
    angles.dedup_by(|a, b| (*a - *b).abs() < ANGLE_EPS);
    trace!(candidates = ?angles, "circle_sector_candidates");

    let (Some(&first), Some(&last)) = (angles.first(), angles.last()) else {
        return if inside(circle.point_at(0.0)) {
            vec![ArcAngles::full()]
        } else {
            Vec::new()
        };
    };
    let mid_inside = |from: f64, to: f64| inside(circle.point_at((from + to) / 2.0));
    let wrap = mid_inside(last, first + 360.0);

    let mut out = Vec::new();
    if wrap {
        push_merged(&mut out, 0.0, first);
    }
    for gap in angles.windows(2) {
        if mid_inside(gap[0], gap[1]) {
            push_merged(&mut out, gap[0], gap[1]);
        }
    }
    if wrap {
        push_merged(&mut out, last, 360.0);
    }
    out
}

/// Append `[from, to]`, extending the previous arc when they touch.
fn push_merged(out: &mut Vec<ArcAngles>, from: f64, to: f64) {
    if to - from < ANGLE_EPS {
        return;
    }
    match out.last_mut() {
        Some(prev) if (from - prev.end).abs() < ANGLE_EPS => prev.end = to,
        _ => out.push(ArcAngles::new(from, to)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{point, Dimension};

    fn assert_arcs(got: &[ArcAngles], want: &[(f64, f64)]) {
        assert_eq!(got.len(), want.len(), "got {got:?}");
        for (g, &(s, e)) in got.iter().zip(want) {
            assert!((g.start - s).abs() < 1e-6 && (g.end - e).abs() < 1e-6, "got {got:?}");
        }
    }

    #[test]
    fn band_centred_on_stage_front_keeps_upper_half() {
        let stage = Polygon::rectangle(Dimension::new(1580.0, 960.0));
        let band = Circle::new(point(790.0, 960.0), 300.0);
        assert_arcs(&arcs_inside_polygon(&band, &stage), &[(180.0, 360.0)]);
    }

    #[test]
    fn wide_band_is_clipped_by_side_walls() {
        let stage = Polygon::rectangle(Dimension::new(1000.0, 960.0));
        let band = Circle::new(point(500.0, 960.0), 600.0);
        // side walls at x=0 and x=1000 cut at acos(500/600)
        let cut = (500.0f64 / 600.0).acos().to_degrees();
        assert_arcs(
            &arcs_inside_polygon(&band, &stage),
            &[(180.0 + cut, 360.0 - cut)],
        );
    }

    #[test]
    fn arc_through_seam_is_split() {
        let right = Polygon::new(vec![
            point(0.0, -200.0),
            point(200.0, -200.0),
            point(200.0, 200.0),
            point(0.0, 200.0),
        ]);
        let c = Circle::new(point(0.0, 0.0), 100.0);
        assert_arcs(&arcs_inside_polygon(&c, &right), &[(0.0, 90.0), (270.0, 360.0)]);
    }

    #[test]
    fn no_crossings_resolves_inside_or_outside() {
        let big = Polygon::rectangle(Dimension::new(1000.0, 1000.0));
        let inner = Circle::new(point(500.0, 500.0), 100.0);
        assert_arcs(&arcs_inside_polygon(&inner, &big), &[(0.0, 360.0)]);
        // polygon wholly inside the circle: center is inside the polygon, circle is not
        let small = Polygon::new(vec![
            point(-10.0, -10.0),
            point(10.0, -10.0),
            point(10.0, 10.0),
            point(-10.0, 10.0),
        ]);
        let around = Circle::new(point(0.0, 0.0), 100.0);
        assert!(arcs_inside_polygon(&around, &small).is_empty());
    }

    #[test]
    fn concentric_sector_is_exact() {
        let sector = Area::Sector(Sector::new(
            point(0.0, 0.0),
            400.0,
            ArcAngles::new(250.0, 290.0),
        ));
        let near = Circle::new(point(0.0, 0.0), 300.0);
        let far = Circle::new(point(0.0, 0.0), 500.0);
        assert_arcs(&arcs_inside(&near, &sector), &[(250.0, 290.0)]);
        assert!(arcs_inside(&far, &sector).is_empty());
    }

    #[test]
    fn clearance_widens_concentric_sector_by_edge_distance() {
        let sector = Sector {
            clearance: 25.0,
            ..Sector::new(point(0.0, 0.0), 1000.0, ArcAngles::new(265.0, 275.0))
        };
        let band = Circle::new(point(0.0, 0.0), 400.0);
        let widen = (25.0f64 / 400.0).asin().to_degrees();
        assert_arcs(
            &arcs_inside(&band, &Area::Sector(sector)),
            &[(265.0 - widen, 275.0 + widen)],
        );
        // beyond the rim only the clearance band is hit
        let outside = Circle::new(point(0.0, 0.0), 1020.0);
        let arcs = arcs_inside(&outside, &Area::Sector(sector));
        assert_eq!(arcs.len(), 1);
        assert!(arcs[0].start > 260.0 && arcs[0].start < 265.0);
        assert!(arcs[0].end > 275.0 && arcs[0].end < 280.0);
        assert!(arcs_inside(&Circle::new(point(0.0, 0.0), 1030.0), &Area::Sector(sector)).is_empty());
    }

    #[test]
    fn offset_disc_crossings_are_exact() {
        let sector = Area::Sector(Sector::new(point(0.0, -300.0), 200.0, ArcAngles::full()));
        let band = Circle::new(point(0.0, 0.0), 300.0);
        // radical axis: a = (300² - 200² + 300²) / 600 along the center line
        let a: f64 = (300.0 * 300.0 - 200.0 * 200.0 + 300.0 * 300.0) / 600.0;
        let half = (300.0 * 300.0 - a * a).sqrt().atan2(a).to_degrees();
        // the disc sits straight "up" (y negative), at 270°
        assert_arcs(&arcs_inside(&band, &sector), &[(270.0 - half, 270.0 + half)]);
    }

    #[test]
    fn non_concentric_sector_edges_are_exact() {
        // quarter sector pointing right of its center, band centred elsewhere
        let sector = Area::Sector(Sector::new(point(0.0, 0.0), 500.0, ArcAngles::new(0.0, 90.0)));
        let band = Circle::new(point(200.0, 0.0), 100.0);
        // the band crosses only the edge along +x (angle 0), leaving its upper half inside
        assert_arcs(&arcs_inside(&band, &sector), &[(0.0, 180.0)]);
    }
}
