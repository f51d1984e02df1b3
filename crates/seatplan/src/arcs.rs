//! Set operations over sorted lists of angular intervals.
//!
//! Inputs are `ArcAngles` lists sorted by `start`, each value with
//! `start <= end` and no seam wrap. Outputs keep that order.

use crate::geom::ArcAngles;

/// Clip every arc to the `allowed` intervals it overlaps.
///
/// An arc overlapping nothing contributes nothing; an arc overlapping several
/// allowed intervals is split. `allowed` must be sorted ascending, which makes
/// the early `break` valid.
pub fn reduce_to(arcs: &[ArcAngles], allowed: &[ArcAngles]) -> Vec<ArcAngles> {
    let mut out = Vec::with_capacity(arcs.len());
    for arc in arcs {
        for a in allowed {
            if a.start >= arc.end && !(arc.is_point() && a.start == arc.end) {
                break;
            }
            if a.end <= arc.start && !(arc.is_point() && a.end == arc.start) {
                continue;
            }
            out.push(ArcAngles::new(arc.start.max(a.start), arc.end.min(a.end)));
        }
    }
    out
}

/// Subtract each `excluded` interval, one at a time, from the working set.
///
/// Empty `excluded` returns `arcs` unchanged. Zero-span excluded intervals
/// have no extent and remove nothing.
pub fn exclude(arcs: &[ArcAngles], excluded: &[ArcAngles]) -> Vec<ArcAngles> {
    let mut current = arcs.to_vec();
    for ex in excluded.iter().filter(|ex| !ex.is_point()) {
        let mut next = Vec::with_capacity(current.len() + 1);
        for arc in &current {
            subtract(arc, ex, &mut next);
        }
        current = next;
    }
    current
}

fn subtract(arc: &ArcAngles, ex: &ArcAngles, out: &mut Vec<ArcAngles>) {
    let disjoint = if arc.is_point() {
        arc.start < ex.start || arc.start > ex.end
    } else {
        ex.end <= arc.start || ex.start >= arc.end
    };
    if disjoint {
        out.push(*arc);
        return;
    }
    // left remainder
    if ex.start > arc.start {
        out.push(ArcAngles::new(arc.start, ex.start));
    }
    // right remainder
    if ex.end < arc.end {
        out.push(ArcAngles::new(ex.end, arc.end));
    }
}

/// Sort by start angle (stable for equal starts).
pub fn sort_arcs(arcs: &mut [ArcAngles]) {
    arcs.sort_by(|a, b| a.start.total_cmp(&b.start));
}
