//! Band orchestration: one pass over all bands of a hall.
//!
//! Per band
//! - radius += max(distancing, row_distancing)
//! - for every row circle: stage arcs (seat-shrunk stage) → clip to the row's
//!   angles → subtract every seat-grown hidden area → join the 0/360 seam
//!   (plain rows only; rows with seat lists keep one arc per declared piece)
//! - rows with seat lists must supply one list per allowed arc; otherwise the
//!   whole band is skipped (logged) and the pass continues
//! - fill every allowed arc through the row filler

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::arcs::{exclude, reduce_to};
use crate::boundary::{arcs_inside, arcs_inside_polygon};
use crate::geom::cfg::ANGLE_EPS;
use crate::geom::{ArcAngles, Area, Circle, Point, Polygon};
use crate::offset::{enlarge, offset_area};
use crate::row::fill_row;

use super::types::{
    BandReport, BandSpec, Hall, Layout, LayoutParams, ParamError, RowArcs, RowSpec, SeatTally,
    DEFAULT_ANGLES,
};

/// Per-band failure; the band is skipped, the layout goes on.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum BandError {
    #[error("band {band}, row {row}: {found} seat lists for {expected} allowed arcs")]
    ArcCountMismatch {
        band: usize,
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Lay out `hall` with its own distancing values.
pub fn layout_hall(hall: &Hall) -> Result<Layout, ParamError> {
    layout_with(hall, hall.default_params())
}

/// Lay out `hall` with explicit distancing values.
///
/// Fails before any geometry runs when a distancing value is not a positive
/// finite number.
pub fn layout_with(hall: &Hall, params: LayoutParams) -> Result<Layout, ParamError> {
    params.validate()?;
    let seating_stage = enlarge(&hall.stage, -hall.seat_radius);
    let seating_hidden: Vec<Area> = hall
        .hidden
        .iter()
        .map(|area| offset_area(area, hall.seat_radius))
        .collect();

    let runner = BandRunner {
        stage: &seating_stage,
        hidden: &seating_hidden,
        center: hall.center,
        distancing: params.distancing,
    };
    let spacing = params.distancing.max(params.row_distancing);
    let mut tally = SeatTally::new();
    let mut bands = Vec::with_capacity(hall.bands.len());
    let mut radius = hall.first_band_offset;
    for (index, spec) in hall.bands.iter().enumerate() {
        radius += spacing;
        bands.push(runner.run(index, radius, spec, &mut tally));
    }

    info!(
        hall = %hall.name,
        seats = tally.count(),
        bands = bands.len(),
        skipped = bands.iter().filter(|b| b.skipped.is_some()).count(),
        distancing = params.distancing,
        row_distancing = params.row_distancing,
        "layout"
    );
    Ok(Layout {
        hall: hall.name.clone(),
        params,
        tally,
        bands,
        seating_stage,
        seating_hidden,
    })
}

/// Shared, read-only context of one pass.
struct BandRunner<'a> {
    stage: &'a Polygon,
    hidden: &'a [Area],
    center: Point,
    distancing: f64,
}

impl BandRunner<'_> {
    fn run(&self, index: usize, radius: f64, spec: &BandSpec, tally: &mut SeatTally) -> BandReport {
        let default_rows = [RowSpec::default()];
        let rows: &[RowSpec] = match spec {
            BandSpec::Default => &default_rows,
            BandSpec::Rows(rows) => rows,
        };

        let plans: Vec<(Circle, Vec<ArcAngles>)> = rows
            .iter()
            .map(|row| {
                let circle = Circle::new(
                    row.center.unwrap_or(self.center),
                    row.radius.unwrap_or(radius),
                );
                let arcs = self.allowed_arcs(&circle, row);
                (circle, arcs)
            })
            .collect();
        debug!(band = index, radius, arcs = ?plans.iter().map(|p| &p.1).collect::<Vec<_>>(), "band_arcs");

        let mut report = BandReport {
            index,
            radius,
            rows: plans
                .iter()
                .map(|(circle, arcs)| RowArcs {
                    center: circle.center,
                    radius: circle.radius,
                    arcs: arcs.clone(),
                })
                .collect(),
            seats: 0,
            skipped: None,
        };

        if let Some(err) = mismatch(index, rows, &plans) {
            warn!(%err, "band skipped");
            report.skipped = Some(err);
            return report;
        }

        let before = tally.count();
        for (row, (circle, arcs)) in rows.iter().zip(&plans) {
            for (i, arc) in arcs.iter().enumerate() {
                let categories = row
                    .seats
                    .as_ref()
                    .and_then(|lists| lists.get(i))
                    .and_then(|list| list.as_deref());
                fill_row(circle, arc, self.distancing, categories, index, tally);
            }
        }
        report.seats = tally.count() - before;
        report
    }

    /// Arcs of `circle` that are on stage, inside the row's angles and clear
    /// of hidden areas.
    ///
    /// Rows with seat lists keep the pieces on both sides of the 0/360 seam
    /// apart, one list per piece; plain rows get them joined into one arc.
    fn allowed_arcs(&self, circle: &Circle, row: &RowSpec) -> Vec<ArcAngles> {
        let stage_arcs = arcs_inside_polygon(circle, self.stage);
        let wanted = row
            .angles
            .as_deref()
            .unwrap_or(std::slice::from_ref(&DEFAULT_ANGLES));
        let mut allowed = reduce_to(wanted, &stage_arcs);
        for zone in self.hidden {
            let blocked = arcs_inside(circle, zone);
            allowed = exclude(&allowed, &blocked);
        }
        if row.seats.is_some() {
            allowed
        } else {
            join_seam(allowed)
        }
    }
}

fn mismatch(band: usize, rows: &[RowSpec], plans: &[(Circle, Vec<ArcAngles>)]) -> Option<BandError> {
    rows.iter()
        .zip(plans)
        .enumerate()
        .find_map(|(row, (spec, (_, arcs)))| {
            let lists = spec.seats.as_ref()?;
            (lists.len() != arcs.len()).then(|| BandError::ArcCountMismatch {
                band,
                row,
                expected: arcs.len(),
                found: lists.len(),
            })
        })
}

/// Merge `[0, a]` and `[b, 360]` into `[b, 360 + a]`: one physical arc across the seam.
fn join_seam(mut arcs: Vec<ArcAngles>) -> Vec<ArcAngles> {
    if arcs.len() > 1 {
        let first = arcs[0];
        let last = arcs[arcs.len() - 1];
        if first.start <= ANGLE_EPS && last.end >= 360.0 - ANGLE_EPS {
            arcs.remove(0);
            let n = arcs.len();
            arcs[n - 1] = ArcAngles::new(last.start, 360.0 + first.end);
        }
    }
    arcs
}
