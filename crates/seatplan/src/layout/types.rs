//! Data types for hall definitions and layout results.
//!
//! - `Hall`, `BandSpec`, `RowSpec`: the validated, read-only hall model.
//! - `LayoutParams`: per-run distancing (lets one hall be compared across scenarios).
//! - `Layout`, `BandReport`, `Seat`, `SeatTally`: what one layout pass returns.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::category::Category;
use crate::geom::{ArcAngles, Area, Circle, Dimension, Point, Polygon};

use super::band::BandError;

/// Arc seated when a band gives no angles: the front half of the circle
/// minus 10° at each end.
pub const DEFAULT_ANGLES: ArcAngles = ArcAngles {
    start: 190.0,
    end: 350.0,
};

/// Seat disk radius (cm) when a hall does not set one.
pub const DEFAULT_SEAT_RADIUS: f64 = 25.0;

/// Caller override for one part of a band.
///
/// `seats[i]` pairs with the i-th allowed arc of this row; `None` entries fill
/// that arc with plain seats.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowSpec {
    /// Sorted by start; `None` means `[DEFAULT_ANGLES]`.
    pub angles: Option<Vec<ArcAngles>>,
    pub seats: Option<Vec<Option<Vec<Category>>>>,
    /// Own circle radius, off the band accumulator.
    pub radius: Option<f64>,
    pub center: Option<Point>,
}

/// One concentric band: default seating or explicit rows.
#[derive(Clone, Debug, PartialEq)]
pub enum BandSpec {
    Default,
    Rows(Vec<RowSpec>),
}

/// Validated hall definition.
///
/// Invariants (enforced by `config`): `distancing > 0`, `row_distancing > 0`,
/// stage polygon has at least three vertices, row angles sorted.
#[derive(Clone, Debug, PartialEq)]
pub struct Hall {
    pub name: String,
    pub stage_extents: Dimension,
    pub stage: Polygon,
    pub bands: Vec<BandSpec>,
    /// Minimum radial spacing between bands.
    pub row_distancing: f64,
    /// Radius the band accumulator starts from.
    pub first_band_offset: f64,
    /// Seating center; defaults to the middle of the stage front edge.
    pub center: Point,
    /// Minimum seat separation.
    pub distancing: f64,
    pub seat_radius: f64,
    pub percussion: Vec<Area>,
    pub hidden: Vec<Area>,
    pub legend: Point,
}

/// Distancing values for one layout pass.
///
/// Both must be finite and positive; `layout_with` rejects anything else.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LayoutParams {
    pub distancing: f64,
    pub row_distancing: f64,
}

/// Rejected distancing value.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{field} must be a positive number of cm, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

impl LayoutParams {
    pub fn new(distancing: f64, row_distancing: f64) -> Result<Self, ParamError> {
        let params = Self {
            distancing,
            row_distancing,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        check_positive("distancing", self.distancing)?;
        check_positive("row_distancing", self.row_distancing)
    }
}

/// `value` is finite and strictly positive.
pub fn check_positive(field: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParamError::NotPositive { field, value })
    }
}

impl Hall {
    /// The hall's own distancing values (unchecked; `layout_with` validates).
    pub fn default_params(&self) -> LayoutParams {
        LayoutParams {
            distancing: self.distancing,
            row_distancing: self.row_distancing,
        }
    }
}

/// One placed slot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Seat {
    pub position: Point,
    /// Angle on its band circle, `[0, 360)`.
    pub angle: f64,
    pub band: usize,
    pub category: Category,
}

/// Seat accumulator threaded through one layout pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SeatTally {
    seats: Vec<Seat>,
    by_category: BTreeMap<Category, usize>,
}

impl SeatTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, seat: Seat) {
        *self.by_category.entry(seat.category).or_insert(0) += 1;
        self.seats.push(seat);
    }

    /// Total placed slots (reserved ones included).
    pub fn count(&self) -> usize {
        self.seats.len()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn by_category(&self) -> &BTreeMap<Category, usize> {
        &self.by_category
    }

    pub fn into_seats(self) -> Vec<Seat> {
        self.seats
    }
}

/// Outcome for one band.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BandReport {
    pub index: usize,
    /// Accumulated band radius (rows may override their own circle).
    pub radius: f64,
    /// Allowed arcs per row circle, for guide lines.
    pub rows: Vec<RowArcs>,
    pub seats: usize,
    /// Set when the band was skipped.
    pub skipped: Option<BandError>,
}

/// Allowed arcs of one row circle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RowArcs {
    pub center: Point,
    pub radius: f64,
    pub arcs: Vec<ArcAngles>,
}

impl RowArcs {
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }
}

/// Result of one layout pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layout {
    pub hall: String,
    pub params: LayoutParams,
    pub tally: SeatTally,
    pub bands: Vec<BandReport>,
    /// Stage shrunk by the seat radius.
    pub seating_stage: Polygon,
    /// Hidden areas grown by the seat radius.
    pub seating_hidden: Vec<Area>,
}

impl Layout {
    pub fn seat_count(&self) -> usize {
        self.tally.count()
    }

    pub fn seats(&self) -> &[Seat] {
        self.tally.seats()
    }
}
