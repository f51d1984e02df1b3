//! Hall layout: concentric bands of seats on a stage.
//!
//! Purpose
//! - Compose the geometry pieces into one deterministic pass: boundary
//!   intersection against the stage, exclusion of hidden areas, row filling.
//! - Return every placed seat together with per-band diagnostics instead of
//!   mutating shared counters.
//!
//! Failure policy
//! - Non-positive or non-finite distancing fails the whole pass (`ParamError`).
//! - A band whose rows do not match its allowed arcs is skipped and reported
//!   (`BandReport::skipped`); the remaining bands are still laid out.
//!
//! Code cross-refs: `crate::boundary`, `crate::arcs`, `crate::offset`, `crate::row`

mod band;
mod types;

pub use band::{layout_hall, layout_with, BandError};
pub use types::{
    check_positive, BandReport, BandSpec, Hall, Layout, LayoutParams, ParamError, RowArcs, RowSpec,
    Seat, SeatTally, DEFAULT_ANGLES, DEFAULT_SEAT_RADIUS,
};
