//! Tolerance defaults for planar seating geometry (internal).
//!
//! Policy
//! - Fixed constants; every quantity in this crate is in centimetres or
//!   degrees, so absolute tolerances are sufficient at stage scale.

/// Distance/membership epsilon (cm).
pub(crate) const EPS: f64 = 1e-9;
/// Two crossing angles closer than this (degrees) are the same crossing.
pub(crate) const ANGLE_EPS: f64 = 1e-7;
/// Angular resolution (degrees) when a sector is flattened into a polygon.
pub(crate) const SECTOR_STEP_DEG: f64 = 5.0;
