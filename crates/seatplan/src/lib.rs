//! Seating layouts for semicircular stages under a distancing constraint.
//!
//! Seats sit on concentric bands around the seating center, clipped to the
//! stage, kept clear of hidden areas, and spaced by a minimum distance.
//!
//! Layers (leaves first)
//! - `geom`: points, circles, angle intervals, polygons and sectors.
//! - `arcs`: interval algebra over sorted angle lists.
//! - `boundary`: which arcs of a circle lie inside an area.
//! - `offset`: shrink/grow areas by the seat radius.
//! - `row`: seats along one arc.
//! - `layout`: bands of a whole hall, returning seats plus diagnostics.
//! - `category`, `config`: seat labels and hall documents.

pub mod api;
pub mod arcs;
pub mod boundary;
pub mod category;
pub mod config;
pub mod geom;
pub mod layout;
pub mod offset;
pub mod row;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use category::{Category, CategoryError};
pub use config::LoadError;
pub use layout::{layout_hall, layout_with, Hall, Layout, LayoutParams, ParamError};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::category::Category;
    pub use crate::geom::{point, ArcAngles, Area, Circle, Dimension, Point, Polygon, Sector};
    pub use crate::layout::{
        layout_hall, layout_with, BandReport, BandSpec, Hall, Layout, LayoutParams, RowSpec, Seat,
    };
}
