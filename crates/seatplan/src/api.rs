//! Curated surface for the command-line front end.
//!
//! Re-exports what a renderer or report writer needs, plus the artifact
//! naming rule shared by every output of one layout run.

pub use crate::boundary::arcs_inside;
pub use crate::category::Category;
pub use crate::config::{load_halls, parse_hall, parse_halls, LoadError};
pub use crate::geom::{ArcAngles, Area, Circle, Dimension, Point, Polygon};
pub use crate::layout::{
    check_positive, layout_hall, layout_with, BandError, BandReport, Hall, Layout, LayoutParams,
    ParamError, RowArcs, Seat,
};

/// Size of the conductor podium drawn in front of the seating center.
pub const PODIUM: Dimension = Dimension {
    length: 100.0,
    width: 100.0,
};

/// File stem for the outputs of one run:
/// `<hall>_distancing_<d>_row_distancing_<rd>`.
///
/// Characters that are unsafe in file names become `_`.
pub fn artifact_stem(hall: &str, params: &LayoutParams) -> String {
    let safe: String = hall
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "{safe}_distancing_{}_row_distancing_{}",
        params.distancing, params.row_distancing
    )
}

/// Legend lines shown next to a rendered layout.
pub fn legend_lines(layout: &Layout) -> Vec<String> {
    vec![
        layout.hall.clone(),
        format!("Number of seats {}", layout.seat_count()),
        format!("distancing: {} cm", layout.params.distancing),
        format!("row distancing: {} cm", layout.params.row_distancing),
        "scale 1m".to_string(),
    ]
}
