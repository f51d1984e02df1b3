//! Hall-definition documents (JSON) and their validation into `Hall`.
//!
//! A file holds one hall object or an array of them. Each hall is parsed and
//! validated on its own, so one malformed hall does not hide the others.
//! Unknown category names are not errors: they resolve to a plain seat with
//! a warning.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::arcs::sort_arcs;
use crate::category::Category;
use crate::geom::{point, ArcAngles, Area, Dimension, Point, Polygon, Sector};
use crate::layout::{BandSpec, Hall, RowSpec, DEFAULT_SEAT_RADIUS};

/// Errors that abort loading one hall.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("hall {hall:?}: invalid {field}: {reason}")]
    Invalid {
        hall: String,
        field: String,
        reason: String,
    },
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct XY {
    pub x: f64,
    pub y: f64,
}

impl From<XY> for Point {
    fn from(p: XY) -> Self {
        point(p.x, p.y)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HallDocument {
    pub name: String,
    pub stage: StageDoc,
    pub rows: RowsDoc,
    pub distancing: f64,
    #[serde(default)]
    pub seat_radius: Option<f64>,
    #[serde(default)]
    pub percussion: Vec<AreaDoc>,
    #[serde(default)]
    pub hidden: Vec<AreaDoc>,
    #[serde(default)]
    pub legend: Option<XY>,
}

#[derive(Debug, Deserialize)]
pub struct StageDoc {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub outline: Option<Vec<XY>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsDoc {
    pub list: Vec<Option<Vec<RowDoc>>>,
    pub distancing: f64,
    #[serde(default)]
    pub distancing_first_row: Option<f64>,
    #[serde(default)]
    pub center: Option<XY>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RowDoc {
    #[serde(default)]
    pub angles: Option<Vec<ArcAngles>>,
    #[serde(default)]
    pub instruments: Option<Vec<Option<Vec<String>>>>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub center: Option<XY>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaDoc {
    Polygon(Vec<XY>),
    Arc(ArcDoc),
}

#[derive(Debug, Deserialize)]
pub struct ArcDoc {
    pub radius: f64,
    pub angles: ArcAngles,
    #[serde(default)]
    pub center: Option<XY>,
}

/// Load every hall in a file; the outer error is for the file as a whole.
pub fn load_halls(path: &Path) -> Result<Vec<Result<Hall, LoadError>>, LoadError> {
    let content = std::fs::read_to_string(path)?;
    parse_halls(&content)
}

/// Parse one hall object or an array of hall objects.
pub fn parse_halls(json: &str) -> Result<Vec<Result<Hall, LoadError>>, LoadError> {
    let value: Value = serde_json::from_str(json)?;
    let docs = match value {
        Value::Array(items) => items,
        single => vec![single],
    };
    Ok(docs
        .into_iter()
        .map(|doc| {
            let doc: HallDocument = serde_json::from_value(doc)?;
            doc.validate()
        })
        .collect())
}

/// Parse exactly one hall.
pub fn parse_hall(json: &str) -> Result<Hall, LoadError> {
    let doc: HallDocument = serde_json::from_str(json)?;
    doc.validate()
}

impl HallDocument {
    /// Check every constraint once and build the typed model.
    pub fn validate(self) -> Result<Hall, LoadError> {
        let name = self.name.trim().to_string();
        let invalid = |field: &str, reason: String| LoadError::Invalid {
            hall: name.clone(),
            field: field.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("name", "must not be empty".into()));
        }
        if !(self.stage.x > 0.0 && self.stage.y > 0.0) {
            return Err(invalid(
                "stage",
                format!("extents must be positive, got {}x{}", self.stage.x, self.stage.y),
            ));
        }
        positive(self.distancing, "distancing").map_err(|r| invalid("distancing", r))?;
        positive(self.rows.distancing, "rows.distancing").map_err(|r| invalid("rows.distancing", r))?;
        let first_band_offset = self.rows.distancing_first_row.unwrap_or(0.0);
        if !(first_band_offset >= 0.0) {
            return Err(invalid(
                "rows.distancingFirstRow",
                format!("must be >= 0, got {first_band_offset}"),
            ));
        }
        let seat_radius = self.seat_radius.unwrap_or(DEFAULT_SEAT_RADIUS);
        if !(seat_radius >= 0.0) {
            return Err(invalid("seatRadius", format!("must be >= 0, got {seat_radius}")));
        }

        let stage_extents = Dimension::new(self.stage.x, self.stage.y);
        let stage = match self.stage.outline {
            Some(outline) => polygon(outline).map_err(|r| invalid("stage.outline", r))?,
            None => Polygon::rectangle(stage_extents),
        };
        let center: Point = self
            .rows
            .center
            .map(Point::from)
            .unwrap_or_else(|| point(self.stage.x / 2.0, self.stage.y));

        let mut bands = Vec::with_capacity(self.rows.list.len());
        for (b, band) in self.rows.list.into_iter().enumerate() {
            let spec = match band {
                None => BandSpec::Default,
                Some(rows) => {
                    let rows = rows
                        .into_iter()
                        .enumerate()
                        .map(|(r, row)| {
                            row_spec(row).map_err(|reason| invalid(&format!("rows.list[{b}][{r}]"), reason))
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    BandSpec::Rows(rows)
                }
            };
            bands.push(spec);
        }

        let areas = |docs: Vec<AreaDoc>, field: &str| {
            docs.into_iter()
                .enumerate()
                .map(|(i, doc)| area(doc, center).map_err(|r| invalid(&format!("{field}[{i}]"), r)))
                .collect::<Result<Vec<_>, _>>()
        };
        let percussion = areas(self.percussion, "percussion")?;
        let hidden = areas(self.hidden, "hidden")?;

        Ok(Hall {
            name: name.clone(),
            stage_extents,
            stage,
            bands,
            row_distancing: self.rows.distancing,
            first_band_offset,
            center,
            distancing: self.distancing,
            seat_radius,
            percussion,
            hidden,
            legend: self.legend.map(Point::from).unwrap_or_else(|| point(10.0, 10.0)),
        })
    }
}

fn positive(v: f64, what: &str) -> Result<(), String> {
    if v > 0.0 && v.is_finite() {
        Ok(())
    } else {
        Err(format!("{what} must be > 0, got {v}"))
    }
}

fn polygon(points: Vec<XY>) -> Result<Polygon, String> {
    if points.len() < 3 {
        return Err(format!("polygon needs at least 3 vertices, got {}", points.len()));
    }
    Ok(Polygon::new(points.into_iter().map(Point::from).collect()))
}

fn checked_angles(arc: ArcAngles) -> Result<ArcAngles, String> {
    if 0.0 <= arc.start && arc.start <= arc.end && arc.end <= 360.0 {
        Ok(arc)
    } else {
        Err(format!(
            "angles must satisfy 0 <= start <= end <= 360, got [{}, {}]",
            arc.start, arc.end
        ))
    }
}

fn row_spec(row: RowDoc) -> Result<RowSpec, String> {
    let angles = row
        .angles
        .map(|list| {
            let mut list = list.into_iter().map(checked_angles).collect::<Result<Vec<_>, _>>()?;
            sort_arcs(&mut list);
            Ok::<_, String>(list)
        })
        .transpose()?;
    if let Some(r) = row.radius {
        positive(r, "radius")?;
    }
    let seats = row.instruments.map(|lists| {
        lists
            .into_iter()
            .map(|list| {
                list.map(|names| names.iter().map(|n| Category::resolve_or_default(n)).collect())
            })
            .collect()
    });
    Ok(RowSpec {
        angles,
        seats,
        radius: row.radius,
        center: row.center.map(Point::from),
    })
}

fn area(doc: AreaDoc, default_center: Point) -> Result<Area, String> {
    match doc {
        AreaDoc::Polygon(points) => polygon(points).map(Area::Polygon),
        AreaDoc::Arc(arc) => {
            positive(arc.radius, "radius")?;
            Ok(Area::Sector(Sector::new(
                arc.center.map(Point::from).unwrap_or(default_center),
                arc.radius,
                checked_angles(arc.angles)?,
            )))
        }
    }
}
