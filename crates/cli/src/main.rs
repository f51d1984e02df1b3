use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

use seatplan::api::{
    artifact_stem, check_positive, layout_with, legend_lines, load_halls, Category, Hall, Layout,
    LayoutParams, ParamError, RowArcs,
};

mod provenance;
mod render;

use provenance::Sidecar;

#[derive(Parser)]
#[command(name = "seatplan")]
#[command(about = "Seating layouts for distanced stages")]
struct Cmd {
    /// Log per-band diagnostics
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Lay out halls and write one PNG plus sidecar per distancing scenario
    Layout {
        #[arg(long = "hall", required = true)]
        halls: Vec<PathBuf>,
        #[arg(long, default_value = "export")]
        out: PathBuf,
        /// Seat distancing in cm; repeat for several scenarios (default: the hall's own)
        #[arg(long, value_parser = positive_cm)]
        distancing: Vec<f64>,
        /// Band distancing in cm (default: the hall's own)
        #[arg(long, value_parser = positive_cm)]
        row_distancing: Option<f64>,
    },
    /// Print a JSON summary of each hall in a file
    Report {
        #[arg(long)]
        hall: PathBuf,
        #[arg(long, value_parser = positive_cm)]
        distancing: Option<f64>,
        #[arg(long, value_parser = positive_cm)]
        row_distancing: Option<f64>,
    },
}

/// Distance flag: a finite number of centimetres above zero.
fn positive_cm(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|err| format!("{raw:?}: {err}"))?;
    check_positive("distance", value).map_err(|err| err.to_string())?;
    Ok(value)
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Layout {
            halls,
            out,
            distancing,
            row_distancing,
        } => {
            let rendered = layout(&halls, &out, &distancing, row_distancing)?;
            if rendered == 0 {
                bail!("no hall could be laid out");
            }
            Ok(())
        }
        Action::Report {
            hall,
            distancing,
            row_distancing,
        } => report(&hall, distancing, row_distancing),
    }
}

/// Halls that fail to load are logged and skipped. Returns the number of
/// rendered scenarios.
fn layout(
    halls: &[PathBuf],
    out: &Path,
    distancing: &[f64],
    row_distancing: Option<f64>,
) -> Result<usize> {
    let mut rendered = 0;
    for path in halls {
        let entries = match load_halls(path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::error!(path = %path.display(), %err, "hall file skipped");
                continue;
            }
        };
        for entry in entries {
            let hall = match entry {
                Ok(hall) => hall,
                Err(err) => {
                    tracing::error!(path = %path.display(), %err, "hall skipped");
                    continue;
                }
            };
            let runs = match scenarios(&hall, distancing, row_distancing) {
                Ok(runs) => runs,
                Err(err) => {
                    tracing::error!(hall = %hall.name, %err, "hall skipped");
                    continue;
                }
            };
            for params in runs {
                render_run(&hall, params, out)?;
                rendered += 1;
            }
        }
    }
    Ok(rendered)
}

/// One parameter set per requested distancing, or the hall's own values.
fn scenarios(
    hall: &Hall,
    distancing: &[f64],
    row_distancing: Option<f64>,
) -> Result<Vec<LayoutParams>, ParamError> {
    let row_distancing = row_distancing.unwrap_or(hall.row_distancing);
    if distancing.is_empty() {
        return Ok(vec![LayoutParams::new(hall.distancing, row_distancing)?]);
    }
    distancing
        .iter()
        .map(|&d| LayoutParams::new(d, row_distancing))
        .collect()
}

fn render_run(hall: &Hall, params: LayoutParams, out: &Path) -> Result<PathBuf> {
    let layout = layout_with(hall, params)?;
    tracing::debug!(legend = ?legend_lines(&layout), "legend");

    let png = out.join(format!("{}.png", artifact_stem(&hall.name, &params)));
    render::save(&render::draw(hall, &layout), &png)?;
    Sidecar::for_layout(&layout, &png).write(&png)?;
    tracing::info!(
        hall = %hall.name,
        seats = layout.seat_count(),
        out = %png.display(),
        "rendered"
    );
    Ok(png)
}

#[derive(Serialize)]
struct HallReport<'a> {
    hall: &'a str,
    params: LayoutParams,
    seats: usize,
    by_category: &'a BTreeMap<Category, usize>,
    bands: Vec<BandSummary<'a>>,
}

#[derive(Serialize)]
struct BandSummary<'a> {
    index: usize,
    radius: f64,
    seats: usize,
    rows: &'a [RowArcs],
    skipped: Option<String>,
}

impl<'a> From<&'a Layout> for HallReport<'a> {
    fn from(layout: &'a Layout) -> Self {
        Self {
            hall: &layout.hall,
            params: layout.params,
            seats: layout.seat_count(),
            by_category: layout.tally.by_category(),
            bands: layout
                .bands
                .iter()
                .map(|band| BandSummary {
                    index: band.index,
                    radius: band.radius,
                    seats: band.seats,
                    rows: &band.rows,
                    skipped: band.skipped.as_ref().map(|err| err.to_string()),
                })
                .collect(),
        }
    }
}

fn report(path: &Path, distancing: Option<f64>, row_distancing: Option<f64>) -> Result<()> {
    let distancing: Vec<f64> = distancing.into_iter().collect();
    let mut layouts = Vec::new();
    for entry in load_halls(path)? {
        match entry {
            Ok(hall) => {
                for params in scenarios(&hall, &distancing, row_distancing)? {
                    layouts.push(layout_with(&hall, params)?);
                }
            }
            Err(err) => tracing::error!(path = %path.display(), %err, "hall skipped"),
        }
    }
    if layouts.is_empty() {
        bail!("no hall in {} could be laid out", path.display());
    }
    let reports: Vec<HallReport> = layouts.iter().map(HallReport::from).collect();
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::tempdir;

    const HALLS: &str = r#"[
        {
            "name": "Aula",
            "stage": {"x": 1580, "y": 960},
            "rows": {"list": [null, null], "distancing": 150, "distancingFirstRow": 100},
            "distancing": 150
        },
        {
            "name": "Broken",
            "stage": {"x": 800, "y": 600},
            "rows": {"list": [null], "distancing": 150},
            "distancing": -1
        }
    ]"#;

    #[test]
    fn cli_parses_repeated_flags() {
        let cmd = Cmd::try_parse_from([
            "seatplan",
            "layout",
            "--hall",
            "a.json",
            "--hall",
            "b.json",
            "--distancing",
            "150",
            "--distancing",
            "200",
            "--row-distancing",
            "180",
            "-v",
        ])
        .unwrap();
        assert!(cmd.verbose);
        match cmd.action {
            Action::Layout {
                halls,
                out,
                distancing,
                row_distancing,
            } => {
                assert_eq!(halls.len(), 2);
                assert_eq!(out, PathBuf::from("export"));
                assert_eq!(distancing, vec![150.0, 200.0]);
                assert_eq!(row_distancing, Some(180.0));
            }
            Action::Report { .. } => panic!("expected layout"),
        }
    }

    #[test]
    fn cli_rejects_non_positive_distancing() {
        for bad in [
            "--distancing=0",
            "--distancing=-5",
            "--distancing=NaN",
            "--distancing=inf",
        ] {
            let parsed = Cmd::try_parse_from(["seatplan", "layout", "--hall", "a.json", bad]);
            assert!(parsed.is_err(), "{bad} accepted");
        }
        // the separated form fails as well
        let parsed = Cmd::try_parse_from([
            "seatplan",
            "layout",
            "--hall",
            "a.json",
            "--distancing",
            "-5",
        ]);
        assert!(parsed.is_err());
        let parsed = Cmd::try_parse_from([
            "seatplan",
            "report",
            "--hall",
            "a.json",
            "--row-distancing=0",
        ]);
        assert!(parsed.is_err());
        assert_eq!(positive_cm("137.5"), Ok(137.5));
    }

    #[test]
    fn scenarios_refuse_non_positive_values() {
        let hall = seatplan::api::parse_halls(HALLS).unwrap().remove(0).unwrap();
        assert!(scenarios(&hall, &[150.0, 0.0], None).is_err());
        assert!(scenarios(&hall, &[-5.0], None).is_err());
        assert!(scenarios(&hall, &[], Some(0.0)).is_err());
    }

    #[test]
    fn layout_writes_png_and_sidecar_per_scenario() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("halls.json");
        fs::write(&input, HALLS).unwrap();
        let out = dir.path().join("export");

        let rendered = layout(&[input], &out, &[150.0, 200.0], None).unwrap();
        assert_eq!(rendered, 2);
        for d in ["150", "200"] {
            let stem = format!("Aula_distancing_{d}_row_distancing_150");
            assert!(out.join(format!("{stem}.png")).exists());
            let sidecar: Value = serde_json::from_slice(
                &fs::read(out.join(format!("{stem}.provenance.json"))).unwrap(),
            )
            .unwrap();
            assert_eq!(sidecar["params"]["hall"], "Aula");
            assert_eq!(sidecar["legend"][0], "Aula");
            assert!(sidecar["totals"]["seats"].as_u64().unwrap() > 0);
        }
    }

    #[test]
    fn unreadable_files_are_skipped() {
        let dir = tempdir().unwrap();
        let rendered = layout(
            &[dir.path().join("missing.json")],
            &dir.path().join("export"),
            &[],
            None,
        )
        .unwrap();
        assert_eq!(rendered, 0);
    }

    #[test]
    fn scenarios_default_to_hall_values() {
        let hall = seatplan::api::parse_halls(HALLS).unwrap().remove(0).unwrap();
        let params = scenarios(&hall, &[], Some(175.0)).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].distancing, 150.0);
        assert_eq!(params[0].row_distancing, 175.0);
    }

    #[test]
    fn report_lists_bands() {
        let hall = seatplan::api::parse_halls(HALLS).unwrap().remove(0).unwrap();
        let layout = layout_with(&hall, hall.default_params()).unwrap();
        let value = serde_json::to_value(HallReport::from(&layout)).unwrap();
        assert_eq!(value["hall"], "Aula");
        assert_eq!(value["bands"].as_array().unwrap().len(), 2);
        assert_eq!(value["bands"][0]["radius"], 250.0);
        assert_eq!(value["seats"], layout.seat_count());
    }
}
