//! Provenance sidecar written next to every rendered layout:
//! `<artifact-stem>.provenance.json` with the code revision, the callsite,
//! the run parameters, the legend and the seat totals.

use std::collections::BTreeMap;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use serde::Serialize;
use seatplan::api::{legend_lines, Category, Layout};

#[derive(Debug, Serialize)]
pub struct Sidecar<'a> {
    code_rev: String,
    tool_version: &'static str,
    callsite: Callsite,
    params: RunParams<'a>,
    legend: Vec<String>,
    totals: Totals<'a>,
    outputs: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Debug, Serialize)]
struct RunParams<'a> {
    hall: &'a str,
    distancing: f64,
    row_distancing: f64,
}

#[derive(Debug, Serialize)]
struct Totals<'a> {
    seats: usize,
    by_category: &'a BTreeMap<Category, usize>,
    skipped_bands: Vec<usize>,
}

impl<'a> Sidecar<'a> {
    /// Record for `layout` rendered to `artifact`; the callsite is the caller's.
    #[track_caller]
    pub fn for_layout(layout: &'a Layout, artifact: &Path) -> Self {
        let caller = Location::caller();
        Self {
            code_rev: code_rev(),
            tool_version: seatplan::VERSION,
            callsite: Callsite {
                file: caller.file(),
                line: caller.line(),
            },
            params: RunParams {
                hall: &layout.hall,
                distancing: layout.params.distancing,
                row_distancing: layout.params.row_distancing,
            },
            legend: legend_lines(layout),
            totals: Totals {
                seats: layout.seat_count(),
                by_category: layout.tally.by_category(),
                skipped_bands: layout
                    .bands
                    .iter()
                    .filter(|band| band.skipped.is_some())
                    .map(|band| band.index)
                    .collect(),
            },
            outputs: vec![artifact.display().to_string()],
        }
    }

    /// Write next to `artifact` and return the sidecar path.
    pub fn write(&self, artifact: &Path) -> Result<PathBuf> {
        let path = sidecar_path(artifact);
        let body = serde_json::to_vec_pretty(self).context("serialising provenance")?;
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

/// `dir/<stem>.png` → `dir/<stem>.provenance.json`.
pub fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// `GIT_COMMIT` from the environment (run time, then build time), else
/// `git rev-parse HEAD`, else "unknown".
fn code_rev() -> String {
    std::env::var("GIT_COMMIT")
        .ok()
        .or_else(|| option_env!("GIT_COMMIT").map(str::to_owned))
        .filter(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn git_head() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).trim().to_owned())
        .filter(|rev| !rev.is_empty())
}
