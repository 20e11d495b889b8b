//! # Request Pipeline
//!
//! Runs one request end to end: grid → sample → match → ticks → assemble. Each
//! run owns its data from start to finish; calling [`run`] twice with the same
//! request and a deterministic solver yields identical reports, which is how the
//! export path reproduces exactly what was displayed.

use crate::error::Result;
use crate::report::{self, SolarReport};
use crate::request::ElevationRequest;
use crate::solver::ElevationSolver;
use crate::{annotate, grid, sampler, ticks};
use tracing::{debug, info};

/// Compute the report for `request` using `solver`.
pub fn run<S: ElevationSolver + ?Sized>(
    request: &ElevationRequest,
    solver: &S,
) -> Result<SolarReport> {
    request.validate()?;
    info!(
        start = %request.start,
        end = %request.end,
        interval = request.interval_minutes,
        zone = %request.zone,
        "computing solar elevation series"
    );

    let timestamps = grid::generate(
        &request.start,
        &request.end,
        request.interval_minutes,
        &request.zone,
    )?;
    let series = sampler::sample(&timestamps, &request.site, solver)?;

    let highlights = annotate::match_annotations(&series, &request.annotations)?;
    debug!(
        highlighted = highlights.indices.len(),
        markers = highlights.markers.len(),
        "resolved annotations"
    );

    let plan = ticks::plan(
        &request.start,
        &request.end,
        &request.zone,
        request.xtick_minutes,
        request.ytick_degrees,
        &series,
    )?;

    let report = report::assemble(series, &highlights, plan, request.summary());
    info!(
        rows = report.rows.len(),
        highlighted = report.highlighted_count(),
        "report ready"
    );
    Ok(report)
}
