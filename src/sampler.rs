//! # Elevation Sampling
//!
//! Walks the grid and asks the solver for one elevation per timestamp. The first
//! solver failure aborts the whole series: tick ranges and matching both assume
//! every grid point has a value.

use crate::error::{ElevationError, Result};
use crate::solver::{ElevationSolver, Site};
use crate::{TimePoint, TimeSeries};
use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn};

/// Sample the solver over `grid`, producing an un-highlighted series.
pub fn sample<S: ElevationSolver + ?Sized>(
    grid: &[DateTime<FixedOffset>],
    site: &Site,
    solver: &S,
) -> Result<TimeSeries> {
    let mut points = Vec::with_capacity(grid.len());

    for timestamp in grid {
        let elevation = solver.elevation_for(timestamp, site).map_err(|source| {
            warn!(%timestamp, error = %source, "solver failed");
            ElevationError::Sample {
                at: *timestamp,
                source,
            }
        })?;
        points.push(TimePoint::new(*timestamp, elevation));
    }

    debug!(points = points.len(), "sampled elevation series");
    Ok(TimeSeries { points })
}
