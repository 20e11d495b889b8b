//! # Solar Elevation Core Library
//!
//! This library computes the elevation angle of the sun over a uniform time grid
//! for one location, marks the grid points that a user asked to highlight, and
//! lays out the axis ticks a chart renderer needs. It performs no plotting: every
//! output is plain data that a renderer or exporter consumes.
//!
//! ## Design Philosophy
//!
//! ### Request-scoped data
//! - **No shared tables**: every run returns its own [`report::SolarReport`]; the
//!   display and export paths both work from the report of the request at hand
//! - **Pure stages**: grid generation, matching and tick layout are pure functions
//!   of their inputs, so recomputing a request always yields the same table
//! - **Fail whole**: a solver failure or a malformed special entry aborts the run
//!   instead of producing a partial series with misleading highlights
//!
//! ### Data Flow
//! 1. **Grid**: `start, start + interval, ...` up to the last point not after `end`
//! 2. **Sample**: one solver call per grid point → elevation in degrees
//! 3. **Match**: special times (nearest point) and special angles (threshold band)
//! 4. **Ticks**: x ticks on their own grid, y ticks on whole multiples of the step
//! 5. **Assemble**: rows of `(timestamp, elevation, highlighted)` plus markers/ticks
//!
//! ## Core Types
//!
//! - [`TimePoint`]: a single elevation sample at a zoned timestamp
//! - [`TimeSeries`]: the ordered samples of one request

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// Module declarations
pub mod annotate;
pub mod config;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod renderer;
pub mod report;
pub mod request;
pub mod sampler;
pub mod solver;
pub mod ticks;
pub mod zone;

#[cfg(test)]
mod tests;

pub use error::ElevationError;

/// A single solar elevation sample.
///
/// Timestamps carry the UTC offset that was in force in the request's zone at
/// that instant. Grid timestamps fall on whole minutes: a parsed request window
/// is truncated to the minute and the step is a whole number of minutes.
///
/// # Example
/// ```
/// use chrono::DateTime;
/// use solar_elevation_lib::TimePoint;
///
/// let noon = DateTime::parse_from_rfc3339("2024-06-21T12:00:00+09:00").unwrap();
/// let point = TimePoint::new(noon, 77.9);
///
/// assert!(!point.highlighted);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// Grid timestamp in the request zone
    pub timestamp: DateTime<FixedOffset>,
    /// Apparent elevation of the sun in degrees (negative below the horizon)
    pub elevation_angle: f64,
    /// True if an annotation target selected this point
    pub highlighted: bool,
}

impl TimePoint {
    /// Create an un-highlighted sample.
    pub fn new(timestamp: DateTime<FixedOffset>, elevation_angle: f64) -> Self {
        TimePoint {
            timestamp,
            elevation_angle,
            highlighted: false,
        }
    }
}

/// Ordered elevation samples of one request.
///
/// Timestamps are strictly increasing and evenly spaced by the request
/// interval; the first point is the request start.
///
/// # Example
/// ```
/// use chrono::{DateTime, Duration};
/// use solar_elevation_lib::{TimePoint, TimeSeries};
///
/// let t0 = DateTime::parse_from_rfc3339("2024-01-01T06:00:00+09:00").unwrap();
/// let series = TimeSeries {
///     points: vec![
///         TimePoint::new(t0, -2.5),
///         TimePoint::new(t0 + Duration::minutes(30), 1.5),
///         TimePoint::new(t0 + Duration::minutes(60), 6.0),
///     ],
/// };
///
/// assert_eq!(series.len(), 3);
/// assert_eq!(series.elevation_range(), Some((-2.5, 6.0)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Samples in grid order
    pub points: Vec<TimePoint>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest elevation, or `None` for an empty series.
    pub fn elevation_range(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        Some(
            self.points
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), point| {
                    (min.min(point.elevation_angle), max.max(point.elevation_angle))
                }),
        )
    }
}
