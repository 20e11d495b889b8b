//! # Annotation Matching
//!
//! Turns the user's special times and special angles into a set of highlighted
//! grid points.
//!
//! ## Matching Rules
//! - **Special time**: the single point closest to the target. Equal distances
//!   go to the earlier point. The grid is sorted, so the candidates are found by
//!   binary search.
//! - **Special angle**: every point with `|elevation - angle| <= threshold`. The
//!   boundary is inclusive and the threshold is shared by all angle targets.
//!
//! The result is the union over all targets. Markers (the vertical reference
//! lines on a chart) are the distinct timestamps of that union, sorted.
//!
//! A threshold of zero is accepted but means exact floating-point equality,
//! which rarely matches a sampled curve; use a small positive band instead.

use crate::error::{ElevationError, Result};
use crate::TimeSeries;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// One annotation target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// Highlight the grid point nearest to this time
    Time(DateTime<FixedOffset>),
    /// Highlight all grid points within the shared threshold of this angle
    Angle(f64),
}

/// The targets of one request plus the band used for angle targets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRequest {
    pub targets: Vec<Target>,
    /// Degrees either side of each angle target
    pub angle_threshold: f64,
}

impl AnnotationRequest {
    /// Build a request from separate time and angle lists.
    pub fn new(
        times: impl IntoIterator<Item = DateTime<FixedOffset>>,
        angles: impl IntoIterator<Item = f64>,
        angle_threshold: f64,
    ) -> Self {
        let targets = times
            .into_iter()
            .map(Target::Time)
            .chain(angles.into_iter().map(Target::Angle))
            .collect();
        AnnotationRequest {
            targets,
            angle_threshold,
        }
    }
}

/// Highlighted grid indices and the marker timestamps derived from them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Highlights {
    pub indices: BTreeSet<usize>,
    /// Sorted, distinct timestamps of the highlighted points
    pub markers: Vec<DateTime<FixedOffset>>,
}

impl Highlights {
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }
}

/// Index of the point nearest to `target`; ties resolve to the earlier index.
pub fn nearest_index(series: &TimeSeries, target: &DateTime<FixedOffset>) -> Result<usize> {
    let points = &series.points;
    if points.is_empty() {
        return Err(ElevationError::EmptySeries);
    }

    let after = points.partition_point(|p| p.timestamp < *target);
    if after == 0 {
        return Ok(0);
    }
    if after == points.len() {
        return Ok(points.len() - 1);
    }

    let before = after - 1;
    let to_before = *target - points[before].timestamp;
    let to_after = points[after].timestamp - *target;
    Ok(if to_before <= to_after { before } else { after })
}

/// Every index whose elevation lies within `threshold` of `angle`, inclusive.
pub fn angle_indices(series: &TimeSeries, angle: f64, threshold: f64) -> Vec<usize> {
    series
        .points
        .iter()
        .enumerate()
        .filter(|(_, p)| (p.elevation_angle - angle).abs() <= threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Resolve all targets of `request` against `series`.
///
/// # Example
/// ```
/// use chrono::{DateTime, Duration};
/// use solar_elevation_lib::annotate::{match_annotations, AnnotationRequest};
/// use solar_elevation_lib::{TimePoint, TimeSeries};
///
/// let t0 = DateTime::parse_from_rfc3339("2024-01-01T06:00:00+09:00").unwrap();
/// let series = TimeSeries {
///     points: (0..4)
///         .map(|i| TimePoint::new(t0 + Duration::minutes(30 * i), -1.0 + i as f64))
///         .collect(),
/// };
///
/// // 06:50 is nearest to 07:00 (index 2); elevation 0.0 ± 0.5 matches index 1
/// let request = AnnotationRequest::new([t0 + Duration::minutes(50)], [0.0], 0.5);
/// let highlights = match_annotations(&series, &request).unwrap();
///
/// assert_eq!(highlights.indices.into_iter().collect::<Vec<_>>(), vec![1, 2]);
/// ```
pub fn match_annotations(series: &TimeSeries, request: &AnnotationRequest) -> Result<Highlights> {
    let threshold = request.angle_threshold;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ElevationError::Config(format!(
            "angle threshold must be a non-negative number, got {threshold}"
        )));
    }

    let mut indices = BTreeSet::new();
    for target in &request.targets {
        match target {
            Target::Time(at) => {
                let index = nearest_index(series, at)?;
                debug!(target = %at, index, "matched special time");
                indices.insert(index);
            }
            Target::Angle(angle) => {
                let matched = angle_indices(series, *angle, threshold);
                debug!(angle, threshold, matches = matched.len(), "matched special angle");
                indices.extend(matched);
            }
        }
    }

    let mut markers: Vec<_> = indices
        .iter()
        .map(|&i| series.points[i].timestamp)
        .collect();
    markers.sort();
    markers.dedup();

    Ok(Highlights { indices, markers })
}
