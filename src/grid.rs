//! # Uniform Time Grids
//!
//! Builds the timestamp sequence `start, start + step, start + 2·step, ...` up to
//! and including the last value not after `end`. The same routine lays out the
//! data grid and the x-axis ticks; only the step differs.
//!
//! `end` is not forced into the grid: with a 25-minute step over one hour the
//! grid is `00:00, 00:25, 00:50`.

use crate::error::{ElevationError, Result};
use crate::zone::Zone;
use chrono::{DateTime, Duration, FixedOffset};

/// Number of grid points for a window, `floor((end - start) / step) + 1`.
///
/// Errors for a non-positive step or an inverted window.
pub fn point_count(
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
    step_minutes: i64,
) -> Result<usize> {
    if step_minutes <= 0 {
        return Err(ElevationError::Config(format!(
            "interval must be a positive number of minutes, got {step_minutes}"
        )));
    }
    if end < start {
        return Err(ElevationError::Range {
            start: *start,
            end: *end,
        });
    }

    // A step too large to express in seconds is longer than any span
    let span_seconds = (*end - *start).num_seconds();
    Ok(match step_minutes.checked_mul(60) {
        Some(step_seconds) => (span_seconds / step_seconds) as usize + 1,
        None => 1,
    })
}

/// Generate the grid between `start` and `end` with a step of `step_minutes`.
///
/// Each point is expressed in `zone`; the first point equals `start`.
///
/// # Example
/// ```
/// use chrono::DateTime;
/// use solar_elevation_lib::{grid, zone::Zone};
///
/// let start = DateTime::parse_from_rfc3339("2024-01-01T00:00:00+09:00").unwrap();
/// let end = DateTime::parse_from_rfc3339("2024-01-02T00:00:00+09:00").unwrap();
/// let zone = Zone::from_hours(9).unwrap();
///
/// let points = grid::generate(&start, &end, 60, &zone).unwrap();
/// assert_eq!(points.len(), 25);
/// assert_eq!(points[0], start);
/// assert_eq!(points[24], end);
/// ```
pub fn generate(
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
    step_minutes: i64,
    zone: &Zone,
) -> Result<Vec<DateTime<FixedOffset>>> {
    let count = point_count(start, end, step_minutes)?;

    let mut points = Vec::with_capacity(count);
    // step * step_minutes stays within the span, so neither the product nor
    // the offset can overflow
    for step in 0..count as i64 {
        let instant = *start + Duration::minutes(step * step_minutes);
        points.push(zone.at(&instant));
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    fn jst() -> Zone {
        Zone::from_hours(9).unwrap()
    }

    #[test]
    fn test_full_day_hourly_grid() {
        let start = tokyo("2024-01-01T00:00:00+09:00");
        let end = tokyo("2024-01-02T00:00:00+09:00");

        let points = generate(&start, &end, 60, &jst()).unwrap();

        assert_eq!(points.len(), 25, "24 hours at 60 minutes plus both ends");
        assert_eq!(points[0], start);
        assert_eq!(*points.last().unwrap(), end);
    }

    #[test]
    fn test_uneven_span_stops_before_end() {
        let start = tokyo("2024-01-01T00:00:00+09:00");
        let end = tokyo("2024-01-01T01:00:00+09:00");

        let points = generate(&start, &end, 25, &jst()).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[2], tokyo("2024-01-01T00:50:00+09:00"));
        assert!(points.iter().all(|p| *p <= end));
    }

    #[test]
    fn test_constant_spacing() {
        let start = tokyo("2024-03-10T04:00:00+09:00");
        let end = tokyo("2024-03-10T20:00:00+09:00");

        let points = generate(&start, &end, 7, &jst()).unwrap();

        assert_eq!(points.len(), (16 * 60) / 7 + 1);
        for pair in points.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::minutes(7));
        }
    }

    #[test]
    fn test_single_point_when_start_equals_end() {
        let start = tokyo("2024-01-01T12:00:00+09:00");
        let points = generate(&start, &start, 10, &jst()).unwrap();
        assert_eq!(points, vec![start]);
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        let start = tokyo("2024-01-01T00:00:00+09:00");
        let end = tokyo("2024-01-01T01:00:00+09:00");

        assert!(matches!(
            generate(&start, &end, 0, &jst()),
            Err(ElevationError::Config(_))
        ));
        assert!(matches!(
            generate(&start, &end, -15, &jst()),
            Err(ElevationError::Config(_))
        ));
    }

    #[test]
    fn test_huge_step_gives_single_point() {
        let start = tokyo("2024-01-01T00:00:00+09:00");
        let end = tokyo("2024-01-02T00:00:00+09:00");

        assert_eq!(point_count(&start, &end, i64::MAX / 60 + 1).unwrap(), 1);
        assert_eq!(point_count(&start, &end, i64::MAX).unwrap(), 1);
        assert_eq!(point_count(&start, &end, 24 * 60 + 1).unwrap(), 1);
        assert_eq!(generate(&start, &end, i64::MAX, &jst()).unwrap(), vec![start]);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let start = tokyo("2024-01-02T00:00:00+09:00");
        let end = tokyo("2024-01-01T00:00:00+09:00");

        assert!(matches!(
            generate(&start, &end, 60, &jst()),
            Err(ElevationError::Range { .. })
        ));
    }

    #[test]
    fn test_named_zone_offsets_follow_dst() {
        let zone: Zone = "Europe/Vienna".parse().unwrap();
        // Spring forward happens at 02:00 local (01:00 UTC) on this date
        let start = DateTime::parse_from_rfc3339("2024-03-31T00:00:00+01:00").unwrap();
        let end = DateTime::parse_from_rfc3339("2024-03-31T04:00:00+02:00").unwrap();

        let points = generate(&start, &end, 60, &zone).unwrap();

        assert_eq!(points.len(), 4);
        assert_eq!(points[0].offset().local_minus_utc(), 3600);
        assert_eq!(points[3].offset().local_minus_utc(), 7200);
        assert_eq!(points[3], end);
    }
}
