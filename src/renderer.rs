//! # Text Chart Rendering
//!
//! Draws a [`SolarReport`] as a terminal chart. The renderer computes nothing of
//! its own: rows, markers and both tick axes come from the report, and x labels
//! follow [`ticks::x_tick_label`].
//!
//! ```text
//!  50 ┤          •••••
//!  40 ┤       ••      ••
//!     │      •          •
//!   0 ┤ ••••*┆            *┆••••
//! ```
//!
//! - `•` plain sample, `*` highlighted sample
//! - `┆` marker line at a highlighted time
//! - long series are bucketed so the chart stays within [`MAX_COLUMNS`]

use crate::report::SolarReport;
use crate::ticks;
use chrono::{DateTime, FixedOffset};

/// Chart height in text rows
const ROWS: usize = 21;
/// Widest plot area in characters
pub const MAX_COLUMNS: usize = 96;
/// Space for y-axis labels plus the axis line
const Y_AXIS_WIDTH: usize = 7;

/// Format a y tick label without a trailing `.0` for whole degrees.
fn format_degrees(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Column of an instant within the plot area.
fn time_to_column(
    at: &DateTime<FixedOffset>,
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
    columns: usize,
) -> usize {
    let span = (*end - *start).num_seconds();
    if span <= 0 || columns <= 1 {
        return 0;
    }
    let fraction = (*at - *start).num_seconds() as f64 / span as f64;
    (fraction.clamp(0.0, 1.0) * (columns - 1) as f64).round() as usize
}

/// Render `report` as a multi-line text chart.
pub fn render_ascii(report: &SolarReport) -> String {
    let mut out = String::new();
    out.push_str(&report.title());
    out.push('\n');

    let sample_count = report.rows.len();
    if sample_count == 0 {
        out.push_str("(no data)\n");
        return out;
    }

    let (y_low, y_high) = report.ticks.y_bounds().unwrap_or_else(|| {
        report.rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), row| {
            (lo.min(row.elevation_angle), hi.max(row.elevation_angle))
        })
    });
    let y_span = if y_high > y_low { y_high - y_low } else { 1.0 };
    let value_to_row = |value: f64| {
        let normalized = ((y_high - value) / y_span).clamp(0.0, 1.0);
        (normalized * (ROWS - 1) as f64).round() as usize
    };

    let columns = sample_count.min(MAX_COLUMNS);
    let start = &report.request.start;
    let end = &report.request.end;

    let mut grid = vec![vec![' '; Y_AXIS_WIDTH + columns]; ROWS];

    // Y axis with tick labels
    for row in grid.iter_mut() {
        row[Y_AXIS_WIDTH - 1] = '│';
    }
    for &tick in &report.ticks.y_ticks {
        let row = value_to_row(tick);
        let label = format!("{:>width$} ┤", format_degrees(tick), width = Y_AXIS_WIDTH - 2);
        for (i, ch) in label.chars().take(Y_AXIS_WIDTH).enumerate() {
            grid[row][i] = ch;
        }
    }

    // Marker lines first so samples draw over them
    for marker in &report.markers {
        let column = Y_AXIS_WIDTH + time_to_column(marker, start, end, columns);
        for row in grid.iter_mut() {
            row[column] = '┆';
        }
    }

    // Samples; a highlighted sample wins over a plain one in the same cell
    for (index, sample) in report.rows.iter().enumerate() {
        let column = if sample_count > 1 {
            Y_AXIS_WIDTH + index * (columns - 1) / (sample_count - 1)
        } else {
            Y_AXIS_WIDTH
        };
        let cell = &mut grid[value_to_row(sample.elevation_angle)][column];
        if sample.highlighted {
            *cell = '*';
        } else if *cell != '*' {
            *cell = '•';
        }
    }

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    // X axis with tick marks and labels
    let padding = " ".repeat(Y_AXIS_WIDTH - 1);
    let mut axis: Vec<char> = std::iter::repeat('─').take(columns).collect();
    let mut labels = vec![' '; columns + 16];
    let mut next_free = 0;
    for tick in &report.ticks.x_ticks {
        let column = time_to_column(tick, start, end, columns);
        axis[column] = '┬';

        // Skip labels that would overlap the previous one
        if column < next_free {
            continue;
        }
        let label = ticks::x_tick_label(tick);
        for (i, ch) in label.chars().enumerate() {
            if let Some(slot) = labels.get_mut(column + i) {
                *slot = ch;
            }
        }
        next_free = column + label.chars().count() + 1;
    }

    out.push_str(&padding);
    out.push('└');
    out.push_str(&axis.into_iter().collect::<String>());
    out.push('\n');
    out.push_str(&" ".repeat(Y_AXIS_WIDTH));
    out.push_str(labels.into_iter().collect::<String>().trim_end());
    out.push('\n');

    out.push_str(&format!(
        "• elevation (deg)   * highlighted ({})   ┆ marker\n",
        report.highlighted_count()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RequestSummary;
    use crate::solver::Site;
    use crate::ticks::TickPlan;
    use crate::TimePoint;
    use chrono::Duration;

    fn test_report(highlight: &[usize]) -> SolarReport {
        let start = DateTime::parse_from_rfc3339("2024-01-01T18:00:00+09:00").unwrap();
        let end = start + Duration::hours(6);
        let elevations = [5.0, -2.0, -15.0, -30.0, -15.0, -2.0, 5.0];
        let rows: Vec<TimePoint> = elevations
            .iter()
            .enumerate()
            .map(|(i, e)| TimePoint {
                timestamp: start + Duration::hours(i as i64),
                elevation_angle: *e,
                highlighted: highlight.contains(&i),
            })
            .collect();
        let markers = highlight.iter().map(|&i| rows[i].timestamp).collect();

        SolarReport {
            request: RequestSummary {
                start,
                end,
                interval_minutes: 60,
                site: Site {
                    latitude: 35.0,
                    longitude: 139.0,
                    altitude: 0.0,
                },
                zone: "+09:00".into(),
            },
            rows,
            markers,
            ticks: TickPlan {
                x_ticks: (0..=6).map(|h| start + Duration::hours(h)).collect(),
                y_ticks: vec![-30.0, -20.0, -10.0, 0.0, 10.0],
            },
        }
    }

    #[test]
    fn test_format_degrees() {
        assert_eq!(format_degrees(10.0), "10");
        assert_eq!(format_degrees(-30.0), "-30");
        assert_eq!(format_degrees(2.5), "2.5");
    }

    #[test]
    fn test_time_to_column_bounds() {
        let report = test_report(&[]);
        let (start, end) = (&report.request.start, &report.request.end);
        assert_eq!(time_to_column(start, start, end, 7), 0);
        assert_eq!(time_to_column(end, start, end, 7), 6);
        assert_eq!(time_to_column(&(*end + Duration::hours(3)), start, end, 7), 6);
        assert_eq!(time_to_column(start, start, start, 7), 0);
    }

    #[test]
    fn test_ascii_rendering() {
        let chart = render_ascii(&test_report(&[]));

        assert!(chart.starts_with("Solar Altitude: 2024-01-01 18:00 to 2024-01-02 00:00\n"));
        assert!(chart.contains("-30 ┤"));
        assert!(chart.contains("10 ┤"));
        assert!(chart.matches('•').count() > 1);
        // Only the legend mentions these
        assert_eq!(chart.matches('*').count(), 1);
        assert_eq!(chart.matches('┆').count(), 1);
        // Midnight tick carries the date
        assert!(chart.contains("01-02 00:00"));
        assert!(chart.contains("18:00"));
    }

    #[test]
    fn test_highlights_and_markers_drawn() {
        let chart = render_ascii(&test_report(&[1, 5]));

        assert!(chart.matches('*').count() > 1);
        assert!(chart.matches('┆').count() > 1);
        assert!(chart.contains("highlighted (2)"));
    }

    #[test]
    fn test_empty_report() {
        let mut report = test_report(&[]);
        report.rows.clear();
        assert!(render_ascii(&report).ends_with("(no data)\n"));
    }
}
