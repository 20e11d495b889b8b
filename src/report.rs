//! # Result Assembly and Table Export
//!
//! Merges the sampled series, the highlight set and the tick plan into one
//! [`SolarReport`]. The report is the only artifact handed on: the chart
//! renderer reads rows, markers and ticks from it, and the CSV export writes its
//! rows.
//!
//! ## CSV Layout
//! ```text
//! Time,Solar Elevation Angle
//! 2024-01-01 00:00:00+09:00,-78.12345
//! ```
//! An optional third `Highlighted` column carries the highlight flags; whether
//! it is written is an explicit [`HighlightColumn`] choice of the caller.

use crate::annotate::Highlights;
use crate::error::{ElevationError, Result};
use crate::solver::Site;
use crate::ticks::TickPlan;
use crate::{TimePoint, TimeSeries};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::io;

pub const TIME_HEADER: &str = "Time";
pub const ELEVATION_HEADER: &str = "Solar Elevation Angle";
pub const HIGHLIGHT_HEADER: &str = "Highlighted";

/// Timestamp layout used in exported tables.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Whether exported tables carry the highlight flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HighlightColumn {
    #[default]
    Omit,
    Include,
}

/// Parameters of the request a report was computed for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub interval_minutes: i64,
    pub site: Site,
    pub zone: String,
}

/// Everything a renderer or exporter needs from one request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolarReport {
    pub request: RequestSummary,
    /// One row per grid point, in grid order
    pub rows: Vec<TimePoint>,
    /// Sorted distinct timestamps of highlighted rows
    pub markers: Vec<DateTime<FixedOffset>>,
    pub ticks: TickPlan,
}

/// Apply `highlights` to `series` and bundle it with `ticks`.
pub fn assemble(
    series: TimeSeries,
    highlights: &Highlights,
    ticks: TickPlan,
    request: RequestSummary,
) -> SolarReport {
    let rows = series
        .points
        .into_iter()
        .enumerate()
        .map(|(index, point)| TimePoint {
            highlighted: highlights.contains(index),
            ..point
        })
        .collect();

    SolarReport {
        request,
        rows,
        markers: highlights.markers.clone(),
        ticks,
    }
}

impl SolarReport {
    pub fn highlighted_count(&self) -> usize {
        self.rows.iter().filter(|row| row.highlighted).count()
    }

    /// Chart title, e.g. `Solar Altitude: 2024-01-01 00:00 to 2024-01-02 00:00`.
    pub fn title(&self) -> String {
        format!(
            "Solar Altitude: {} to {}",
            self.request.start.format("%Y-%m-%d %H:%M"),
            self.request.end.format("%Y-%m-%d %H:%M")
        )
    }

    fn file_stem(&self) -> String {
        let r = &self.request;
        format!(
            "{}_{}_{}min_{:?}_{:?}_{:?}",
            r.start.format("%Y-%m-%d_%H%M"),
            r.end.format("%Y-%m-%d_%H%M"),
            r.interval_minutes,
            r.site.latitude,
            r.site.longitude,
            r.site.altitude
        )
    }

    /// Download name for the CSV table.
    pub fn table_filename(&self) -> String {
        format!("{}_table.csv", self.file_stem())
    }

    /// Download name for a rendered chart with the given extension.
    pub fn chart_filename(&self, extension: &str) -> String {
        format!("{}_chart.{}", self.file_stem(), extension)
    }

    /// Write the rows as CSV.
    pub fn write_csv<W: io::Write>(&self, writer: W, column: HighlightColumn) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        match column {
            HighlightColumn::Omit => csv.write_record([TIME_HEADER, ELEVATION_HEADER])?,
            HighlightColumn::Include => {
                csv.write_record([TIME_HEADER, ELEVATION_HEADER, HIGHLIGHT_HEADER])?
            }
        }

        for row in &self.rows {
            let time = row.timestamp.format(TIME_FORMAT).to_string();
            let elevation = row.elevation_angle.to_string();
            match column {
                HighlightColumn::Omit => csv.write_record([time, elevation])?,
                HighlightColumn::Include => {
                    csv.write_record([time, elevation, row.highlighted.to_string()])?
                }
            }
        }

        csv.flush()?;
        Ok(())
    }

    /// Rows as a CSV string.
    pub fn to_csv_string(&self, column: HighlightColumn) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer, column)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Read a table written by [`SolarReport::write_csv`].
///
/// Tables without a `Highlighted` column read back with every flag false.
pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<TimePoint>> {
    let mut csv = csv::Reader::from_reader(reader);

    let headers = csv.headers()?.clone();
    let has_highlight = match headers.iter().collect::<Vec<_>>().as_slice() {
        [TIME_HEADER, ELEVATION_HEADER] => false,
        [TIME_HEADER, ELEVATION_HEADER, HIGHLIGHT_HEADER] => true,
        _ => {
            return Err(ElevationError::parse(
                "table header",
                1,
                &headers.iter().collect::<Vec<_>>().join(","),
                "unexpected columns",
            ))
        }
    };

    let mut rows = Vec::new();
    for (index, record) in csv.records().enumerate() {
        let record = record?;
        // Header is line 1
        let line = index + 2;
        let field = |i: usize| record.get(i).unwrap_or_default();

        let timestamp = DateTime::parse_from_str(field(0), TIME_FORMAT)
            .map_err(|e| ElevationError::parse("table time", line, field(0), e.to_string()))?;
        let elevation_angle: f64 = field(1)
            .parse()
            .map_err(|_| ElevationError::parse("table elevation", line, field(1), "not a number"))?;
        let highlighted = if has_highlight {
            field(2)
                .parse()
                .map_err(|_| ElevationError::parse("table highlight", line, field(2), "not a bool"))?
        } else {
            false
        };

        rows.push(TimePoint {
            timestamp,
            elevation_angle,
            highlighted,
        });
    }

    Ok(rows)
}
