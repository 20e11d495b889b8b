//! # Axis Tick Layout
//!
//! Plans the reference values a chart draws along each axis.
//!
//! - **X ticks** run on their own grid (`xtick_minutes`), independent of how
//!   densely the data was sampled.
//! - **Y ticks** cover the data range on whole multiples of `ytick_degrees`:
//!   the lowest tick is the data minimum rounded down, the highest is the data
//!   maximum rounded up. Ticks are built from integer multiples of the step, so
//!   no rounding error accumulates along the axis.
//!
//! Label text for x ticks is part of the plan's contract with renderers: a tick
//! at local midnight shows the date, every other tick only the time.

use crate::error::{ElevationError, Result};
use crate::grid;
use crate::zone::Zone;
use crate::TimeSeries;
use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

/// Axis reference values for one chart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickPlan {
    pub x_ticks: Vec<DateTime<FixedOffset>>,
    pub y_ticks: Vec<f64>,
}

impl TickPlan {
    /// Lowest and highest y tick.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        Some((*self.y_ticks.first()?, *self.y_ticks.last()?))
    }
}

/// Lay out both axes for `series` over the window `start..=end`.
pub fn plan(
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
    zone: &Zone,
    xtick_minutes: i64,
    ytick_degrees: i64,
    series: &TimeSeries,
) -> Result<TickPlan> {
    let y_ticks = y_ticks(series, ytick_degrees)?;
    let x_ticks = grid::generate(start, end, xtick_minutes, zone)?;
    Ok(TickPlan { x_ticks, y_ticks })
}

/// Y ticks from `floor(min / step) * step` to `ceil(max / step) * step`.
///
/// # Example
/// ```
/// use chrono::DateTime;
/// use solar_elevation_lib::{ticks, TimePoint, TimeSeries};
///
/// let at = DateTime::parse_from_rfc3339("2024-06-21T05:00:00+09:00").unwrap();
/// let series = TimeSeries {
///     points: vec![TimePoint::new(at, -3.2), TimePoint::new(at, 47.8)],
/// };
///
/// let y = ticks::y_ticks(&series, 10).unwrap();
/// assert_eq!(y, vec![-10.0, 0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
/// ```
pub fn y_ticks(series: &TimeSeries, ytick_degrees: i64) -> Result<Vec<f64>> {
    if ytick_degrees <= 0 {
        return Err(ElevationError::Config(format!(
            "y tick step must be a positive number of degrees, got {ytick_degrees}"
        )));
    }
    let (min, max) = series.elevation_range().ok_or(ElevationError::EmptySeries)?;

    let step = ytick_degrees as f64;
    let lowest = (min / step).floor() as i64;
    let highest = (max / step).ceil() as i64;

    Ok((lowest..=highest).map(|k| (k * ytick_degrees) as f64).collect())
}

/// Label for an x tick: `MM-DD HH:MM` at local midnight, `HH:MM` otherwise.
pub fn x_tick_label(tick: &DateTime<FixedOffset>) -> String {
    if tick.hour() == 0 && tick.minute() == 0 {
        tick.format("%m-%d %H:%M").to_string()
    } else {
        tick.format("%H:%M").to_string()
    }
}
