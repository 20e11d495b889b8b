//! # Elevation Solvers
//!
//! The pipeline treats the astronomy as a black box: give it an instant and a
//! site, get back the sun's elevation in degrees. [`ElevationSolver`] is that
//! seam. [`SpaSolver`] is the production implementation, built on NREL's Solar
//! Position Algorithm from the `solar-positioning` crate; tests plug in closures.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use solar_positioning::{spa, time::DeltaT, RefractionCorrection};
use thiserror::Error;

/// Observer location.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Degrees north, -90 to +90
    pub latitude: f64,
    /// Degrees east, -180 to +180
    pub longitude: f64,
    /// Meters above sea level
    pub altitude: f64,
}

#[derive(Error, Debug)]
pub enum SolverError {
    /// The solar position algorithm rejected its inputs
    #[error("solar position: {0}")]
    Position(#[from] solar_positioning::Error),

    /// The solver produced NaN or infinity
    #[error("non-finite elevation {0}")]
    NonFinite(f64),

    #[error("{0}")]
    Other(String),
}

/// Computes the sun's elevation angle for one instant at one site.
pub trait ElevationSolver {
    fn elevation_for(
        &self,
        timestamp: &DateTime<FixedOffset>,
        site: &Site,
    ) -> Result<f64, SolverError>;
}

impl<F> ElevationSolver for F
where
    F: Fn(&DateTime<FixedOffset>, &Site) -> Result<f64, SolverError>,
{
    fn elevation_for(
        &self,
        timestamp: &DateTime<FixedOffset>,
        site: &Site,
    ) -> Result<f64, SolverError> {
        self(timestamp, site)
    }
}

/// NREL SPA solver returning apparent (refracted) elevation by default.
#[derive(Clone, Copy, Debug)]
pub struct SpaSolver {
    refraction: Option<RefractionCorrection>,
}

impl SpaSolver {
    /// Apparent elevation under standard atmosphere (1013.25 hPa, 15 °C).
    pub fn new() -> Self {
        SpaSolver {
            refraction: Some(RefractionCorrection::standard()),
        }
    }

    /// Geometric elevation, no refraction correction.
    pub fn geometric() -> Self {
        SpaSolver { refraction: None }
    }
}

impl Default for SpaSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ElevationSolver for SpaSolver {
    fn elevation_for(
        &self,
        timestamp: &DateTime<FixedOffset>,
        site: &Site,
    ) -> Result<f64, SolverError> {
        let delta_t = DeltaT::estimate_from_date_like(*timestamp)?;
        let position = spa::solar_position(
            *timestamp,
            site.latitude,
            site.longitude,
            site.altitude,
            delta_t,
            self.refraction,
        )?;

        let elevation = position.elevation_angle();
        if !elevation.is_finite() {
            return Err(SolverError::NonFinite(elevation));
        }
        Ok(elevation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo() -> Site {
        Site {
            latitude: 35.6895,
            longitude: 139.6917,
            altitude: 0.0,
        }
    }

    #[test]
    fn test_spa_noon_and_midnight() {
        let solver = SpaSolver::new();
        let noon = DateTime::parse_from_rfc3339("2024-06-21T11:40:00+09:00").unwrap();
        let midnight = DateTime::parse_from_rfc3339("2024-06-21T23:40:00+09:00").unwrap();

        let high = solver.elevation_for(&noon, &tokyo()).unwrap();
        let low = solver.elevation_for(&midnight, &tokyo()).unwrap();

        // Solstice noon in Tokyo: 90 - 35.7 + 23.4 ≈ 77.7°
        assert!((high - 77.7).abs() < 1.0, "noon elevation {high}");
        assert!(low < -25.0, "midnight elevation {low}");
    }

    #[test]
    fn test_refraction_lifts_low_sun() {
        let at = DateTime::parse_from_rfc3339("2024-06-21T04:30:00+09:00").unwrap();
        let apparent = SpaSolver::new().elevation_for(&at, &tokyo()).unwrap();
        let geometric = SpaSolver::geometric().elevation_for(&at, &tokyo()).unwrap();

        assert!(apparent >= geometric);
    }

    #[test]
    fn test_spa_rejects_bad_latitude() {
        let at = DateTime::parse_from_rfc3339("2024-06-21T12:00:00+09:00").unwrap();
        let site = Site {
            latitude: 123.0,
            ..tokyo()
        };

        assert!(matches!(
            SpaSolver::new().elevation_for(&at, &site),
            Err(SolverError::Position(_))
        ));
    }

    #[test]
    fn test_closure_solver() {
        let flat = |_: &DateTime<FixedOffset>, _: &Site| Ok::<f64, SolverError>(12.5);
        let at = DateTime::parse_from_rfc3339("2024-06-21T12:00:00+09:00").unwrap();
        assert_eq!(flat.elevation_for(&at, &tokyo()).unwrap(), 12.5);
    }
}
