//! # Request Parsing and Validation
//!
//! Raw inputs arrive as text (CLI flags, config values, form fields). This module
//! turns them into a validated [`ElevationRequest`] before any computation runs.
//!
//! ## Parsing Rules
//! - Timestamps: `YYYY-MM-DD HH:MM[:SS]`, the same with a `T` separator, or a bare
//!   date (midnight) are wall-clock times in the request zone; RFC 3339 values
//!   with an explicit offset are converted into the request zone.
//! - Special entries that are empty or whitespace are skipped. Anything else that
//!   does not parse fails the request with a [`ElevationError::Parse`] naming the
//!   list, the entry's position and its text.
//! - Wall-clock times that a DST change skips do not exist and are rejected.
//! - The window start and end are truncated to the minute. Special times keep
//!   their seconds; they only select the nearest grid point.

use crate::annotate::AnnotationRequest;
use crate::error::{ElevationError, Result};
use crate::report::{RequestSummary, TIME_FORMAT};
use crate::solver::Site;
use crate::zone::{NauticalZoneResolver, Zone, ZoneResolver};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Unvalidated request inputs, as typed by a user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestInputs {
    pub start: String,
    pub end: String,
    pub interval_minutes: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    /// Offset or IANA name; resolved from the location when absent
    pub timezone: Option<String>,
    pub special_times: Vec<String>,
    pub special_angles: Vec<String>,
    pub angle_threshold: f64,
    pub xtick_minutes: i64,
    pub ytick_degrees: i64,
}

impl RequestInputs {
    /// Parse and validate, resolving a missing zone by nautical time.
    pub fn into_request(self) -> Result<ElevationRequest> {
        self.into_request_with(&NauticalZoneResolver)
    }

    /// Parse and validate, resolving a missing zone with `resolver`.
    pub fn into_request_with<R: ZoneResolver + ?Sized>(
        self,
        resolver: &R,
    ) -> Result<ElevationRequest> {
        let zone = match self.timezone.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.parse::<Zone>()?,
            _ => resolver.zone_for(self.latitude, self.longitude),
        };

        let request = ElevationRequest {
            start: truncate_to_minute(parse_timestamp("start", 1, &self.start, &zone)?),
            end: truncate_to_minute(parse_timestamp("end", 1, &self.end, &zone)?),
            interval_minutes: self.interval_minutes,
            site: Site {
                latitude: self.latitude,
                longitude: self.longitude,
                altitude: self.altitude,
            },
            annotations: AnnotationRequest::new(
                parse_special_times(&self.special_times, &zone)?,
                parse_special_angles(&self.special_angles)?,
                self.angle_threshold,
            ),
            xtick_minutes: self.xtick_minutes,
            ytick_degrees: self.ytick_degrees,
            zone,
        };

        request.validate()?;
        Ok(request)
    }
}

/// A fully parsed request.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationRequest {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub zone: Zone,
    pub interval_minutes: i64,
    pub site: Site,
    pub annotations: AnnotationRequest,
    pub xtick_minutes: i64,
    pub ytick_degrees: i64,
}

impl ElevationRequest {
    /// Check every numeric parameter and the window ordering.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("interval", self.interval_minutes),
            ("x tick step", self.xtick_minutes),
            ("y tick step", self.ytick_degrees),
        ];
        for (name, value) in positive {
            if value <= 0 {
                return Err(ElevationError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let threshold = self.annotations.angle_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ElevationError::Config(format!(
                "angle threshold must be a non-negative number, got {threshold}"
            )));
        }

        let site = &self.site;
        if !(-90.0..=90.0).contains(&site.latitude) {
            return Err(ElevationError::Config(format!(
                "latitude must be between -90 and 90, got {}",
                site.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&site.longitude) {
            return Err(ElevationError::Config(format!(
                "longitude must be between -180 and 180, got {}",
                site.longitude
            )));
        }
        if !site.altitude.is_finite() {
            return Err(ElevationError::Config(format!(
                "altitude must be a finite number, got {}",
                site.altitude
            )));
        }

        if self.end < self.start {
            return Err(ElevationError::Range {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn summary(&self) -> RequestSummary {
        RequestSummary {
            start: self.start,
            end: self.end,
            interval_minutes: self.interval_minutes,
            site: self.site,
            zone: self.zone.to_string(),
        }
    }
}

/// Parse one timestamp for list `field` at 1-based `position`.
pub fn parse_timestamp(
    field: &'static str,
    position: usize,
    input: &str,
    zone: &Zone,
) -> Result<DateTime<FixedOffset>> {
    let text = input.trim();

    if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
        return Ok(zone.at(&zoned));
    }
    if let Ok(zoned) = DateTime::parse_from_str(text, TIME_FORMAT) {
        return Ok(zone.at(&zoned));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| {
            ElevationError::parse(field, position, input, "expected a time like 2024-06-21 12:00")
        })?;

    zone.localize(&naive).ok_or_else(|| {
        ElevationError::parse(field, position, input, format!("time does not exist in {zone}"))
    })
}

/// Drop seconds and sub-second digits; the grid runs on whole minutes.
fn truncate_to_minute(at: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let sub_minute = Duration::seconds(i64::from(at.second()))
        + Duration::nanoseconds(i64::from(at.nanosecond()));
    at - sub_minute
}

/// Parse the special time list, skipping blank entries.
pub fn parse_special_times(raw: &[String], zone: &Zone) -> Result<Vec<DateTime<FixedOffset>>> {
    raw.iter()
        .enumerate()
        .filter(|(_, entry)| !entry.trim().is_empty())
        .map(|(i, entry)| parse_timestamp("special time", i + 1, entry, zone))
        .collect()
}

/// Parse the special angle list, skipping blank entries.
pub fn parse_special_angles(raw: &[String]) -> Result<Vec<f64>> {
    raw.iter()
        .enumerate()
        .filter(|(_, entry)| !entry.trim().is_empty())
        .map(|(i, entry)| {
            let angle: f64 = entry.trim().parse().map_err(|_| {
                ElevationError::parse("special angle", i + 1, entry, "not a number")
            })?;
            if !angle.is_finite() {
                return Err(ElevationError::parse(
                    "special angle",
                    i + 1,
                    entry,
                    "must be a finite number",
                ));
            }
            Ok(angle)
        })
        .collect()
}
