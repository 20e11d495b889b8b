//! # Request Time Zones
//!
//! A request is expressed in one zone: either a fixed UTC offset (`+09:00`, or a
//! bare hour count like `9` as the old web form accepted) or an IANA name such as
//! `Asia/Tokyo`. Grid arithmetic happens on absolute instants; [`Zone::at`] then
//! re-expresses each instant with the offset in force at that moment, so a named
//! zone shows the right offset on both sides of a DST change.

use crate::error::{ElevationError, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

/// Time zone of a request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Zone {
    Fixed(FixedOffset),
    Named(Tz),
}

impl Zone {
    /// UTC offset given in whole hours.
    pub fn from_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(Zone::Fixed)
    }

    /// Attach this zone to a wall-clock time.
    ///
    /// Returns `None` for local times skipped by a DST transition. Ambiguous
    /// local times (repeated hour) resolve to the earlier instant.
    pub fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Zone::Fixed(offset) => offset.from_local_datetime(naive).single(),
            Zone::Named(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
        }
    }

    /// Express an instant in this zone.
    pub fn at<T: TimeZone>(&self, instant: &DateTime<T>) -> DateTime<FixedOffset> {
        let utc = instant.with_timezone(&Utc);
        match self {
            Zone::Fixed(offset) => utc.with_timezone(offset),
            Zone::Named(tz) => utc.with_timezone(tz).fixed_offset(),
        }
    }
}

impl Default for Zone {
    fn default() -> Self {
        Zone::Fixed(FixedOffset::east_opt(9 * 3600).unwrap_or_else(|| Utc.fix()))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Fixed(offset) => write!(f, "{offset}"),
            Zone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

impl FromStr for Zone {
    type Err = ElevationError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let fail = |reason: &str| ElevationError::parse("timezone", 1, s, reason);

        if text.eq_ignore_ascii_case("utc") || text == "Z" {
            return Ok(Zone::Fixed(Utc.fix()));
        }

        // Bare hour count, e.g. "9" or "-5"
        let unsigned = text.trim_start_matches(['+', '-']);
        if (1..=2).contains(&unsigned.len()) {
            if let Ok(hours) = text.parse::<i32>() {
                return Zone::from_hours(hours).ok_or_else(|| fail("offset out of range"));
            }
        }

        if let Some(rest) = text.strip_prefix('+').or_else(|| text.strip_prefix('-')) {
            let sign = if text.starts_with('-') { -1 } else { 1 };
            let digits: String = rest.chars().filter(|c| *c != ':').collect();
            if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(fail("expected an offset like +09:00"));
            }
            let hours: i32 = digits[..2].parse().map_err(|_| fail("bad hours"))?;
            let minutes: i32 = digits[2..].parse().map_err(|_| fail("bad minutes"))?;
            if minutes >= 60 {
                return Err(fail("minutes must be below 60"));
            }
            return FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
                .map(Zone::Fixed)
                .ok_or_else(|| fail("offset out of range"));
        }

        text.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| fail("unknown time zone name"))
    }
}

/// Resolves the zone to use for a location.
pub trait ZoneResolver {
    fn zone_for(&self, latitude: f64, longitude: f64) -> Zone;
}

/// Nautical time: a whole-hour offset of `round(longitude / 15)`.
///
/// Only a fallback for requests that name no zone; civil zones follow borders,
/// not meridians.
#[derive(Clone, Copy, Debug, Default)]
pub struct NauticalZoneResolver;

impl ZoneResolver for NauticalZoneResolver {
    fn zone_for(&self, _latitude: f64, longitude: f64) -> Zone {
        let hours = (longitude / 15.0).round().clamp(-12.0, 12.0) as i32;
        Zone::from_hours(hours).unwrap_or_default()
    }
}
