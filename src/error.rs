//! # Pipeline Errors
//!
//! Every stage of a request reports failures through [`ElevationError`]. Each
//! variant names the input that caused it so the message can be shown to the
//! user as-is. Nothing in the pipeline skips a bad entry silently: a request
//! either produces a complete report or fails with one of these.

use crate::solver::SolverError;
use chrono::{DateTime, FixedOffset};
use std::io;
use thiserror::Error;

/// Errors that can abort an elevation request.
#[derive(Error, Debug)]
pub enum ElevationError {
    /// A step, interval, threshold or coordinate is out of its valid range
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The requested window ends before it starts
    #[error("end {end} is before start {start}")]
    Range {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },

    /// A free-text input could not be parsed
    #[error("cannot parse {field} entry {position} ({input:?}): {reason}")]
    Parse {
        field: &'static str,
        /// 1-based position of the entry within its list
        position: usize,
        input: String,
        reason: String,
    },

    /// Nearest-time matching was asked of a series with no points
    #[error("cannot match a time against an empty series")]
    EmptySeries,

    /// The solver failed for one grid timestamp
    #[error("solver failed at {at}: {source}")]
    Sample {
        at: DateTime<FixedOffset>,
        #[source]
        source: SolverError,
    },

    /// Table export or import failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading or writing an artifact failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ElevationError {
    pub(crate) fn parse(
        field: &'static str,
        position: usize,
        input: &str,
        reason: impl Into<String>,
    ) -> Self {
        ElevationError::Parse {
            field,
            position,
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ElevationError>;
