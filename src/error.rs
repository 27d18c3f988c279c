//! Domain errors.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised before any aggregation is attempted.
#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("report window {which} is missing")]
    MissingBound { which: &'static str },

    #[error("report window {which} '{value}' is not a valid date or timestamp")]
    UnparsableBound { which: &'static str, value: String },

    #[error("report window start {start} is after end {end}")]
    InvertedWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}
