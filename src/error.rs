//! Error types for the coursecal engine.

use thiserror::Error;

/// Errors that can occur while encoding, aggregating, or exporting meetings.
#[derive(Error, Debug)]
pub enum CourseCalError {
    #[error("source list is empty")]
    EmptySource,

    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("Invalid meeting: {0}")]
    InvalidMeeting(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("RRULE expansion error: {0}")]
    RruleExpand(String),

    #[error("Occurrence outside scope hours: {0}")]
    OutsideScopeHours(String),

    #[error("Cache path \"{0}\" does not exist")]
    CacheFileMissing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type alias for coursecal operations.
pub type CourseCalResult<T> = Result<T, CourseCalError>;
