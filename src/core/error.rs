use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlotError {
    #[error("no data to summarize")]
    EmptyInput,

    #[error("read {read} has length {found}, expected {expected}")]
    LengthMismatch {
        read: u64,
        expected: usize,
        found: usize,
    },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid raster dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("threshold {0} outside 0-100")]
    InvalidThreshold(f64),

    #[error("unknown status '{0}' (expected PASS, WARN or FAIL)")]
    UnknownStatus(String),
}

impl PlotError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        PlotError::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type PlotResult<T> = Result<T, PlotError>;
