// src/error.rs

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which axis of the efficiency grid an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    Torque,
    Speed,
}

impl fmt::Display for GridAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridAxis::Torque => write!(f, "torque"),
            GridAxis::Speed => write!(f, "speed"),
        }
    }
}

/// Validation failures of the efficiency lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EfficiencyError {
    #[error("efficiency matrix shape {found:?} does not match axis lengths {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{axis} axis needs at least 2 points, got {len}")]
    AxisTooShort { axis: GridAxis, len: usize },

    #[error("{axis} axis is not strictly increasing at index {index}")]
    NonMonotonicAxis { axis: GridAxis, index: usize },

    #[error("efficiency at row {row}, column {column} must be finite and non-negative")]
    InvalidValue { row: usize, column: usize },

    #[error("speed and torque series differ in length ({speeds} vs {torques})")]
    LengthMismatch { speeds: usize, torques: usize },
}

/// Parse and evaluation failures of math-channel expressions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedChar { found: char, position: usize },

    #[error("unterminated column name starting at position {position}")]
    UnterminatedColumn { position: usize },

    #[error("invalid number '{text}'")]
    InvalidNumber { text: String },

    #[error("unexpected {found} at position {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("expression is empty")]
    Empty,

    #[error("name '{0}' is not defined")]
    UnknownColumn(String),
}

/// Errors raised by the loading, derivation and plotting pipeline.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config file '{path}' is invalid: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("log '{0}' has no header row")]
    EmptyLog(PathBuf),

    #[error("channel '{name}' has {found} samples, log has {expected} rows")]
    ChannelLength {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("columns not found in log or as math channels: {}", missing.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("channel '{channel}': {source}")]
    Expression {
        channel: String,
        #[source]
        source: ExpressionError,
    },

    #[error(transparent)]
    Efficiency(#[from] EfficiencyError),

    #[error("plot rendering failed: {0}")]
    Plot(String),
}


// src/error.rs
