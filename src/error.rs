//! Error types for price data, scheduling parameters, and the binary.

use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Malformed or empty price data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no price observations")]
    Empty,

    #[error("line {line}: unparsable timestamp \"{value}\"")]
    InvalidTimestamp { line: u64, value: String },

    #[error("line {line}: unparsable price \"{value}\"")]
    InvalidPrice { line: u64, value: String },

    #[error("line {line}: missing column \"{column}\"")]
    MissingColumn { line: u64, column: String },

    #[error("observation {index} is earlier than its predecessor")]
    Unordered { index: usize },

    #[error("day {day} is not after the preceding day")]
    UnorderedDay { day: NaiveDate },

    #[error("price {price} for {day} is not finite")]
    NonFinitePrice { day: NaiveDate, price: f64 },

    #[error("cannot read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Invalid or infeasible parameters, with the dotted field they refer to.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"procurement.n_parts"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Top-level error for the `proc-sched` binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("report serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
