//! Error types for the news/timbre pipeline

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Loading configuration or validating the year range
    Config,
    /// Reading a partition or the feature table
    Read,
    /// Running the sentiment scorer on a document
    Score,
    /// Reducing a year's score vectors
    Aggregate,
    /// Joining and correlating the yearly tables
    Correlate,
    /// Writing derived tables
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Read => "read",
            Stage::Score => "score",
            Stage::Aggregate => "aggregate",
            Stage::Correlate => "correlate",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Failure reported by a sentiment scorer
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct ScoringError(pub String);

impl ScoringError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// No partition file exists for the year
    #[error("no partition for year {year} at {}", path.display())]
    PartitionNotFound { year: i32, path: PathBuf },

    /// An expected column is missing from a table header
    #[error("column '{column}' not found in {}", path.display())]
    Schema { path: PathBuf, column: String },

    /// The sentiment scorer failed on a document
    #[error("scoring failed for year {year}: {source}")]
    Scoring {
        year: i32,
        #[source]
        source: ScoringError,
    },

    /// A year has no documents, or its summed scores total zero
    #[error("year {year} has no documents or a zero score total")]
    EmptyPartition { year: i32 },

    /// Too few joined years to compute a correlation
    #[error("insufficient data: {matched} matched years, at least {required} required")]
    InsufficientData { matched: usize, required: usize },

    /// A cell could not be parsed as a number
    #[error("invalid value '{value}' for column '{column}' at line {line} of {}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    /// Year range with start after end
    #[error("invalid year range {start}..={end}")]
    InvalidYearRange { start: i32, end: i32 },

    /// Worker pool could not be created
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A partition file is not valid CSV
    #[error("malformed partition for year {year} at {}: {source}", path.display())]
    Partition {
        year: i32,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A derived table could not be written
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV error
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stage of the pipeline the error belongs to
    pub fn stage(&self) -> Stage {
        match self {
            Error::PartitionNotFound { .. }
            | Error::Partition { .. }
            | Error::Schema { .. }
            | Error::Parse { .. }
            | Error::Csv(_) => Stage::Read,
            Error::Scoring { .. } => Stage::Score,
            Error::EmptyPartition { .. } => Stage::Aggregate,
            Error::InsufficientData { .. } => Stage::Correlate,
            Error::InvalidYearRange { .. } | Error::Config(_) | Error::ThreadPool(_) => {
                Stage::Config
            }
            Error::Write { .. } | Error::Io(_) => Stage::Write,
        }
    }

    /// Year the error refers to, if any
    pub fn year(&self) -> Option<i32> {
        match self {
            Error::PartitionNotFound { year, .. }
            | Error::Partition { year, .. }
            | Error::Scoring { year, .. }
            | Error::EmptyPartition { year } => Some(*year),
            _ => None,
        }
    }
}
