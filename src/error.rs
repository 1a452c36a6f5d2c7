//! Error types for the incident dashboard
use std::path::PathBuf;
use thiserror::Error;

/// Failure to bring the incident dataset into memory. Fatal at startup.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Dataset file missing or unreadable
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Required column not present in the header
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// A cell that could not be coerced to its column type
    #[error("Invalid value {value:?} for column {column} on line {line}")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },

    /// No usable records
    #[error("Dataset contains no records")]
    Empty,
}

/// A filter mutation that would leave the selection inconsistent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Country {country} is not in region {region}")]
    CountryNotInRegion { country: String, region: String },

    #[error("Year range {from}-{to} is inverted")]
    InvertedYears { from: i32, to: i32 },

    #[error("Year range {from}-{to} is outside {min}-{max}")]
    YearOutOfBounds { from: i32, to: i32, min: i32, max: i32 },

    #[error("No choice at position {0}")]
    NoSuchChoice(usize),
}

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Valid selection, zero matching rows
    #[error("No data found for the selected filters.")]
    EmptyResult,

    /// Centroid lookup for a country that is not in the dataset
    #[error("No location known for country: {0}")]
    NotFound(String),
}

/// Type alias for Results using DashboardError
pub type Result<T> = std::result::Result<T, DashboardError>;
