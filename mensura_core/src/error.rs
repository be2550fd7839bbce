//! Error types for the mensura_core library.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for mensura_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The measurement log could not be read or written
    #[error("Storage error at {path:?}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A measurement value is outside its accepted range
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not enough distinct dates to fit a trend line
    #[error("Insufficient data: forecasting needs {required} distinct dates, found {distinct_dates}")]
    InsufficientData {
        distinct_dates: usize,
        required: usize,
    },

    /// The forecast would run past the supported horizon or calendar
    #[error("Forecast horizon of {horizon_days} days is out of range (max {max})")]
    HorizonOutOfRange { horizon_days: u32, max: u32 },

    /// All abscissa values are identical, so no slope can be fitted
    #[error("Degenerate fit: input has zero variance in the date axis")]
    DegenerateFit,

    /// The supplied secret did not match
    #[error("Unauthorized: incorrect password")]
    Unauthorized,

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an IO error raised while touching the log at `path`
    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Storage {
            path: path.into(),
            source,
        }
    }
}
