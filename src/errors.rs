use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cumulative flow CSV parsing
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Issue dump and chart JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file or environment could not be loaded
    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    /// Configuration issues (unknown stage names, bad frequencies, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid cumulative flow record
    #[error("Invalid CFD record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Config(format!("TOML serialisation failed: {}", err))
    }
}
