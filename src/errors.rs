use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Settings database operations
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Settings store failures (including exhausted schema-cache retries)
    #[error("Settings store error: {0}")]
    Store(#[from] StoreError),

    /// Orchestrator refused or failed to start a run
    #[error("Orchestrator error: {0}")]
    Orchestrator(#[from] OrchestratorError),

    /// HTTP transport failures outside the probe boundary (object listing)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV snapshot parsing
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid object record in a snapshot file
    #[error("Invalid object record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
}

/// Settings store error types
///
/// `SchemaCacheTransient` is the only retryable class; see [`crate::probe::RetryPolicy`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store's schema view lags a just-applied change
    #[error("Schema cache not yet refreshed: {0}")]
    SchemaCacheTransient(String),

    /// No settings record has been saved yet
    #[error("Settings record not found")]
    NotFound,

    /// Record rejected before it reached the store
    #[error("Invalid settings: {0}")]
    Validation(String),

    /// Store could not be reached
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Store answered with an error that is not retryable
    #[error("Store call failed: {operation} - {message}")]
    CallFailed { operation: String, message: String },
}

impl StoreError {
    /// True only for the schema-cache class that the retry policy re-issues
    pub fn is_schema_cache_transient(&self) -> bool {
        matches!(self, StoreError::SchemaCacheTransient(_))
    }
}

/// Orchestrator error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// Another topology check or smoke-test run is still in flight
    #[error("A probe run is already in progress")]
    Busy,
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for settings store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::SchemaChanged) => {
                StoreError::SchemaCacheTransient(err.to_string())
            }
            Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::CannotOpen) => {
                StoreError::ConnectionFailed(err.to_string())
            }
            _ => StoreError::CallFailed {
                operation: "sqlite".to_string(),
                message: err.to_string(),
            },
        }
    }
}
