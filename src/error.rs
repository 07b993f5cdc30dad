use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;

/// Error type shared by every operation in the crate.
#[derive(Debug, Error)]
pub enum SqlSessionError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Resource error: {0}")]
    ResourceError(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),
}
