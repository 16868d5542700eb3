//! Error types shared by the ledger workspace

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, CommonError>;

/// Main error type for shared helpers
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidVar {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Logging error: {0}")]
    Logging(String),
}
