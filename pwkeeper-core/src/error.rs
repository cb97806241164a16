//! Error types

/// Errors raised by the credential store and the authentication gate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem failure while reading or writing preferences
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Preferences could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rejected user input (PIN format, empty fields)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Hashing or verification failure
    #[error("Security error: {0}")]
    Security(String),

    /// No usable data directory could be determined
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
