// ==========================================
// Grain Receiving - Repository Error Types
// ==========================================
// Tool: thiserror derive
// ==========================================

use thiserror::Error;

/// Repository layer error
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Lookup errors =====
    #[error("record not found: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("duplicate record: {entity} with id={id}")]
    DuplicateRecord { entity: String, id: String },

    // ===== Store errors =====
    #[error("store lock failed: {0}")]
    LockError(String),

    #[error("store query failed: {0}")]
    StoreQueryError(String),

    #[error("store transaction failed: {0}")]
    StoreTransactionError(String),

    // ===== Payload errors =====
    #[error("stored payload for key={key} is malformed: {message}")]
    MalformedPayload { key: String, message: String },

    #[error("payload serialization failed: {0}")]
    SerializationError(String),

    // ===== Configuration errors =====
    #[error("invalid config value: {key}={value} ({message})")]
    InvalidConfigValue {
        key: String,
        value: String,
        message: String,
    },

    // ===== Generic =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::StoreQueryError(msg),
            _ => RepositoryError::StoreQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

/// Result alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;
