//! Error types for mongo-dsl
//!
//! Building documents never fails. These errors cover the surrounding plumbing:
//! establishing a connection, loading configuration from the environment and
//! serializing a typed value into an update document.

use thiserror::Error;

/// Result type alias for mongo-dsl operations
pub type Result<T> = std::result::Result<T, DslError>;

/// Unified error type for the non-execution parts of mongo-dsl
#[derive(Error, Debug, Clone)]
pub enum DslError {
    #[error("MongoDB error: {0}")]
    MongoDB(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl DslError {
    /// Returns true if the error happened before any document reached the server
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            DslError::Connection(_) | DslError::Configuration(_)
        )
    }
}

// MongoDB-specific error conversions (when mongodb-errors feature is enabled)
#[cfg(feature = "mongodb-errors")]
impl From<mongodb::error::Error> for DslError {
    fn from(err: mongodb::error::Error) -> Self {
        DslError::MongoDB(err.to_string())
    }
}

#[cfg(feature = "mongodb-errors")]
impl From<bson::ser::Error> for DslError {
    fn from(err: bson::ser::Error) -> Self {
        DslError::Serialization(format!("BSON serialization error: {}", err))
    }
}

#[cfg(feature = "mongodb-errors")]
impl From<bson::de::Error> for DslError {
    fn from(err: bson::de::Error) -> Self {
        DslError::Deserialization(format!("BSON deserialization error: {}", err))
    }
}
