//! Errors from region storage, snapshots and service-level validation

use thiserror::Error;

use crate::domain::DomainError;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("region not found: {0}")]
    RegionNotFound(String),

    #[error("region still has employees, remove them first: {0}")]
    RegionNotEmpty(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid snapshot: {message}")]
    Snapshot { message: String },

    /// Reading, writing or (de)serializing the region store or a share.
    #[error("store failure: {context}")]
    Store {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
