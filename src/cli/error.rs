//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    /// The engine refused the operation; the store is untouched.
    #[error("operation rejected: {0}")]
    Rejected(DomainError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Rejected(_) => crate::exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::DataDir { .. } => crate::exitcode::CANTCREAT,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                    ApplicationError::RegionNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::RegionNotEmpty(_) => crate::exitcode::DATAERR,
                    ApplicationError::InvalidInput(_) => crate::exitcode::USAGE,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Snapshot { .. } => crate::exitcode::DATAERR,
                    ApplicationError::Store { .. } => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}
