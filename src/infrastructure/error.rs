//! Errors raised while wiring orgtree onto the local machine

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// The data directory holding the region store could not be prepared.
    #[error("data directory {}: {source}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    pub fn data_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DataDir {
            path: path.into(),
            source,
        }
    }
}

pub type InfraResult<T> = Result<T, InfraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_unwritable_data_dir_when_displaying_then_names_path() {
        let err = InfraError::data_dir(
            "/srv/orgtree",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );

        let text = err.to_string();

        assert!(text.contains("/srv/orgtree"), "{text}");
        assert!(text.contains("denied"), "{text}");
    }
}
