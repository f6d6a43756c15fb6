//! Path context for store I/O and (de)serialization failures

use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

pub trait StoreResultExt<T> {
    /// Wrap the error as `ApplicationError::Store`, naming the action and file.
    ///
    /// ```ignore
    /// read_json::<RegionList>(content.as_bytes())
    ///     .with_path_context("parse regions", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T, E> StoreResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Store {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}
