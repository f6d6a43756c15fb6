//! Storage seam under the region store and shared snapshots

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// File access the chart and share services need; swapped out in tests.
pub trait FileSystem: Send + Sync {
    /// Contents of `path`, or `None` when the file does not exist yet.
    fn read_if_exists(&self, path: &Path) -> io::Result<Option<String>>;

    /// Replace the whole file so readers never see a half-written store.
    fn write_atomic(&self, path: &Path, content: &str) -> io::Result<()>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_if_exists(&self, path: &Path) -> io::Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_atomic(&self, path: &Path, content: &str) -> io::Result<()> {
        // temp file must live on the same filesystem for the rename
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        self.create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_missing_parent_when_writing_atomically_then_creates_it() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/regions.json");
        let fs = RealFileSystem;

        fs.write_atomic(&path, "[]").unwrap();
        fs.write_atomic(&path, "[1]").unwrap();

        assert_eq!(fs.read_if_exists(&path).unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn given_missing_file_when_reading_then_none() {
        let temp = TempDir::new().unwrap();

        let content = RealFileSystem
            .read_if_exists(&temp.path().join("regions.json"))
            .unwrap();

        assert!(content.is_none());
    }
}
