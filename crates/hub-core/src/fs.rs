//! File system abstraction for testability.
//!
//! Every component touches the disk through [`FileSystem`], so tests can swap
//! in an in-memory implementation that also refuses mutations on chosen
//! paths (a permission failure that holds even when tests run as root).
//!
//! ```rust,ignore
//! use hub_core::fs::{FileSystem, RealFileSystem};
//!
//! let fs = RealFileSystem::new();
//! if !fs.exists(&candidate) {
//!     fs.rename(&original, &candidate)?;
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, FileSystemError, Result};

/// Classifies an I/O error, keeping "not found" and "permission denied"
/// distinguishable from everything else.
fn classify(
    path: &Path,
    e: &io::Error,
    other: impl FnOnce(PathBuf, String) -> FileSystemError,
) -> Error {
    let fs_error = match e.kind() {
        io::ErrorKind::NotFound => FileSystemError::NotFound {
            path: path.to_path_buf(),
        },
        io::ErrorKind::PermissionDenied => FileSystemError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => other(path.to_path_buf(), e.to_string()),
    };
    Error::FileSystem(fs_error)
}

fn read_error(path: &Path, e: &io::Error) -> Error {
    classify(path, e, |path, reason| FileSystemError::ReadFailed { path, reason })
}

fn write_error(path: &Path, e: &io::Error) -> Error {
    classify(path, e, |path, reason| FileSystemError::WriteFailed { path, reason })
}

fn create_dir_error(path: &Path, e: &io::Error) -> Error {
    classify(path, e, |path, reason| FileSystemError::CreateDirFailed { path, reason })
}

fn delete_error(path: &Path, e: &io::Error) -> Error {
    classify(path, e, |path, reason| FileSystemError::DeleteFailed { path, reason })
}

fn rename_error(from: &Path, to: &Path, e: &io::Error) -> Error {
    let to = to.to_path_buf();
    classify(from, e, move |from, reason| FileSystemError::RenameFailed {
        from,
        to,
        reason,
    })
}

/// Abstraction over file system operations for testability.
pub trait FileSystem: Send + Sync {
    /// Read a file's contents as a string.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write string contents to a file, creating or truncating it.
    ///
    /// The parent directory must already exist.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Rename a file, replacing `to` if it exists.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Real file system implementation using std::fs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl RealFileSystem {
    /// Create a new real file system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| read_error(path, &e))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).map_err(|e| write_error(path, &e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| create_dir_error(path, &e))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| delete_error(path, &e))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).map_err(|e| rename_error(from, to, &e))
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::mock::MockFileSystem;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mock_fs_write_requires_parent() {
        let fs = MockFileSystem::new();
        let err = fs.write(Path::new("/data/settings.json"), "{}").unwrap_err();
        assert!(err.is_not_found());

        fs.create_dir_all(Path::new("/data")).unwrap();
        fs.write(Path::new("/data/settings.json"), "{}").unwrap();
        assert_eq!(fs.contents("/data/settings.json").as_deref(), Some("{}"));
    }

    #[test]
    fn test_mock_fs_denied_remove() {
        let fs = MockFileSystem::new();
        fs.add_file("/media/locked.mp4", "bytes");
        fs.deny("/media/locked.mp4");

        let err = fs.remove_file(Path::new("/media/locked.mp4")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::PermissionDenied);
        assert!(fs.exists(Path::new("/media/locked.mp4")));
    }

    #[test]
    fn test_mock_fs_rename_missing_source() {
        let fs = MockFileSystem::new();
        let err = fs
            .rename(Path::new("/media/a.mp4"), Path::new("/media/b.mp4"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_real_fs_rename_missing_source_is_not_found() {
        let temp_dir = TempDir::new().expect("Should create temp dir");
        let fs = RealFileSystem::new();
        let err = fs
            .rename(&temp_dir.path().join("nope.mp4"), &temp_dir.path().join("b.mp4"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_real_fs_write_read_roundtrip() {
        let temp_dir = TempDir::new().expect("Should create temp dir");
        let fs = RealFileSystem::new();
        let path = temp_dir.path().join("note.txt");

        fs.write(&path, "hello").unwrap();
        assert!(fs.exists(&path));
        assert!(!fs.is_dir(&path));
        assert_eq!(fs.read_to_string(&path).unwrap(), "hello");

        fs.remove_file(&path).unwrap();
        assert!(!fs.exists(&path));
    }
}
