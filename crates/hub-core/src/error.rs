//! Error types for Video Hub core operations.
//!
//! Errors are grouped by domain. Filesystem failures carry the path they
//! occurred at so they can be logged with context before being folded into
//! the per-component outcome types (`RenameOutcome`, `DeleteReport`, ...).

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Filesystem failures, classified by what was being attempted.
#[derive(Debug, Error)]
pub enum FileSystemError {
    /// The path does not exist.
    #[error("Path not found: {path}")]
    NotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// The OS refused access to the path.
    #[error("Permission denied: {path}")]
    PermissionDenied {
        /// Path that could not be accessed.
        path: PathBuf,
    },

    /// Reading failed for another reason.
    #[error("Failed to read {path}: {reason}")]
    ReadFailed {
        /// Path being read.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// Writing failed for another reason.
    #[error("Failed to write {path}: {reason}")]
    WriteFailed {
        /// Path being written.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// Directory creation failed.
    #[error("Failed to create directory {path}: {reason}")]
    CreateDirFailed {
        /// Directory being created.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// Unlink failed.
    #[error("Failed to delete {path}: {reason}")]
    DeleteFailed {
        /// Path being deleted.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// A file name from the UI is not a single path segment.
    #[error("Invalid file name: {name:?}")]
    InvalidFileName {
        /// Name as received.
        name: String,
    },

    /// Rename failed.
    #[error("Failed to rename {from} to {to}: {reason}")]
    RenameFailed {
        /// Original path.
        from: PathBuf,
        /// Requested destination.
        to: PathBuf,
        /// Underlying reason.
        reason: String,
    },
}

/// Thumbnail transform failures.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// The incoming image could not be decoded.
    #[error("Failed to decode image {path}: {reason}")]
    DecodeFailed {
        /// Incoming image path.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// The resized image could not be encoded or saved.
    #[error("Failed to encode thumbnail {path}: {reason}")]
    EncodeFailed {
        /// Output path.
        path: PathBuf,
        /// Encoder message.
        reason: String,
    },

    /// The transform routine panicked or was cancelled.
    #[error("Thumbnail transform did not finish: {0}")]
    Interrupted(String),
}

/// Session persistence failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A catalog was supplied but no catalog file is open.
    #[error("No catalog file is open; catalog was not written")]
    MissingCatalogPath,

    /// The settings file exists but is not valid settings JSON.
    #[error("Settings file {path} is corrupt: {reason}")]
    CorruptSettings {
        /// Settings file path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
}

/// Errors that can occur in Video Hub core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem operation failed.
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    /// Thumbnail transform failed.
    #[error(transparent)]
    Thumbnail(#[from] ThumbnailError),

    /// Session persistence failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Moving a file to the trash failed.
    #[error("Failed to move {path} to trash: {reason}")]
    Trash {
        /// File being trashed.
        path: PathBuf,
        /// Platform message.
        reason: String,
    },

    /// The library context is missing something the operation needs.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse error category, used by the host to tag error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Path missing.
    NotFound,
    /// Access refused.
    PermissionDenied,
    /// Any other filesystem failure.
    FileSystem,
    /// Image transform failure.
    Thumbnail,
    /// Session persistence failure.
    Session,
    /// Trash failure.
    Trash,
    /// Configuration problem.
    Configuration,
    /// Encoding/decoding failure.
    Serialization,
    /// Raw IO failure.
    Io,
}

impl Error {
    /// Returns the category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::FileSystem(FileSystemError::NotFound { .. }) => ErrorKind::NotFound,
            Self::FileSystem(FileSystemError::PermissionDenied { .. }) => {
                ErrorKind::PermissionDenied
            }
            Self::FileSystem(_) => ErrorKind::FileSystem,
            Self::Thumbnail(_) => ErrorKind::Thumbnail,
            Self::Session(_) => ErrorKind::Session,
            Self::Trash { .. } => ErrorKind::Trash,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Shorthand for a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// True when the error means the path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound)
            || matches!(self, Self::Io(e) if matches!(e.kind(), std::io::ErrorKind::NotFound))
    }
}
