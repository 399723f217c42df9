//! `Video Hub` Core Library
//!
//! This crate provides the file-mutating side of the `Video Hub` desktop app:
//! - Deleting catalogued videos (trash or permanent)
//! - Renaming videos without overwriting
//! - Replacing a video's thumbnail with a user-supplied image
//! - Writing and opening a temporary playlist
//! - Saving settings and the catalog when the window closes
//!
//! The desktop host supplies the window, the shell and the event bus through
//! the traits in [`host`]. Every operation receives the current
//! [`LibraryContext`] explicitly.
//!
//! # Error Handling
//!
//! Errors are typed per domain, see the [`error`] module. Operations whose
//! failures the UI never sees report them in outcome types instead of
//! returning `Err`.
//!
//! ```rust,ignore
//! use hub_core::{RenameEngine, RealFileSystem};
//!
//! let engine = RenameEngine::new(Arc::new(RealFileSystem::new()));
//! let outcome = engine.rename(&request, &sink);
//! ```

pub mod catalog;
pub mod config;
pub mod delete;
pub mod error;
pub mod events;
pub mod fs;
pub mod host;
pub mod playlist;
pub mod rename;
pub mod session;
pub mod thumbnail;

pub use catalog::{CatalogDocument, CatalogItem, FOLDER_SENTINEL};
pub use config::{
    APP_NAMESPACE, AppPaths, DEFAULT_SCREENSHOT_HEIGHT, LibraryContext, SourceFolder,
    default_app_data_root,
};
pub use delete::{DeleteAdapter, DeleteReport, SystemTrash, Trash};
pub use error::{Error, ErrorKind, FileSystemError, Result, SessionError, ThumbnailError};
pub use events::OutboundEvent;
pub use fs::{FileSystem, RealFileSystem};
pub use host::{EventSink, ShellHost, WindowHost};
pub use playlist::{PlaylistMaterializer, render_pls};
pub use rename::{RenameEngine, RenameErrorCode, RenameOutcome, RenameRequest};
pub use session::{
    CatalogWriter, ClosePhase, CloseReport, JsonCatalogWriter, SessionPersistence, Settings,
    Shortcuts, WindowBounds,
};
pub use thumbnail::{ImageTransformer, JpegResizer, ReplaceOutcome, ThumbnailPipeline};
