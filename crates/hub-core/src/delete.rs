//! Deleting catalogued files, either to the trash or permanently.
//!
//! The UI is told `file-deleted` only when a check after the deletion finds
//! the file gone. Failures are never reported to the UI; they are logged and
//! returned in the [`DeleteReport`].

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::CatalogItem;
use crate::config::LibraryContext;
use crate::error::{Error, Result};
use crate::events::OutboundEvent;
use crate::fs::FileSystem;
use crate::host::EventSink;

/// Recoverable deletion.
#[cfg_attr(test, mockall::automock)]
pub trait Trash: Send + Sync {
    /// Move `path` to the platform trash / recycle bin.
    fn move_to_trash(&self, path: &Path) -> Result<()>;
}

/// The platform trash, via the `trash` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTrash;

impl Trash for SystemTrash {
    fn move_to_trash(&self, path: &Path) -> Result<()> {
        trash::delete(path).map_err(|e| Error::Trash {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// What happened to a delete request.
#[derive(Debug)]
pub struct DeleteReport {
    /// Resolved file path (empty if it could not be resolved).
    pub path: PathBuf,
    /// Result of the unlink / trash call.
    pub issued: Result<()>,
    /// Whether the existence check after deleting found the file gone.
    pub confirmed: bool,
}

/// Deletes catalogued files.
pub struct DeleteAdapter {
    fs: Arc<dyn FileSystem>,
    trash: Arc<dyn Trash>,
}

impl DeleteAdapter {
    /// Create an adapter.
    pub fn new(fs: Arc<dyn FileSystem>, trash: Arc<dyn Trash>) -> Self {
        Self { fs, trash }
    }

    /// Delete the item's file and emit `file-deleted` if it is gone afterward.
    ///
    /// The path is resolved against the first source folder, whatever the
    /// item's own `input_source` is.
    pub async fn delete(
        &self,
        ctx: &LibraryContext,
        item: &CatalogItem,
        permanently: bool,
        sink: &dyn EventSink,
    ) -> DeleteReport {
        let path = match ctx
            .primary_source_root()
            .and_then(|root| item.full_path(root))
        {
            Ok(path) => path,
            Err(e) => {
                warn!("Cannot delete {}: {}", item.file_name, e);
                return DeleteReport {
                    path: PathBuf::new(),
                    issued: Err(e),
                    confirmed: false,
                };
            }
        };

        debug!(
            "Deleting {} ({})",
            path.display(),
            if permanently { "permanent" } else { "trash" }
        );

        let issued = if permanently {
            let fs = Arc::clone(&self.fs);
            let target = path.clone();
            off_thread(move || fs.remove_file(&target)).await
        } else {
            let trash = Arc::clone(&self.trash);
            let target = path.clone();
            off_thread(move || trash.move_to_trash(&target)).await
        };

        if let Err(e) = &issued {
            warn!("{} was NOT deleted: {}", path.display(), e);
        }

        let confirmed = !self.fs.exists(&path);
        if confirmed {
            info!("Deleted {}", path.display());
            sink.emit(OutboundEvent::FileDeleted(item.clone()));
        }

        DeleteReport {
            path,
            issued,
            confirmed,
        }
    }
}

async fn off_thread<F>(op: F) -> Result<()>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .unwrap_or_else(|e| Err(Error::Io(io::Error::other(e))))
}
