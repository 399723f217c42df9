//! Application state managed by Tauri.

use std::sync::Arc;

use hub_core::{
    AppPaths, DeleteAdapter, FileSystem, JpegResizer, JsonCatalogWriter, LibraryContext,
    PlaylistMaterializer, RealFileSystem, RenameEngine, SessionPersistence, SystemTrash,
    ThumbnailPipeline,
};
use keepawake::KeepAwake;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use super::error::host_err;

/// Application state managed by Tauri.
pub struct AppState {
    /// Where settings and the temporary playlist live.
    pub(crate) paths: AppPaths,
    /// The hub the UI has open, as last pushed by `set_library_context`.
    pub(crate) library: Arc<RwLock<LibraryContext>>,
    pub(crate) rename_engine: Arc<RenameEngine>,
    pub(crate) delete_adapter: Arc<DeleteAdapter>,
    pub(crate) thumbnails: Arc<ThumbnailPipeline>,
    pub(crate) playlists: Arc<PlaylistMaterializer>,
    pub(crate) session: Arc<SessionPersistence>,
    /// Held while sleep is prevented.
    pub(crate) sleep_guard: Arc<Mutex<Option<KeepAwake>>>,
}

impl AppState {
    /// Wire every component to the real filesystem.
    pub fn new(paths: AppPaths) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem::new());
        info!("App data directory: {}", paths.data_dir().display());

        Self {
            paths,
            library: Arc::new(RwLock::new(LibraryContext::default())),
            rename_engine: Arc::new(RenameEngine::new(Arc::clone(&fs))),
            delete_adapter: Arc::new(DeleteAdapter::new(Arc::clone(&fs), Arc::new(SystemTrash))),
            thumbnails: Arc::new(ThumbnailPipeline::new(
                Arc::clone(&fs),
                Arc::new(JpegResizer::default()),
            )),
            playlists: Arc::new(PlaylistMaterializer::new(Arc::clone(&fs))),
            session: Arc::new(SessionPersistence::new(
                Arc::clone(&fs),
                Arc::new(JsonCatalogWriter::new(fs)),
            )),
            sleep_guard: Arc::new(Mutex::new(None)),
        }
    }

    /// Snapshot of the open hub.
    pub async fn library(&self) -> LibraryContext {
        self.library.read().await.clone()
    }

    /// Replace the open hub.
    pub async fn set_library(&self, ctx: LibraryContext) {
        *self.library.write().await = ctx;
    }
}

/// Run blocking file work on Tokio's blocking pool.
pub(crate) async fn run_blocking<T, F>(op: F) -> std::result::Result<T, String>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| host_err("blocking task", e))
}
