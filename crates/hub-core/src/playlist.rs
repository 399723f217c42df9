//! Turning a selection of catalog items into a playlist the OS can play.
//!
//! The playlist is a PLS v2 file at `<appData>/<namespace>/temp.pls`,
//! rewritten on every request and handed to the default handler for `.pls`.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::CatalogItem;
use crate::config::{AppPaths, LibraryContext};
use crate::error::Result;
use crate::fs::FileSystem;
use crate::host::ShellHost;

/// Render the PLS text for `items`, skipping folder placeholders.
///
/// Returns `None` when nothing playable is left.
pub fn render_pls(ctx: &LibraryContext, items: &[CatalogItem]) -> Result<Option<String>> {
    let playable: Vec<&CatalogItem> = items.iter().filter(|item| !item.is_folder()).collect();
    if playable.is_empty() {
        return Ok(None);
    }

    let mut pls = String::from("[playlist]\n");
    for (n, item) in playable.iter().enumerate() {
        let path = item.full_path(ctx.source_root(item.input_source)?)?;
        let number = n + 1;
        let _ = writeln!(pls, "File{number}={}", path.display());
        let _ = writeln!(pls, "Title{number}={}", item.clean_name);
    }
    let _ = writeln!(pls, "NumberOfEntries={}", playable.len());
    pls.push_str("Version=2\n");
    Ok(Some(pls))
}

/// Writes and opens the temporary playlist.
pub struct PlaylistMaterializer {
    fs: Arc<dyn FileSystem>,
}

impl PlaylistMaterializer {
    /// Create a materializer.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Write the playlist for `items` and open it.
    ///
    /// Returns the playlist path, or `None` if `items` held only folders.
    pub fn create(
        &self,
        paths: &AppPaths,
        ctx: &LibraryContext,
        items: &[CatalogItem],
        shell: &dyn ShellHost,
    ) -> Result<Option<PathBuf>> {
        let Some(contents) = render_pls(ctx, items)? else {
            debug!("Playlist request had no playable items");
            return Ok(None);
        };

        let data_dir = paths.data_dir();
        if !self.fs.is_dir(&data_dir) {
            self.fs.create_dir_all(&data_dir)?;
        }

        let playlist = paths.playlist_file();
        self.fs.write(&playlist, &contents)?;
        info!("Wrote playlist {}", playlist.display());

        shell.open_path(&playlist)?;
        Ok(Some(playlist))
    }
}
