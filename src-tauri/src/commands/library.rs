//! Commands that change files of the open hub.
//!
//! Each command reads a snapshot of the current [`LibraryContext`] and
//! answers through events, exactly like the core components do.

use std::path::Path;
use std::sync::Arc;

use hub_core::{CatalogItem, LibraryContext, ReplaceOutcome, RenameOutcome, RenameRequest};
use tauri::{AppHandle, State};
use tracing::{debug, info};

use super::error::map_err;
use super::state::{AppState, run_blocking};
use crate::host::{TauriEventSink, TauriShell};

/// Replace the open hub. Called by the UI whenever a hub is opened or created.
#[tauri::command]
pub async fn set_library_context(
    state: State<'_, AppState>,
    context: LibraryContext,
) -> std::result::Result<(), String> {
    info!(
        "Library context: hub '{}' with {} source folder(s)",
        context.hub_name,
        context.source_folders.len()
    );
    state.set_library(context).await;
    Ok(())
}

/// Write `temp.pls` for `items` and open it. Returns the playlist path, or
/// `None` when the selection held only folders.
#[tauri::command]
pub async fn create_playlist(
    app: AppHandle,
    state: State<'_, AppState>,
    items: Vec<CatalogItem>,
) -> std::result::Result<Option<String>, String> {
    debug!("Creating playlist from {} item(s)", items.len());
    let ctx = state.library().await;
    let playlists = Arc::clone(&state.playlists);
    let paths = state.paths.clone();
    let written = run_blocking(move || {
        playlists.create(&paths, &ctx, &items, &TauriShell::new(app))
    })
    .await?
    .map_err(map_err)?;
    Ok(written.map(|path| path.display().to_string()))
}

/// Delete the item's file. Answers with `file-deleted` once the file is gone.
///
/// Returns whether the file is confirmed gone. Deletion failures are logged,
/// not returned as errors.
#[tauri::command]
pub async fn delete_file(
    app: AppHandle,
    state: State<'_, AppState>,
    item: CatalogItem,
    permanent: bool,
) -> std::result::Result<bool, String> {
    let ctx = state.library().await;
    let report = state
        .delete_adapter
        .delete(&ctx, &item, permanent, &TauriEventSink::new(app))
        .await;
    Ok(report.confirmed)
}

/// Replace the item's thumbnail with the image at `incoming_path`.
/// Answers with `thumbnail-replaced` on success.
#[tauri::command]
pub async fn replace_thumbnail(
    app: AppHandle,
    state: State<'_, AppState>,
    incoming_path: String,
    item: CatalogItem,
) -> std::result::Result<bool, String> {
    let ctx = state.library().await;
    let outcome = state
        .thumbnails
        .replace(
            &ctx,
            Path::new(&incoming_path),
            &item,
            &TauriEventSink::new(app),
        )
        .await;
    Ok(matches!(outcome, ReplaceOutcome::Replaced))
}

/// Rename a file in place. Answers with `rename-result`, which is also
/// returned.
#[tauri::command]
pub async fn rename_file(
    app: AppHandle,
    state: State<'_, AppState>,
    source_folder: String,
    rel_path: String,
    file: String,
    new_name: String,
    index: usize,
) -> std::result::Result<RenameOutcome, String> {
    let request = RenameRequest {
        source_folder: source_folder.into(),
        rel_path,
        current_file_name: file,
        desired_file_name: new_name,
        request_index: index,
    };
    let engine = Arc::clone(&state.rename_engine);
    run_blocking(move || engine.rename(&request, &TauriEventSink::new(app))).await
}
