//! Session start and end.

use std::sync::Arc;

use hub_core::{CatalogDocument, Settings};
use tauri::{State, WebviewWindow};
use tracing::{info, warn};

use super::error::map_err;
use super::state::{AppState, run_blocking};
use crate::host::TauriWindow;

/// Save settings (and the catalog, when given) and close the window.
///
/// The window closes even when a write fails; failures are logged.
#[tauri::command]
pub async fn close_window(
    window: WebviewWindow,
    state: State<'_, AppState>,
    settings: Settings,
    catalog: Option<CatalogDocument>,
) -> std::result::Result<(), String> {
    let ctx = state.library().await;
    let session = Arc::clone(&state.session);
    let paths = state.paths.clone();
    let report = run_blocking(move || {
        session.close_session(
            &paths,
            &ctx,
            settings,
            catalog.as_ref(),
            &TauriWindow::new(window),
        )
    })
    .await?;

    if report.is_clean() {
        info!("Session saved");
    } else {
        warn!("Session closed with {} failed phase(s)", report.failures.len());
    }
    Ok(())
}

/// Settings saved by the last session, `None` on first start.
#[tauri::command]
pub fn load_settings(state: State<'_, AppState>) -> std::result::Result<Option<Settings>, String> {
    state.session.load_settings(&state.paths).map_err(map_err)
}
