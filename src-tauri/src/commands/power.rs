//! Keeping the machine awake during long screenshot extraction.

use tauri::State;
use tracing::{debug, info};

use super::error::host_err;
use super::state::AppState;

/// Prevent the system from sleeping until `allow_sleep` is called.
///
/// Calling it again while sleep is already prevented does nothing.
#[tauri::command]
pub async fn prevent_sleep(state: State<'_, AppState>) -> std::result::Result<(), String> {
    let mut guard = state.sleep_guard.lock().await;
    if guard.is_some() {
        debug!("Sleep already prevented");
        return Ok(());
    }

    let awake = keepawake::Builder::default()
        .idle(true)
        .reason("Extracting screenshots")
        .app_name("Video Hub")
        .app_reverse_domain("app.videohub")
        .create()
        .map_err(|e| host_err("prevent sleep", e))?;
    *guard = Some(awake);
    info!("Preventing sleep");
    Ok(())
}

/// Let the system sleep again.
#[tauri::command]
pub async fn allow_sleep(state: State<'_, AppState>) -> std::result::Result<(), String> {
    if state.sleep_guard.lock().await.take().is_some() {
        info!("Allowing sleep");
    }
    Ok(())
}
