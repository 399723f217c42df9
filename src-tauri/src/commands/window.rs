//! Window chrome commands.

use tauri::WebviewWindow;
use tracing::debug;

use super::error::host_err;

/// Restore the calling window from maximized.
#[tauri::command]
pub fn un_maximize_window(window: WebviewWindow) -> std::result::Result<(), String> {
    debug!("Un-maximizing window {}", window.label());
    window.unmaximize().map_err(|e| host_err("un-maximize", e))
}

/// Minimize the calling window.
#[tauri::command]
pub fn minimize_window(window: WebviewWindow) -> std::result::Result<(), String> {
    debug!("Minimizing window {}", window.label());
    window.minimize().map_err(|e| host_err("minimize", e))
}

/// Maximize the calling window.
#[tauri::command]
pub fn maximize_window(window: WebviewWindow) -> std::result::Result<(), String> {
    debug!("Maximizing window {}", window.label());
    window.maximize().map_err(|e| host_err("maximize", e))
}
