//! Handing files and URLs to the operating system.

use std::path::PathBuf;

use tauri::AppHandle;
use tauri_plugin_opener::OpenerExt;
use tracing::{debug, info};

use super::error::host_err;

/// Paths from the UI may mix `/` and `\` on Windows.
fn normalize(path: &str) -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(path.replace('/', "\\"))
    } else {
        PathBuf::from(path)
    }
}

/// Show `path` selected in the platform file manager.
#[tauri::command]
pub fn open_in_explorer(app: AppHandle, path: String) -> std::result::Result<(), String> {
    debug!("Revealing {}", path);
    app.opener()
        .reveal_item_in_dir(normalize(&path))
        .map_err(|e| host_err("reveal in file manager", e))
}

/// Open `url` in the default browser.
#[tauri::command]
pub fn open_url(app: AppHandle, url: String) -> std::result::Result<(), String> {
    debug!("Opening URL {}", url);
    app.opener()
        .open_url(url, None::<&str>)
        .map_err(|e| host_err("open URL", e))
}

/// Open a video with its default player.
#[tauri::command]
pub fn open_media_file(app: AppHandle, path: String) -> std::result::Result<(), String> {
    let path = normalize(&path);
    info!("Opening {}", path.display());
    app.opener()
        .open_path(path.to_string_lossy(), None::<&str>)
        .map_err(|e| host_err("open media file", e))
}

/// Launch `executable` with the video path followed by `extra_args`
/// (typically a seek-to-timestamp flag). The child is spawned on the Tokio
/// runtime and not waited for.
#[allow(clippy::unused_async)]
#[tauri::command]
pub async fn open_media_file_at_timestamp(
    executable: String,
    path: String,
    extra_args: Vec<String>,
) -> std::result::Result<(), String> {
    let executable = normalize(&executable);
    let path = normalize(&path);
    info!(
        "Launching {} {} {:?}",
        executable.display(),
        path.display(),
        extra_args
    );
    tokio::process::Command::new(&executable)
        .arg(&path)
        .args(&extra_args)
        .spawn()
        .map(drop)
        .map_err(|e| host_err("launch player", e))
}
