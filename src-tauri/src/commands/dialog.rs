//! Native pickers whose answer comes back as an event.

use std::path::PathBuf;

use hub_core::{EventSink, OutboundEvent};
use rfd::AsyncFileDialog;
use tauri::AppHandle;
use tracing::{debug, info};

use crate::host::TauriEventSink;

async fn pick_folder(title: &str) -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title(title)
        .pick_folder()
        .await
        .map(|handle| handle.path().to_path_buf())
}

/// Ask for the default video player; answers with `player-path-chosen`.
///
/// Cancelling the dialog sends nothing.
#[tauri::command]
pub async fn choose_default_player(app: AppHandle) -> std::result::Result<(), String> {
    let chosen = AsyncFileDialog::new()
        .set_title("Select default video player")
        .add_filter("Executable", &["exe", "app"])
        .add_filter("All files", &["*"])
        .pick_file()
        .await;

    match chosen {
        Some(handle) => {
            let path = handle.path().to_path_buf();
            info!("Default player set to {}", path.display());
            TauriEventSink::new(app).emit(OutboundEvent::PlayerPathChosen(path));
        }
        None => debug!("Player selection cancelled"),
    }
    Ok(())
}

/// Ask for a folder containing videos; answers with `input-dir-chosen`.
#[tauri::command]
pub async fn choose_input_dir(app: AppHandle) -> std::result::Result<(), String> {
    match pick_folder("Select input folder").await {
        Some(path) => TauriEventSink::new(app).emit(OutboundEvent::InputDirChosen(path)),
        None => debug!("Input folder selection cancelled"),
    }
    Ok(())
}

/// Ask where the hub should be written; answers with `output-dir-chosen`.
#[tauri::command]
pub async fn choose_output_dir(app: AppHandle) -> std::result::Result<(), String> {
    match pick_folder("Select output folder").await {
        Some(path) => TauriEventSink::new(app).emit(OutboundEvent::OutputDirChosen(path)),
        None => debug!("Output folder selection cancelled"),
    }
    Ok(())
}
