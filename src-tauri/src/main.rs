//! Video Hub - desktop app for browsing and curating a local video library.
//!
//! This is the main entry point for the Tauri application.

#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

mod commands;
mod host;
mod logging;

use commands::AppState;
use hub_core::AppPaths;
use tracing::{error, info};

fn main() {
    let _log_guard = match logging::init_auto() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {e}");
            None
        }
    };

    info!("Starting Video Hub");

    let app_state = AppState::new(AppPaths::platform_default());

    let result = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            commands::un_maximize_window,
            commands::minimize_window,
            commands::maximize_window,
            commands::prevent_sleep,
            commands::allow_sleep,
            commands::open_in_explorer,
            commands::open_url,
            commands::open_media_file,
            commands::open_media_file_at_timestamp,
            commands::choose_default_player,
            commands::choose_input_dir,
            commands::choose_output_dir,
            commands::set_library_context,
            commands::create_playlist,
            commands::delete_file,
            commands::replace_thumbnail,
            commands::rename_file,
            commands::close_window,
            commands::load_settings,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        error!("Video Hub exited with an error: {}", e);
        std::process::exit(1);
    }
}
