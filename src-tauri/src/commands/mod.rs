//! Tauri commands for the `Video Hub` application.
//!
//! These commands are invoked from the frontend via Tauri's IPC mechanism.
//!
//! This module is organized into submodules by feature area:
//! - `state`: Application state management
//! - `error`: Error handling utilities
//! - `window`: Window chrome
//! - `power`: Sleep prevention
//! - `shell`: Opening files, folders and URLs with the OS
//! - `dialog`: Native pickers answering through events
//! - `library`: Rename, delete, thumbnail and playlist operations
//! - `session`: Loading and saving the session

mod dialog;
mod error;
mod library;
mod power;
mod session;
mod shell;
mod state;
mod window;

// Re-export AppState for main.rs
pub use state::AppState;

// Re-export all commands
pub use dialog::*;
pub use library::*;
pub use power::*;
pub use session::*;
pub use shell::*;
pub use window::*;
