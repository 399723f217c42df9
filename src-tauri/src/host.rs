//! Tauri implementations of the core's host collaborators.

use std::io;
use std::path::Path;

use hub_core::{Error, EventSink, OutboundEvent, ShellHost, WindowBounds, WindowHost};
use tauri::{AppHandle, Emitter, WebviewWindow};
use tauri_plugin_opener::OpenerExt;
use tracing::{debug, error};

/// Sends core events to every webview.
pub struct TauriEventSink {
    app: AppHandle,
}

impl TauriEventSink {
    /// Emit through `app`.
    pub const fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl EventSink for TauriEventSink {
    fn emit(&self, event: OutboundEvent) {
        let name = event.name();
        debug!("Emitting {} event", name);
        if let Err(e) = self.app.emit(name, event.payload()) {
            error!("Failed to emit {} event: {}", name, e);
        }
    }
}

/// Opens paths with their default handler via the opener plugin.
pub struct TauriShell {
    app: AppHandle,
}

impl TauriShell {
    /// Open through `app`.
    pub const fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl ShellHost for TauriShell {
    fn open_path(&self, path: &Path) -> hub_core::Result<()> {
        self.app
            .opener()
            .open_path(path.to_string_lossy(), None::<&str>)
            .map_err(|e| Error::Io(io::Error::other(e.to_string())))
    }
}

/// The window that asked for the session to close.
pub struct TauriWindow {
    window: WebviewWindow,
}

impl TauriWindow {
    /// Wrap the calling window.
    pub const fn new(window: WebviewWindow) -> Self {
        Self { window }
    }
}

impl WindowHost for TauriWindow {
    fn content_bounds(&self) -> Option<WindowBounds> {
        let position = self.window.inner_position().ok()?;
        let size = self.window.inner_size().ok()?;
        Some(WindowBounds {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        })
    }

    fn close(&self) -> bool {
        match self.window.close() {
            Ok(()) => true,
            Err(e) => {
                debug!("Window close failed: {}", e);
                false
            }
        }
    }
}
