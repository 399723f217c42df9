//! Collaborators provided by the desktop host.
//!
//! The core never talks to the window system or the OS shell directly. The
//! Tauri host implements these traits; tests mock them.

use std::path::Path;

use crate::error::Result;
use crate::events::OutboundEvent;
use crate::session::WindowBounds;

/// Delivers response events to the UI.
#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send + Sync {
    /// Send one event.
    fn emit(&self, event: OutboundEvent);
}

/// OS shell integration.
#[cfg_attr(test, mockall::automock)]
pub trait ShellHost: Send + Sync {
    /// Open `path` with its default handler.
    fn open_path(&self, path: &Path) -> Result<()>;
}

/// The application window being closed at session end.
#[cfg_attr(test, mockall::automock)]
pub trait WindowHost: Send + Sync {
    /// Live bounds of the window content area, `None` if the window is gone.
    fn content_bounds(&self) -> Option<WindowBounds>;

    /// Close the window. Returns `false` when there was no window to close.
    fn close(&self) -> bool;
}
