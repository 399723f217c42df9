//! Persisting the session when the main window closes.
//!
//! Closing runs a fixed sequence of phases: capture the window bounds,
//! normalize shortcuts, serialize the settings, make sure the namespace
//! directory exists, write the settings, write the catalog (only if one was
//! supplied), close the window. A failing phase is logged and recorded in the
//! [`CloseReport`] and the sequence carries on, so the window always closes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::catalog::CatalogDocument;
use crate::config::{AppPaths, LibraryContext};
use crate::error::{Error, Result, SessionError};
use crate::fs::FileSystem;
use crate::host::WindowHost;

/// Position and size of the window content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Keyboard shortcuts in the order the user defined them.
///
/// Serialized as a JSON object whose keys keep insertion order. Accepts
/// either an object or a list of `[key, action]` pairs, which is what the UI
/// sends for its in-memory map. Pairs become the ordered record while
/// deserializing; a key bound twice keeps its first position and last action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shortcuts(Vec<(String, String)>);

impl Shortcuts {
    /// Empty shortcut table.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Bind `key` to `action`. Rebinding keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, action: impl Into<String>) {
        let key = key.into();
        let action = action.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = action,
            None => self.0.push((key, action)),
        }
    }

    /// Action bound to `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, action)| action.as_str())
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Shortcuts {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut shortcuts = Self::new();
        for (key, action) in iter {
            shortcuts.insert(key, action);
        }
        shortcuts
    }
}

impl Serialize for Shortcuts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, action) in &self.0 {
            map.serialize_entry(key, action)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Shortcuts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ShortcutsVisitor;

        impl<'de> Visitor<'de> for ShortcutsVisitor {
            type Value = Shortcuts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a shortcut object or a list of [key, action] pairs")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Shortcuts, A::Error> {
                let mut shortcuts = Shortcuts::new();
                while let Some((key, action)) = access.next_entry::<String, String>()? {
                    shortcuts.insert(key, action);
                }
                Ok(shortcuts)
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Shortcuts, A::Error> {
                let mut shortcuts = Shortcuts::new();
                while let Some((key, action)) = access.next_element::<(String, String)>()? {
                    shortcuts.insert(key, action);
                }
                Ok(shortcuts)
            }
        }

        deserializer.deserialize_any(ShortcutsVisitor)
    }
}

/// User settings persisted to `settings.json`.
///
/// Only the fields the backend touches are typed. Everything else the UI
/// stores is carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Window bounds at the last close.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_size_and_position: Option<WindowBounds>,
    /// Keyboard shortcuts.
    #[serde(default)]
    pub shortcuts: Shortcuts,
    /// Remaining UI-owned settings.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Steps of the close sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosePhase {
    /// Read the live window bounds.
    CaptureBounds,
    /// Trace the ordered shortcut record built when the settings arrived.
    NormalizeShortcuts,
    /// Serialize settings to JSON.
    SerializeSettings,
    /// Create the namespace directory if needed.
    EnsureDir,
    /// Write `settings.json`.
    WriteSettings,
    /// Write the catalog file.
    WriteCatalog,
    /// Close the window.
    CloseWindow,
}

impl fmt::Display for ClosePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CaptureBounds => "CAPTURE_BOUNDS",
            Self::NormalizeShortcuts => "NORMALIZE_SHORTCUTS",
            Self::SerializeSettings => "SERIALIZE_SETTINGS",
            Self::EnsureDir => "ENSURE_DIR",
            Self::WriteSettings => "WRITE_SETTINGS",
            Self::WriteCatalog => "WRITE_CATALOG",
            Self::CloseWindow => "CLOSE_WINDOW",
        };
        f.write_str(name)
    }
}

/// Writes the catalog in its on-disk format.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogWriter: Send + Sync {
    /// Persist `catalog` at `path`.
    fn write_catalog(&self, path: &Path, catalog: &CatalogDocument) -> Result<()>;
}

/// Writes the catalog as JSON through a `.tmp` sibling and a rename.
pub struct JsonCatalogWriter {
    fs: Arc<dyn FileSystem>,
}

impl JsonCatalogWriter {
    /// Create a writer.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl CatalogWriter for JsonCatalogWriter {
    fn write_catalog(&self, path: &Path, catalog: &CatalogDocument) -> Result<()> {
        let json = serde_json::to_string(catalog.as_value())?;
        let mut staging_name = path.file_name().unwrap_or_default().to_os_string();
        staging_name.push(".tmp");
        let staging = path.with_file_name(staging_name);

        self.fs.write(&staging, &json)?;
        if let Err(e) = self.fs.rename(&staging, path) {
            let _ = self.fs.remove_file(&staging);
            return Err(e);
        }
        Ok(())
    }
}

/// What the close sequence did.
#[derive(Debug, Default)]
pub struct CloseReport {
    /// Phases that ran, in order.
    pub phases: Vec<ClosePhase>,
    /// Phases that failed and why.
    pub failures: Vec<(ClosePhase, Error)>,
    /// Whether a window was actually closed.
    pub window_closed: bool,
    /// The settings as written.
    pub settings: Settings,
}

impl CloseReport {
    /// True when every phase succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn ran(&mut self, phase: ClosePhase) {
        debug!("Close phase {}", phase);
        self.phases.push(phase);
    }

    fn failed(&mut self, phase: ClosePhase, error: Error) {
        warn!("Close phase {} failed: {}", phase, error);
        self.failures.push((phase, error));
    }
}

/// Saves settings and catalog at shutdown and reads settings at startup.
pub struct SessionPersistence {
    fs: Arc<dyn FileSystem>,
    catalog_writer: Arc<dyn CatalogWriter>,
}

impl SessionPersistence {
    /// Create a session manager.
    pub fn new(fs: Arc<dyn FileSystem>, catalog_writer: Arc<dyn CatalogWriter>) -> Self {
        Self { fs, catalog_writer }
    }

    /// Persist settings (and the catalog, if given) and close the window.
    pub fn close_session(
        &self,
        paths: &AppPaths,
        ctx: &LibraryContext,
        mut settings: Settings,
        catalog: Option<&CatalogDocument>,
        window: &dyn WindowHost,
    ) -> CloseReport {
        let mut report = CloseReport::default();

        report.ran(ClosePhase::CaptureBounds);
        match window.content_bounds() {
            Some(bounds) => settings.window_size_and_position = Some(bounds),
            None => debug!("Window is gone, keeping previous bounds"),
        }

        report.ran(ClosePhase::NormalizeShortcuts);
        debug!("Saving {} shortcuts", settings.shortcuts.len());

        report.ran(ClosePhase::SerializeSettings);
        let json = match serde_json::to_string(&settings) {
            Ok(json) => Some(json),
            Err(e) => {
                report.failed(ClosePhase::SerializeSettings, e.into());
                None
            }
        };

        report.ran(ClosePhase::EnsureDir);
        let data_dir = paths.data_dir();
        if !self.fs.is_dir(&data_dir)
            && let Err(e) = self.fs.create_dir_all(&data_dir)
        {
            report.failed(ClosePhase::EnsureDir, e);
        }

        if let Some(json) = json {
            report.ran(ClosePhase::WriteSettings);
            let settings_file = paths.settings_file();
            match self.fs.write(&settings_file, &json) {
                Ok(()) => info!("Saved settings to {}", settings_file.display()),
                Err(e) => report.failed(ClosePhase::WriteSettings, e),
            }
        }

        if let Some(catalog) = catalog {
            report.ran(ClosePhase::WriteCatalog);
            match self.write_catalog(ctx, catalog) {
                Ok(path) => info!("Saved catalog to {}", path.display()),
                Err(e) => report.failed(ClosePhase::WriteCatalog, e),
            }
        }

        report.ran(ClosePhase::CloseWindow);
        report.window_closed = window.close();
        if !report.window_closed {
            debug!("No window to close");
        }

        report.settings = settings;
        report
    }

    fn write_catalog(&self, ctx: &LibraryContext, catalog: &CatalogDocument) -> Result<PathBuf> {
        let path = ctx
            .current_catalog_file
            .as_deref()
            .ok_or(SessionError::MissingCatalogPath)?;
        self.catalog_writer.write_catalog(path, catalog)?;
        Ok(path.to_path_buf())
    }

    /// Read `settings.json`. `None` when it does not exist yet.
    pub fn load_settings(&self, paths: &AppPaths) -> Result<Option<Settings>> {
        let settings_file = paths.settings_file();
        if !self.fs.exists(&settings_file) {
            debug!("No settings at {}", settings_file.display());
            return Ok(None);
        }

        let json = self.fs.read_to_string(&settings_file)?;
        let settings = serde_json::from_str(&json).map_err(|e| SessionError::CorruptSettings {
            path: settings_file,
            reason: e.to_string(),
        })?;
        Ok(Some(settings))
    }
}
