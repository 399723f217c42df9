//! Configuration context for the file-mutation components.
//!
//! Two values describe everything the components need to resolve paths:
//! - [`AppPaths`]: where the application keeps its own files (settings,
//!   temporary playlist). Fixed for the lifetime of the process.
//! - [`LibraryContext`]: which hub is open (source folders, output folder,
//!   hub name, screenshot height, catalog file). Pushed by the UI whenever
//!   the user opens or creates a hub and handed to each operation by value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Directory name under the platform app-data root.
pub const APP_NAMESPACE: &str = "video-hub-app-2";

/// Settings file name inside the namespace directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Playlist file name inside the namespace directory.
pub const PLAYLIST_FILE_NAME: &str = "temp.pls";

/// Thumbnail directory name inside a hub folder.
pub const THUMBNAILS_DIR_NAME: &str = "thumbnails";

/// Default thumbnail height in pixels.
pub const DEFAULT_SCREENSHOT_HEIGHT: u32 = 144;

/// Where the application keeps its own files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    app_data_root: PathBuf,
    namespace: String,
}

impl AppPaths {
    /// Create paths rooted at `app_data_root` using the default namespace.
    pub fn new(app_data_root: impl Into<PathBuf>) -> Self {
        Self {
            app_data_root: app_data_root.into(),
            namespace: APP_NAMESPACE.to_string(),
        }
    }

    /// Use a different namespace directory.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Paths under the platform app-data directory.
    pub fn platform_default() -> Self {
        Self::new(default_app_data_root())
    }

    /// Root directory shared by all applications.
    pub fn app_data_root(&self) -> &Path {
        &self.app_data_root
    }

    /// `<appDataRoot>/<namespace>`.
    pub fn data_dir(&self) -> PathBuf {
        self.app_data_root.join(&self.namespace)
    }

    /// `<appDataRoot>/<namespace>/settings.json`.
    pub fn settings_file(&self) -> PathBuf {
        self.data_dir().join(SETTINGS_FILE_NAME)
    }

    /// `<appDataRoot>/<namespace>/temp.pls`.
    pub fn playlist_file(&self) -> PathBuf {
        self.data_dir().join(PLAYLIST_FILE_NAME)
    }
}

/// Platform app-data root (`%APPDATA%`, `~/.config`, `~/Library/Application Support`).
#[must_use]
pub fn default_app_data_root() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// One configured input folder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFolder {
    /// Absolute folder path.
    pub path: PathBuf,
    /// Whether the folder is watched for changes.
    #[serde(default)]
    pub watch: bool,
}

impl SourceFolder {
    /// An unwatched folder.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            watch: false,
        }
    }
}

/// The currently open hub.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryContext {
    /// Input folders, indexed by `CatalogItem::input_source`.
    #[serde(default)]
    pub source_folders: Vec<SourceFolder>,
    /// Folder that contains `vha-<hubName>/`.
    pub output_folder: PathBuf,
    /// Hub name.
    pub hub_name: String,
    /// Target thumbnail height in pixels.
    #[serde(default = "default_screenshot_height")]
    pub screenshot_height: u32,
    /// Catalog file currently open, if any.
    #[serde(default)]
    pub current_catalog_file: Option<PathBuf>,
}

const fn default_screenshot_height() -> u32 {
    DEFAULT_SCREENSHOT_HEIGHT
}

impl Default for LibraryContext {
    fn default() -> Self {
        Self {
            source_folders: Vec::new(),
            output_folder: PathBuf::new(),
            hub_name: String::new(),
            screenshot_height: DEFAULT_SCREENSHOT_HEIGHT,
            current_catalog_file: None,
        }
    }
}

impl LibraryContext {
    /// First configured source folder.
    pub fn primary_source_root(&self) -> Result<&Path> {
        self.source_folders
            .first()
            .map(|folder| folder.path.as_path())
            .ok_or_else(|| Error::configuration("no source folders configured"))
    }

    /// Source folder at `index`, falling back to the first one when the
    /// index is out of range.
    pub fn source_root(&self, index: usize) -> Result<&Path> {
        match self.source_folders.get(index) {
            Some(folder) => Ok(&folder.path),
            None => {
                warn!(
                    "Source folder index {} out of range ({} configured), using the first",
                    index,
                    self.source_folders.len()
                );
                self.primary_source_root()
            }
        }
    }

    /// `<outputFolder>/vha-<hubName>`.
    pub fn hub_dir(&self) -> PathBuf {
        self.output_folder.join(format!("vha-{}", self.hub_name))
    }

    /// `<outputFolder>/vha-<hubName>/thumbnails/<hash>.jpg`.
    pub fn thumbnail_path(&self, hash: &str) -> PathBuf {
        self.hub_dir()
            .join(THUMBNAILS_DIR_NAME)
            .join(format!("{hash}.jpg"))
    }
}
