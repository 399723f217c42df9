//! Catalog types as seen by the file-mutation layer.
//!
//! The catalog itself lives in the UI; requests carry copies of the items
//! they act on. Only the fields the core needs are modelled, everything else
//! the UI sends along is ignored.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FileSystemError, Result};

/// `cleanName` of the placeholder entries the UI uses to show folders.
pub const FOLDER_SENTINEL: &str = "*FOLDER*";

/// A single media asset known to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Directory of the file relative to its source folder.
    #[serde(default)]
    pub partial_path: String,
    /// File name including extension.
    pub file_name: String,
    /// Display name.
    #[serde(default)]
    pub clean_name: String,
    /// Content hash, also the thumbnail file stem.
    #[serde(default)]
    pub hash: String,
    /// Index of the source folder the file was found in.
    #[serde(default)]
    pub input_source: usize,
}

impl CatalogItem {
    /// True for folder placeholder entries.
    pub fn is_folder(&self) -> bool {
        self.clean_name == FOLDER_SENTINEL
    }

    /// `root / partialPath / fileName`, always below `root`.
    ///
    /// The UI stores `partialPath` with a leading separator (`/sub/dir`), which
    /// must not be read as an absolute path. `fileName` must be a plain name.
    pub fn full_path(&self, root: &Path) -> Result<PathBuf> {
        let name = plain_file_name(&self.file_name)?;
        Ok(join_relative(root, &self.partial_path).join(name))
    }
}

/// Joins a UI-style relative directory (`/a/b`, `\\a\\b` or `a/b`) onto `root`.
///
/// `.` and `..` segments are dropped, so the result never leaves `root`.
pub(crate) fn join_relative(root: &Path, relative: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    path.extend(
        relative
            .split(['/', '\\'])
            .filter(|segment| !matches!(*segment, "" | "." | "..")),
    );
    path
}

/// Accepts `name` only if it names an entry directly inside a directory.
pub(crate) fn plain_file_name(name: &str) -> Result<&str> {
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    let plain = single && !name.contains(['/', '\\']);
    if plain {
        Ok(name)
    } else {
        Err(FileSystemError::InvalidFileName {
            name: name.to_string(),
        }
        .into())
    }
}

/// The complete catalog object as sent by the UI at close time.
///
/// Its schema belongs to the catalog format; the core treats it as opaque JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CatalogDocument(pub serde_json::Value);

impl CatalogDocument {
    /// Wrap a JSON value.
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Borrow the JSON value.
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_full_path_strips_leading_separator() {
        let item = CatalogItem {
            partial_path: "/shows/season 1".to_string(),
            file_name: "ep01.mkv".to_string(),
            ..Default::default()
        };
        assert_eq!(
            item.full_path(Path::new("/videos")).unwrap(),
            PathBuf::from("/videos/shows/season 1/ep01.mkv")
        );
    }

    #[test]
    fn test_full_path_handles_backslashes() {
        let item = CatalogItem {
            partial_path: "\\shows\\s1".to_string(),
            file_name: "ep01.mkv".to_string(),
            ..Default::default()
        };
        assert_eq!(
            item.full_path(Path::new("/videos")).unwrap(),
            PathBuf::from("/videos/shows/s1/ep01.mkv")
        );
    }

    #[test]
    fn test_full_path_root_level() {
        let item = CatalogItem {
            file_name: "clip.mp4".to_string(),
            ..Default::default()
        };
        assert_eq!(
            item.full_path(Path::new("/videos")).unwrap(),
            PathBuf::from("/videos/clip.mp4")
        );
    }

    #[test]
    fn test_full_path_rejects_names_leaving_the_folder() {
        for name in ["/etc/passwd", "../clip.mp4", "sub/clip.mp4", "..\\clip.mp4", "..", ""] {
            let item = CatalogItem {
                partial_path: "/shows".to_string(),
                file_name: name.to_string(),
                ..Default::default()
            };
            let err = item.full_path(Path::new("/videos")).unwrap_err();
            assert!(
                matches!(err, crate::Error::FileSystem(FileSystemError::InvalidFileName { .. })),
                "{name:?} was accepted"
            );
        }
    }

    #[test]
    fn test_join_relative_drops_parent_segments() {
        assert_eq!(
            join_relative(Path::new("/videos"), "/../../etc/./shows"),
            PathBuf::from("/videos/etc/shows")
        );
    }

    #[test]
    fn test_is_folder() {
        let folder = CatalogItem {
            clean_name: FOLDER_SENTINEL.to_string(),
            ..Default::default()
        };
        let clip = CatalogItem {
            clean_name: "clip".to_string(),
            ..Default::default()
        };
        assert!(folder.is_folder());
        assert!(!clip.is_folder());
    }

    #[test]
    fn test_item_ignores_unknown_ui_fields() {
        let json = r#"{
            "partialPath": "/a",
            "fileName": "b.mp4",
            "cleanName": "b",
            "hash": "h1",
            "duration": 12.5,
            "screens": 10
        }"#;
        let item: CatalogItem = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(item.hash, "h1");
        assert_eq!(item.input_source, 0);
    }
}
