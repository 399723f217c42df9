//! Outbound events sent back to the UI.
//!
//! Every inbound command answers with at most one of these. The host maps
//! them onto its own event bus using [`OutboundEvent::name`] and
//! [`OutboundEvent::payload`].

use std::path::PathBuf;

use serde_json::Value;

use crate::catalog::CatalogItem;
use crate::rename::RenameOutcome;

/// Event names as the UI listens for them.
pub mod names {
    /// A default video player was picked.
    pub const PLAYER_PATH_CHOSEN: &str = "player-path-chosen";
    /// A file is confirmed gone.
    pub const FILE_DELETED: &str = "file-deleted";
    /// A thumbnail was swapped.
    pub const THUMBNAIL_REPLACED: &str = "thumbnail-replaced";
    /// An input directory was picked.
    pub const INPUT_DIR_CHOSEN: &str = "input-dir-chosen";
    /// An output directory was picked.
    pub const OUTPUT_DIR_CHOSEN: &str = "output-dir-chosen";
    /// A rename attempt finished.
    pub const RENAME_RESULT: &str = "rename-result";
}

/// A response event correlated with one inbound command.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// Executable picked as default player.
    PlayerPathChosen(PathBuf),
    /// The item's file no longer exists.
    FileDeleted(CatalogItem),
    /// The thumbnail of the requested item was replaced.
    ThumbnailReplaced,
    /// Folder picked as input.
    InputDirChosen(PathBuf),
    /// Folder picked as output.
    OutputDirChosen(PathBuf),
    /// Outcome of a rename request.
    RenameResult(RenameOutcome),
}

impl OutboundEvent {
    /// Event name on the UI side.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PlayerPathChosen(_) => names::PLAYER_PATH_CHOSEN,
            Self::FileDeleted(_) => names::FILE_DELETED,
            Self::ThumbnailReplaced => names::THUMBNAIL_REPLACED,
            Self::InputDirChosen(_) => names::INPUT_DIR_CHOSEN,
            Self::OutputDirChosen(_) => names::OUTPUT_DIR_CHOSEN,
            Self::RenameResult(_) => names::RENAME_RESULT,
        }
    }

    /// JSON payload of the event.
    pub fn payload(&self) -> Value {
        match self {
            Self::PlayerPathChosen(path)
            | Self::InputDirChosen(path)
            | Self::OutputDirChosen(path) => Value::String(path.display().to_string()),
            Self::FileDeleted(item) => serde_json::to_value(item).unwrap_or(Value::Null),
            Self::ThumbnailReplaced => Value::Null,
            Self::RenameResult(outcome) => serde_json::to_value(outcome).unwrap_or(Value::Null),
        }
    }
}
