//! Renaming catalogued files in place.
//!
//! A rename never overwrites: if the desired name is already taken the
//! request fails with [`RenameErrorCode::NameCollision`] before anything is
//! touched. Every request produces exactly one `rename-result` event carrying
//! the caller's index, so the UI can match answers to requests even when
//! several renames are in flight.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{join_relative, plain_file_name};
use crate::error::Result;
use crate::events::OutboundEvent;
use crate::fs::FileSystem;
use crate::host::EventSink;

/// Why a rename failed, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenameErrorCode {
    /// A file with the desired name already exists.
    NameCollision,
    /// The file to rename is missing.
    SourceNotFound,
    /// Any other OS failure.
    GenericRenameError,
}

impl RenameErrorCode {
    /// The string the UI keys its error message on.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NameCollision => "NameCollision",
            Self::SourceNotFound => "SourceNotFound",
            Self::GenericRenameError => "GenericRenameError",
        }
    }
}

impl fmt::Display for RenameErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rename attempt from the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    /// Source folder the file lives under.
    pub source_folder: PathBuf,
    /// Directory of the file relative to `source_folder`.
    pub rel_path: String,
    /// Current file name.
    pub current_file_name: String,
    /// Requested file name.
    pub desired_file_name: String,
    /// Correlation token, echoed back unchanged.
    pub request_index: usize,
}

impl RenameRequest {
    /// `sourceFolder / relPath / currentFileName`.
    pub fn original_path(&self) -> Result<PathBuf> {
        self.path_of(&self.current_file_name)
    }

    /// `sourceFolder / relPath / desiredFileName`.
    pub fn candidate_path(&self) -> Result<PathBuf> {
        self.path_of(&self.desired_file_name)
    }

    fn path_of(&self, file_name: &str) -> Result<PathBuf> {
        let name = plain_file_name(file_name)?;
        Ok(join_relative(&self.source_folder, &self.rel_path).join(name))
    }
}

/// Result of a rename attempt, sent to the UI as `rename-result`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenameOutcome {
    /// The request's index.
    pub index: usize,
    /// Whether the file now has the new name.
    pub success: bool,
    /// Requested file name.
    pub new_name: String,
    /// File name before the attempt.
    pub old_name: String,
    /// Failure reason when `success` is false.
    pub error_code: Option<RenameErrorCode>,
}

impl RenameOutcome {
    fn new(request: &RenameRequest, error_code: Option<RenameErrorCode>) -> Self {
        Self {
            index: request.request_index,
            success: error_code.is_none(),
            new_name: request.desired_file_name.clone(),
            old_name: request.current_file_name.clone(),
            error_code,
        }
    }
}

/// Applies rename requests.
pub struct RenameEngine {
    fs: Arc<dyn FileSystem>,
}

impl RenameEngine {
    /// Create an engine over the given filesystem.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Attempt the rename and report the outcome to `sink`.
    pub fn rename(&self, request: &RenameRequest, sink: &dyn EventSink) -> RenameOutcome {
        let outcome = RenameOutcome::new(request, self.apply(request).err());
        sink.emit(OutboundEvent::RenameResult(outcome.clone()));
        outcome
    }

    fn apply(&self, request: &RenameRequest) -> std::result::Result<(), RenameErrorCode> {
        let (original, candidate) = match (request.original_path(), request.candidate_path()) {
            (Ok(original), Ok(candidate)) => (original, candidate),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Rename #{} refused: {}", request.request_index, e);
                return Err(RenameErrorCode::GenericRenameError);
            }
        };
        debug!(
            "Rename #{}: {} -> {}",
            request.request_index,
            original.display(),
            candidate.display()
        );

        if self.fs.exists(&candidate) {
            warn!(
                "Rename #{} refused, {} already exists",
                request.request_index,
                candidate.display()
            );
            return Err(RenameErrorCode::NameCollision);
        }

        match self.fs.rename(&original, &candidate) {
            Ok(()) => {
                info!(
                    "Renamed {} to {}",
                    original.display(),
                    request.desired_file_name
                );
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!("Rename #{} failed: {}", request.request_index, e);
                Err(RenameErrorCode::SourceNotFound)
            }
            Err(e) => {
                warn!("Rename #{} failed: {}", request.request_index, e);
                Err(RenameErrorCode::GenericRenameError)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::fs::RealFileSystem;
    use crate::fs::mock::MockFileSystem;
    use crate::host::MockEventSink;
    use std::fs;
    use tempfile::TempDir;

    fn request(root: &std::path::Path, from: &str, to: &str, index: usize) -> RenameRequest {
        RenameRequest {
            source_folder: root.to_path_buf(),
            rel_path: "/clips".to_string(),
            current_file_name: from.to_string(),
            desired_file_name: to.to_string(),
            request_index: index,
        }
    }

    fn expect_one_result(index: usize, success: bool) -> MockEventSink {
        let mut sink = MockEventSink::new();
        sink.expect_emit()
            .withf(move |event| {
                matches!(
                    event,
                    OutboundEvent::RenameResult(o) if o.index == index && o.success == success
                )
            })
            .times(1)
            .return_const(());
        sink
    }

    fn setup() -> (TempDir, RenameEngine) {
        let temp_dir = TempDir::new().expect("Should create temp dir");
        fs::create_dir_all(temp_dir.path().join("clips")).unwrap();
        (temp_dir, RenameEngine::new(Arc::new(RealFileSystem::new())))
    }

    #[test]
    fn test_rename_success_moves_content() {
        let (temp_dir, engine) = setup();
        let clips = temp_dir.path().join("clips");
        fs::write(clips.join("old.mp4"), "video bytes").unwrap();

        let sink = expect_one_result(7, true);
        let outcome = engine.rename(&request(temp_dir.path(), "old.mp4", "new.mp4", 7), &sink);

        assert!(outcome.success);
        assert_eq!(outcome.index, 7);
        assert_eq!(outcome.error_code, None);
        assert!(!clips.join("old.mp4").exists());
        assert_eq!(fs::read_to_string(clips.join("new.mp4")).unwrap(), "video bytes");
    }

    #[test]
    fn test_rename_collision_leaves_files_untouched() {
        let (temp_dir, engine) = setup();
        let clips = temp_dir.path().join("clips");
        fs::write(clips.join("a.mp4"), "A").unwrap();
        fs::write(clips.join("b.mp4"), "B").unwrap();

        let sink = expect_one_result(2, false);
        let outcome = engine.rename(&request(temp_dir.path(), "a.mp4", "b.mp4", 2), &sink);

        assert_eq!(outcome.error_code, Some(RenameErrorCode::NameCollision));
        assert_eq!(fs::read_to_string(clips.join("a.mp4")).unwrap(), "A");
        assert_eq!(fs::read_to_string(clips.join("b.mp4")).unwrap(), "B");
    }

    #[test]
    fn test_rename_to_same_name_is_collision() {
        let (temp_dir, engine) = setup();
        fs::write(temp_dir.path().join("clips").join("a.mp4"), "A").unwrap();

        let sink = expect_one_result(0, false);
        let outcome = engine.rename(&request(temp_dir.path(), "a.mp4", "a.mp4", 0), &sink);

        assert_eq!(outcome.error_code, Some(RenameErrorCode::NameCollision));
        assert!(temp_dir.path().join("clips").join("a.mp4").exists());
    }

    #[test]
    fn test_rename_missing_source() {
        let (temp_dir, engine) = setup();

        let sink = expect_one_result(3, false);
        let outcome = engine.rename(&request(temp_dir.path(), "gone.mp4", "new.mp4", 3), &sink);

        assert_eq!(outcome.error_code, Some(RenameErrorCode::SourceNotFound));
        assert_eq!(outcome.old_name, "gone.mp4");
        assert_eq!(outcome.new_name, "new.mp4");
    }

    #[test]
    fn test_rename_other_failure_is_generic() {
        let fs = MockFileSystem::new();
        fs.add_file("/videos/clips/a.mp4", "A");
        fs.deny("/videos/clips/a.mp4");
        let engine = RenameEngine::new(Arc::new(fs.clone()));

        let sink = expect_one_result(9, false);
        let outcome = engine.rename(
            &request(std::path::Path::new("/videos"), "a.mp4", "b.mp4", 9),
            &sink,
        );

        assert_eq!(outcome.error_code, Some(RenameErrorCode::GenericRenameError));
        assert_eq!(fs.contents("/videos/clips/a.mp4").as_deref(), Some("A"));
    }

    #[test]
    fn test_rename_refuses_names_outside_the_folder() {
        let (temp_dir, engine) = setup();
        let elsewhere = TempDir::new().expect("Should create temp dir");
        let clips = temp_dir.path().join("clips");
        fs::write(clips.join("a.mp4"), "A").unwrap();

        let escaped = elsewhere.path().join("escaped.mp4");
        let targets = [
            escaped.to_string_lossy().into_owned(),
            "../a.mp4".to_string(),
            "nested/a.mp4".to_string(),
        ];
        for (index, target) in targets.iter().enumerate() {
            let sink = expect_one_result(index, false);
            let outcome = engine.rename(&request(temp_dir.path(), "a.mp4", target, index), &sink);
            assert_eq!(outcome.error_code, Some(RenameErrorCode::GenericRenameError));
        }

        assert!(!escaped.exists());
        assert!(!temp_dir.path().join("a.mp4").exists());
        assert_eq!(fs::read_to_string(clips.join("a.mp4")).unwrap(), "A");
    }

    #[test]
    fn test_rename_refuses_absolute_current_name() {
        let (temp_dir, engine) = setup();
        let elsewhere = TempDir::new().expect("Should create temp dir");
        let outside = elsewhere.path().join("victim.mp4");
        fs::write(&outside, "V").unwrap();

        let sink = expect_one_result(4, false);
        let outcome = engine.rename(
            &request(temp_dir.path(), &outside.to_string_lossy(), "taken.mp4", 4),
            &sink,
        );

        assert_eq!(outcome.error_code, Some(RenameErrorCode::GenericRenameError));
        assert!(outside.exists());
        assert!(!temp_dir.path().join("clips").join("taken.mp4").exists());
    }

    #[test]
    fn test_interleaved_requests_echo_their_own_index() {
        let (temp_dir, engine) = setup();
        let clips = temp_dir.path().join("clips");
        fs::write(clips.join("one.mp4"), "1").unwrap();
        fs::write(clips.join("two.mp4"), "2").unwrap();

        let mut sink = MockEventSink::new();
        sink.expect_emit().times(2).return_const(());

        let second = engine.rename(&request(temp_dir.path(), "two.mp4", "deux.mp4", 11), &sink);
        let first = engine.rename(&request(temp_dir.path(), "one.mp4", "un.mp4", 10), &sink);

        assert_eq!(second.index, 11);
        assert_eq!(first.index, 10);
        assert!(first.success && second.success);
    }

    #[test]
    fn test_error_code_strings() {
        assert_eq!(RenameErrorCode::NameCollision.to_string(), "NameCollision");
        assert_eq!(RenameErrorCode::SourceNotFound.as_str(), "SourceNotFound");
        assert_eq!(
            serde_json::to_string(&RenameErrorCode::GenericRenameError).unwrap(),
            "\"GenericRenameError\""
        );
    }
}
