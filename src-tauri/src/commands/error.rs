//! Error handling utilities for Tauri commands.

use hub_core::Error;
use tracing::error;

/// Structured error payload returned to the UI.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub message: String,
    /// Error category, e.g. `NotFound` or `Configuration`.
    pub kind: String,
}

impl From<&Error> for ErrorResponse {
    fn from(e: &Error) -> Self {
        Self {
            message: e.to_string(),
            kind: format!("{:?}", e.kind()),
        }
    }
}

/// Convert a core error into the string Tauri hands to the UI.
///
/// The string is a JSON-encoded [`ErrorResponse`], or the plain message if
/// encoding fails.
pub fn map_err(e: Error) -> String {
    error!("Command error [kind={:?}]: {}", e.kind(), e);
    serde_json::to_string(&ErrorResponse::from(&e)).unwrap_or_else(|_| e.to_string())
}

/// Error string for failures that come from the host rather than the core.
pub fn host_err(context: &str, e: impl std::fmt::Display) -> String {
    map_err(Error::configuration(format!("{context}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hub_core::FileSystemError;
    use std::path::PathBuf;

    #[test]
    fn test_map_err_is_structured_json() {
        let err = Error::FileSystem(FileSystemError::NotFound {
            path: PathBuf::from("/videos/clip.mp4"),
        });
        let json: serde_json::Value = serde_json::from_str(&map_err(err)).unwrap();
        assert_eq!(json["kind"], "NotFound");
        assert!(json["message"].as_str().unwrap().contains("/videos/clip.mp4"));
    }

    #[test]
    fn test_host_err_is_configuration() {
        let json: serde_json::Value =
            serde_json::from_str(&host_err("window", "no such window")).unwrap();
        assert_eq!(json["kind"], "Configuration");
        assert_eq!(json["message"], "Configuration error: window: no such window");
    }
}
