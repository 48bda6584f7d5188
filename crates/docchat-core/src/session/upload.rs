//! Upload status tracking

use serde::{Deserialize, Serialize};

/// Document upload state for the current session.
///
/// Lifecycle: `Idle → Uploading → Success | Error`, with `Error → Uploading`
/// on retry and `Success | Error → Idle` on detach or new selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Success,
    Error,
}

impl UploadStatus {
    /// Whether an upload may be started from this state
    pub fn can_start(&self) -> bool {
        !matches!(self, UploadStatus::Uploading)
    }

    /// Whether an upload is currently in flight
    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadStatus::Uploading)
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UploadStatus::Idle => "idle",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Success => "success",
            UploadStatus::Error => "error",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(UploadStatus::default(), UploadStatus::Idle);
    }

    #[test]
    fn test_retry_allowed_from_error() {
        assert!(UploadStatus::Error.can_start());
        assert!(!UploadStatus::Uploading.can_start());
    }
}
