//! File domain — uploads, signed file records, history, downloads.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod progress;
pub mod state;
pub mod wire;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::network::{USER_UPLOAD_PATH, USER_UPLOAD_V1_PATH};
use crate::shared::{FileId, PageId};

pub use state::{UploadState, UploadTracker};

/// Largest upload the backend accepts.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Shown when an upload is submitted with nothing selected.
pub const NO_FILE_SELECTED: &str = "Please select a file to sign";

// ─── Status ──────────────────────────────────────────────────────────────────

/// Backend signing status of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Pending,
    InProgress,
    Signed,
    Failed,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Signed => "signed",
            Self::Failed => "failed",
        }
    }

    /// Signed and failed are final; nothing moves a file out of them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Signed | Self::Failed)
    }

    pub fn is_downloadable(&self) -> bool {
        matches!(self, Self::Signed)
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A submitted file and its signing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedFile {
    pub id: FileId,
    pub file_name: String,
    pub status: FileStatus,
    pub uploaded_at: DateTime<Utc>,
    pub signed_at: Option<DateTime<Utc>>,
}

impl SignedFile {
    /// Name the signed artifact is saved under.
    pub fn download_name(&self) -> String {
        format!("signed_{}", self.file_name)
    }
}

/// The one file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its file name.
    #[cfg(feature = "native")]
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// A downloaded signed artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

// ─── Upload events ───────────────────────────────────────────────────────────

/// Progress notifications for a single upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// `sent` of `total` bytes handed to the transport.
    Progress { sent: u64, total: u64 },
    /// Body fully sent; the backend is signing.
    Processing,
    Signed(SignedFile),
    Failed(String),
}

/// Result of [`Files::sign`](client::Files::sign).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOutcome {
    pub file: SignedFile,
    /// History refreshed after the file settled.
    pub history: Vec<SignedFile>,
}

// ─── Scope ───────────────────────────────────────────────────────────────────

/// Whose files user-flow requests act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileScope {
    /// The authenticated user's own files.
    Own,
    /// An admin acting on behalf of a signing page.
    OnBehalfOf(PageId),
}

impl FileScope {
    /// Impersonation applies only to admins with a target page.
    pub fn resolve(role: Option<Role>, target: Option<PageId>) -> Self {
        match (role, target) {
            (Some(Role::Admin), Some(page)) => Self::OnBehalfOf(page),
            (Some(Role::Admin), None) | (Some(Role::User), _) | (None, _) => Self::Own,
        }
    }

    /// Query parameters every user-flow request carries.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Own => Vec::new(),
            Self::OnBehalfOf(page) => vec![("page_id", page.to_string())],
        }
    }

    pub fn upload_path(&self) -> &'static str {
        match self {
            Self::Own => USER_UPLOAD_PATH,
            Self::OnBehalfOf(_) => USER_UPLOAD_V1_PATH,
        }
    }
}

// ─── Polling ─────────────────────────────────────────────────────────────────

/// How the history endpoint is polled while a file is being signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_status_serde() {
        let s: FileStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(s, FileStatus::InProgress);
        assert_eq!(serde_json::to_string(&FileStatus::Signed).unwrap(), "\"signed\"");
    }

    #[test]
    fn test_file_status_terminal() {
        assert!(!FileStatus::Pending.is_terminal());
        assert!(!FileStatus::InProgress.is_terminal());
        assert!(FileStatus::Signed.is_terminal());
        assert!(FileStatus::Failed.is_terminal());
        assert!(FileStatus::Signed.is_downloadable());
        assert!(!FileStatus::Failed.is_downloadable());
    }

    #[test]
    fn test_scope_requires_admin_for_impersonation() {
        let page = Some(PageId::new(9));
        assert_eq!(
            FileScope::resolve(Some(Role::Admin), page),
            FileScope::OnBehalfOf(PageId::new(9))
        );
        assert_eq!(FileScope::resolve(Some(Role::User), page), FileScope::Own);
        assert_eq!(FileScope::resolve(None, page), FileScope::Own);
        assert_eq!(FileScope::resolve(Some(Role::Admin), None), FileScope::Own);
    }

    #[test]
    fn test_scope_paths_and_query() {
        let own = FileScope::Own;
        assert_eq!(own.upload_path(), "/api/user/files/upload");
        assert!(own.query().is_empty());

        let proxy = FileScope::OnBehalfOf(PageId::new(3));
        assert_eq!(proxy.upload_path(), "/api/v1/user/files/upload");
        assert_eq!(proxy.query(), vec![("page_id", "3".to_string())]);
    }
}
