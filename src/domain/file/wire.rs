//! Wire types for user file endpoints.

use serde::{Deserialize, Serialize};

use super::FileStatus;

/// A file record from `POST /api/user/files/upload` or `GET /api/user/files/history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResponse {
    pub id: i64,
    pub file_name: String,
    pub status: FileStatus,
    pub uploaded_at: String,
    #[serde(default)]
    pub signed_at: Option<String>,
}
