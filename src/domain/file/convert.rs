//! Conversions from wire types to domain types for files.

use super::wire::FileResponse;
use super::SignedFile;
use crate::error::HttpError;
use crate::shared::serde_util::timestamp;
use crate::shared::FileId;

impl TryFrom<FileResponse> for SignedFile {
    type Error = HttpError;

    fn try_from(f: FileResponse) -> Result<Self, Self::Error> {
        let uploaded_at = timestamp::parse(&f.uploaded_at).ok_or_else(|| {
            HttpError::InvalidResponse(format!("invalid uploaded_at: {}", f.uploaded_at))
        })?;
        let signed_at = match f.signed_at.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(timestamp::parse(raw).ok_or_else(|| {
                HttpError::InvalidResponse(format!("invalid signed_at: {}", raw))
            })?),
        };

        Ok(Self {
            id: FileId::new(f.id),
            file_name: f.file_name,
            status: f.status,
            uploaded_at,
            signed_at,
        })
    }
}
