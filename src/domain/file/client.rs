//! Files sub-client — upload, signing status, history, download.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};

use crate::client::SigningClient;
use crate::domain::file::wire::FileResponse;
use crate::domain::file::{
    Download, FileScope, FileStatus, SelectedFile, SignOutcome, SignedFile, UploadEvent,
    NO_FILE_SELECTED,
};
use crate::error::{HttpError, SdkError};
use crate::http::client::with_query;
use crate::network::{USER_DOWNLOAD_PATH, USER_HISTORY_PATH};
use crate::shared::{format_file_size, FileId};

type EventSink = Arc<dyn Fn(UploadEvent) + Send + Sync>;

/// Sub-client for the user file flow.
pub struct Files<'a> {
    pub(crate) client: &'a SigningClient,
}

impl<'a> Files<'a> {
    /// Whose files these requests act on under the cached session.
    pub async fn scope(&self) -> FileScope {
        let role = self.client.session.read().await.as_ref().map(|s| s.role);
        FileScope::resolve(role, self.client.impersonate)
    }

    /// Upload exactly one file for signing.
    ///
    /// `on_event` receives progress (`sent` never decreases), then
    /// [`UploadEvent::Processing`] once the body is sent, then a terminal
    /// event if the backend has already settled the file. Transport and
    /// HTTP failures are reported as [`UploadEvent::Failed`] as well as
    /// returned.
    pub async fn upload<F>(
        &self,
        selection: Option<SelectedFile>,
        on_event: F,
    ) -> Result<SignedFile, SdkError>
    where
        F: Fn(UploadEvent) + Send + Sync + 'static,
    {
        let file = self.validate(selection)?;
        let on_event: EventSink = Arc::new(on_event);
        let scope = self.scope().await;
        let path = with_query(scope.upload_path(), &scope.query());

        tracing::info!(
            file_name = %file.name,
            size = %format_file_size(file.size()),
            ?scope,
            "Uploading file for signing"
        );

        let form = Form::new().part("file", upload_part(file, on_event.clone())?);
        let response: FileResponse = match self.client.http.post_multipart(&path, form).await {
            Ok(resp) => resp,
            Err(e) => {
                on_event(UploadEvent::Failed(e.user_message()));
                return Err(e.into());
            }
        };

        let record = match SignedFile::try_from(response) {
            Ok(record) => record,
            Err(e) => {
                on_event(UploadEvent::Failed(e.user_message()));
                return Err(e.into());
            }
        };

        emit_settled(&on_event, &record);
        Ok(record)
    }

    /// Upload, wait for the backend to settle the file, then refresh history.
    pub async fn sign<F>(
        &self,
        selection: Option<SelectedFile>,
        on_event: F,
    ) -> Result<SignOutcome, SdkError>
    where
        F: Fn(UploadEvent) + Send + Sync + 'static,
    {
        let on_event: EventSink = Arc::new(on_event);
        let forward = on_event.clone();
        let uploaded = self.upload(selection, move |event| forward(event)).await?;

        let file = if uploaded.status.is_terminal() {
            uploaded
        } else {
            match self.wait_until_settled(uploaded.id).await {
                Ok(settled) => {
                    emit_settled(&on_event, &settled);
                    settled
                }
                Err(e) => {
                    on_event(UploadEvent::Failed(e.user_message()));
                    return Err(e);
                }
            }
        };

        let history = self.history(0, 100).await?;
        Ok(SignOutcome { file, history })
    }

    /// Poll history until `id` reaches a terminal status.
    pub async fn wait_until_settled(&self, id: FileId) -> Result<SignedFile, SdkError> {
        let poll = self.client.poll;
        for attempt in 1..=poll.max_attempts {
            futures_timer::Delay::new(poll.interval).await;

            let history = self.history(0, 100).await?;
            match history.into_iter().find(|f| f.id == id) {
                Some(file) if file.status.is_terminal() => return Ok(file),
                Some(file) => {
                    tracing::debug!(%id, attempt, status = %file.status, "File not settled yet");
                }
                None => {
                    tracing::debug!(%id, attempt, "File not in history yet");
                }
            }
        }

        Err(SdkError::Other(format!(
            "File {} was not signed after {} checks",
            id, poll.max_attempts
        )))
    }

    /// Prior submissions, newest first.
    pub async fn history(&self, skip: u32, limit: u32) -> Result<Vec<SignedFile>, SdkError> {
        let scope = self.scope().await;
        let mut params = vec![("skip", skip.to_string()), ("limit", limit.to_string())];
        params.extend(scope.query());
        let path = with_query(USER_HISTORY_PATH, &params);

        let files: Vec<FileResponse> = self.client.http.get(&path).await?;
        Ok(files
            .into_iter()
            .map(SignedFile::try_from)
            .collect::<Result<Vec<_>, HttpError>>()?)
    }

    /// Fetch the signed artifact as bytes (the download needs the bearer token).
    pub async fn download(&self, id: FileId) -> Result<Download, SdkError> {
        let scope = self.scope().await;
        let path = with_query(&format!("{}/{}", USER_DOWNLOAD_PATH, id), &scope.query());
        let resp = self.client.http.get_bytes(&path).await?;

        Ok(Download {
            file_name: resp.file_name.unwrap_or_else(|| format!("signed_{}", id)),
            bytes: resp.bytes,
        })
    }

    fn validate(&self, selection: Option<SelectedFile>) -> Result<SelectedFile, SdkError> {
        let file = selection.ok_or_else(|| SdkError::Validation(NO_FILE_SELECTED.to_string()))?;
        if file.size() > self.client.max_upload_bytes {
            return Err(SdkError::Validation(format!(
                "{} is {}, the limit is {}",
                file.name,
                format_file_size(file.size()),
                format_file_size(self.client.max_upload_bytes)
            )));
        }
        Ok(file)
    }
}

fn emit_settled(on_event: &EventSink, file: &SignedFile) {
    match file.status {
        FileStatus::Signed => on_event(UploadEvent::Signed(file.clone())),
        FileStatus::Failed => on_event(UploadEvent::Failed("File signing failed".to_string())),
        FileStatus::Pending | FileStatus::InProgress => {}
    }
}

/// Streamed body: progress follows chunks as the transport pulls them.
#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
fn upload_part(file: SelectedFile, on_event: EventSink) -> Result<Part, SdkError> {
    use crate::domain::file::progress::{progress_chunks, UPLOAD_CHUNK_SIZE};

    let total = file.size();
    let stream = progress_chunks(file.bytes, UPLOAD_CHUNK_SIZE, move |sent, total| {
        on_event(UploadEvent::Progress { sent, total });
        if sent == total {
            on_event(UploadEvent::Processing);
        }
    });
    let body = reqwest::Body::wrap_stream(stream);

    Part::stream_with_length(body, total)
        .file_name(file.name)
        .mime_str("application/octet-stream")
        .map_err(|e| SdkError::Http(e.into()))
}

/// Buffered body: the whole file is handed over at once.
#[cfg(not(all(feature = "native", not(target_arch = "wasm32"))))]
fn upload_part(file: SelectedFile, on_event: EventSink) -> Result<Part, SdkError> {
    let total = file.size();
    on_event(UploadEvent::Progress { sent: 0, total });
    on_event(UploadEvent::Progress { sent: total, total });
    on_event(UploadEvent::Processing);

    Part::bytes(file.bytes)
        .file_name(file.name)
        .mime_str("application/octet-stream")
        .map_err(|e| SdkError::Http(e.into()))
}
