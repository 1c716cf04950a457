//! Low-level HTTP client — `SigningHttp`.
//!
//! Builds every request as `{base_url}{path}`, attaches the bearer token from
//! the session store, and maps non-2xx responses to [`HttpError`] carrying the
//! backend's `detail` message. One request, one attempt: there is no retry,
//! backoff, or default timeout.

use std::time::Duration;

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::HttpError;
use crate::session::SessionStore;

/// Where the `Authorization` header comes from.
#[derive(Debug, Clone, Copy)]
pub enum Bearer<'a> {
    /// Token currently held by the session store (if any).
    Stored,
    /// An explicit token, e.g. one just returned by the credential exchange.
    Token(&'a str),
    /// No `Authorization` header.
    Omit,
}

/// Raw binary response body plus the server-suggested file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryResponse {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Low-level HTTP client for the signing service REST API.
#[derive(Clone)]
pub struct SigningHttp {
    base_url: String,
    client: Client,
    session: SessionStore,
}

impl SigningHttp {
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self, HttpError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder().build()?,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ── JSON verbs ───────────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        let resp = self.dispatch(Method::GET, path, Bearer::Stored, |r| r).await?;
        parse_json(resp).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        let resp = self
            .dispatch(Method::POST, path, Bearer::Stored, |r| r.json(body))
            .await?;
        parse_json(resp).await
    }

    /// POST without a body (the count endpoints).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        let resp = self.dispatch(Method::POST, path, Bearer::Stored, |r| r).await?;
        parse_json(resp).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        let resp = self
            .dispatch(Method::PUT, path, Bearer::Stored, |r| r.json(body))
            .await?;
        parse_json(resp).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        let resp = self.dispatch(Method::DELETE, path, Bearer::Stored, |r| r).await?;
        parse_json(resp).await
    }

    // ── Special-purpose requests ─────────────────────────────────────────

    /// POST an `application/x-www-form-urlencoded` body without a bearer token.
    pub async fn post_form<T: DeserializeOwned, F: Serialize>(
        &self,
        path: &str,
        form: &F,
    ) -> Result<T, HttpError> {
        let body = serde_urlencoded::to_string(form)
            .map_err(|e| HttpError::InvalidRequest(e.to_string()))?;
        let resp = self
            .dispatch(Method::POST, path, Bearer::Omit, |r| {
                r.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(body)
            })
            .await?;
        parse_json(resp).await
    }

    /// GET with an explicit token and optional per-request timeout.
    pub async fn get_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        timeout: Option<Duration>,
    ) -> Result<T, HttpError> {
        let resp = self
            .dispatch(Method::GET, path, Bearer::Token(token), |r| {
                with_timeout(r, timeout)
            })
            .await?;
        parse_json(resp).await
    }

    /// GET a binary body (authenticated download).
    pub async fn get_bytes(&self, path: &str) -> Result<BinaryResponse, HttpError> {
        let resp = self.dispatch(Method::GET, path, Bearer::Stored, |r| r).await?;
        let file_name = resp
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(content_disposition_filename);
        let bytes = resp.bytes().await.map_err(transport_error)?.to_vec();
        Ok(BinaryResponse { file_name, bytes })
    }

    /// POST a multipart form (file upload).
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, HttpError> {
        let resp = self
            .dispatch(Method::POST, path, Bearer::Stored, |r| r.multipart(form))
            .await?;
        parse_json(resp).await
    }

    // ── Internal ─────────────────────────────────────────────────────────

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        bearer: Bearer<'_>,
        configure: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, HttpError> {
        let url = self.url(path);
        let mut req = self.client.request(method.clone(), &url);

        let token = match bearer {
            Bearer::Stored => match self.session.token() {
                Ok(token) => token,
                Err(e) => {
                    tracing::warn!(error = %e, "Session store unreadable, sending request without token");
                    None
                }
            },
            Bearer::Token(token) => Some(token.to_string()),
            Bearer::Omit => None,
        };
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }

        tracing::debug!(method = %method, url = %url, "Dispatching API request");
        let resp = configure(req).send().await.map_err(transport_error)?;
        let status = resp.status().as_u16();
        tracing::debug!(method = %method, url = %url, status, "API response");

        if resp.status().is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        match status {
            401 => Err(HttpError::Unauthorized { message }),
            _ => Err(HttpError::Api { status, message }),
        }
    }
}

impl std::fmt::Debug for SigningHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningHttp")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn with_timeout(req: RequestBuilder, timeout: Option<Duration>) -> RequestBuilder {
    match timeout {
        Some(t) => req.timeout(t),
        None => req,
    }
}

#[cfg(target_arch = "wasm32")]
fn with_timeout(req: RequestBuilder, _timeout: Option<Duration>) -> RequestBuilder {
    req
}

fn transport_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Network(e)
    }
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T, HttpError> {
    resp.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            HttpError::InvalidResponse(e.to_string())
        } else {
            transport_error(e)
        }
    })
}

/// Message for a non-2xx response.
///
/// The backend's `detail` when it is a string; validation error lists
/// (`[{ "msg": ... }]`) are joined; anything else falls back to a generic
/// status-coded message.
pub fn error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s,
        Some(serde_json::Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                generic_message(status)
            } else {
                msgs.join("; ")
            }
        }
        _ => generic_message(status),
    }
}

fn generic_message(status: u16) -> String {
    format!("API request failed with status {}", status)
}

/// Extracts `filename` from a `Content-Disposition` header value.
pub(crate) fn content_disposition_filename(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Appends URL-encoded query parameters to a path.
pub(crate) fn with_query(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{}{}{}", path, sep, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_uses_detail() {
        let msg = error_message(400, r#"{"detail":"Username already registered"}"#);
        assert_eq!(msg, "Username already registered");
    }

    #[test]
    fn test_error_message_generic_without_detail() {
        assert_eq!(
            error_message(500, "Internal Server Error"),
            "API request failed with status 500"
        );
        assert_eq!(
            error_message(404, r#"{"error":"nope"}"#),
            "API request failed with status 404"
        );
        assert_eq!(
            error_message(400, r#"{"detail":""}"#),
            "API request failed with status 400"
        );
    }

    #[test]
    fn test_error_message_joins_validation_list() {
        let body = r#"{"detail":[{"loc":["body","username"],"msg":"field required"},{"msg":"value is not a valid integer"}]}"#;
        assert_eq!(
            error_message(422, body),
            "field required; value is not a valid integer"
        );
    }

    #[test]
    fn test_content_disposition_filename() {
        assert_eq!(
            content_disposition_filename(r#"attachment; filename="signed_a.txt""#).as_deref(),
            Some("signed_a.txt")
        );
        assert_eq!(
            content_disposition_filename("attachment; FILENAME=b.bin").as_deref(),
            Some("b.bin")
        );
        assert_eq!(content_disposition_filename("inline"), None);
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("/a", &[]), "/a");
        assert_eq!(
            with_query("/a", &[("skip", "0".into()), ("q", "x y".into())]),
            "/a?skip=0&q=x%20y"
        );
        assert_eq!(with_query("/a?x=1", &[("page_id", "3".into())]), "/a?x=1&page_id=3");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let http = SigningHttp::new("http://host:8000/", SessionStore::in_memory()).unwrap();
        assert_eq!(http.url("/api/token"), "http://host:8000/api/token");
    }
}
