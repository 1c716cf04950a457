//! Client configuration: serde defaults plus environment overrides.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::file::{PollConfig, DEFAULT_MAX_UPLOAD_BYTES};
use crate::error::SdkError;
use crate::network::DEFAULT_API_URL;
use crate::shared::PageId;

pub const ENV_API_URL: &str = "CODESIGN_API_URL";
pub const ENV_SESSION_FILE: &str = "CODESIGN_SESSION_FILE";
pub const ENV_PAGE_ID: &str = "CODESIGN_PAGE_ID";

/// Settings for building a [`SigningClient`](crate::client::SigningClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Where the session is persisted. `None` keeps it in memory.
    #[serde(default)]
    pub session_file: Option<PathBuf>,

    /// Signing page an admin acts on behalf of
    #[serde(default)]
    pub impersonate_page: Option<PageId>,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_poll_attempts() -> u32 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            session_file: None,
            impersonate_page: None,
            max_upload_bytes: default_max_upload_bytes(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_attempts: default_poll_attempts(),
        }
    }
}

impl ClientConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, SdkError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup` (usually the environment). Blank values
    /// are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, SdkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url.trim().to_string();
        }
        if let Some(path) = get(ENV_SESSION_FILE) {
            self.session_file = Some(PathBuf::from(path));
        }
        if let Some(raw) = get(ENV_PAGE_ID) {
            let page = raw.parse::<PageId>().map_err(|_| {
                SdkError::Validation(format!("{} is not a page id: {}", ENV_PAGE_ID, raw))
            })?;
            self.impersonate_page = Some(page);
        }
        Ok(self)
    }

    pub fn poll(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.poll_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.api_url, "http://localhost:8000");
        assert_eq!(cfg.max_upload_bytes, 100 * 1024 * 1024);
        assert_eq!(cfg.poll(), PollConfig::default());
        assert!(cfg.session_file.is_none());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let cfg = ClientConfig::from_json(r#"{"api_url":"https://sign.example.com","poll_attempts":3}"#)
            .unwrap();
        assert_eq!(cfg.api_url, "https://sign.example.com");
        assert_eq!(cfg.poll_attempts, 3);
        assert_eq!(cfg.poll_interval_ms, 1_000);
        assert_eq!(cfg.impersonate_page, None);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://api.example.com "),
            (ENV_SESSION_FILE, "/tmp/s.json"),
            (ENV_PAGE_ID, " 17 "),
        ]
        .into_iter()
        .collect();
        let cfg = ClientConfig::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(cfg.api_url, "https://api.example.com");
        assert_eq!(cfg.session_file, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(cfg.impersonate_page, Some(PageId::new(17)));
    }

    #[test]
    fn test_blank_override_ignored_and_bad_page_rejected() {
        let cfg = ClientConfig::default()
            .with_overrides(|k| (k == ENV_API_URL).then(|| "  ".to_string()))
            .unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);

        let err = ClientConfig::default()
            .with_overrides(|k| (k == ENV_PAGE_ID).then(|| "abc".to_string()))
            .unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }
}
