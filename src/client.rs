//! High-level client — `SigningClient` with nested sub-client accessors.
//!
//! Each flow has its own sub-client (`auth/client.rs`, `domain/<name>/client.rs`).
//! This module keeps the builder, the cached session, and accessor methods.

use crate::auth::client::Auth;
use crate::config::ClientConfig;
use crate::domain::admin::client::Admin;
use crate::domain::file::client::Files;
use crate::domain::file::{PollConfig, DEFAULT_MAX_UPLOAD_BYTES};
use crate::error::SdkError;
use crate::http::SigningHttp;
use crate::session::{MemoryStorage, Session, SessionStore, Storage};
use crate::shared::PageId;

use async_lock::RwLock;
use std::sync::Arc;

// Re-export sub-client types for convenience.
pub use crate::auth::client::Auth as AuthClient;
pub use crate::domain::admin::client::Admin as AdminClient;
pub use crate::domain::file::client::Files as FilesClient;

/// The primary entry point for the SDK.
///
/// Provides nested sub-client accessors for each flow:
/// `client.auth()`, `client.admin()`, `client.files()`.
pub struct SigningClient {
    pub(crate) http: SigningHttp,
    /// Application-level copy of the persisted session.
    pub(crate) session: Arc<RwLock<Option<Session>>>,
    /// Signing page an admin acts on behalf of in the user flow.
    pub(crate) impersonate: Option<PageId>,
    pub(crate) max_upload_bytes: u64,
    pub(crate) poll: PollConfig,
}

impl SigningClient {
    pub fn builder() -> SigningClientBuilder {
        SigningClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    pub fn admin(&self) -> Admin<'_> {
        Admin { client: self }
    }

    pub fn files(&self) -> Files<'_> {
        Files { client: self }
    }

    pub fn http(&self) -> &SigningHttp {
        &self.http
    }

    pub fn impersonating(&self) -> Option<PageId> {
        self.impersonate
    }
}

impl Clone for SigningClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            session: self.session.clone(),
            impersonate: self.impersonate,
            max_upload_bytes: self.max_upload_bytes,
            poll: self.poll,
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct SigningClientBuilder {
    base_url: String,
    storage: Option<Arc<dyn Storage>>,
    impersonate: Option<PageId>,
    max_upload_bytes: u64,
    poll: PollConfig,
}

impl Default for SigningClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            storage: None,
            impersonate: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            poll: PollConfig::default(),
        }
    }
}

impl SigningClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Where the session is persisted. Defaults to process memory.
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Act on behalf of a signing page in the user flow (admins only).
    pub fn impersonate(mut self, page: PageId) -> Self {
        self.impersonate = Some(page);
        self
    }

    pub fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Apply a [`ClientConfig`]. A configured session file selects file-backed
    /// storage on native builds.
    pub fn from_config(mut self, config: &ClientConfig) -> Self {
        self.base_url = config.api_url.clone();
        self.impersonate = config.impersonate_page;
        self.max_upload_bytes = config.max_upload_bytes;
        self.poll = config.poll();

        #[cfg(feature = "native")]
        if let Some(path) = &config.session_file {
            self.storage = Some(Arc::new(crate::session::FileStorage::new(path.clone())));
        }

        self
    }

    pub fn build(self) -> Result<SigningClient, SdkError> {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let store = SessionStore::new(storage);

        Ok(SigningClient {
            http: SigningHttp::new(&self.base_url, store)?,
            session: Arc::new(RwLock::new(None)),
            impersonate: self.impersonate,
            max_upload_bytes: self.max_upload_bytes,
            poll: self.poll,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::domain::file::FileScope;

    fn admin() -> Session {
        Session {
            user_id: Some(1),
            username: "root".to_string(),
            role: Role::Admin,
            token: "t".to_string(),
        }
    }

    #[test]
    fn test_builder_defaults() {
        let client = SigningClient::builder().build().unwrap();
        assert_eq!(client.http().base_url(), "http://localhost:8000");
        assert_eq!(client.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(client.poll, PollConfig::default());
        assert_eq!(client.impersonating(), None);
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            api_url: "https://sign.example.com/".to_string(),
            impersonate_page: Some(PageId::new(3)),
            max_upload_bytes: 1024,
            poll_attempts: 2,
            ..ClientConfig::default()
        };
        let client = SigningClient::builder().from_config(&config).build().unwrap();
        assert_eq!(client.http().base_url(), "https://sign.example.com");
        assert_eq!(client.impersonating(), Some(PageId::new(3)));
        assert_eq!(client.max_upload_bytes, 1024);
        assert_eq!(client.poll.max_attempts, 2);
    }

    #[test]
    fn test_clones_share_cached_session() {
        let client = SigningClient::builder()
            .impersonate(PageId::new(8))
            .build()
            .unwrap();
        let other = client.clone();

        assert_eq!(tokio_test::block_on(other.files().scope()), FileScope::Own);

        tokio_test::block_on(async {
            *client.session.write().await = Some(admin());
        });
        assert_eq!(
            tokio_test::block_on(other.files().scope()),
            FileScope::OnBehalfOf(PageId::new(8))
        );
        assert!(tokio_test::block_on(other.auth().is_admin()));
    }
}
