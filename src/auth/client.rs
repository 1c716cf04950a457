//! Auth sub-client — login, session restore, role checks, logout.

use std::time::Duration;

use crate::auth::routing::{self, Area, Route};
use crate::auth::{Landing, LoginOutcome, TokenRequest, TokenResponse, UserProfile};
use crate::client::SigningClient;
use crate::error::{AuthError, HttpError, SdkError};
use crate::network::{PROFILE_PATH, TOKEN_PATH};
use crate::session::Session;

/// Profile fetch right after the credential exchange gives up after this long.
pub const PROFILE_TIMEOUT: Duration = Duration::from_secs(5);

/// Sub-client for authentication operations.
pub struct Auth<'a> {
    pub(crate) client: &'a SigningClient,
}

impl<'a> Auth<'a> {
    /// Exchange credentials for a token, fetch the profile, persist the session.
    ///
    /// Never returns an error: any failure yields [`LoginOutcome::Rejected`]
    /// with the backend message, and leaves no session persisted.
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        match self.authenticate(username, password).await {
            Ok(session) => {
                let landing = session.role.landing();
                tracing::info!(username = %session.username, role = %session.role, "Login succeeded");
                LoginOutcome::Authenticated { session, landing }
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "Login failed");
                self.forget().await;
                LoginOutcome::Rejected {
                    message: rejection_message(&e),
                }
            }
        }
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Session, SdkError> {
        let http = &self.client.http;

        let token: TokenResponse = http
            .post_form(TOKEN_PATH, &TokenRequest { username, password })
            .await?;

        let profile: UserProfile = http
            .get_with_token(PROFILE_PATH, &token.access_token, Some(PROFILE_TIMEOUT))
            .await?;

        let session = Session {
            user_id: profile.id,
            username: profile.username,
            role: profile.role,
            token: token.access_token,
        };

        http.session().save(&session)?;
        *self.client.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Restore a persisted session into the client's cached state.
    pub async fn restore(&self) -> Result<Option<Session>, SdkError> {
        let session = self.client.http.session().load()?;
        *self.client.session.write().await = session.clone();
        Ok(session)
    }

    /// The cached session, if any.
    pub async fn current_session(&self) -> Option<Session> {
        self.client.session.read().await.clone()
    }

    /// Whether the cached session holds the admin role.
    pub async fn is_admin(&self) -> bool {
        self.client
            .session
            .read()
            .await
            .as_ref()
            .map(Session::is_admin)
            .unwrap_or(false)
    }

    /// The cached session, required to be an admin.
    pub async fn require_admin(&self) -> Result<Session, SdkError> {
        match self.current_session().await {
            Some(session) if session.is_admin() => Ok(session),
            Some(_) => Err(AuthError::AdminRequired.into()),
            None => Err(AuthError::NotAuthenticated.into()),
        }
    }

    /// Routing decision for a page area under the cached session.
    pub async fn guard(&self, area: Area) -> Route {
        routing::guard(self.client.session.read().await.as_ref(), area)
    }

    /// Clear the persisted and cached session; returns the entry page.
    pub async fn logout(&self) -> Landing {
        self.forget().await;
        tracing::info!("Logged out");
        Landing::Entry
    }

    /// Route a failed API call: an unauthorized response ends the session
    /// and sends the operator back to the entry page.
    pub async fn handle_failure(&self, error: &SdkError) -> Option<Landing> {
        if error.is_unauthorized() {
            tracing::info!("Stored token rejected, returning to login");
            Some(self.logout().await)
        } else {
            None
        }
    }

    async fn forget(&self) {
        if let Err(e) = self.client.http.session().clear() {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
        *self.client.session.write().await = None;
    }
}

fn rejection_message(error: &SdkError) -> String {
    match error {
        SdkError::Http(HttpError::Api { message, .. })
        | SdkError::Http(HttpError::Unauthorized { message }) => message.clone(),
        SdkError::Http(e @ HttpError::Timeout) => e.to_string(),
        SdkError::Http(e) => e.user_message(),
        _ => "Authentication failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;

    #[test]
    fn test_rejection_message_prefers_detail() {
        let err: SdkError = HttpError::Unauthorized {
            message: "Incorrect username or password".to_string(),
        }
        .into();
        assert_eq!(rejection_message(&err), "Incorrect username or password");
    }

    #[test]
    fn test_rejection_message_timeout() {
        let err: SdkError = HttpError::Timeout.into();
        assert_eq!(rejection_message(&err), "Request timeout");
    }

    #[test]
    fn test_rejection_message_non_http() {
        let err: SdkError = SessionError::Unavailable("x".to_string()).into();
        assert_eq!(rejection_message(&err), "Authentication failed");
    }
}
