//! Admin domain — signing pages, their owner accounts, dashboard figures.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::shared::PageId;

pub use state::{PageDirectory, PageRows};

/// Prompt shown before a signing page is deleted.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this signing page?";

/// Activity label for a newly created page.
pub const PAGE_CREATED: &str = "Page Created";

const PASSWORD_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_-+=";
const PASSWORD_LEN: usize = 12;

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 6;

// ─── Pages ───────────────────────────────────────────────────────────────────

/// Lifecycle status of a signing page. A page without a status is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum PageStatus {
    #[default]
    Active,
    Suspended,
    Other(String),
}

impl PageStatus {
    pub fn from_wire(status: Option<&str>) -> Self {
        match status.map(str::trim) {
            None | Some("") | Some("active") => Self::Active,
            Some("suspended") => Self::Suspended,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Other(s) => s,
        }
    }

    /// Label for list views.
    pub fn label(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Suspended => "Suspended",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A signing page: a tenant's certificate credentials bound to an owner account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPage {
    pub id: PageId,
    /// Owner username, or the page URL for pages without one.
    pub title: String,
    pub page_url: String,
    pub owner_id: Option<i64>,
    pub owner_username: Option<String>,
    pub account_uri: Option<String>,
    pub account_name: Option<String>,
    pub certificate_name: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    /// Absent when the backend record carries no creation time.
    pub created_at: Option<DateTime<Utc>>,
    pub status: PageStatus,
}

impl SigningPage {
    /// Case-insensitive substring match on title or owner username.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .owner_username
                .as_deref()
                .is_some_and(|u| u.to_lowercase().contains(needle))
    }
}

// ─── Forms ───────────────────────────────────────────────────────────────────

/// Credentials for an account provisioned alongside a page.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
}

impl NewAccount {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn with_generated_password(username: impl Into<String>) -> Self {
        Self::new(username, generate_strong_password())
    }
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Input for creating a signing page.
///
/// Either `owner` (an account to provision first) or `owner_id` (an existing
/// user) must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSigningPage {
    pub title: String,
    pub owner: Option<NewAccount>,
    pub owner_id: Option<i64>,
    pub account_uri: String,
    pub account_name: String,
    pub certificate_name: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Edit form for an existing page, pre-filled from the backend record.
///
/// Secret fields start blank; left blank they are not sent, so the backend
/// keeps its stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageEditForm {
    pub page_url: String,
    /// Display only; page ownership is not changed through this form.
    pub owner_username: String,
    pub account_uri: String,
    pub account_name: String,
    pub certificate_name: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl From<&SigningPage> for PageEditForm {
    fn from(page: &SigningPage) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            page_url: page.page_url.clone(),
            owner_username: text(&page.owner_username),
            account_uri: text(&page.account_uri),
            account_name: text(&page.account_name),
            certificate_name: text(&page.certificate_name),
            tenant_id: text(&page.tenant_id),
            client_id: text(&page.client_id),
            client_secret: String::new(),
        }
    }
}

/// A user account created through the admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Asks the operator to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub pages: u64,
    pub signed_files: u64,
}

/// One row of the recent activity feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub action: &'static str,
    pub page_url: String,
    pub at: Option<DateTime<Utc>>,
}

impl From<&SigningPage> for ActivityEntry {
    fn from(page: &SigningPage) -> Self {
        Self {
            action: PAGE_CREATED,
            page_url: page.page_url.clone(),
            at: page.created_at,
        }
    }
}

// ─── Generators ──────────────────────────────────────────────────────────────

/// Random 12-character password drawn from letters, digits, and symbols.
pub fn generate_strong_password() -> String {
    generate_strong_password_with(&mut rand::thread_rng())
}

pub fn generate_strong_password_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    sample(rng, PASSWORD_CHARSET, PASSWORD_LEN)
}

/// Random 6-character `[a-z0-9]` suffix that keeps page URLs unique.
pub fn generate_url_suffix() -> String {
    generate_url_suffix_with(&mut rand::thread_rng())
}

pub fn generate_url_suffix_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    sample(rng, SUFFIX_CHARSET, SUFFIX_LEN)
}

fn sample<R: Rng + ?Sized>(rng: &mut R, charset: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}
