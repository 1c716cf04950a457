//! # Code Signing SDK
//!
//! A Rust client for the Code Signing Service REST API, for native and WASM
//! targets: session persistence, authentication, signing-page administration,
//! and the file upload/sign/download flow.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Newtypes, domain models, wire types, configuration (always available, WASM-safe)
//! 2. **Session + Auth** — Token/user persistence over pluggable storage, login, role routing
//! 3. **HTTP API** — `SigningHttp`, one attempt per request, backend `detail` messages
//! 4. **High-Level Client** — `SigningClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use codesign_sdk::prelude::*;
//!
//! let client = SigningClient::builder()
//!     .base_url("http://localhost:8000")
//!     .build()?;
//!
//! match client.auth().login("alice", "secret").await {
//!     LoginOutcome::Authenticated { landing, .. } => println!("go to {}", landing.path()),
//!     LoginOutcome::Rejected { message } => eprintln!("{}", message),
//! }
//!
//! let history = client.files().history(0, 100).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and formatting helpers.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants and API paths.
pub mod network;

/// Client configuration.
pub mod config;

// ── Layer 2: Session + Auth ──────────────────────────────────────────────────

/// Session persistence: token and current-user record.
pub mod session;

/// Authentication: login, profile, roles, routing.
pub mod auth;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client for the REST API.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `SigningClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{format_date, format_file_size, FileId, PageId};

    // Domain types — admin
    pub use crate::domain::admin::{
        generate_strong_password, ActivityEntry, Confirm, CreatedUser, DashboardStats,
        DeleteOutcome, NewAccount, NewSigningPage, PageDirectory, PageEditForm, PageRows,
        PageStatus, SigningPage,
    };

    // Domain types — files
    pub use crate::domain::file::{
        Download, FileScope, FileStatus, PollConfig, SelectedFile, SignOutcome, SignedFile,
        UploadEvent, UploadState, UploadTracker,
    };

    // Errors
    pub use crate::error::{AuthError, HttpError, SdkError, SessionError};

    // Network + config
    pub use crate::config::ClientConfig;
    pub use crate::network::DEFAULT_API_URL;

    // Session + auth
    pub use crate::auth::routing::{Area, Regions, Route};
    pub use crate::auth::{Landing, LoginOutcome, Role, UserProfile};
    pub use crate::session::{MemoryStorage, Session, SessionStore, Storage};

    #[cfg(feature = "native")]
    pub use crate::session::FileStorage;

    #[cfg(feature = "wasm")]
    pub use crate::session::WebStorage;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        AdminClient, AuthClient, FilesClient, SigningClient, SigningClientBuilder,
    };
}
