//! Network URL constants and API paths for the Code Signing Service.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Credential exchange (form-encoded).
pub const TOKEN_PATH: &str = "/api/token";

/// Authenticated user profile.
pub const PROFILE_PATH: &str = "/api/users/me";

pub const ADMIN_PAGES_PATH: &str = "/api/admin/pages";
pub const ADMIN_PAGES_COUNT_PATH: &str = "/api/admin/pages/count";
pub const ADMIN_USERS_PATH: &str = "/api/admin/users";
pub const ADMIN_SIGNED_FILES_COUNT_PATH: &str = "/api/admin/files_signed/count";

pub const USER_UPLOAD_PATH: &str = "/api/user/files/upload";
/// Versioned upload endpoint used when acting on behalf of a page.
pub const USER_UPLOAD_V1_PATH: &str = "/api/v1/user/files/upload";
pub const USER_HISTORY_PATH: &str = "/api/user/files/history";
pub const USER_DOWNLOAD_PATH: &str = "/api/user/files/download";
