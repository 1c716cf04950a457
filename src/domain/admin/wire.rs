//! Wire types for the admin REST endpoints.

use serde::{Deserialize, Serialize};

use crate::auth::Role;

/// Page record returned by `GET /api/admin/pages[/{id}]`, `POST` and `PUT`.
///
/// Legacy `azure_account_uri` / `azure_account_key` fields are not read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    pub page_url: String,
    #[serde(default)]
    pub account_uri: Option<String>,
    #[serde(default)]
    pub azure_account_name: Option<String>,
    #[serde(default)]
    pub azure_certificate_name: Option<String>,
    #[serde(default)]
    pub azure_tenant_id: Option<String>,
    #[serde(default)]
    pub azure_client_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `POST /api/admin/pages`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePageRequest {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub page_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_certificate_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_client_secret: Option<String>,
}

/// Body of `PUT /api/admin/pages/{id}`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_certificate_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_client_secret: Option<String>,
}

/// Body of `POST /api/admin/users`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserResponse {
    pub id: i64,
    #[serde(default)]
    pub message: Option<String>,
}

/// `{ "count": n }` from the count endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
