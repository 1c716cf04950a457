//! Conversions between admin wire types and domain types.

use super::wire::{CreatePageRequest, PageResponse, UpdatePageRequest};
use super::{NewSigningPage, PageEditForm, PageStatus, SigningPage};
use crate::error::HttpError;
use crate::shared::serde_util::timestamp;
use crate::shared::PageId;

impl TryFrom<PageResponse> for SigningPage {
    type Error = HttpError;

    fn try_from(p: PageResponse) -> Result<Self, Self::Error> {
        let created_at = match p.created_at.as_deref() {
            Some(raw) => Some(timestamp::parse(raw).ok_or_else(|| {
                HttpError::InvalidResponse(format!("invalid created_at: {}", raw))
            })?),
            None => None,
        };
        let owner_username = p.username.filter(|u| !u.is_empty());
        let title = owner_username.clone().unwrap_or_else(|| p.page_url.clone());

        Ok(Self {
            id: PageId::new(p.id),
            title,
            page_url: p.page_url,
            owner_id: p.user_id,
            owner_username,
            account_uri: p.account_uri,
            account_name: p.azure_account_name,
            certificate_name: p.azure_certificate_name,
            tenant_id: p.azure_tenant_id,
            client_id: p.azure_client_id,
            created_at,
            status: PageStatus::from_wire(p.status.as_deref()),
        })
    }
}

/// Trimmed value, `None` when blank.
fn present(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl CreatePageRequest {
    pub(crate) fn from_form(form: &NewSigningPage, user_id: i64, suffix: &str) -> Self {
        Self {
            user_id,
            username: form.owner.as_ref().and_then(|o| present(&o.username)),
            page_url: format!("{}-{}", form.title.trim(), suffix),
            account_uri: present(&form.account_uri),
            azure_account_name: present(&form.account_name),
            azure_certificate_name: present(&form.certificate_name),
            azure_tenant_id: present(&form.tenant_id),
            azure_client_id: present(&form.client_id),
            azure_client_secret: present(&form.client_secret),
        }
    }
}

impl From<&PageEditForm> for UpdatePageRequest {
    fn from(form: &PageEditForm) -> Self {
        Self {
            page_url: present(&form.page_url),
            account_uri: present(&form.account_uri),
            azure_account_name: present(&form.account_name),
            azure_certificate_name: present(&form.certificate_name),
            azure_tenant_id: present(&form.tenant_id),
            azure_client_id: present(&form.client_id),
            azure_client_secret: present(&form.client_secret),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::admin::NewAccount;

    fn response(json: &str) -> PageResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_page_title_is_owner_username() {
        let page = SigningPage::try_from(response(
            r#"{"id":3,"user_id":9,"username":"acme","page_url":"acme-ab12cd",
                "azure_account_name":"acme-signing","created_at":"2024-05-02T08:00:00",
                "status":"suspended"}"#,
        ))
        .unwrap();
        assert_eq!(page.id, PageId::new(3));
        assert_eq!(page.title, "acme");
        assert_eq!(page.owner_id, Some(9));
        assert_eq!(page.account_name.as_deref(), Some("acme-signing"));
        assert_eq!(page.status, PageStatus::Suspended);
    }

    #[test]
    fn test_page_without_owner_or_status() {
        let page = SigningPage::try_from(response(
            r#"{"id":1,"page_url":"legacy-page","created_at":"2024-05-02T08:00:00Z",
                "azure_account_uri":"https://old","azure_account_key":"k"}"#,
        ))
        .unwrap();
        assert_eq!(page.title, "legacy-page");
        assert_eq!(page.owner_username, None);
        assert_eq!(page.account_uri, None);
        assert_eq!(page.status, PageStatus::Active);
    }

    #[test]
    fn test_page_without_created_at_is_kept() {
        let page = SigningPage::try_from(response(r#"{"id":2,"page_url":"fresh-page"}"#)).unwrap();
        assert_eq!(page.page_url, "fresh-page");
        assert_eq!(page.created_at, None);

        let bad = response(r#"{"id":2,"page_url":"fresh-page","created_at":"soon"}"#);
        assert!(matches!(
            SigningPage::try_from(bad),
            Err(HttpError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_create_request_from_form() {
        let form = NewSigningPage {
            title: " acme ".to_string(),
            owner: Some(NewAccount::new("acme", "pw")),
            account_name: "acme-signing".to_string(),
            client_secret: "s3cret".to_string(),
            ..Default::default()
        };
        let req = CreatePageRequest::from_form(&form, 42, "x1y2z3");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["user_id"], 42);
        assert_eq!(body["username"], "acme");
        assert_eq!(body["page_url"], "acme-x1y2z3");
        assert_eq!(body["azure_account_name"], "acme-signing");
        assert_eq!(body["azure_client_secret"], "s3cret");
        assert!(body.get("azure_tenant_id").is_none());
        assert!(body.get("azure_account_key").is_none());
    }

    #[test]
    fn test_update_request_omits_blank_secret() {
        let form = PageEditForm {
            page_url: "acme-x1y2z3".to_string(),
            owner_username: "someone-else".to_string(),
            account_name: "renamed".to_string(),
            client_secret: "  ".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(UpdatePageRequest::from(&form)).unwrap();
        assert_eq!(body["azure_account_name"], "renamed");
        assert!(body.get("azure_client_secret").is_none());
        assert!(body.get("azure_tenant_id").is_none());
        assert!(body.get("username").is_none());
    }
}
