//! Admin sub-client — signing page CRUD, account provisioning, dashboard.

use crate::auth::Role;
use crate::client::SigningClient;
use crate::domain::admin::wire::{
    CountResponse, CreatePageRequest, CreateUserRequest, CreateUserResponse, MessageResponse,
    PageResponse, UpdatePageRequest,
};
use crate::domain::admin::{
    generate_url_suffix, ActivityEntry, Confirm, CreatedUser, DashboardStats, DeleteOutcome,
    NewSigningPage, PageDirectory, PageEditForm, SigningPage, DELETE_PROMPT,
};
use crate::error::{HttpError, SdkError};
use crate::http::client::with_query;
use crate::network::{
    ADMIN_PAGES_COUNT_PATH, ADMIN_PAGES_PATH, ADMIN_SIGNED_FILES_COUNT_PATH, ADMIN_USERS_PATH,
};
use crate::shared::PageId;

/// Default page size for the page list.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Entries shown in the recent activity feed.
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 5;

/// Sub-client for admin operations.
pub struct Admin<'a> {
    pub(crate) client: &'a SigningClient,
}

impl<'a> Admin<'a> {
    // ── Pages ────────────────────────────────────────────────────────────

    pub async fn list_pages(&self, skip: u32, limit: u32) -> Result<Vec<SigningPage>, SdkError> {
        let path = with_query(
            ADMIN_PAGES_PATH,
            &[("skip", skip.to_string()), ("limit", limit.to_string())],
        );
        let pages: Vec<PageResponse> = self.client.http.get(&path).await?;
        Ok(pages
            .into_iter()
            .map(SigningPage::try_from)
            .collect::<Result<Vec<_>, HttpError>>()?)
    }

    /// Re-fetch the page list into `directory`. On failure the directory keeps
    /// its previous contents.
    pub async fn refresh(&self, directory: &mut PageDirectory) -> Result<(), SdkError> {
        let pages = self.list_pages(0, DEFAULT_PAGE_LIMIT).await?;
        directory.replace(pages);
        Ok(())
    }

    pub async fn get_page(&self, id: PageId) -> Result<SigningPage, SdkError> {
        let page: PageResponse = self.client.http.get(&page_path(id)).await?;
        Ok(SigningPage::try_from(page)?)
    }

    /// Edit form pre-filled from the stored page, secrets blank.
    pub async fn edit_form(&self, id: PageId) -> Result<PageEditForm, SdkError> {
        let page = self.get_page(id).await?;
        Ok(PageEditForm::from(&page))
    }

    /// Create a signing page, provisioning its owner account first when the
    /// form carries one.
    pub async fn create_page(&self, form: &NewSigningPage) -> Result<SigningPage, SdkError> {
        if form.title.trim().is_empty() {
            return Err(SdkError::Validation("Page title is required".to_string()));
        }

        let user_id = match &form.owner {
            Some(owner) => {
                self.create_user(&owner.username, &owner.password, Role::User)
                    .await?
                    .id
            }
            None => form.owner_id.ok_or_else(|| {
                SdkError::Validation("A page owner account is required".to_string())
            })?,
        };

        let body = CreatePageRequest::from_form(form, user_id, &generate_url_suffix());
        let page: PageResponse = self.client.http.post(ADMIN_PAGES_PATH, &body).await?;
        let page = SigningPage::try_from(page)?;

        tracing::info!(id = %page.id, page_url = %page.page_url, user_id, "Signing page created");
        Ok(page)
    }

    /// Save an edited page. Blank fields, including the client secret, are
    /// left out so the backend keeps what it has.
    pub async fn update_page(
        &self,
        id: PageId,
        form: &PageEditForm,
    ) -> Result<SigningPage, SdkError> {
        let body = UpdatePageRequest::from(form);
        let page: PageResponse = self.client.http.put(&page_path(id), &body).await?;
        tracing::info!(%id, "Signing page updated");
        Ok(SigningPage::try_from(page)?)
    }

    /// Delete a page after `confirm` accepts [`DELETE_PROMPT`]. Declining
    /// sends nothing.
    pub async fn delete_page(
        &self,
        id: PageId,
        confirm: &impl Confirm,
    ) -> Result<DeleteOutcome, SdkError> {
        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(%id, "Page deletion cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let _: MessageResponse = self.client.http.delete(&page_path(id)).await?;
        tracing::info!(%id, "Signing page deleted");
        Ok(DeleteOutcome::Deleted)
    }

    // ── Accounts ─────────────────────────────────────────────────────────

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<CreatedUser, SdkError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(SdkError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let body = CreateUserRequest {
            username: username.trim(),
            password,
            role,
        };
        let resp: CreateUserResponse = self.client.http.post(ADMIN_USERS_PATH, &body).await?;
        tracing::info!(id = resp.id, username = body.username, %role, "User created");

        Ok(CreatedUser {
            id: resp.id,
            username: body.username.to_string(),
            role,
        })
    }

    // ── Dashboard ────────────────────────────────────────────────────────

    pub async fn pages_count(&self) -> Result<u64, SdkError> {
        let resp: CountResponse = self.client.http.post_empty(ADMIN_PAGES_COUNT_PATH).await?;
        Ok(resp.count)
    }

    pub async fn signed_files_count(&self) -> Result<u64, SdkError> {
        let resp: CountResponse = self
            .client
            .http
            .post_empty(ADMIN_SIGNED_FILES_COUNT_PATH)
            .await?;
        Ok(resp.count)
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, SdkError> {
        Ok(DashboardStats {
            pages: self.pages_count().await?,
            signed_files: self.signed_files_count().await?,
        })
    }

    /// The newest pages, rendered as "Page Created" entries.
    pub async fn recent_activity(&self, limit: u32) -> Result<Vec<ActivityEntry>, SdkError> {
        let pages = self.list_pages(0, limit).await?;
        Ok(pages.iter().map(ActivityEntry::from).collect())
    }
}

fn page_path(id: PageId) -> String {
    format!("{}/{}", ADMIN_PAGES_PATH, id)
}
