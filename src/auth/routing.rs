//! Role-gated routing and region visibility.

use super::{Landing, Role};
use crate::session::Session;

/// Page areas with distinct access rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// Login / entry page.
    Entry,
    /// Upload and history pages.
    UserPages,
    /// Signing-page management and dashboard.
    AdminPages,
}

/// Routing decision for a page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Allow,
    Redirect(Landing),
}

/// Decide whether the current session may view `area`.
///
/// - Entry: guests stay; an existing session is sent to its role landing.
/// - User pages: any session.
/// - Admin pages: admin role only; everyone else goes back to the entry page.
pub fn guard(session: Option<&Session>, area: Area) -> Route {
    match (area, session.map(|s| s.role)) {
        (Area::Entry, None) => Route::Allow,
        (Area::Entry, Some(role)) => Route::Redirect(role.landing()),
        (Area::UserPages, Some(Role::User | Role::Admin)) => Route::Allow,
        (Area::AdminPages, Some(Role::Admin)) => Route::Allow,
        (Area::UserPages | Area::AdminPages, _) => Route::Redirect(Landing::Entry),
    }
}

/// Visibility of the login-required / guest-only / admin-only regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub login_required: bool,
    pub guest_only: bool,
    pub admin_only: bool,
}

impl Regions {
    pub fn for_session(session: Option<&Session>) -> Self {
        match session.map(|s| s.role) {
            None => Self {
                login_required: false,
                guest_only: true,
                admin_only: false,
            },
            Some(role) => Self {
                login_required: true,
                guest_only: false,
                admin_only: role.is_admin(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session {
            user_id: Some(5),
            username: "u".to_string(),
            role,
            token: "t".to_string(),
        }
    }

    #[test]
    fn test_guest_routes() {
        assert_eq!(guard(None, Area::Entry), Route::Allow);
        assert_eq!(guard(None, Area::UserPages), Route::Redirect(Landing::Entry));
        assert_eq!(guard(None, Area::AdminPages), Route::Redirect(Landing::Entry));
    }

    #[test]
    fn test_user_routes() {
        let s = session(Role::User);
        assert_eq!(guard(Some(&s), Area::Entry), Route::Redirect(Landing::User));
        assert_eq!(guard(Some(&s), Area::UserPages), Route::Allow);
        assert_eq!(guard(Some(&s), Area::AdminPages), Route::Redirect(Landing::Entry));
    }

    #[test]
    fn test_admin_routes() {
        let s = session(Role::Admin);
        assert_eq!(guard(Some(&s), Area::Entry), Route::Redirect(Landing::Admin));
        assert_eq!(guard(Some(&s), Area::UserPages), Route::Allow);
        assert_eq!(guard(Some(&s), Area::AdminPages), Route::Allow);
    }

    #[test]
    fn test_regions() {
        let guest = Regions::for_session(None);
        assert!(guest.guest_only && !guest.login_required && !guest.admin_only);

        let user = Regions::for_session(Some(&session(Role::User)));
        assert!(user.login_required && !user.guest_only && !user.admin_only);

        let admin = Regions::for_session(Some(&session(Role::Admin)));
        assert!(admin.login_required && admin.admin_only);
    }
}
