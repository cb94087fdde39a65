use std::fmt;

use crate::{api::InvitationAction, session::SessionState};

/// Client-side routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    VerifyTwoFactor,
    Invitation { project_id: i64, action: InvitationAction },
    Dashboard,
    Project(i64),
    EditProject(i64),
    Admin,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::VerifyTwoFactor => "/verify-2fa".to_string(),
            Self::Invitation { project_id, action } => {
                format!("/invitations/{project_id}/{}", action.as_str())
            }
            Self::Dashboard => "/dashboard".to_string(),
            Self::Project(id) => format!("/projects/{id}"),
            Self::EditProject(id) => format!("/projects/{id}/edit"),
            Self::Admin => "/admin".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Loading,
    Redirect(Route),
    Render,
}

/// Decides whether a protected view may render for the current session.
pub fn guard(state: &SessionState, require_admin: bool) -> GuardDecision {
    match state {
        SessionState::Loading => GuardDecision::Loading,
        SessionState::Authenticated(user) if require_admin && !user.is_admin() => {
            GuardDecision::Redirect(Route::Dashboard)
        }
        SessionState::Authenticated(_) => GuardDecision::Render,
        SessionState::Anonymous | SessionState::PendingTwoFactor { .. } => {
            GuardDecision::Redirect(Route::Login)
        }
    }
}

/// Where a freshly signed-in user lands.
pub fn landing_route(state: &SessionState) -> Route {
    match state {
        SessionState::Authenticated(user) if user.is_admin() => Route::Admin,
        SessionState::Authenticated(_) => Route::Dashboard,
        _ => Route::Login,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Role, User};

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated(User {
            id: 1,
            name: "John Doe".into(),
            email: String::new(),
            role,
            two_factor_enabled: false,
        })
    }

    #[test]
    fn loading_renders_nothing_yet() {
        assert_eq!(guard(&SessionState::Loading, false), GuardDecision::Loading);
        assert_eq!(guard(&SessionState::Loading, true), GuardDecision::Loading);
    }

    #[test]
    fn anonymous_goes_to_login() {
        assert_eq!(guard(&SessionState::Anonymous, false), GuardDecision::Redirect(Route::Login));

        let pending = SessionState::PendingTwoFactor { user_id: 1, email: "x@y.z".into() };
        assert_eq!(guard(&pending, false), GuardDecision::Redirect(Route::Login));
    }

    #[test]
    fn authenticated_renders() {
        assert_eq!(guard(&signed_in(Role::Student), false), GuardDecision::Render);
        assert_eq!(guard(&signed_in(Role::Admin), true), GuardDecision::Render);
    }

    #[test]
    fn non_admin_is_sent_to_dashboard() {
        assert_eq!(
            guard(&signed_in(Role::Student), true),
            GuardDecision::Redirect(Route::Dashboard)
        );
        assert_eq!(
            guard(&signed_in(Role::Unknown), true),
            GuardDecision::Redirect(Route::Dashboard)
        );
    }

    #[test]
    fn paths() {
        assert_eq!(Route::EditProject(5).path(), "/projects/5/edit");
        assert_eq!(
            Route::Invitation { project_id: 3, action: InvitationAction::Decline }.to_string(),
            "/invitations/3/decline"
        );
        assert_eq!(landing_route(&signed_in(Role::Admin)), Route::Admin);
        assert_eq!(landing_route(&signed_in(Role::Student)), Route::Dashboard);
    }
}
