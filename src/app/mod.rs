mod admin;
mod auth_pages;
mod dashboard;
mod edit_project;
mod invitations;
mod kanban_board;
mod project_details;
mod project_modal;

use std::rc::Rc;

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

use crate::{
    api::{ApiClient, ApiErr, User},
    config::Config,
    guard::{guard, GuardDecision, Route as AppRoute},
    session::{Session, SessionState},
    storage::{BrowserStorage, MemoryStorage, SharedStore},
};

use self::{
    admin::AdminDashboard,
    auth_pages::{Login, SignUp, VerifyTwoFactor},
    dashboard::StudentDashboard,
    edit_project::EditProject,
    invitations::InvitationResponse,
    project_details::ProjectDetails,
};

/// Session and API access shared through the view tree.
#[derive(Clone, Copy)]
pub struct AuthContext {
    api: StoredValue<ApiClient>,
    session: StoredValue<Session>,
    pub state: RwSignal<SessionState>,
}

impl AuthContext {
    pub fn new(config: Config, store: SharedStore) -> Self {
        let session = Session::new(store.clone());

        Self {
            api: store_value(ApiClient::new(config, store)),
            session: store_value(session),
            state: create_rw_signal(SessionState::Loading),
        }
    }

    pub fn api(&self) -> ApiClient {
        self.api.get_value()
    }

    pub fn session(&self) -> Session {
        self.session.get_value()
    }

    pub fn hydrate(&self) {
        self.state.set(self.session.with_value(Session::hydrate));
    }

    /// Re-reads the session from storage after an operation changed it.
    pub fn refresh(&self) {
        self.state.set(self.session.with_value(Session::current));
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|state| state.user().cloned())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.state.with(|state| state.user().map(|user| user.id))
    }

    pub fn is_admin(&self) -> bool {
        self.state.with(SessionState::is_admin)
    }

    pub fn logout(&self) {
        self.session.with_value(Session::logout);
        self.state.set(SessionState::Anonymous);
    }

    /// Logs a failed call. An expired session is signed out here, which in
    /// turn sends the user to the login page.
    pub fn report(&self, context: &str, err: &ApiErr) {
        logging::error!("{context}: {err}");

        if self
            .session
            .with_value(|session| session.handle_api_error(err))
            .is_some()
        {
            self.state.set(SessionState::Anonymous);
        }
    }
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

pub(crate) fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or(false)
}

pub(crate) fn alert(message: &str) {
    let _ = window().alert_with_message(message);
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    let store: SharedStore = match BrowserStorage::open() {
        Some(storage) => Rc::new(storage),
        None => {
            logging::warn!("local storage unavailable, session will not survive a reload");
            Rc::new(MemoryStorage::new())
        }
    };

    let config = Config::from_env();
    provide_context(config.clone());

    let auth = AuthContext::new(config, store);
    provide_context(auth);
    auth.hydrate();

    view! {
        <Title text="Project Planner"/>

        <Router>
            <ExpiredSessionRedirect/>
            <main>
                <Routes>
                    <Route path="/login" view=Login/>
                    <Route path="/signup" view=SignUp/>
                    <Route path="/verify-2fa" view=VerifyTwoFactor/>
                    <Route path="/invitations/:project_id/:action" view=InvitationResponse/>
                    <Route path="/dashboard" view=|| view! {
                        <Protected>
                            <DashboardRouter/>
                        </Protected>
                    }/>
                    <Route path="/projects/:id" view=|| view! {
                        <Protected>
                            <ProjectDetails/>
                        </Protected>
                    }/>
                    <Route path="/projects/:id/edit" view=|| view! {
                        <Protected>
                            <EditProject/>
                        </Protected>
                    }/>
                    <Route path="/admin" view=|| view! {
                        <Protected require_admin=true>
                            <AdminDashboard/>
                        </Protected>
                    }/>
                    <Route path="/*any" view=|| view! { <Redirect path="/dashboard"/> }/>
                </Routes>
            </main>
        </Router>
    }
}

/// Gates its children on the current session.
#[component]
pub fn Protected(#[prop(optional)] require_admin: bool, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();

    move || match auth.state.with(|state| guard(state, require_admin)) {
        GuardDecision::Loading => view! { <div class="loading">"Loading..."</div> }.into_view(),
        GuardDecision::Redirect(route) => view! { <Redirect path=route.path()/> }.into_view(),
        GuardDecision::Render => children().into_view(),
    }
}

#[component]
fn DashboardRouter() -> impl IntoView {
    let auth = use_auth();

    move || {
        if auth.is_admin() {
            view! { <AdminDashboard/> }.into_view()
        } else {
            view! { <StudentDashboard/> }.into_view()
        }
    }
}

/// Sends the user to the login page whenever a signed-in session ends,
/// whichever page they are on.
#[component]
fn ExpiredSessionRedirect() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    create_effect(move |was_signed_in: Option<bool>| {
        let signed_in = auth.state.with(|state| state.user().is_some());

        if was_signed_in == Some(true) && !signed_in {
            navigate(&AppRoute::Login.path(), Default::default());
        }

        signed_in
    });
}

/// Header controls shared by both dashboards: two-factor toggle and logout.
#[component]
fn AccountControls() -> impl IntoView {
    let auth = use_auth();
    let enabled = create_rw_signal(auth.user().is_some_and(|user| user.two_factor_enabled));

    let toggle = move |_| {
        let Some(user) = auth.user() else {
            return;
        };

        spawn_local(async move {
            let api = auth.api();
            let turning_on = !enabled.get_untracked();

            let result = if turning_on {
                api.enable_2fa(user.id).await
            } else {
                api.disable_2fa(user.id).await
            };

            match result {
                Ok(_) => {
                    enabled.set(turning_on);
                    auth.session().set_two_factor_enabled(turning_on);
                    auth.refresh();
                    alert(if turning_on {
                        "2FA enabled! You will receive a verification code via email when logging in."
                    } else {
                        "2FA has been disabled successfully"
                    });
                }
                Err(e) => {
                    auth.report("Error toggling 2FA", &e);
                    alert("Failed to toggle 2FA. Please try again.");
                }
            }
        });
    };

    view! {
        <div class="account-controls">
            <button class="two-factor" class:enabled=move || enabled.get() on:click=toggle>
                {move || if enabled.get() { "2FA Enabled" } else { "Enable 2FA" }}
            </button>
            <button class="logout" on:click=move |_| auth.logout()>"Logout"</button>
        </div>
    }
}
