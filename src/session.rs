//! Session lifecycle and the two-factor login flow.
//!
//! The persisted store is the single source of truth: `token` + `user` mean
//! signed in, the `pending_2fa_*` markers mean a code is outstanding. The
//! view layer mirrors [`SessionState`] into a signal after every operation.

use crate::{
    api::{ApiClient, ApiErr, ApiResult, Credentials, Registration, User},
    guard::Route,
    storage::{self, SharedStore},
};

pub const SESSION_EXPIRED: &str = "Session expired. Please login again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Not yet hydrated from storage.
    Loading,
    Anonymous,
    PendingTwoFactor { user_id: i64, email: String },
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    pub fn is_student(&self) -> bool {
        self.user()
            .is_some_and(|user| user.role == crate::api::Role::Student)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    SignedIn(User),
    RequiresTwoFactor { user_id: i64 },
}

#[derive(Clone)]
pub struct Session {
    store: SharedStore,
}

impl Session {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Reads the persisted session at startup, discarding a user record that
    /// cannot be parsed.
    pub fn hydrate(&self) -> SessionState {
        let token = self.store.get(storage::TOKEN_KEY);
        let user = self.store.get(storage::USER_KEY);

        if let (Some(_), Some(raw)) = (&token, &user) {
            if raw != "undefined" {
                match serde_json::from_str::<User>(raw) {
                    Ok(user) => return SessionState::Authenticated(user),
                    Err(e) => {
                        leptos::logging::error!("Error parsing stored user: {e}");
                        storage::clear_credentials(self.store.as_ref());
                    }
                }
            }
        }

        self.current()
    }

    /// The state implied by what is in the store right now.
    pub fn current(&self) -> SessionState {
        if self.store.get(storage::TOKEN_KEY).is_some() {
            if let Some(user) = self
                .store
                .get(storage::USER_KEY)
                .and_then(|raw| serde_json::from_str::<User>(&raw).ok())
            {
                return SessionState::Authenticated(user);
            }
        }

        match self.pending_user_id() {
            Some(user_id) => SessionState::PendingTwoFactor {
                user_id,
                email: self.store.get(storage::PENDING_EMAIL_KEY).unwrap_or_default(),
            },
            None => SessionState::Anonymous,
        }
    }

    pub async fn login(&self, api: &ApiClient, credentials: &Credentials) -> ApiResult<LoginOutcome> {
        let response = api.login(credentials).await?;

        if response.two_factor_enabled {
            let user_id = response.user_id.ok_or_else(|| {
                ApiErr::Decode("two-factor login response is missing user_id".to_string())
            })?;

            // The password is kept so the code can be re-sent by logging in
            // again; it is dropped once the code is verified.
            self.store.set(storage::PENDING_USER_ID_KEY, &user_id.to_string());
            self.store.set(storage::PENDING_EMAIL_KEY, &credentials.email);
            self.store.set(storage::PENDING_PASSWORD_KEY, &credentials.password);

            return Ok(LoginOutcome::RequiresTwoFactor { user_id });
        }

        match (response.token, response.user) {
            (Some(token), Some(user)) => {
                self.persist(&token, &user)?;
                storage::clear_pending_two_factor(self.store.as_ref());
                Ok(LoginOutcome::SignedIn(user))
            }
            _ => Err(ApiErr::Decode(
                "login response is missing token or user".to_string(),
            )),
        }
    }

    pub async fn verify_2fa(&self, api: &ApiClient, code: &str) -> ApiResult<User> {
        let user_id = self
            .pending_user_id()
            .ok_or_else(|| ApiErr::Validation(SESSION_EXPIRED.to_string()))?;

        let response = api.verify_2fa(user_id, code).await?;

        self.persist(&response.token, &response.user)?;
        storage::clear_pending_two_factor(self.store.as_ref());

        Ok(response.user)
    }

    /// Asks the server for a fresh code by repeating the original login.
    pub async fn resend_code(&self, api: &ApiClient) -> ApiResult<()> {
        let expired = || ApiErr::Validation(SESSION_EXPIRED.to_string());

        self.pending_user_id().ok_or_else(expired)?;
        let email = self.store.get(storage::PENDING_EMAIL_KEY).ok_or_else(expired)?;
        let password = self
            .store
            .get(storage::PENDING_PASSWORD_KEY)
            .ok_or_else(expired)?;

        api.login(&Credentials { email, password }).await?;

        Ok(())
    }

    /// Returns the server's confirmation message.
    pub async fn register(&self, api: &ApiClient, registration: &Registration) -> ApiResult<Option<String>> {
        Ok(api.register(registration).await?.message)
    }

    pub fn logout(&self) -> Route {
        storage::clear_credentials(self.store.as_ref());
        storage::clear_pending_two_factor(self.store.as_ref());
        Route::Login
    }

    /// Records a two-factor toggle on the stored user.
    pub fn set_two_factor_enabled(&self, enabled: bool) -> Option<User> {
        let SessionState::Authenticated(mut user) = self.current() else {
            return None;
        };

        user.two_factor_enabled = enabled;
        let raw = serde_json::to_string(&user).ok()?;
        self.store.set(storage::USER_KEY, &raw);

        Some(user)
    }

    /// The one place an expired session is turned into navigation.
    pub fn handle_api_error(&self, err: &ApiErr) -> Option<Route> {
        if err.is_unauthorized() {
            storage::clear_credentials(self.store.as_ref());
            Some(Route::Login)
        } else {
            None
        }
    }

    fn persist(&self, token: &str, user: &User) -> ApiResult<()> {
        let raw = serde_json::to_string(user).map_err(|e| ApiErr::Decode(e.to_string()))?;

        self.store.set(storage::TOKEN_KEY, token);
        self.store.set(storage::USER_KEY, &raw);

        Ok(())
    }

    fn pending_user_id(&self) -> Option<i64> {
        self.store
            .get(storage::PENDING_USER_ID_KEY)?
            .parse()
            .ok()
    }
}

/// Keeps only digits, at most six of them.
pub fn sanitize_code(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).take(6).collect()
}

pub fn code_is_complete(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

/// Seconds before the first resend is allowed.
pub const INITIAL_RESEND_DELAY: u32 = 10;
/// Seconds before another resend is allowed after one was sent.
pub const RESEND_COOLDOWN: u32 = 60;

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{api::Role, storage::{KeyValueStore, MemoryStorage}};

    fn session() -> (Session, MemoryStorage) {
        let store = MemoryStorage::new();
        (Session::new(Rc::new(store.clone())), store)
    }

    fn student() -> User {
        User {
            id: 4,
            name: "Wanjiru".into(),
            email: "wanjiru@example.com".into(),
            role: Role::Student,
            two_factor_enabled: false,
        }
    }

    #[test]
    fn hydrate_without_anything_is_anonymous() {
        let (session, _) = session();
        assert_eq!(session.hydrate(), SessionState::Anonymous);
    }

    #[test]
    fn hydrate_restores_user() {
        let (session, store) = session();
        store.set(storage::TOKEN_KEY, "t");
        store.set(storage::USER_KEY, &serde_json::to_string(&student()).unwrap());

        assert_eq!(session.hydrate(), SessionState::Authenticated(student()));
    }

    #[test]
    fn hydrate_clears_corrupt_user() {
        let (session, store) = session();
        store.set(storage::TOKEN_KEY, "t");
        store.set(storage::USER_KEY, "{not json");

        assert_eq!(session.hydrate(), SessionState::Anonymous);
        assert_eq!(store.get(storage::TOKEN_KEY), None);
        assert_eq!(store.get(storage::USER_KEY), None);
    }

    #[test]
    fn literal_undefined_user_is_ignored() {
        let (session, store) = session();
        store.set(storage::TOKEN_KEY, "t");
        store.set(storage::USER_KEY, "undefined");

        assert_eq!(session.hydrate(), SessionState::Anonymous);
    }

    #[test]
    fn pending_markers_mean_pending_two_factor() {
        let (session, store) = session();
        store.set(storage::PENDING_USER_ID_KEY, "12");
        store.set(storage::PENDING_EMAIL_KEY, "a@b.co");

        assert_eq!(
            session.current(),
            SessionState::PendingTwoFactor { user_id: 12, email: "a@b.co".into() }
        );
    }

    #[test]
    fn logout_clears_everything() {
        let (session, store) = session();
        store.set(storage::TOKEN_KEY, "t");
        store.set(storage::USER_KEY, "{}");
        store.set(storage::PENDING_PASSWORD_KEY, "hunter2");

        assert_eq!(session.logout(), Route::Login);
        assert!(store.is_empty());
    }

    #[test]
    fn unauthorized_redirects_to_login() {
        let (session, store) = session();
        store.set(storage::TOKEN_KEY, "t");

        assert_eq!(session.handle_api_error(&ApiErr::Unauthorized), Some(Route::Login));
        assert_eq!(store.get(storage::TOKEN_KEY), None);

        let other = ApiErr::Server { status: 500, message: None };
        assert_eq!(session.handle_api_error(&other), None);
    }

    #[test]
    fn two_factor_toggle_updates_stored_user() {
        let (session, store) = session();
        store.set(storage::TOKEN_KEY, "t");
        store.set(storage::USER_KEY, &serde_json::to_string(&student()).unwrap());

        let user = session.set_two_factor_enabled(true).unwrap();
        assert!(user.two_factor_enabled);
        assert_eq!(session.current().user().map(|u| u.two_factor_enabled), Some(true));
    }

    #[test]
    fn code_sanitizing() {
        assert_eq!(sanitize_code("12a3 4-5678"), "123456");
        assert!(code_is_complete("123456"));
        assert!(!code_is_complete("12345"));
    }
}
