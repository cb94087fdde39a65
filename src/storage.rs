//! Persistent key-value storage for the session.
//!
//! In the browser this is `window.localStorage`; tests and environments
//! without local storage use [`MemoryStorage`].

use std::{cell::RefCell, collections::HashMap, rc::Rc};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const PENDING_USER_ID_KEY: &str = "pending_2fa_user_id";
pub const PENDING_EMAIL_KEY: &str = "pending_2fa_email";
pub const PENDING_PASSWORD_KEY: &str = "pending_2fa_password";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

pub type SharedStore = Rc<dyn KeyValueStore>;

/// Removes the signed-in credentials, leaving any two-factor markers alone.
pub fn clear_credentials(store: &dyn KeyValueStore) {
    store.remove(TOKEN_KEY);
    store.remove(USER_KEY);
}

pub fn clear_pending_two_factor(store: &dyn KeyValueStore) {
    store.remove(PENDING_USER_ID_KEY);
    store.remove(PENDING_EMAIL_KEY);
    store.remove(PENDING_PASSWORD_KEY);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage(Rc<RefCell<HashMap<String, String>>>);

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.0.borrow_mut().remove(key);
    }
}

/// `window.localStorage`. Writes that the browser rejects (quota, private
/// mode) are dropped.
#[derive(Debug, Clone)]
pub struct BrowserStorage(web_sys::Storage);

impl BrowserStorage {
    pub fn open() -> Option<Self> {
        web_sys::window()?.local_storage().ok().flatten().map(Self)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if self.0.set_item(key, value).is_err() {
            leptos::logging::warn!("could not persist `{key}` to local storage");
        }
    }

    fn remove(&self, key: &str) {
        let _ = self.0.remove_item(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_credentials_keeps_pending_markers() {
        let store = MemoryStorage::new();
        store.set(TOKEN_KEY, "abc");
        store.set(USER_KEY, "{}");
        store.set(PENDING_USER_ID_KEY, "7");

        clear_credentials(&store);

        assert_eq!(store.get(TOKEN_KEY), None);
        assert_eq!(store.get(USER_KEY), None);
        assert_eq!(store.get(PENDING_USER_ID_KEY).as_deref(), Some("7"));

        clear_pending_two_factor(&store);
        assert!(store.is_empty());
    }

    #[test]
    fn clones_share_the_same_map() {
        let store = MemoryStorage::new();
        let other = store.clone();
        other.set(TOKEN_KEY, "t");
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("t"));
        assert_eq!(store.len(), 1);
    }
}
