use std::rc::Rc;

use http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Method, StatusCode,
};
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::Config,
    storage::{self, SharedStore},
};

pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiErr {
    /// The server rejected the session. Stored credentials have already been
    /// dropped; the caller decides where to navigate.
    #[error("unauthorized")]
    Unauthorized,
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Server { status: u16, message: Option<String> },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("json parse error: {0}")]
    Decode(String),
    #[error("{0}")]
    Validation(String),
}

impl ApiErr {
    /// Text fit for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Validation(message) => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    /// Like [`ApiErr::user_message`], but with a caller-chosen fallback.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

pub type ApiResult<T> = Result<T, ApiErr>;

/// Single point of HTTP access to the REST API.
///
/// Every request is JSON and carries the stored bearer token when there is
/// one. Bodies are returned decoded, without an envelope.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: Rc<Config>,
    store: SharedStore,
}

impl ApiClient {
    pub fn new(config: Config, store: SharedStore) -> Self {
        Self {
            http: Client::new(),
            config: Rc::new(config),
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub(crate) fn url(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<Url> {
        let raw = self.config.endpoint(path);

        let url = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };

        url.map_err(|e| ApiErr::Transport(e.to_string()))
    }

    pub(crate) async fn request<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.store.get(storage::TOKEN_KEY) {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        if let Some(body) = body {
            let body = serde_json::to_string(body).map_err(|e| ApiErr::Decode(e.to_string()))?;
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            leptos::logging::error!("API Error: {method} {url}: {e}");
            ApiErr::Transport(e.to_string())
        })?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            storage::clear_credentials(self.store.as_ref());
            return Err(ApiErr::Unauthorized);
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiErr::Transport(e.to_string()))?;

        if !status.is_success() {
            let err = ApiErr::Server {
                status: status.as_u16(),
                message: server_message(&text),
            };
            leptos::logging::error!("API Error: {method} {url}: {err}");
            return Err(err);
        }

        decode(&text)
    }

    pub(crate) async fn get<T>(&self, path: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        self.get_with(path, &[]).await
    }

    pub(crate) async fn get_with<T>(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path, params)?;
        self.request::<(), T>(Method::GET, url, None).await
    }

    /// GET for list endpoints that may answer with something other than an
    /// array; those bodies read as an empty list. Malformed elements of a real
    /// array are still decode errors.
    pub(crate) async fn get_list<T>(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let body: serde_json::Value = self.get_with(path, params).await?;
        list_or_empty(body)
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        self.request(Method::POST, url, Some(body)).await
    }

    pub(crate) async fn post_empty<T>(&self, path: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        self.request::<(), T>(Method::POST, url, None).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        self.request(Method::PUT, url, Some(body)).await
    }

    pub(crate) async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        self.request(Method::PATCH, url, Some(body)).await
    }

    pub(crate) async fn delete<T>(&self, path: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        self.request::<(), T>(Method::DELETE, url, None).await
    }
}

/// Pulls `message` (or `error`) out of a JSON error body.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key)?.as_str())
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn list_or_empty<T: DeserializeOwned>(body: serde_json::Value) -> ApiResult<Vec<T>> {
    if !body.is_array() {
        return Ok(Vec::new());
    }

    serde_json::from_value(body).map_err(|e| ApiErr::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let body = if body.trim().is_empty() { "null" } else { body };

    serde_json::from_str(body).map_err(|e| ApiErr::Decode(e.to_string()))
}
