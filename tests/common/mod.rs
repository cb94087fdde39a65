//! In-process mock of the REST API.

#![allow(dead_code)]

use std::{
    rc::Rc,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::{self, Next},
    response::Response,
    Router,
};
use project_planner::{
    api::ApiClient,
    config::Config,
    session::Session,
    storage::MemoryStorage,
};
use serde_json::Value;
use tokio::net::TcpListener;

/// One request as the mock server saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Requests received by the mock server, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Seen>>>);

impl Recorder {
    pub fn all(&self) -> Vec<Seen> {
        self.0.lock().unwrap().clone()
    }

    pub fn matching(&self, method: &str, path: &str) -> Vec<Seen> {
        self.all()
            .into_iter()
            .filter(|seen| seen.method == method && seen.path == path)
            .collect()
    }

    fn push(&self, seen: Seen) {
        self.0.lock().unwrap().push(seen);
    }
}

async fn record(State(recorder): State<Recorder>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    recorder.push(Seen {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: authorization(&parts.headers),
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    });

    next.run(Request::from_parts(parts, axum::body::Body::from(bytes))).await
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Serves `routes` on a free local port, recording every request.
pub async fn serve(routes: Router) -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = routes.layer(middleware::from_fn_with_state(recorder.clone(), record));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), recorder)
}

pub struct Harness {
    pub api: ApiClient,
    pub session: Session,
    pub store: MemoryStorage,
    pub recorder: Recorder,
}

pub async fn harness(routes: Router) -> Harness {
    let (base, recorder) = serve(routes).await;
    let store = MemoryStorage::new();

    Harness {
        api: ApiClient::new(Config::new(base), Rc::new(store.clone())),
        session: Session::new(Rc::new(store.clone())),
        store,
        recorder,
    }
}

pub fn student_json() -> Value {
    serde_json::json!({
        "id": 4,
        "name": "Wanjiru",
        "email": "wanjiru@example.com",
        "role": "Student",
        "two_factor_enabled": false
    })
}
