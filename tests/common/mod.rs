#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};

pub const TAG_LISTING: &str = "tests/fixtures/ocp-release-tags.json";
pub const SERVICE_ACCOUNT_PEM: &str = "tests/fixtures/service-account.pem";

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

/// A canned answer for requests with `method` whose path ends with `path_suffix`.
#[derive(Clone, Debug)]
pub struct Route {
    pub method: Method,
    pub path_suffix: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn new(method: Method, path_suffix: &str, status: u16, body: &str) -> Self {
        Self {
            method,
            path_suffix: path_suffix.to_string(),
            status,
            body: body.to_string(),
        }
    }
}

struct Shared {
    routes: Vec<Route>,
    fallback: (u16, String),
    requests: Mutex<Vec<Recorded>>,
}

/// Fake HTTP upstream recording every request it receives.
pub struct FakeServer {
    pub url: String,
    shared: Arc<Shared>,
}

impl FakeServer {
    /// Answers every request with `status` and `body`.
    pub async fn start(status: u16, body: &str) -> Self {
        Self::with_routes(vec![], status, body).await
    }

    /// Answers with the first matching route, or with `status` and `body` otherwise.
    pub async fn with_routes(routes: Vec<Route>, status: u16, body: &str) -> Self {
        let shared = Arc::new(Shared {
            routes,
            fallback: (status, body.to_string()),
            requests: Mutex::new(vec![]),
        });

        let app = Router::new().fallback(record).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let url = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock server failed");
        });

        Self { url, shared }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let path = uri.path().to_string();
    let (status, answer) = shared
        .routes
        .iter()
        .find(|route| route.method == method && path.ends_with(&route.path_suffix))
        .map(|route| (route.status, route.body.clone()))
        .unwrap_or_else(|| shared.fallback.clone());

    shared.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        answer,
    )
}
