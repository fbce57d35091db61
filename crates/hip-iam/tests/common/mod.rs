//! Mock identity service for integration tests.
//!
//! Serves the token endpoint and the `/identity` API on a random local
//! port, records every request in arrival order and can be told to answer
//! specific calls with a canned status/body or after a delay.

#![allow(dead_code)]

use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use parking_lot::Mutex;
use serde_json::json;

use hip_iam::config::FileConfig;
use hip_iam::{Config, Orchestrator};

/// Token issued by the mock.
pub const TEST_TOKEN: &str = "test-token";

/// One request as received by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// HTTP method.
    pub method: Method,
    /// Request path, still percent-encoded.
    pub path: String,
    /// Raw query string.
    pub query: Option<String>,
    /// `Authorization` header value.
    pub authorization: Option<String>,
    /// Request body.
    pub body: String,
}

impl RecordedCall {
    /// `"METHOD /path"` form, for sequence assertions.
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

struct Override {
    method: Method,
    path: String,
    status: StatusCode,
    body: String,
}

struct Delay {
    method: Method,
    path: String,
    body_contains: String,
    delay: Duration,
}

#[derive(Default)]
struct MockState {
    calls: Mutex<Vec<RecordedCall>>,
    overrides: Mutex<Vec<Override>>,
    delays: Mutex<Vec<Delay>>,
    token_status: Mutex<Option<StatusCode>>,
}

/// Running mock identity service.
pub struct MockIdentityService {
    /// Base URL, e.g. `http://127.0.0.1:12345`.
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockIdentityService {
    /// Starts the mock on a random port.
    pub async fn start() -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("hip_iam=debug")
            .with_test_writer()
            .try_init();

        let state = Arc::new(MockState::default());
        let router = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("mock server error: {}", e);
            }
        });

        Ok(Self { base_url, state })
    }

    /// Configuration pointing both the token endpoint and the API at the
    /// mock.
    pub fn config(&self) -> Config {
        self.config_with_api(&self.base_url)
    }

    /// Configuration with the token endpoint on the mock and the API at
    /// `api_url`.
    pub fn config_with_api(&self, api_url: &str) -> Config {
        self.config_from(api_url, true)
    }

    /// Configuration with credentials and API only, no scenario users.
    pub fn config_without_users(&self) -> Config {
        self.config_from(&self.base_url, false)
    }

    fn config_from(&self, api_url: &str, with_users: bool) -> Config {
        let token_url = format!("{}/token", self.base_url);
        let api_url = api_url.to_string();
        Config::from_sources(FileConfig::default(), move |key| {
            if !with_users && matches!(key, "ADMIN" | "USER1" | "USER2") {
                return None;
            }
            let value = match key {
                "IAM_CLIENT_URL" => token_url.as_str(),
                "IAM_CLIENT_ID" => "hip",
                "IAM_CLIENT_SECRET" => "secret",
                "EBRAINS_API_URL" => api_url.as_str(),
                "ADMIN" => "alice",
                "USER1" => "bob",
                "USER2" => "carol",
                _ => return None,
            };
            Some(value.to_string())
        })
        .expect("mock configuration is complete")
    }

    /// Orchestrator wired to the mock.
    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(self.config()).expect("HTTP client builds")
    }

    /// Makes the token endpoint answer with `status`.
    pub fn fail_token(&self, status: StatusCode) {
        *self.state.token_status.lock() = Some(status);
    }

    /// Answers `method path` with `status` and `body` instead of the default.
    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.state.overrides.lock().push(Override {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
    }

    /// Answers `method path` with a 500.
    pub fn fail(&self, method: Method, path: &str) {
        self.respond(method, path, StatusCode::INTERNAL_SERVER_ERROR, "mock failure");
    }

    /// Delays the answer to `method path` when the body contains a fragment.
    pub fn delay(&self, method: Method, path: &str, body_contains: &str, delay: Duration) {
        self.state.delays.lock().push(Delay {
            method,
            path: path.to_string(),
            body_contains: body_contains.to_string(),
            delay,
        });
    }

    /// Every recorded request, token requests included.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().clone()
    }

    /// Recorded requests against the `/identity` API.
    pub fn api_calls(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.path.starts_with("/identity"))
            .collect()
    }

    /// `"METHOD /path"` lines of the API calls.
    pub fn api_lines(&self) -> Vec<String> {
        self.api_calls().iter().map(RecordedCall::line).collect()
    }
}

/// A port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    port
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();

    state.calls.lock().push(RecordedCall {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });

    let delay = state
        .delays
        .lock()
        .iter()
        .find(|d| d.method == method && d.path == path && body.contains(&d.body_contains))
        .map(|d| d.delay);
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    if path == "/token" {
        return token_response(&state);
    }

    let canned = state
        .overrides
        .lock()
        .iter()
        .find(|o| o.method == method && o.path == path)
        .map(|o| (o.status, o.body.clone()));
    if let Some((status, body)) = canned {
        return (status, body).into_response();
    }

    default_response(&method, &path)
}

fn token_response(state: &MockState) -> Response {
    match *state.token_status.lock() {
        Some(status) => (status, r#"{"error":"unauthorized_client"}"#).into_response(),
        None => axum::Json(json!({
            "access_token": TEST_TOKEN,
            "token_type": "Bearer",
            "expires_in": 300
        }))
        .into_response(),
    }
}

fn default_response(method: &Method, path: &str) -> Response {
    let segments: Vec<&str> = path
        .trim_start_matches("/identity/")
        .split('/')
        .collect();

    match (method.as_str(), segments.as_slice()) {
        ("POST", ["groups"]) => StatusCode::CREATED.into_response(),
        ("GET", ["groups"]) => axum::Json(json!([
            { "name": "hip-projects-testing", "title": "hip-projects-testing",
              "description": "description hip-projects-testing", "acceptMembershipRequest": true }
        ]))
        .into_response(),
        ("GET", ["groups", name]) => axum::Json(json!({
            "name": name,
            "title": name,
            "description": format!("description {name}"),
            "acceptMembershipRequest": true
        }))
        .into_response(),
        ("GET", ["groups", _, "member"]) => axum::Json(json!({
            "users": [{ "id": "2", "username": "bob" }, { "id": "3", "username": "carol" }],
            "units": [],
            "groups": []
        }))
        .into_response(),
        ("GET", ["groups", _, "administrator"]) => axum::Json(json!({
            "users": [{ "id": "1", "username": "alice" }],
            "units": [],
            "groups": []
        }))
        .into_response(),
        ("GET", ["users", username]) => axum::Json(json!({
            "id": "42",
            "mitreid": "301",
            "username": username,
            "firstName": "Bob",
            "lastName": "Builder",
            "biography": "",
            "avatar": "",
            "active": true
        }))
        .into_response(),
        ("PUT" | "DELETE", _) => StatusCode::OK.into_response(),
        _ => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from("no such route"))
            .expect("static response"),
    }
}
