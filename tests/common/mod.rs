//! tests/common/mod.rs
//! Shared helpers: spawn a service on an ephemeral port with an injected
//! environment, and spawn mock upstreams for it to talk to.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use sfmi_probe::{create_app, AppState, EnvironmentVariables, StaticEnv};
use tokio::net::TcpListener as TokioTcpListener;

pub const TOKEN_PATH: &str = "/metadata/identity/oauth2/token";

/// Spawns `routes` with the shared middleware stack, reading variables only
/// from `env`. Returns the base URL, e.g. "http://127.0.0.1:12345".
pub fn spawn_app(routes: Router<AppState>, env: StaticEnv) -> String {
    let config: EnvironmentVariables =
        EnvironmentVariables::from_lookup(&env).expect("Invalid test configuration");
    let state: AppState = AppState::new(config, Arc::new(env)).expect("Failed to build state");

    spawn_router(create_app(routes, state))
}

/// Serves any router on a random unused port in a background task
pub fn spawn_router(app: Router) -> String {
    // * Bind an ephemeral port using std::net::TcpListener.
    let std_listener: std::net::TcpListener = std::net::TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    std_listener.set_nonblocking(true).unwrap();

    // * Convert std::net::TcpListener to tokio::net::TcpListener.
    let tokio_listener: TokioTcpListener = TokioTcpListener::from_std(std_listener)
        .expect("Failed to convert to tokio listener");

    let addr: std::net::SocketAddr = tokio_listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(tokio_listener, app)
            .await
            .expect("Server failed");
    });

    format!("http://{}", addr)
}

/// One request seen by the mock identity endpoint
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub uri: String,
    pub headers: HeaderMap,
}

#[derive(Clone)]
struct MockIdentity {
    status: StatusCode,
    body: Value,
    seen: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn issue_token(State(mock): State<MockIdentity>, uri: Uri, headers: HeaderMap) -> impl IntoResponse {
    mock.seen.lock().unwrap().push(CapturedRequest {
        uri: uri.to_string(),
        headers,
    });
    (mock.status, Json(mock.body))
}

/// Identity endpoint answering every token request with `body`.
/// Returns the full token URL and the log of received requests.
pub fn spawn_identity(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
    let seen: Arc<Mutex<Vec<CapturedRequest>>> = Arc::new(Mutex::new(Vec::new()));
    let mock: MockIdentity = MockIdentity { status, body, seen: seen.clone() };

    let app: Router = Router::new()
        .route(TOKEN_PATH, get(issue_token))
        .with_state(mock);

    (format!("{}{}", spawn_router(app), TOKEN_PATH), seen)
}

/// Unix seconds `offset` away from now
pub fn unix_in(offset: i64) -> i64 {
    chrono::Utc::now().timestamp() + offset
}
