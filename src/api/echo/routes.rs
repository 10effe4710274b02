// Identity variable echo routes, mounted by both services

use axum::{routing::get, Router};

use crate::config::state::AppState;
use super::handler;

pub fn echo_routes() -> Router<AppState> {
    Router::new()
        .route("/identity_endpoint", get(handler::identity_endpoint))
        .route("/identity_header", get(handler::identity_header))
        .route("/identity_server_thumbprint", get(handler::identity_server_thumbprint))
}
