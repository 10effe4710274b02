// Secret lister route definitions

use axum::{routing::get, Router};

use crate::api::echo::echo_routes;
use crate::config::state::AppState;
use super::handler;

/// Full surface of the secret lister service
pub fn secret_lister_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_secrets))
        .merge(echo_routes())
}
