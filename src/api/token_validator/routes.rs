// Token validator route definitions

use axum::{routing::get, Router};

use crate::api::echo::echo_routes;
use crate::config::state::AppState;
use super::handler;

/// Full surface of the token validator service
pub fn token_validator_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::validate_token))
        .route("/all", get(handler::all_variables))
        .route("/helloworld", get(handler::hello_world))
        .merge(echo_routes())
}
