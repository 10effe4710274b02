// Endpoints that echo the managed identity variables the platform injected

use axum::extract::State;
use tracing::{debug, instrument};

use crate::config::{lookup::EnvLookup, state::AppState};
use crate::identity::{IDENTITY_ENDPOINT, IDENTITY_HEADER, IDENTITY_SERVER_THUMBPRINT};

/// Value of `name`, or a message naming it when it is not set
pub fn echo_var(env: &dyn EnvLookup, name: &str) -> String {
    match env.get(name) {
        Some(value) => value,
        None => {
            debug!(variable = name, "variable not set");
            format!("No value found for {name}")
        }
    }
}

#[instrument(skip(state))]
pub async fn identity_endpoint(State(state): State<AppState>) -> String {
    echo_var(state.env.as_ref(), IDENTITY_ENDPOINT)
}

#[instrument(skip(state))]
pub async fn identity_header(State(state): State<AppState>) -> String {
    echo_var(state.env.as_ref(), IDENTITY_HEADER)
}

#[instrument(skip(state))]
pub async fn identity_server_thumbprint(State(state): State<AppState>) -> String {
    echo_var(state.env.as_ref(), IDENTITY_SERVER_THUMBPRINT)
}
