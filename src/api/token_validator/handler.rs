// Token validation probe: ask the identity endpoint for a Key Vault token and
// check the shape of what comes back

use anyhow::Context;
use axum::{body::Bytes, extract::State};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::config::{lookup::EnvLookup, state::AppState};
use crate::identity::token::KEY_VAULT_RESOURCE;
use crate::identity::{IdentitySource, TokenCheck, TokenResponse, IDENTITY_ENDPOINT, IDENTITY_HEADER};
use crate::utils::error_handler::AppError;

pub const NOT_CONFIGURED: &str = "Managed identity environment variables not found";
pub const TOKEN_REQUEST_FAILED: &str = "Token request failed";
pub const TOKEN_REQUEST_SUCCEEDED: &str = "Token request succeeded";
pub const HELLO_WORLD: &str = "Hello world!";

/// What the probe concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    NotConfigured,
    Rejected(TokenCheck),
    Accepted,
}

impl ProbeOutcome {
    /// Text sent to the caller. Every rejection reads the same.
    pub fn message(self) -> &'static str {
        match self {
            ProbeOutcome::NotConfigured => NOT_CONFIGURED,
            ProbeOutcome::Rejected(_) => TOKEN_REQUEST_FAILED,
            ProbeOutcome::Accepted => TOKEN_REQUEST_SUCCEEDED,
        }
    }
}

/// Requests a Key Vault token with the Service Fabric protocol and validates
/// it. Transport and decoding failures are errors, not outcomes.
pub async fn probe_token(env: &dyn EnvLookup, client: &reqwest::Client) -> anyhow::Result<ProbeOutcome> {
    let endpoint: Option<String> = env.get(IDENTITY_ENDPOINT).filter(|v| !v.is_empty());
    let secret: Option<String> = env.get(IDENTITY_HEADER).filter(|v| !v.is_empty());

    let (Some(endpoint), Some(secret)) = (endpoint, secret) else {
        return Ok(ProbeOutcome::NotConfigured);
    };

    let source: IdentitySource = IdentitySource::ServiceFabric { endpoint, secret };

    let response: reqwest::Response = source
        .request(client, KEY_VAULT_RESOURCE)
        .send()
        .await
        .context("identity endpoint request failed")?;

    info!(status = response.status().as_u16(), "identity endpoint answered");

    let body: Bytes = response
        .bytes()
        .await
        .context("failed to read identity endpoint response")?;
    let token: TokenResponse = TokenResponse::from_body(&body)
        .context("identity endpoint returned a body that is not a token JSON object")?;

    Ok(match token.check(Utc::now().timestamp()) {
        Ok(()) => ProbeOutcome::Accepted,
        Err(check) => {
            warn!(%check, "token rejected");
            ProbeOutcome::Rejected(check)
        }
    })
}

#[instrument(skip(state))]
pub async fn validate_token(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let outcome: ProbeOutcome = probe_token(state.env.as_ref(), &state.identity_http).await?;
    info!(?outcome, "token probe finished");
    Ok(outcome.message())
}

/// Names of all environment variables, sorted, one per line
#[instrument(skip(state))]
pub async fn all_variables(State(state): State<AppState>) -> String {
    let mut names: Vec<String> = state.env.names();
    names.sort();
    names.join("\n")
}

pub async fn hello_world() -> &'static str {
    HELLO_WORLD
}
