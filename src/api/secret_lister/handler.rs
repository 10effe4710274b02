// Secret listing probe: authenticate with the managed identity and enumerate
// the vault's secrets

use anyhow::Context;
use axum::extract::State;
use tracing::{info, instrument};

use crate::config::state::AppState;
use crate::identity::ManagedIdentityCredential;
use crate::keyvault::{SecretClient, SecretProperties};
use crate::utils::error_handler::AppError;

pub const SECRET_FETCHING_SUCCEEDED: &str = "Secret fetching succeeded";

/// Errors are not reported as text here: any failure becomes a bare 500
#[instrument(skip(state))]
pub async fn list_secrets(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let vault_url: &str = state
        .environment
        .key_vault_url
        .as_deref()
        .context("AZURE_KEY_VAULT_URL is not set")?;

    let credential: ManagedIdentityCredential =
        ManagedIdentityCredential::from_env(state.env.as_ref(), state.identity_http.clone());
    let client: SecretClient = SecretClient::new(vault_url, credential, state.vault_http.clone())
        .allow_http(state.environment.key_vault_allow_http);

    let secrets: Vec<SecretProperties> = client.list_properties_of_secrets().await?;

    info!(count = secrets.len(), "listed secret properties");
    Ok(SECRET_FETCHING_SUCCEEDED)
}
