// Key Vault secrets client, limited to enumerating secret properties

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::identity::ManagedIdentityCredential;

pub const SECRETS_API_VERSION: &str = "7.4";

/// Resource Key Vault tokens are issued for
pub const KEY_VAULT_SCOPE: &str = "https://vault.azure.net";

/// Metadata of one secret. Values are never fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct SecretProperties {
    pub id: String,
}

impl SecretProperties {
    /// Last path segment of the secret id
    pub fn name(&self) -> Option<&str> {
        self.id.trim_end_matches('/').rsplit('/').next()
    }
}

#[derive(Deserialize)]
struct SecretListPage {
    #[serde(default)]
    value: Vec<SecretProperties>,
    #[serde(rename = "nextLink", default)]
    next_link: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SecretClient {
    vault_url: String,
    credential: ManagedIdentityCredential,
    http: Client,
    allow_http: bool,
}

impl SecretClient {
    pub fn new(vault_url: impl Into<String>, credential: ManagedIdentityCredential, http: Client) -> Self {
        Self {
            vault_url: vault_url.into().trim_end_matches('/').to_string(),
            credential,
            http,
            allow_http: false,
        }
    }

    /// Lets the bearer token travel over plain http. Local vault emulators only.
    pub fn allow_http(mut self, allow: bool) -> Self {
        self.allow_http = allow;
        self
    }

    /// Every URL the token is sent to must be https unless http was allowed
    fn ensure_secure(&self, url: &str) -> Result<()> {
        let parsed: Url = Url::parse(url).with_context(|| format!("invalid key vault url {url}"))?;
        match parsed.scheme() {
            "https" => Ok(()),
            "http" if self.allow_http => Ok(()),
            scheme => anyhow::bail!("refusing to send key vault token over {scheme}: {url}"),
        }
    }

    /// Walks every page of the vault's secret list. Any token, transport,
    /// status or decoding error aborts the walk.
    #[instrument(skip(self), fields(vault = %self.vault_url))]
    pub async fn list_properties_of_secrets(&self) -> Result<Vec<SecretProperties>> {
        self.ensure_secure(&self.vault_url)?;

        let token: String = self
            .credential
            .get_token(KEY_VAULT_SCOPE)
            .await
            .context("failed to acquire key vault token")?;

        let mut secrets: Vec<SecretProperties> = Vec::new();
        let mut url: String = format!(
            "{}/secrets?api-version={}",
            self.vault_url, SECRETS_API_VERSION
        );
        let mut pages: usize = 0;

        loop {
            // nextLink comes from the server, check it like the configured url
            self.ensure_secure(&url)?;

            let response: reqwest::Response = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .send()
                .await
                .with_context(|| format!("key vault request to {url} failed"))?;

            let status: StatusCode = response.status();
            if !status.is_success() {
                let body: String = response.text().await.unwrap_or_default();
                anyhow::bail!("list secrets failed: {status} {body}");
            }

            let page: SecretListPage = response
                .json()
                .await
                .context("failed to decode list secrets response")?;

            pages += 1;
            debug!(
                page = pages,
                names = ?page.value.iter().filter_map(SecretProperties::name).collect::<Vec<&str>>(),
                "secret page received"
            );
            secrets.extend(page.value);

            match page.next_link.filter(|link| !link.is_empty()) {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(secrets)
    }
}
