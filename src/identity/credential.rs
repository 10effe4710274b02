// Managed identity credential: picks the token source the host platform
// exposes and fetches access tokens from it

use anyhow::{Context, Result};
use axum::body::Bytes;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, info, instrument};

use crate::config::lookup::EnvLookup;
use crate::identity::token::TokenResponse;
use crate::identity::{IDENTITY_ENDPOINT, IDENTITY_HEADER, IDENTITY_SERVER_THUMBPRINT};

pub const SERVICE_FABRIC_API_VERSION: &str = "2019-07-01-preview";
pub const APP_SERVICE_API_VERSION: &str = "2019-08-01";
pub const IMDS_API_VERSION: &str = "2018-02-01";
pub const IMDS_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

/// Where tokens come from, decided by which ambient variables are present
#[derive(Clone, PartialEq, Eq)]
pub enum IdentitySource {
    /// Service Fabric cluster: endpoint, secret and server thumbprint are set
    ServiceFabric { endpoint: String, secret: String },
    /// App Service / Functions: endpoint and secret are set
    AppService { endpoint: String, secret: String },
    /// Azure instance metadata service, the fallback on plain VMs
    Imds,
}

// Secrets stay out of logs
impl std::fmt::Debug for IdentitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentitySource::ServiceFabric { endpoint, .. } => f
                .debug_struct("ServiceFabric")
                .field("endpoint", endpoint)
                .finish_non_exhaustive(),
            IdentitySource::AppService { endpoint, .. } => f
                .debug_struct("AppService")
                .field("endpoint", endpoint)
                .finish_non_exhaustive(),
            IdentitySource::Imds => f.write_str("Imds"),
        }
    }
}

impl IdentitySource {
    pub fn from_env(env: &dyn EnvLookup) -> Self {
        let endpoint: Option<String> = env.get(IDENTITY_ENDPOINT).filter(|v| !v.is_empty());
        let secret: Option<String> = env.get(IDENTITY_HEADER).filter(|v| !v.is_empty());
        let thumbprint: Option<String> =
            env.get(IDENTITY_SERVER_THUMBPRINT).filter(|v| !v.is_empty());

        match (endpoint, secret, thumbprint) {
            (Some(endpoint), Some(secret), Some(_)) => {
                IdentitySource::ServiceFabric { endpoint, secret }
            }
            (Some(endpoint), Some(secret), None) => IdentitySource::AppService { endpoint, secret },
            _ => IdentitySource::Imds,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IdentitySource::ServiceFabric { .. } => "service_fabric",
            IdentitySource::AppService { .. } => "app_service",
            IdentitySource::Imds => "imds",
        }
    }

    /// Token URL for `resource`. The query is appended as-is so the resource
    /// URL reaches the endpoint unencoded.
    pub fn token_url(&self, resource: &str) -> String {
        let (endpoint, api_version): (&str, &str) = match self {
            IdentitySource::ServiceFabric { endpoint, .. } => {
                (endpoint.as_str(), SERVICE_FABRIC_API_VERSION)
            }
            IdentitySource::AppService { endpoint, .. } => {
                (endpoint.as_str(), APP_SERVICE_API_VERSION)
            }
            IdentitySource::Imds => (IMDS_ENDPOINT, IMDS_API_VERSION),
        };

        format!("{endpoint}?api-version={api_version}&resource={resource}")
    }

    /// GET request for a token, with the header the source authenticates by
    pub fn request(&self, client: &Client, resource: &str) -> RequestBuilder {
        let builder: RequestBuilder = client.get(self.token_url(resource));

        match self {
            IdentitySource::ServiceFabric { secret, .. } => builder.header("Secret", secret),
            IdentitySource::AppService { secret, .. } => {
                builder.header("X-IDENTITY-HEADER", secret)
            }
            IdentitySource::Imds => builder.header("Metadata", "true"),
        }
    }
}

/// Acquires tokens for a resource from the ambient managed identity
#[derive(Debug, Clone)]
pub struct ManagedIdentityCredential {
    source: IdentitySource,
    client: Client,
}

impl ManagedIdentityCredential {
    pub fn new(source: IdentitySource, client: Client) -> Self {
        Self { source, client }
    }

    pub fn from_env(env: &dyn EnvLookup, client: Client) -> Self {
        let source: IdentitySource = IdentitySource::from_env(env);
        info!(source = source.name(), "managed identity credential selected");
        Self::new(source, client)
    }

    /// Returns a bearer access token for `resource`
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn get_token(&self, resource: &str) -> Result<String> {
        let response: reqwest::Response = self
            .source
            .request(&self.client, resource)
            .send()
            .await
            .with_context(|| format!("{} token request failed", self.source.name()))?;

        let status: StatusCode = response.status();
        if !status.is_success() {
            let body: String = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "{} token endpoint returned {status}: {body}",
                self.source.name()
            );
        }

        let body: Bytes = response
            .bytes()
            .await
            .context("failed to read managed identity token response")?;
        let token: TokenResponse = TokenResponse::from_body(&body)
            .context("failed to decode managed identity token response")?;

        debug!(expires_on = ?token.expires_on, "managed identity token acquired");

        token
            .access_token
            .filter(|t| !t.is_empty())
            .context("managed identity token response has no access_token")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::lookup::StaticEnv;

    const ENDPOINT: &str = "https://10.0.0.4:2377/metadata/identity/oauth2/token";

    #[test]
    fn service_fabric_needs_the_thumbprint() {
        let env: StaticEnv = StaticEnv::new()
            .with(IDENTITY_ENDPOINT, ENDPOINT)
            .with(IDENTITY_HEADER, "s3cret")
            .with(IDENTITY_SERVER_THUMBPRINT, "9A1B2C");

        assert_eq!(
            IdentitySource::from_env(&env),
            IdentitySource::ServiceFabric { endpoint: ENDPOINT.into(), secret: "s3cret".into() }
        );
    }

    #[test]
    fn endpoint_and_header_without_thumbprint_is_app_service() {
        let env: StaticEnv = StaticEnv::new()
            .with(IDENTITY_ENDPOINT, ENDPOINT)
            .with(IDENTITY_HEADER, "s3cret");

        assert_eq!(IdentitySource::from_env(&env).name(), "app_service");
    }

    #[test]
    fn anything_less_falls_back_to_imds() {
        let only_endpoint: StaticEnv = StaticEnv::new().with(IDENTITY_ENDPOINT, ENDPOINT);
        assert_eq!(IdentitySource::from_env(&only_endpoint), IdentitySource::Imds);

        let empty_header: StaticEnv = StaticEnv::new()
            .with(IDENTITY_ENDPOINT, ENDPOINT)
            .with(IDENTITY_HEADER, "")
            .with(IDENTITY_SERVER_THUMBPRINT, "9A1B2C");
        assert_eq!(IdentitySource::from_env(&empty_header), IdentitySource::Imds);
    }

    #[test]
    fn token_urls_keep_resource_unencoded() {
        let sf: IdentitySource =
            IdentitySource::ServiceFabric { endpoint: ENDPOINT.into(), secret: "x".into() };
        assert_eq!(
            sf.token_url("https://vault.azure.net/"),
            format!("{ENDPOINT}?api-version=2019-07-01-preview&resource=https://vault.azure.net/")
        );

        assert_eq!(
            IdentitySource::Imds.token_url("https://vault.azure.net"),
            "http://169.254.169.254/metadata/identity/oauth2/token?api-version=2018-02-01&resource=https://vault.azure.net"
        );
    }

    #[test]
    fn requests_carry_the_source_header() {
        let client: Client = Client::new();

        let sf: reqwest::Request = IdentitySource::ServiceFabric {
            endpoint: ENDPOINT.into(),
            secret: "s3cret".into(),
        }
        .request(&client, "https://vault.azure.net/")
        .build()
        .unwrap();
        assert_eq!(sf.headers()["Secret"], "s3cret");
        assert_eq!(
            sf.url().query(),
            Some("api-version=2019-07-01-preview&resource=https://vault.azure.net/")
        );

        let app: reqwest::Request = IdentitySource::AppService {
            endpoint: ENDPOINT.into(),
            secret: "s3cret".into(),
        }
        .request(&client, "https://vault.azure.net")
        .build()
        .unwrap();
        assert_eq!(app.headers()["X-IDENTITY-HEADER"], "s3cret");

        let imds: reqwest::Request =
            IdentitySource::Imds.request(&client, "https://vault.azure.net").build().unwrap();
        assert_eq!(imds.headers()["Metadata"], "true");
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let sf: IdentitySource =
            IdentitySource::ServiceFabric { endpoint: ENDPOINT.into(), secret: "s3cret".into() };
        assert!(!format!("{sf:?}").contains("s3cret"));
    }
}
