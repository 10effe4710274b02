// Start of file: /src/config/environment.rs

// * Server and probe configuration, read once at startup from an
// * environment lookup.

use std::{borrow::Cow, time::Duration};
// * anyhow for convenient error handling
use anyhow::{Context, Result};
use tracing::warn;

use crate::config::lookup::EnvLookup;

// ! Default values for environment variables (used if variables aren't set):
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 80;
const DEFAULT_TIMEOUT: u64 = 30; // 30 seconds

// * A struct containing all environment variables used by the app
#[derive(Clone, Debug)]
pub struct EnvironmentVariables {
    pub environment: Cow<'static, str>,
    pub host: Cow<'static, str>,
    pub port: u16,
    pub default_timeout_seconds: u64,
    pub key_vault_url: Option<String>,
    pub key_vault_allow_http: bool,
    pub identity_tls_skip_verify: bool,
    pub identity_request_timeout: Option<Duration>,
}

impl EnvironmentVariables {
    // * Loads configuration from the process environment.
    // * Only reads .env if ENVIRONMENT != "production".
    pub fn load() -> Result<Self> {
        // ? In non-production environments, attempt to load .env
        if std::env::var("ENVIRONMENT").unwrap_or_default() != "production" {
            dotenv::dotenv().ok();
        }

        Self::from_lookup(&crate::config::lookup::ProcessEnv)
    }

    // * Builds the configuration from any lookup, providing defaults if missing
    pub fn from_lookup(env: &dyn EnvLookup) -> Result<Self> {
        let get_var = |key: &str| env.get(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            environment: get_var("ENVIRONMENT")
                .map(Cow::Owned)
                .unwrap_or_else(|| {
                    warn!("Missing ENVIRONMENT, defaulting to '{DEFAULT_ENVIRONMENT}'");
                    Cow::Borrowed(DEFAULT_ENVIRONMENT)
                }),

            host: get_var("HOST")
                .map(Cow::Owned)
                .unwrap_or(Cow::Borrowed(DEFAULT_HOST)),

            port: get_var("PORT")
                .map(|s| s.parse().context("Invalid PORT value"))
                .transpose()?
                .unwrap_or(DEFAULT_PORT),

            default_timeout_seconds: get_var("DEFAULT_TIMEOUT_SECONDS")
                .map(|s| s.parse().context("Invalid DEFAULT_TIMEOUT_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_TIMEOUT),

            key_vault_url: get_var("AZURE_KEY_VAULT_URL")
                .map(|s| s.trim().trim_end_matches('/').to_string()),

            key_vault_allow_http: get_var("KEY_VAULT_ALLOW_HTTP")
                .map(|s| parse_flag(&s).context("Invalid KEY_VAULT_ALLOW_HTTP"))
                .transpose()?
                .unwrap_or(false),

            identity_tls_skip_verify: get_var("IDENTITY_TLS_SKIP_VERIFY")
                .map(|s| parse_flag(&s).context("Invalid IDENTITY_TLS_SKIP_VERIFY"))
                .transpose()?
                .unwrap_or(false),

            identity_request_timeout: get_var("IDENTITY_REQUEST_TIMEOUT_SECONDS")
                .map(|s| s.parse::<u64>().context("Invalid IDENTITY_REQUEST_TIMEOUT_SECONDS"))
                .transpose()?
                // 0 means no timeout, same as unset
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{other}'"),
    }
}


// End of file: /src/config/environment.rs
