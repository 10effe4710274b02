// Application state shared by every handler

use std::{sync::Arc, time::Duration};
use anyhow::{Context, Result};

use crate::config::environment::EnvironmentVariables;
use crate::config::lookup::{EnvLookup, ProcessEnv};

/// Settings the identity endpoint client is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityClientOptions {
    pub accept_invalid_certs: bool,
    pub timeout: Option<Duration>,
}

impl IdentityClientOptions {
    pub fn from_config(environment: &EnvironmentVariables) -> Self {
        Self {
            accept_invalid_certs: environment.identity_tls_skip_verify,
            timeout: environment.identity_request_timeout,
        }
    }

    pub fn build(self) -> Result<reqwest::Client> {
        let mut builder: reqwest::ClientBuilder =
            reqwest::Client::builder().danger_accept_invalid_certs(self.accept_invalid_certs);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if self.accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled for identity endpoint calls");
        }

        builder.build().context("failed to build identity http client")
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub environment: Arc<EnvironmentVariables>,
    pub env: Arc<dyn EnvLookup>,
    pub identity_options: IdentityClientOptions,
    /// Client for the local identity endpoint, built from `identity_options`
    pub identity_http: reqwest::Client,
    /// Client for Key Vault, always verifies certificates
    pub vault_http: reqwest::Client,
}

impl AppState {
    /// Builds state for a real process: config from the environment (and .env)
    pub fn from_process() -> Result<Self> {
        let environment: EnvironmentVariables = EnvironmentVariables::load()?;
        Self::new(environment, Arc::new(ProcessEnv))
    }

    /// Builds state from explicit parts, used by tests to inject variables
    pub fn new(environment: EnvironmentVariables, env: Arc<dyn EnvLookup>) -> Result<Self> {
        let identity_options: IdentityClientOptions = IdentityClientOptions::from_config(&environment);
        let identity_http: reqwest::Client = identity_options.build()?;

        let vault_http: reqwest::Client = reqwest::Client::builder()
            .build()
            .context("failed to build key vault http client")?;

        Ok(Self {
            environment: Arc::new(environment),
            env,
            identity_options,
            identity_http,
            vault_http,
        })
    }
}
