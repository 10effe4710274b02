// Token response returned by managed identity endpoints, and the shape checks
// the token validator runs against it

use anyhow::Context;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Resource the probes request tokens for
pub const KEY_VAULT_RESOURCE: &str = "https://vault.azure.net/";

/// Token type every identity endpoint is expected to hand out
pub const BEARER: &str = "Bearer";

/// Token payload as sent by the identity endpoint.
///
/// Fields are optional and loosely typed: a field with an unexpected JSON type
/// is treated as missing rather than failing the whole parse. `expires_on` is
/// accepted both as a number and as a numeric string, since Service Fabric and
/// App Service disagree on that.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub access_token: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub expires_on: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub resource: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub token_type: Option<String>,
}

/// First check a token failed, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCheck {
    MissingAccessToken,
    Expired,
    WrongResource,
    WrongTokenType,
}

impl std::fmt::Display for TokenCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text: &str = match self {
            TokenCheck::MissingAccessToken => "access_token missing or empty",
            TokenCheck::Expired => "expires_on missing or not in the future",
            TokenCheck::WrongResource => "resource missing or not the key vault resource",
            TokenCheck::WrongTokenType => "token_type missing or not Bearer",
        };
        f.write_str(text)
    }
}

impl TokenResponse {
    /// Decodes a token endpoint body. Only a JSON object is a token payload;
    /// arrays, scalars and `null` are rejected like any other malformed body.
    pub fn from_body(body: &[u8]) -> anyhow::Result<Self> {
        let fields: Map<String, Value> =
            serde_json::from_slice(body).context("token body is not a JSON object")?;
        serde_json::from_value(Value::Object(fields)).context("token object could not be decoded")
    }

    /// Runs the checks in order and stops at the first failure.
    /// `now` is unix seconds.
    pub fn check(&self, now: i64) -> Result<(), TokenCheck> {
        if self.access_token.as_deref().is_none_or(str::is_empty) {
            return Err(TokenCheck::MissingAccessToken);
        }

        if self.expires_on.is_none_or(|expires_on| expires_on <= now) {
            return Err(TokenCheck::Expired);
        }

        if self.resource.as_deref() != Some(KEY_VAULT_RESOURCE) {
            return Err(TokenCheck::WrongResource);
        }

        if self.token_type.as_deref() != Some(BEARER) {
            return Err(TokenCheck::WrongTokenType);
        }

        Ok(())
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}
