//! Auth schema declared by integrations and credentials handed in by the host.
//!
//! Token refresh and storage belong to the host platform. Connectors only read
//! an [`AuthContext`] for the duration of one invocation.

use crate::error::ConnectorError;
use crate::form::Property;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[cfg(test)]
mod tests;

/// OAuth configuration for an integration.
///
/// Defines the OAuth 2.0 endpoints and scopes the host uses to obtain a token.
///
/// # Example
/// ```
/// use wakflo::OAuthConfig;
///
/// let config = OAuthConfig {
///     auth_url: "https://app.todoist.com/oauth/authorize".to_string(),
///     token_url: "https://todoist.com/oauth/access_token".to_string(),
///     scopes: vec!["data:read_write".to_string()],
/// };
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// OAuth authorization endpoint URL
    pub auth_url: String,

    /// OAuth token exchange endpoint URL
    pub token_url: String,

    /// Required OAuth scopes for this integration
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    pub fn new(auth_url: &str, token_url: &str, scopes: &[&str]) -> Self {
        Self {
            auth_url: auth_url.to_string(),
            token_url: token_url.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// How the host collects credentials for an integration.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthSchema {
    /// No credentials needed.
    None,
    /// OAuth 2.0 authorization-code flow run by the host.
    #[serde(rename = "oauth2")]
    OAuth2(OAuthConfig),
    /// Custom form (API key, domain, bot token, ...). Values arrive in
    /// [`AuthContext::extra`] keyed by each property's key.
    Custom { fields: Vec<Property> },
}

/// Auth declaration returned by `Integration::auth`.
#[derive(Clone, Debug, Serialize)]
pub struct IntegrationAuth {
    pub required: bool,
    pub schema: AuthSchema,
}

impl IntegrationAuth {
    pub fn oauth2(config: OAuthConfig) -> Self {
        Self {
            required: true,
            schema: AuthSchema::OAuth2(config),
        }
    }

    pub fn custom(fields: Vec<Property>) -> Self {
        Self {
            required: true,
            schema: AuthSchema::Custom { fields },
        }
    }

    pub fn none() -> Self {
        Self {
            required: false,
            schema: AuthSchema::None,
        }
    }
}

/// Credentials supplied by the host for one invocation. Read-only.
///
/// OAuth integrations read `access_token`; custom-auth integrations read their
/// form values (API key, domain, instance URL, ...) from `extra`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthContext {
    /// OAuth access token (or the primary secret for token-style auth)
    #[serde(default, alias = "accessToken")]
    pub access_token: Option<String>,

    /// Token type reported by the provider (usually "Bearer")
    #[serde(default, alias = "tokenType")]
    pub token_type: Option<String>,

    /// When the access token expires (UTC)
    #[serde(default, alias = "expiresAt")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Extra auth parameters: api keys, domains, instance URLs, client ids.
    #[serde(default)]
    pub extra: HashMap<String, String>,
}

impl AuthContext {
    /// Context carrying only an OAuth access token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Adds an extra auth parameter.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Returns the access token, or an auth error if it is missing or blank.
    pub fn access_token(&self) -> Result<&str, ConnectorError> {
        match self.access_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ConnectorError::Auth("missing access token".to_string())),
        }
    }

    /// Returns a non-blank extra parameter, or an auth error naming it.
    pub fn require(&self, key: &str) -> Result<&str, ConnectorError> {
        match self.get(key) {
            Some(value) => Ok(value),
            None => Err(ConnectorError::Auth(format!("missing auth field '{}'", key))),
        }
    }

    /// Returns an extra parameter if present and non-blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.extra
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&String> = self.extra.keys().collect();
        f.debug_struct("AuthContext")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("extra_keys", &keys)
            .finish()
    }
}

/// Encodes `username:password` the way an HTTP Basic `Authorization` header does.
pub fn basic_credentials(username: &str, password: Option<&str>) -> String {
    let raw = format!("{}:{}", username, password.unwrap_or(""));
    format!("Basic {}", BASE64.encode(raw))
}
