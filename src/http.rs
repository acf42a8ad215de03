//! Shared outbound HTTP helper.
//!
//! Every integration builds an [`HttpClient`] per invocation with its own auth
//! scheme and base URL, then issues one (or a short fixed sequence of)
//! requests. No retries, no backoff, no caching.
//!
//! Response handling:
//! - 2xx with empty body → `null`
//! - 2xx with JSON body → decoded value
//! - 2xx with non-JSON body → `{"rawResponse": "<text>"}`
//! - non-2xx → [`ConnectorError::Api`] with status, message and raw body

use crate::auth::basic_credentials;
use crate::error::ConnectorError;
use crate::JsonValue;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// How the outbound request authenticates.
#[derive(Clone)]
pub enum AuthScheme {
    /// No auth header (e.g. Telegram, where the token is in the URL path).
    None,
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `Authorization: Basic base64(username:password)`
    Basic {
        username: String,
        password: Option<String>,
    },
    /// Arbitrary header, e.g. `Authorization: Bot <token>` or
    /// `Authorization: Ghost <jwt>`.
    Header { name: String, value: String },
}

impl std::fmt::Debug for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthScheme::None => write!(f, "None"),
            AuthScheme::Bearer(_) => write!(f, "Bearer(<redacted>)"),
            AuthScheme::Basic { username, .. } => write!(f, "Basic({}, <redacted>)", username),
            AuthScheme::Header { name, .. } => write!(f, "Header({}, <redacted>)", name),
        }
    }
}

/// HTTP settings shared by every client a connector builds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("wakflo-connectors/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Extracts a human-readable message from a vendor error envelope.
pub type ErrorExtractor = fn(&JsonValue) -> Option<String>;

/// HTTP client for one integration invocation.
pub struct HttpClient {
    http_client: Client,
    base_url: String,
    auth: AuthScheme,
    headers: Vec<(String, String)>,
    error_extractor: Option<ErrorExtractor>,
}

impl HttpClient {
    /// Creates a client rooted at `base_url`.
    pub fn new(base_url: &str, auth: AuthScheme, config: &HttpConfig) -> Result<Self, ConnectorError> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| ConnectorError::Transport {
                context: "failed to create client",
                source,
            })?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            headers: Vec::new(),
            error_extractor: None,
        })
    }

    /// Adds a header sent with every request from this client.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Installs a vendor-specific error message extractor.
    pub fn with_error_extractor(mut self, extractor: ErrorExtractor) -> Self {
        self.error_extractor = Some(extractor);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request(&self, method: Method, path: &str) -> PendingRequest<'_> {
        PendingRequest {
            client: self,
            method,
            url: self.url(path),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            accepted: Vec::new(),
        }
    }

    pub fn get(&self, path: &str) -> PendingRequest<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> PendingRequest<'_> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> PendingRequest<'_> {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: &str) -> PendingRequest<'_> {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> PendingRequest<'_> {
        self.request(Method::DELETE, path)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// One outbound request under construction.
pub struct PendingRequest<'a> {
    client: &'a HttpClient,
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<JsonValue>,
    accepted: Vec<StatusCode>,
}

impl<'a> PendingRequest<'a> {
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Treats a non-2xx status as success with a `null` result.
    pub fn accept_status(mut self, status: StatusCode) -> Self {
        self.accepted.push(status);
        self
    }

    /// Sends the request and decodes the response.
    pub async fn send(self) -> Result<JsonValue, ConnectorError> {
        let client = self.client;
        let mut request = client
            .http_client
            .request(self.method.clone(), &self.url)
            .header("Accept", "application/json");

        request = match &client.auth {
            AuthScheme::None => request,
            AuthScheme::Bearer(token) => request.bearer_auth(token),
            AuthScheme::Basic { username, password } => {
                request.header("Authorization", basic_credentials(username, password.as_deref()))
            }
            AuthScheme::Header { name, value } => request.header(name.as_str(), value.as_str()),
        };

        for (name, value) in client.headers.iter().chain(self.headers.iter()) {
            request = request.header(name.as_str(), value.as_str());
        }
        if !self.query.is_empty() {
            request = request.query(&self.query);
        }
        if let Some(body) = &self.body {
            request = request.json(body);
        }

        debug!(method = %self.method, url = %self.url, "Sending request");

        let response = request.send().await.map_err(|source| ConnectorError::Transport {
            context: "failed to execute request",
            source,
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| ConnectorError::Transport {
            context: "failed to read response body",
            source,
        })?;

        debug!(method = %self.method, url = %self.url, status = status.as_u16(), "Received response");

        if self.accepted.contains(&status) {
            return Ok(JsonValue::Null);
        }

        if !status.is_success() {
            let message = serde_json::from_str::<JsonValue>(&text)
                .ok()
                .and_then(|body| client.error_extractor.and_then(|extract| extract(&body)))
                .unwrap_or_else(|| text.clone());
            warn!(
                method = %self.method,
                url = %self.url,
                status = status.as_u16(),
                "Remote API returned an error"
            );
            return Err(ConnectorError::Api {
                status: status.as_u16(),
                message,
                body: text,
            });
        }

        Ok(decode_body(&text))
    }
}

/// Decodes a 2xx body: `null` when empty, JSON when parseable, otherwise a
/// `{"rawResponse": ...}` wrapper.
pub fn decode_body(text: &str) -> JsonValue {
    if text.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::json!({ "rawResponse": text }))
}

/// `{"success": true}` for endpoints that answer with an empty body.
pub fn success_or(value: JsonValue) -> JsonValue {
    if value.is_null() {
        serde_json::json!({ "success": true })
    } else {
        value
    }
}
