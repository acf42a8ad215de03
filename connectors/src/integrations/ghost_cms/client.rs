use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use wakflo::http::{AuthScheme, HttpClient, HttpConfig};
use wakflo::{AuthContext, ConnectorError, JsonValue};

use super::config::{ACCEPT_VERSION, ADMIN_PATH, TOKEN_AUDIENCE, TOKEN_TTL_SECS};

type HmacSha256 = Hmac<Sha256>;

/// Signs a short-lived Admin API JWT from an `id:secret` admin key.
///
/// The secret half is hex; it is decoded to raw bytes before use as the
/// HS256 key.
pub fn admin_token(admin_key: &str, issued_at: i64) -> Result<String, ConnectorError> {
    let (id, secret) = admin_key
        .trim()
        .split_once(':')
        .filter(|(id, secret)| !id.is_empty() && !secret.is_empty())
        .ok_or_else(|| ConnectorError::Auth("admin API key must look like '<id>:<secret>'".to_string()))?;
    let secret = hex::decode(secret)
        .map_err(|_| ConnectorError::Auth("admin API key secret is not hex".to_string()))?;

    let header = json!({"alg": "HS256", "typ": "JWT", "kid": id});
    let claims = json!({
        "iat": issued_at,
        "exp": issued_at + TOKEN_TTL_SECS,
        "aud": TOKEN_AUDIENCE,
    });
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    );

    let mut mac = HmacSha256::new_from_slice(&secret)
        .map_err(|e| ConnectorError::Auth(format!("invalid signing key: {}", e)))?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}

/// Builds an Admin API client with a freshly signed token.
pub fn connect(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    let token = admin_token(auth.require("admin_api_key")?, Utc::now().timestamp())?;
    let base_url = match base_url {
        Some(url) => url.to_string(),
        None => format!("{}{}", auth.require("url")?.trim_end_matches('/'), ADMIN_PATH),
    };
    let scheme = AuthScheme::Header {
        name: "Authorization".to_string(),
        value: format!("Ghost {}", token),
    };
    Ok(HttpClient::new(&base_url, scheme, http)?
        .with_header("Accept-Version", ACCEPT_VERSION)
        .with_error_extractor(extract_error))
}

/// Ghost wraps failures as `{"errors": [{"message": ..., "context": ...}]}`.
fn extract_error(body: &JsonValue) -> Option<String> {
    let first = body["errors"].get(0)?;
    let message = first["message"].as_str()?;
    Some(match first["context"].as_str() {
        Some(context) => format!("{} {}", message, context),
        None => message.to_string(),
    })
}

/// First element of a Ghost resource envelope (`{"posts": [..]}`).
pub fn first_resource(mut response: JsonValue, key: &str) -> Result<JsonValue, ConnectorError> {
    match response.get_mut(key).and_then(|items| items.get_mut(0)) {
        Some(item) => Ok(item.take()),
        None => Err(ConnectorError::Decode(format!("response did not contain any {}", key))),
    }
}
