use wakflo::http::{AuthScheme, HttpClient, HttpConfig};
use wakflo::{AuthContext, ConnectorError, JsonValue};

use super::config::BASE_URL_TEMPLATE;

/// Builds a client for the helpdesk. Freshdesk takes the API key as the
/// Basic username with a dummy `X` password.
pub fn connect(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    let api_key = auth.require("api_key")?;
    let base_url = match base_url {
        Some(url) => url.to_string(),
        None => BASE_URL_TEMPLATE.replace("{domain}", &normalize_domain(auth.require("domain")?)),
    };
    let scheme = AuthScheme::Basic {
        username: api_key.to_string(),
        password: Some("X".to_string()),
    };
    Ok(HttpClient::new(&base_url, scheme, http)?.with_error_extractor(extract_error))
}

/// Accepts `acme`, `acme.freshdesk.com` or a full `https://` URL.
fn normalize_domain(raw: &str) -> String {
    let host = raw
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    host.strip_suffix(".freshdesk.com").unwrap_or(host).to_string()
}

/// `{"description": "Validation failed", "errors": [{"field", "message"}]}`
fn extract_error(body: &JsonValue) -> Option<String> {
    let description = body["description"].as_str()?;
    match body["errors"].get(0) {
        Some(first) => Some(format!(
            "{}: {} {}",
            description,
            first["field"].as_str().unwrap_or_default(),
            first["message"].as_str().unwrap_or_default()
        )),
        None => Some(description.to_string()),
    }
}

/// Parses a numeric choice from a select field, checking it against `allowed`.
pub fn choice(field: &str, raw: Option<&str>, allowed: &[(&str, &str)]) -> Result<Option<u8>, ConnectorError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if !allowed.iter().any(|(id, _)| *id == raw) {
        return Err(ConnectorError::invalid(field, format!("'{}' is not a valid {}", raw, field)));
    }
    raw.parse()
        .map(Some)
        .map_err(|_| ConnectorError::invalid(field, format!("'{}' is not a number", raw)))
}
