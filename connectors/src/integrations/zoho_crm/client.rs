use async_trait::async_trait;
use wakflo::form::{OptionsContext, OptionsLoader, SelectOption};
use wakflo::http::{AuthScheme, HttpClient, HttpConfig};
use wakflo::{AuthContext, ConnectorError, JsonValue};

use super::config::{API_PATH, DEFAULT_API_DOMAIN};

/// Builds a client for the account's data centre (`api_domain`).
pub fn connect(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    let token = auth.access_token()?;
    let base_url = match base_url {
        Some(url) => url.to_string(),
        None => format!(
            "{}{}",
            auth.get("api_domain").unwrap_or(DEFAULT_API_DOMAIN).trim_end_matches('/'),
            API_PATH
        ),
    };
    let scheme = AuthScheme::Header {
        name: "Authorization".to_string(),
        value: format!("Zoho-oauthtoken {}", token),
    };
    Ok(HttpClient::new(&base_url, scheme, http)?.with_error_extractor(extract_error))
}

fn extract_error(body: &JsonValue) -> Option<String> {
    let message = body["message"].as_str()?;
    Some(match body["code"].as_str() {
        Some(code) => format!("{}: {}", code, message),
        None => message.to_string(),
    })
}

/// Checks the per-record result of a write and returns it.
///
/// Zoho answers writes with 2xx even when the record was rejected; the real
/// outcome is `data[0].status`.
pub fn record_result(response: &JsonValue) -> Result<JsonValue, ConnectorError> {
    let result = response["data"]
        .get(0)
        .ok_or_else(|| ConnectorError::Decode("write response did not contain a result".to_string()))?;
    if result["status"].as_str() == Some("error") {
        return Err(ConnectorError::Api {
            status: 400,
            message: extract_error(result).unwrap_or_else(|| "record rejected".to_string()),
            body: response.to_string(),
        });
    }
    Ok(result.clone())
}

pub fn module_path(module: &str) -> String {
    format!("/{}", urlencoding::encode(module.trim()))
}

/// Modules exposed through the API (Leads, Contacts, Deals, custom ...).
pub struct ModuleOptions {
    pub base_url: Option<String>,
}

#[async_trait]
impl OptionsLoader for ModuleOptions {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let response = client.get("/settings/modules").send().await?;
        Ok(response["modules"]
            .as_array()
            .map(|modules| {
                modules
                    .iter()
                    .filter(|m| m["api_supported"].as_bool() == Some(true))
                    .filter_map(|m| {
                        let api_name = m["api_name"].as_str()?;
                        let label = m["plural_label"].as_str().unwrap_or(api_name);
                        Some(SelectOption::new(api_name, label))
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
