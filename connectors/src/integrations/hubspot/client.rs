use serde_json::json;
use wakflo::http::{AuthScheme, HttpClient, HttpConfig};
use wakflo::{AuthContext, ConnectorError, JsonValue};

use super::config::{BASE_URL, CONTACTS_PATH, CONTACT_PROPERTIES};

pub fn connect(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    let token = auth.access_token()?;
    Ok(
        HttpClient::new(base_url.unwrap_or(BASE_URL), AuthScheme::Bearer(token.to_string()), http)?
            .with_error_extractor(|body| body["message"].as_str().map(str::to_string)),
    )
}

/// Runs a contact search with the given filters, newest first.
pub async fn search_contacts(
    client: &HttpClient,
    filters: Vec<JsonValue>,
    limit: u32,
) -> Result<JsonValue, ConnectorError> {
    let filter_groups = if filters.is_empty() {
        json!([])
    } else {
        json!([{"filters": filters}])
    };
    client
        .post(&format!("{}/search", CONTACTS_PATH))
        .json(json!({
            "filterGroups": filter_groups,
            "sorts": [{"propertyName": "createdate", "direction": "DESCENDING"}],
            "properties": CONTACT_PROPERTIES,
            "limit": limit,
        }))
        .send()
        .await
}
