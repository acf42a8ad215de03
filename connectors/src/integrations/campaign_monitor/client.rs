use async_trait::async_trait;
use wakflo::form::{to_options, OptionsContext, OptionsLoader, SelectOption};
use wakflo::http::{AuthScheme, HttpClient, HttpConfig};
use wakflo::{AuthContext, ConnectorError, JsonValue};

use super::config::BASE_URL;

/// API key as the Basic username; the password is ignored by the API.
pub fn connect(
    auth: &AuthContext,
    http: &HttpConfig,
    base_url: Option<&str>,
) -> Result<HttpClient, ConnectorError> {
    let api_key = auth.require("api_key")?;
    let scheme = AuthScheme::Basic {
        username: api_key.to_string(),
        password: Some("x".to_string()),
    };
    Ok(HttpClient::new(base_url.unwrap_or(BASE_URL), scheme, http)?.with_error_extractor(extract_error))
}

/// `{"Code": 1, "Message": "Invalid Email Address"}`
fn extract_error(body: &JsonValue) -> Option<String> {
    let message = body["Message"].as_str()?;
    Some(match body["Code"].as_i64() {
        Some(code) => format!("{} (code {})", message, code),
        None => message.to_string(),
    })
}

pub fn list_segment(list_id: &str) -> String {
    urlencoding::encode(list_id.trim()).into_owned()
}

/// Subscriber lists of the client named by the `client_id` auth field.
pub struct ListOptions {
    pub base_url: Option<String>,
}

#[async_trait]
impl OptionsLoader for ListOptions {
    async fn load(&self, ctx: &OptionsContext) -> Result<Vec<SelectOption>, ConnectorError> {
        let client_id = ctx.auth.require("client_id")?;
        let client = connect(&ctx.auth, &ctx.http, self.base_url.as_deref())?;
        let lists = client
            .get(&format!("/clients/{}/lists.json", urlencoding::encode(client_id)))
            .send()
            .await?;
        Ok(to_options(&lists, "ListID", "Name"))
    }
}
